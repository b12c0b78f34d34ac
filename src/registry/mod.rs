// src/registry/mod.rs

//! Target registry.
//!
//! Targets are stored in an arena (`Vec<Target>`) in registration order and
//! addressed by [`TargetId`]. A name → id map serves lookups. The registry is
//! populated once at startup and only read afterwards; it holds no interior
//! mutability, so a shared `&TargetRegistry` can be read from any thread.

pub mod target;

use std::collections::HashMap;

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::{Result, TaskchainError};

pub use target::{ActionStep, Target, TargetId};

#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    index: HashMap<String, TargetId>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a registry from a validated config, in the config's key order.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut registry = Self::new();
        for (name, tc) in cfg.targets().iter() {
            registry.insert(Target::from_config(name, tc))?;
        }
        debug!(targets = registry.len(), "target registry populated");
        Ok(registry)
    }

    /// Add a target. Fails if `name` is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        dependencies: Vec<String>,
        actions: Vec<ActionStep>,
    ) -> Result<TargetId> {
        self.insert(Target::new(name, dependencies, actions))
    }

    /// Add a fully built target (description included).
    pub fn insert(&mut self, target: Target) -> Result<TargetId> {
        if self.index.contains_key(&target.name) {
            return Err(TaskchainError::DuplicateTarget(target.name));
        }
        let id = TargetId(self.targets.len());
        self.index.insert(target.name.clone(), id);
        self.targets.push(target);
        Ok(id)
    }

    /// Look up a target by name.
    pub fn lookup(&self, name: &str) -> Result<&Target> {
        self.id_of(name)
            .map(|id| self.get(id))
            .ok_or_else(|| TaskchainError::UnknownTarget {
                name: name.to_string(),
                required_by: None,
            })
    }

    pub fn id_of(&self, name: &str) -> Option<TargetId> {
        self.index.get(name).copied()
    }

    /// Target behind an id issued by this registry.
    pub fn get(&self, id: TargetId) -> &Target {
        &self.targets[id.0]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Targets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Target names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
