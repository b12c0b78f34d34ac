// src/plan/mod.rs

//! Execution plans.
//!
//! - [`resolver`] turns a root target name into a [`Plan`].
//! - [`Plan`] is the resulting linear order, borrowed from the registry and
//!   discarded at the end of the invocation.

pub mod resolver;

use std::fmt;

use crate::registry::Target;

pub use resolver::resolve;

/// Dependency-respecting order of targets for one invocation.
#[derive(Debug, Clone)]
pub struct Plan<'r> {
    root: String,
    targets: Vec<&'r Target>,
}

impl<'r> Plan<'r> {
    pub(crate) fn new(root: String, targets: Vec<&'r Target>) -> Self {
        Self { root, targets }
    }

    /// The target that was requested.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Targets in execution order.
    pub fn targets(&self) -> &[&'r Target] {
        &self.targets
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }

    /// Position of `name` in the plan, if it is part of it.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of external commands the plan will run if nothing fails.
    pub fn step_count(&self) -> usize {
        self.targets.iter().map(|t| t.actions.len()).sum()
    }
}

impl PartialEq for Plan<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.names().eq(other.names())
    }
}

impl Eq for Plan<'_> {}

impl fmt::Display for Plan<'_> {
    /// Multi-line rendering used by `--dry-run`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "plan for '{}' ({} targets):", self.root, self.targets.len())?;
        for (i, target) in self.targets.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, target.name)?;
            if target.actions.is_empty() {
                writeln!(f, "       (no steps)")?;
            }
            for (step, action) in target.actions.iter().enumerate() {
                writeln!(f, "       [{step}] {action}")?;
            }
        }
        Ok(())
    }
}
