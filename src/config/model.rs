// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// default_target = "inspect"
///
/// [target.check]
/// description = "Formatting check"
/// steps = [{ program = "black", args = ["--check", "src"] }]
///
/// [target.lint]
/// steps = ["flake8 src"]
///
/// [target.inspect]
/// after = ["check", "lint"]
/// ```
///
/// This is the raw, unvalidated shape. Use [`ConfigFile`] (obtained through
/// `TryFrom<RawConfigFile>`) everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All targets from `[target.<name>]`, keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// A validated configuration.
///
/// Fields are only reachable through accessors so that a `ConfigFile` can
/// only be produced by validation (see `config::validate`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    target: BTreeMap<String, TargetConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        target: BTreeMap<String, TargetConfig>,
    ) -> Self {
        Self { config, target }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn targets(&self) -> &BTreeMap<String, TargetConfig> {
        &self.target
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Target to run when none is named on the command line.
    #[serde(default)]
    pub default_target: Option<String>,
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Free-form text shown by `--list`.
    #[serde(default)]
    pub description: Option<String>,

    /// Targets that must succeed before this one runs, in the order they
    /// are visited.
    #[serde(default)]
    pub after: Vec<String>,

    /// Commands run in order once every dependency has succeeded. Empty for
    /// grouping targets.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One entry of `steps = [...]`.
///
/// A bare string is a shell line; a table is a program plus its arguments,
/// executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StepConfig {
    Shell(String),
    Program(ProgramStep),
}

/// `{ program = "...", args = [...] }` form of a step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramStep {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}
