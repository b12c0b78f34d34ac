// src/registry/target.rs

//! Target declarations and their action steps.

use std::fmt;

use crate::config::model::{StepConfig, TargetConfig};

/// Dense index of a target inside a [`TargetRegistry`](super::TargetRegistry).
///
/// Ids are assigned in registration order and are only meaningful for the
/// registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) usize);

impl TargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One external command owned by a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStep {
    /// Run `program` directly with `args`; no shell is involved, so argument
    /// boundaries are exactly those declared.
    Program { program: String, args: Vec<String> },
    /// Hand the whole line to the platform shell (`sh -c` / `cmd /C`).
    Shell(String),
}

impl ActionStep {
    pub fn program(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ActionStep::Program {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shell(line: impl Into<String>) -> Self {
        ActionStep::Shell(line.into())
    }
}

impl From<&StepConfig> for ActionStep {
    fn from(cfg: &StepConfig) -> Self {
        match cfg {
            StepConfig::Shell(line) => ActionStep::Shell(line.clone()),
            StepConfig::Program(step) => ActionStep::Program {
                program: step.program.clone(),
                args: step.args.clone(),
            },
        }
    }
}

impl fmt::Display for ActionStep {
    /// Human-readable rendering used for command echo and `--dry-run`.
    /// Arguments containing whitespace or quotes are shown quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStep::Shell(line) => f.write_str(line),
            ActionStep::Program { program, args } => {
                write!(f, "{}", display_arg(program))?;
                for arg in args {
                    write!(f, " {}", display_arg(arg))?;
                }
                Ok(())
            }
        }
    }
}

fn display_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return arg.to_string();
    }
    format!("{arg:?}")
}

/// A named unit of work: prerequisites plus an ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub description: Option<String>,
    /// Direct dependencies, in declaration order.
    pub dependencies: Vec<String>,
    pub actions: Vec<ActionStep>,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<String>,
        actions: Vec<ActionStep>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            dependencies,
            actions,
        }
    }

    pub fn from_config(name: &str, cfg: &TargetConfig) -> Self {
        Self {
            name: name.to_string(),
            description: cfg.description.clone(),
            dependencies: cfg.after.clone(),
            actions: cfg.steps.iter().map(ActionStep::from).collect(),
        }
    }

    /// True for targets that exist only to sequence their dependencies.
    pub fn is_grouping(&self) -> bool {
        self.actions.is_empty()
    }
}
