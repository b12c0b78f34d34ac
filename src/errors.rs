// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

/// Every way an invocation can stop short of success.
///
/// Resolution errors (`UnknownTarget`, `CyclicDependency`) are raised before
/// any process is spawned. Execution errors (`StepFailure`, `StepSpawn`,
/// `Cancelled`) carry the target and step index that was in flight.
#[derive(Error, Debug)]
pub enum TaskchainError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Raised by `TargetRegistry::register`/`insert`. A config file never
    /// produces it: TOML rejects a repeated `[target.<name>]` table, which
    /// surfaces as `TomlError`.
    #[error("Duplicate target: '{0}' is declared more than once")]
    DuplicateTarget(String),

    #[error("{}", unknown_target_message(.name, .required_by))]
    UnknownTarget {
        name: String,
        /// The target whose `after` list referenced `name`, if any.
        required_by: Option<String>,
    },

    #[error("Cyclic dependency: {}", cycle_path(.cycle))]
    CyclicDependency {
        /// Names forming the cycle; the first name is repeated at the end.
        cycle: Vec<String>,
    },

    #[error("Target '{target}' failed at step {step} (exit status {status})")]
    StepFailure {
        target: String,
        step: usize,
        status: i32,
    },

    #[error("Target '{target}' could not start step {step}: {source}")]
    StepSpawn {
        target: String,
        step: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Cancelled while running target '{target}' step {step}")]
    Cancelled { target: String, step: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskchainError {
    /// Process exit status reported by the `taskchain` binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskchainError::StepFailure { .. } | TaskchainError::StepSpawn { .. } => 1,
            TaskchainError::Cancelled { .. } => 130,
            _ => 2,
        }
    }

    /// True for errors raised while turning a target name into a plan.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            TaskchainError::UnknownTarget { .. } | TaskchainError::CyclicDependency { .. }
        )
    }
}

fn unknown_target_message(name: &str, required_by: &Option<String>) -> String {
    match required_by {
        Some(parent) => format!("Unknown target: '{name}' (required by '{parent}')"),
        None => format!("Unknown target: '{name}'"),
    }
}

fn cycle_path(cycle: &[String]) -> String {
    cycle.join(" -> ")
}

pub type Result<T> = std::result::Result<T, TaskchainError>;
