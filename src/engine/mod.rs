// src/engine/mod.rs

//! Execution engine for taskchain.
//!
//! This module ties together:
//! - plan resolution (delegated to [`crate::plan`])
//! - the step-by-step progression through a plan
//! - the step runner that actually spawns processes
//!
//! The pure, synchronous progression lives in [`core`]; the async shell
//! that drives it and talks to a [`StepRunner`](crate::exec::StepRunner) is
//! implemented in [`runtime`].

use std::fmt;

pub mod core;
pub mod runtime;

pub use self::core::{PendingStep, PlanCursor};
pub use runtime::Engine;

/// Where a single invocation currently stands.
///
/// `Idle → Resolving → Executing → {Succeeded, Failed, Cancelled}`;
/// `Resolving` may go straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Idle,
    Resolving,
    Executing,
    Succeeded,
    Failed,
    Cancelled,
}

impl InvocationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InvocationState::Succeeded | InvocationState::Failed | InvocationState::Cancelled
        )
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvocationState::Idle => "idle",
            InvocationState::Resolving => "resolving",
            InvocationState::Executing => "executing",
            InvocationState::Succeeded => "succeeded",
            InvocationState::Failed => "failed",
            InvocationState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Options for the engine's own output.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Print `taskchain: [target] step N: <command>` to stderr before each
    /// step starts.
    pub echo_commands: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            echo_commands: true,
        }
    }
}

/// Summary of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub root: String,
    /// Targets that completed, in execution order.
    pub targets: Vec<String>,
    /// Number of action steps that ran.
    pub steps_run: usize,
}
