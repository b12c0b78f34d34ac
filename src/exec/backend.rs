// src/exec/backend.rs

//! Pluggable step runner abstraction.
//!
//! The engine talks to a `StepRunner` instead of spawning processes itself.
//! Production code uses [`ProcessRunner`](super::ProcessRunner); tests can
//! provide a runner that records which steps were requested and returns
//! scripted exit statuses without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::registry::ActionStep;

use super::cancel::CancelSignal;

/// A single step the engine wants run now.
#[derive(Debug, Clone, Copy)]
pub struct StepRequest<'a> {
    /// Name of the owning target.
    pub target: &'a str,
    /// Zero-based index of the step within its target.
    pub index: usize,
    pub action: &'a ActionStep,
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The process terminated on its own with this status. `-1` stands for
    /// termination without an exit code (e.g. killed by a signal).
    Exited(i32),
    /// The process was stopped because cancellation was requested.
    Cancelled,
}

/// Trait abstracting how a single action step is executed.
pub trait StepRunner: Send {
    /// Run `step` to completion, or until `cancel` fires.
    ///
    /// Implementations must not return before the process they started has
    /// terminated: the engine relies on exactly one step being in flight.
    /// Failing to start the step at all is an `Err`, not an outcome.
    fn run_step<'a>(
        &'a mut self,
        step: StepRequest<'a>,
        cancel: &'a mut CancelSignal,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + 'a>>;
}
