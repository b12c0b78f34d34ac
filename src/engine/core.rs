// src/engine/core.rs

//! Pure progression through a plan.
//!
//! [`PlanCursor`] is a synchronous, deterministic state machine: it hands
//! out the next step to run and consumes the outcome of that step, deciding
//! whether the invocation continues, fails or is cancelled. It has no Tokio
//! types and performs no IO, so the fail-fast rules can be tested without
//! spawning anything. The async shell in `engine::runtime` drives it.

use tracing::debug;

use crate::errors::{Result, TaskchainError};
use crate::exec::StepOutcome;
use crate::plan::Plan;
use crate::registry::{ActionStep, Target};

/// A step handed out by the cursor, awaiting its outcome.
#[derive(Debug, Clone, Copy)]
pub struct PendingStep<'r> {
    pub target: &'r Target,
    /// Position of `target` in the plan.
    pub target_index: usize,
    /// Position of the step within `target`.
    pub step: usize,
    pub action: &'r ActionStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorStatus {
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug)]
pub struct PlanCursor<'p, 'r> {
    plan: &'p Plan<'r>,
    target: usize,
    step: usize,
    /// True between `next_step` returning a step and `record` being called.
    in_flight: bool,
    completed_targets: usize,
    steps_run: usize,
    status: CursorStatus,
}

impl<'p, 'r> PlanCursor<'p, 'r> {
    pub fn new(plan: &'p Plan<'r>) -> Self {
        Self {
            plan,
            target: 0,
            step: 0,
            in_flight: false,
            completed_targets: 0,
            steps_run: 0,
            status: CursorStatus::Running,
        }
    }

    /// The next step to run, or `None` once the plan is exhausted or the
    /// run has ended.
    ///
    /// Targets without steps are passed over and counted as completed.
    /// While a step is in flight this returns `None`; record its outcome
    /// first.
    pub fn next_step(&mut self) -> Option<PendingStep<'r>> {
        if self.status != CursorStatus::Running || self.in_flight {
            return None;
        }

        let targets: &[&'r Target] = self.plan.targets();

        loop {
            let Some(&target) = targets.get(self.target) else {
                self.status = CursorStatus::Succeeded;
                debug!(
                    targets = self.completed_targets,
                    steps = self.steps_run,
                    "plan exhausted"
                );
                return None;
            };

            if let Some(action) = target.actions.get(self.step) {
                self.in_flight = true;
                return Some(PendingStep {
                    target,
                    target_index: self.target,
                    step: self.step,
                    action,
                });
            }

            debug!(name = %target.name, "target complete");
            self.completed_targets += 1;
            self.target += 1;
            self.step = 0;
        }
    }

    /// Record how the in-flight step ended.
    ///
    /// `Ok(())` means the run continues. A non-zero exit yields
    /// `StepFailure` and a cancellation yields `Cancelled`; either way the
    /// cursor is finished and `next_step` returns `None` from then on.
    pub fn record(&mut self, outcome: StepOutcome) -> Result<()> {
        if !self.in_flight {
            return Err(TaskchainError::Other(anyhow::anyhow!(
                "step outcome recorded with no step in flight"
            )));
        }
        self.in_flight = false;

        let target_name = self.plan.targets()[self.target].name.clone();
        let step = self.step;

        match outcome {
            StepOutcome::Exited(0) => {
                self.steps_run += 1;
                self.step += 1;
                Ok(())
            }
            StepOutcome::Exited(status) => {
                self.steps_run += 1;
                self.status = CursorStatus::Failed;
                Err(TaskchainError::StepFailure {
                    target: target_name,
                    step,
                    status,
                })
            }
            StepOutcome::Cancelled => {
                self.status = CursorStatus::Cancelled;
                Err(TaskchainError::Cancelled {
                    target: target_name,
                    step,
                })
            }
        }
    }

    /// Targets fully completed so far, in plan order.
    pub fn completed_targets(&self) -> impl Iterator<Item = &'r Target> + '_ {
        self.plan.targets()[..self.completed_targets].iter().copied()
    }

    /// Steps that have run to completion (successfully or not).
    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    pub fn is_finished(&self) -> bool {
        self.status != CursorStatus::Running
    }

    pub fn succeeded(&self) -> bool {
        self.status == CursorStatus::Succeeded
    }
}
