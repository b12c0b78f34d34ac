// src/engine/runtime.rs

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::{CancelSignal, StepOutcome, StepRequest, StepRunner};
use crate::plan::{self, Plan};
use crate::registry::TargetRegistry;

use super::core::PlanCursor;
use super::{EngineOptions, InvocationState, RunReport};

/// Resolves targets against a registry and runs the resulting plans,
/// delegating each step to a [`StepRunner`].
///
/// This is the async shell around [`PlanCursor`], which holds the
/// fail-fast semantics. Exactly one step is in flight at any time.
pub struct Engine<'r, R: StepRunner> {
    registry: &'r TargetRegistry,
    runner: R,
    options: EngineOptions,
    state: InvocationState,
}

impl<R: StepRunner> fmt::Debug for Engine<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("targets", &self.registry.len())
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'r, R: StepRunner> Engine<'r, R> {
    pub fn new(registry: &'r TargetRegistry, runner: R, options: EngineOptions) -> Self {
        Self {
            registry,
            runner,
            options,
            state: InvocationState::Idle,
        }
    }

    /// State of the current (or most recent) invocation.
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Give the runner back, e.g. to inspect what a fake runner recorded.
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Resolve `root` into a fresh plan.
    pub fn resolve(&mut self, root: &str) -> Result<Plan<'r>> {
        self.transition(InvocationState::Resolving);
        match plan::resolve(self.registry, root) {
            Ok(plan) => Ok(plan),
            Err(err) => {
                warn!(root = %root, error = %err, "resolution failed");
                self.transition(InvocationState::Failed);
                Err(err)
            }
        }
    }

    /// Run every step of `plan` in order, stopping at the first failure or
    /// cancellation.
    pub async fn execute(&mut self, plan: &Plan<'r>, cancel: &mut CancelSignal) -> Result<RunReport> {
        self.transition(InvocationState::Executing);
        info!(
            root = %plan.root(),
            targets = plan.len(),
            steps = plan.step_count(),
            "executing plan"
        );

        let mut cursor = PlanCursor::new(plan);

        while let Some(pending) = cursor.next_step() {
            let outcome = if cancel.is_cancelled() {
                // Cancelled between steps: never start the next one.
                StepOutcome::Cancelled
            } else {
                if pending.step == 0 {
                    info!(name = %pending.target.name, "starting target");
                }
                if self.options.echo_commands {
                    eprintln!(
                        "taskchain: [{}] step {}: {}",
                        pending.target.name, pending.step, pending.action
                    );
                }

                let request = StepRequest {
                    target: &pending.target.name,
                    index: pending.step,
                    action: pending.action,
                };

                match self.runner.run_step(request, cancel).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        error!(
                            name = %pending.target.name,
                            step = pending.step,
                            error = %err,
                            "step could not be run"
                        );
                        self.transition(InvocationState::Failed);
                        return Err(err);
                    }
                }
            };

            debug!(
                name = %pending.target.name,
                step = pending.step,
                ?outcome,
                "step finished"
            );

            if let Err(err) = cursor.record(outcome) {
                let next = match outcome {
                    StepOutcome::Cancelled => InvocationState::Cancelled,
                    StepOutcome::Exited(_) => InvocationState::Failed,
                };
                warn!(error = %err, "invocation aborted");
                self.transition(next);
                return Err(err);
            }
        }

        let report = RunReport {
            root: plan.root().to_string(),
            targets: cursor.completed_targets().map(|t| t.name.clone()).collect(),
            steps_run: cursor.steps_run(),
        };
        self.transition(InvocationState::Succeeded);
        Ok(report)
    }

    /// Resolve `root` and execute the resulting plan.
    ///
    /// Every call starts from `Idle` and recomputes the plan; nothing is
    /// carried over from earlier invocations.
    pub async fn invoke(&mut self, root: &str, cancel: &mut CancelSignal) -> Result<RunReport> {
        self.state = InvocationState::Idle;
        let plan = self.resolve(root)?;
        self.execute(&plan, cancel).await
    }

    fn transition(&mut self, next: InvocationState) {
        debug!(from = %self.state, to = %next, "invocation state change");
        self.state = next;
    }
}
