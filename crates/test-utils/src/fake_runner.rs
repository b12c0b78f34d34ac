use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskchain::errors::Result;
use taskchain::exec::{CancelSignal, StepOutcome, StepRequest, StepRunner};

/// A step the fake runner was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStep {
    pub target: String,
    pub index: usize,
    /// The step rendered with `Display`, e.g. `flake8 src`.
    pub command: String,
}

/// A fake runner that:
/// - records every step it is asked to run
/// - reports a scripted exit status per rendered command (default 0)
/// - optionally blocks on chosen commands until cancellation fires.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    exit_codes: HashMap<String, i32>,
    hanging: HashSet<String>,
    executed: Arc<Mutex<Vec<RecordedStep>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `code`.
    pub fn exit_with(mut self, command: &str, code: i32) -> Self {
        self.exit_codes.insert(command.to_string(), code);
        self
    }

    /// Make `command` run until the invocation is cancelled.
    pub fn hang_on(mut self, command: &str) -> Self {
        self.hanging.insert(command.to_string());
        self
    }

    /// Shared view of what has run so far.
    pub fn executed(&self) -> Arc<Mutex<Vec<RecordedStep>>> {
        Arc::clone(&self.executed)
    }

    /// Rendered commands in the order they ran.
    pub fn commands(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.command.clone())
            .collect()
    }

    /// Owning targets in the order their steps ran (one entry per step).
    pub fn targets(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.target.clone())
            .collect()
    }
}

impl StepRunner for ScriptedRunner {
    fn run_step<'a>(
        &'a mut self,
        step: StepRequest<'a>,
        cancel: &'a mut CancelSignal,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + 'a>> {
        let command = step.action.to_string();

        Box::pin(async move {
            self.executed.lock().unwrap().push(RecordedStep {
                target: step.target.to_string(),
                index: step.index,
                command: command.clone(),
            });

            if self.hanging.contains(&command) {
                cancel.cancelled().await;
                return Ok(StepOutcome::Cancelled);
            }

            let code = self.exit_codes.get(&command).copied().unwrap_or(0);
            Ok(StepOutcome::Exited(code))
        })
    }
}
