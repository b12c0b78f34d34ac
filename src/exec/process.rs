// src/exec/process.rs

//! Production step runner backed by `tokio::process::Command`.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, TaskchainError};
use crate::registry::ActionStep;

use super::backend::{StepOutcome, StepRequest, StepRunner};
use super::cancel::CancelSignal;

/// Runs each step as a child process whose stdin, stdout and stderr are
/// inherited from taskchain, so output reaches the terminal as it is
/// written.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    working_dir: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory every step is started in. Defaults to taskchain's own
    /// working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn build_command(&self, action: &ActionStep) -> Command {
        let mut cmd = match action {
            ActionStep::Program { program, args } => {
                let mut c = Command::new(program);
                c.args(args);
                c
            }
            ActionStep::Shell(line) => shell_command(line),
        };

        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}

impl StepRunner for ProcessRunner {
    fn run_step<'a>(
        &'a mut self,
        step: StepRequest<'a>,
        cancel: &'a mut CancelSignal,
    ) -> Pin<Box<dyn Future<Output = Result<StepOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let mut child = self
                .build_command(step.action)
                .spawn()
                .map_err(|source| TaskchainError::StepSpawn {
                    target: step.target.to_string(),
                    step: step.index,
                    source,
                })?;

            debug!(
                name = %step.target,
                step = step.index,
                pid = child.id(),
                "step process started"
            );

            // Either the process exits on its own (normal case), or the
            // invocation is cancelled and we stop it ourselves.
            let status = tokio::select! {
                status_res = child.wait() => status_res.with_context(|| {
                    format!(
                        "waiting for step {} of target '{}'",
                        step.index, step.target
                    )
                })?,

                _ = cancel.cancelled() => {
                    info!(
                        name = %step.target,
                        step = step.index,
                        "cancellation requested; killing step process"
                    );
                    if let Err(e) = child.kill().await {
                        warn!(
                            name = %step.target,
                            step = step.index,
                            error = %e,
                            "failed to kill step process on cancellation"
                        );
                    }
                    return Ok(StepOutcome::Cancelled);
                }
            };

            if !status.success() && cancelled_after_exit(cancel).await {
                info!(
                    name = %step.target,
                    step = step.index,
                    "step process interrupted"
                );
                return Ok(StepOutcome::Cancelled);
            }

            let code = status.code().unwrap_or(-1);
            debug!(
                name = %step.target,
                step = step.index,
                exit_code = code,
                success = status.success(),
                "step process exited"
            );
            Ok(StepOutcome::Exited(code))
        })
    }
}

/// A terminal Ctrl-C reaches the whole foreground process group, so the
/// child may exit from SIGINT just before our own listener flags the
/// cancellation. A failed step only counts as cancelled if the flag is set
/// within this window.
const CANCEL_GRACE: Duration = Duration::from_millis(100);

async fn cancelled_after_exit(cancel: &mut CancelSignal) -> bool {
    if cancel.is_cancelled() {
        return true;
    }
    tokio::time::timeout(CANCEL_GRACE, cancel.cancelled())
        .await
        .is_ok()
}
