// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the action steps of a
//! target and reporting how each one ended.
//!
//! - [`backend`] provides the `StepRunner` trait that the engine talks to,
//!   which tests can replace with a fake implementation.
//! - [`process`] is the production runner built on `tokio::process`.
//! - [`cancel`] carries invocation-wide cancellation (Ctrl-C) to the runner.

pub mod backend;
pub mod cancel;
pub mod process;

pub use backend::{StepOutcome, StepRequest, StepRunner};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use process::ProcessRunner;
