// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskchain`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskchain",
    version,
    about = "Run a target and its dependencies as a fail-fast chain of commands.",
    long_about = None
)]
pub struct CliArgs {
    /// Target to run.
    ///
    /// If omitted, `[config].default_target` is used.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `TASKCHAIN_CONFIG` if set, otherwise `Taskchain.toml` in the
    /// current working directory.
    #[arg(long, short = 'f', value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKCHAIN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the plan, but don't execute any commands.
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// List declared targets and exit.
    #[arg(long, short = 'l', conflicts_with = "dry_run")]
    pub list: bool,

    /// Don't echo each command before running it.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
