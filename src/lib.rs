// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod registry;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::ConfigFile;
use crate::engine::{Engine, EngineOptions};
use crate::errors::{Result, TaskchainError};
use crate::exec::{cancel_pair, ProcessRunner};
use crate::registry::TargetRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and registry population
/// - `--list` / `--dry-run` short-circuits
/// - the engine with the real process runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)?;
    let registry = TargetRegistry::from_config(&cfg)?;

    if args.list {
        write_target_list(&mut std::io::stdout().lock(), &cfg, &registry)?;
        return Ok(());
    }

    let root = requested_target(&args, &cfg)?;

    if args.dry_run {
        let plan = plan::resolve(&registry, &root)?;
        print!("{plan}");
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    // Ctrl-C → cancel the in-flight step and abort the invocation.
    let (cancel_handle, mut cancel) = cancel_pair();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        cancel_handle.cancel();
    });

    let runner = ProcessRunner::new().with_working_dir(config_root_dir(&config_path));
    let options = EngineOptions {
        echo_commands: !args.quiet,
    };

    let mut engine = Engine::new(&registry, runner, options);
    let report = engine.invoke(&root, &mut cancel).await?;

    info!(
        root = %report.root,
        targets = ?report.targets,
        steps = report.steps_run,
        "invocation succeeded"
    );
    Ok(())
}

/// Target named on the command line, falling back to
/// `[config].default_target`.
fn requested_target(args: &CliArgs, cfg: &ConfigFile) -> Result<String> {
    args.target
        .clone()
        .or_else(|| cfg.config().default_target.clone())
        .ok_or_else(|| {
            TaskchainError::ConfigError(
                "no target given and [config].default_target is not set".to_string(),
            )
        })
}

/// Directory steps run in.
///
/// - If the config path has a non-empty parent (e.g. "ci/Taskchain.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Taskchain.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// `--list` output: one target per line, with dependencies and description.
/// The default target is marked with `*`.
pub fn write_target_list(
    out: &mut impl Write,
    cfg: &ConfigFile,
    registry: &TargetRegistry,
) -> io::Result<()> {
    let default = cfg.config().default_target.as_deref();
    let width = registry.names().map(str::len).max().unwrap_or(0);

    for target in registry.iter() {
        let marker = if Some(target.name.as_str()) == default { "*" } else { " " };
        let mut line = format!("{marker} {:<width$}", target.name);
        if let Some(desc) = &target.description {
            line.push_str(&format!("  {desc}"));
        }
        if !target.dependencies.is_empty() {
            line.push_str(&format!("  (after: {})", target.dependencies.join(", ")));
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
