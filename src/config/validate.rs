// src/config/validate.rs

//! Structural validation of a raw config.
//!
//! Only the shape of each declaration is checked here. Whether `after`
//! references exist and whether the graph is acyclic is decided when a
//! target is resolved, so that a broken target elsewhere in the file does
//! not prevent running an unrelated one.

use crate::config::model::{ConfigFile, RawConfigFile, StepConfig};
use crate::errors::{Result, TaskchainError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskchainError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.target))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_target_names(cfg)?;
    validate_steps(cfg)?;
    validate_default_target(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(TaskchainError::ConfigError(
            "config must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_target_names(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        check_name(name).map_err(|why| {
            TaskchainError::ConfigError(format!("invalid target name '{name}': {why}"))
        })?;
        for dep in target.after.iter() {
            check_name(dep).map_err(|why| {
                TaskchainError::ConfigError(format!(
                    "target '{name}' has invalid dependency name '{dep}' in `after`: {why}"
                ))
            })?;
        }
    }
    Ok(())
}

fn check_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if name.chars().any(char::is_whitespace) {
        return Err("name contains whitespace");
    }
    Ok(())
}

fn validate_steps(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        for (index, step) in target.steps.iter().enumerate() {
            match step {
                StepConfig::Shell(line) if line.trim().is_empty() => {
                    return Err(TaskchainError::ConfigError(format!(
                        "target '{name}' step {index} is an empty command line"
                    )));
                }
                StepConfig::Program(step) if step.program.trim().is_empty() => {
                    return Err(TaskchainError::ConfigError(format!(
                        "target '{name}' step {index} has an empty `program`"
                    )));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn validate_default_target(cfg: &RawConfigFile) -> Result<()> {
    if let Some(default) = cfg.config.default_target.as_deref() {
        if !cfg.target.contains_key(default) {
            return Err(TaskchainError::ConfigError(format!(
                "[config].default_target '{default}' is not a declared target"
            )));
        }
    }
    Ok(())
}
