#![allow(dead_code)]

use std::collections::BTreeMap;
use taskchain::config::{
    ConfigFile, ConfigSection, ProgramStep, RawConfigFile, StepConfig, TargetConfig,
};
use taskchain::registry::{ActionStep, TargetRegistry};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.config.target.insert(name.to_string(), target);
        self
    }

    pub fn with_default_target(mut self, name: &str) -> Self {
        self.config.config.default_target = Some(name.to_string());
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new() -> Self {
        Self {
            target: TargetConfig::default(),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.target.after.push(dep.to_string());
        self
    }

    pub fn shell(mut self, line: &str) -> Self {
        self.target.steps.push(StepConfig::Shell(line.to_string()));
        self
    }

    pub fn program(mut self, program: &str, args: &[&str]) -> Self {
        self.target.steps.push(StepConfig::Program(ProgramStep {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }));
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.target.description = Some(text.to_string());
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}

impl Default for TargetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Terse registry construction: each step is a shell line.
pub struct RegistryBuilder {
    registry: TargetRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: TargetRegistry::new(),
        }
    }

    pub fn target(mut self, name: &str, deps: &[&str], steps: &[&str]) -> Self {
        self.registry
            .register(
                name,
                deps.iter().map(|d| d.to_string()).collect(),
                steps.iter().map(|s| ActionStep::shell(*s)).collect(),
            )
            .expect("duplicate target in RegistryBuilder");
        self
    }

    pub fn build(self) -> TargetRegistry {
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The formatter/linter/type-checker layout used throughout the tests:
/// `inspect` groups `check`, `lint` and `typecheck`.
pub fn inspect_registry() -> TargetRegistry {
    RegistryBuilder::new()
        .target("check", &[], &["black --check src"])
        .target("lint", &[], &["flake8 src"])
        .target("typecheck", &[], &["mypy src"])
        .target("inspect", &["check", "lint", "typecheck"], &[])
        .build()
}
