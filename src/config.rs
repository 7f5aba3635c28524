//! Configuration System
//!
//! Layered configuration for the prompt bridge: built-in defaults, the global
//! config file, an explicit file from the command line, then environment
//! variables. Tests included.

use crate::error::BridgeError;
use crate::logging::LoggingConfig;
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod sources;

pub use sources::env::ENV_PREFIX;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Prompt broker settings
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prompt broker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Seconds a prompt may stay unanswered before it fails with a timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Disable colored prompt rendering on the console host
    #[serde(default)]
    pub no_color: bool,
}

fn default_timeout_secs() -> u64 {
    5 * 60
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            no_color: false,
        }
    }
}

impl PromptConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl BridgeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), BridgeError> {
        self.prompt
            .validate()
            .map_err(|e| BridgeError::ConfigError(format!("prompt: {}", e)))?;
        self.logging.validate()?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, BridgeError> {
        toml::to_string_pretty(self).map_err(|e| BridgeError::ConfigError(e.to_string()))
    }
}

/// Loads [`BridgeConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then environment.
    pub fn load() -> Result<BridgeConfig, BridgeError> {
        let builder = sources::global_file::add_to_builder(Config::builder())?;
        Self::finish(sources::env::add_to_builder(builder))
    }

    /// Defaults, then the global file, then `path`, then environment.
    pub fn load_from_file(path: &Path) -> Result<BridgeConfig, BridgeError> {
        if !path.exists() {
            return Err(BridgeError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = sources::global_file::add_to_builder(Config::builder())?
            .add_source(config::File::from(path.to_path_buf()));
        Self::finish(sources::env::add_to_builder(builder))
    }

    /// Load from `path` when given, otherwise from the default locations.
    pub fn resolve(path: Option<&Path>) -> Result<BridgeConfig, BridgeError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<BridgeConfig, BridgeError> {
        let config: BridgeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
