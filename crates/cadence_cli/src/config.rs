//! Cadence configuration file handling

use anyhow::{Context, Result};
use cadence_animation::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Top-level configuration (cadence.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// Frame host configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct HostConfig {
    /// Frames delivered per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_fps() -> u32 {
    60
}

fn default_log() -> String {
    "info".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            log: default_log(),
        }
    }
}

impl CadenceConfig {
    /// Load from `path`, or from `cadence.toml` in the working directory.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default.to_path_buf()
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: CadenceConfig = toml::from_str(content)?;
        config.runtime.validate()?;
        if config.host.fps == 0 {
            anyhow::bail!("host.fps must be at least 1");
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
