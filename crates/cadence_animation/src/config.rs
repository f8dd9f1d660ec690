//! Runtime configuration
//!
//! Deserializable from the `[runtime]` table of a TOML file; every field has
//! a default so an empty table is valid.

use crate::error::{ConfigError, Result};
use crate::scheduler::FRAME_INTERVAL_MS;
use crate::task::CatchUp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Multiplier applied to every frame delta
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Period used by per-frame tasks and as the floor for intervals
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f64,
    /// What repeating tasks do when one frame spans several periods
    #[serde(default)]
    pub catch_up: CatchUp,
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_frame_interval() -> f64 {
    FRAME_INTERVAL_MS
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            frame_interval_ms: default_frame_interval(),
            catch_up: CatchUp::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            return Err(ConfigError::InvalidFrameInterval(self.frame_interval_ms));
        }
        Ok(())
    }
}
