//! Runtime error types

use thiserror::Error;

/// Invalid runtime configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Time scale must be finite and not negative
    #[error("Invalid time scale: {0} (must be finite and >= 0)")]
    InvalidTimeScale(f64),

    /// Frame interval must be finite and positive
    #[error("Invalid frame interval: {0}ms (must be finite and > 0)")]
    InvalidFrameInterval(f64),
}

/// Result type for runtime construction
pub type Result<T> = std::result::Result<T, ConfigError>;
