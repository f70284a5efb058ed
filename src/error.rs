//! Error types.
//!
//! Event handling never fails; the only fallible surface is configuration
//! (parsing activation names and the opt-in [`validate`] pass).
//!
//! [`validate`]: crate::config::InteractionConfig::validate

use thiserror::Error;

/// Problems found in an [`InteractionConfig`](crate::config::InteractionConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown mouse activation method: {0:?}")]
    UnknownMouseActivation(String),

    #[error("unknown touch activation method: {0:?}")]
    UnknownTouchActivation(String),

    #[error("{field} must be a finite number, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("item position limits on the {axis} axis are inverted (min {min} > max {max})")]
    InvertedLimits { axis: char, min: f64, max: f64 },
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
