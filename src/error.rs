//! Error types for the pane engine.

use thiserror::Error;

/// Problems found while parsing or validating a [`crate::config::GalleryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed, or it contains an unknown key.
    #[error("failed to parse gallery config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A tile dimension is zero, negative or not a number.
    #[error("{field} must be a positive number, got {value}")]
    NonPositiveDimension { field: &'static str, value: f32 },

    /// A spacing or padding value is negative or not a number.
    #[error("{field} must be zero or positive, got {value}")]
    NegativeSpacing { field: &'static str, value: f32 },

    /// A count that must be at least one was set to zero.
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    /// An offset is not a finite number.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    /// Autoplay was configured with a zero interval.
    #[error("autoplay_interval_ms must be at least 1")]
    ZeroInterval,
}

/// Errors surfaced by the public gallery API.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A pane index outside `[0, total_panes)` was requested explicitly.
    #[error("pane {index} is out of range (total panes: {total_panes})")]
    OutOfRange { index: i64, total_panes: usize },

    #[error("invalid container width: {0}")]
    InvalidWidth(f32),

    /// Autoplay needs a tokio runtime to schedule its timer.
    #[error("autoplay requires a running tokio runtime")]
    NoRuntime,

    #[error("gallery has been destroyed")]
    Destroyed,
}

pub type Result<T> = std::result::Result<T, GalleryError>;
