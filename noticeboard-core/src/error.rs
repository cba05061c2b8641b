//! Error types for noticeboard.
//!
//! Publishing, updating, dismissing and subscribing never fail; unknown ids
//! are ignored. The only fallible paths are configuration loading and
//! validation, which this module covers.

use thiserror::Error;

/// Result type alias using `NoticeError`.
pub type Result<T> = std::result::Result<T, NoticeError>;

/// Main error type for noticeboard.
#[derive(Debug, Error)]
pub enum NoticeError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An environment variable could not be parsed.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnvVar {
        /// Variable name
        name: String,
        /// Raw value found in the environment
        value: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl NoticeError {
    /// Returns true if the input could not be parsed at all, as opposed to
    /// parsing into out-of-range values.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            NoticeError::InvalidEnvVar { .. } | NoticeError::JsonError(_)
        )
    }
}
