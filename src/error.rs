//! Error types for the preset core.
//!
//! Provides a unified error type for catalog loading, normalization,
//! validation, and storage operations.

use thiserror::Error;

/// Unified error type for preset operations.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Requested preset id absent from a given back end.
    ///
    /// The unified lookup helper recovers from this by trying the next
    /// back end; every other error propagates as-is.
    #[error("Preset not found: {0}")]
    NotFound(String),

    /// Structural shape invalid after coercion. Carries a path-qualified
    /// list of violations.
    #[error("Schema violation: {}", .violations.join("; "))]
    SchemaViolation { violations: Vec<String> },

    /// Catalog unavailable or unexpected failure during slot migration.
    #[error("Normalization failed: {0}")]
    NormalizationFailed(String),

    /// Persistence-time constraint violation (e.g. blank preset name on an
    /// explicit save). Raised before any storage write is attempted.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A save is already in flight for this session.
    #[error("A save is already in progress")]
    SaveInProgress,

    /// Network or remote-service failure. Not recovered locally; the caller
    /// is expected to present a retry option.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error for local file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PresetError {
    /// Create a not-found error for the given preset id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a schema-violation error from a list of path-qualified messages.
    pub fn schema(violations: Vec<String>) -> Self {
        Self::SchemaViolation { violations }
    }

    /// Create a normalization error with the given message.
    pub fn normalization(msg: impl Into<String>) -> Self {
        Self::NormalizationFailed(msg.into())
    }

    /// Create a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Create a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether this error is a fallback-eligible absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for PresetError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Result type alias for preset operations.
pub type PresetResult<T> = Result<T, PresetError>;
