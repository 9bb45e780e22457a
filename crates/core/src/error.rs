//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic input failures (malformed filters,
/// unknown quality levels). Storage concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A quality level outside `poor | questionable | good | excellent`.
    #[error("unknown quality level: {0}")]
    UnknownQuality(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_quality(level: impl Into<String>) -> Self {
        Self::UnknownQuality(level.into())
    }
}
