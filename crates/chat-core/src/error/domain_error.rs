//! Domain errors - error types for the domain and store layers

use thiserror::Error;

use crate::value_objects::{Id, IdParseError};

/// Domain layer errors
///
/// Store operations resolve to this type; the orchestrator surfaces it to
/// the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(Id),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid {field}: {reason}")]
    InvalidId {
        field: &'static str,
        reason: IdParseError,
    },

    #[error("Invalid emoji name: {0:?}")]
    InvalidEmojiName(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Build an invalid id error for a named field
    pub fn invalid_id(field: &'static str, reason: IdParseError) -> Self {
        Self::InvalidId { field, reason }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidId { .. } => "INVALID_ID",
            Self::InvalidEmojiName(_) => "INVALID_EMOJI_NAME",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_))
    }

    /// Check if this is a structural validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidId { .. } | Self::InvalidEmojiName(_)
        )
    }

    /// Check if this is a durable-layer failure
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::StoreUnavailable(_))
    }
}
