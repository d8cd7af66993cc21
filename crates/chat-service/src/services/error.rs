//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use chat_common::domain_status;
use chat_core::{DomainError, Id};
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Store or domain rule failure, surfaced unchanged
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Structural problem with the request
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing required permission: {permission}")]
    PermissionDenied { permission: String },

    /// The post does not live in the channel named by the request
    #[error("Post {post_id} belongs to channel {post_channel_id}, not {channel_id}")]
    ChannelMismatch {
        post_id: Id,
        post_channel_id: Id,
        channel_id: Id,
    },
}

impl ServiceError {
    /// Create a permission denied error
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::Validation(_) => 400,
            Self::PermissionDenied { .. } => 403,
            Self::ChannelMismatch { .. } => 400,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PermissionDenied { .. } => "MISSING_PERMISSIONS",
            Self::ChannelMismatch { .. } => "CHANNEL_MISMATCH",
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
