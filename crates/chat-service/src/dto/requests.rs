//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chat_core::{DomainError, Id, Reaction};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Reaction Requests
// ============================================================================

/// Reaction descriptor as sent by clients
///
/// Ids stay raw strings until [`ReactionRequest::to_reaction`] so a malformed
/// id is reported as a structural error naming the field, not as a body
/// parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactionRequest {
    #[validate(length(equal = 26, message = "user_id must be 26 characters"))]
    pub user_id: String,

    #[validate(length(equal = 26, message = "post_id must be 26 characters"))]
    pub post_id: String,

    #[validate(length(
        min = 1,
        max = 64,
        message = "emoji_name must be 1-64 characters"
    ))]
    pub emoji_name: String,

    /// Client supplied timestamps are kept; zero means "assign on save"
    #[serde(default)]
    pub create_at: i64,
}

impl ReactionRequest {
    /// Build a request for the given reaction
    pub fn new(user_id: Id, post_id: Id, emoji_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            emoji_name: emoji_name.into(),
            create_at: 0,
        }
    }

    /// Parse into a domain reaction, checking ids and the emoji name
    pub fn to_reaction(&self) -> Result<Reaction, DomainError> {
        let user_id =
            Id::parse(&self.user_id).map_err(|e| DomainError::invalid_id("user_id", e))?;
        let post_id =
            Id::parse(&self.post_id).map_err(|e| DomainError::invalid_id("post_id", e))?;
        if self.create_at < 0 {
            return Err(DomainError::ValidationError(
                "create_at must not be negative".to_string(),
            ));
        }

        let mut reaction = Reaction::new(user_id, post_id, self.emoji_name.as_str());
        reaction.create_at = self.create_at;
        reaction.validate()?;
        Ok(reaction)
    }
}
