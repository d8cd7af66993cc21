//! Reaction entity - a user's emoji response to a post

use crate::clock::now_millis;
use crate::error::DomainError;
use crate::value_objects::Id;

/// Maximum length of an emoji name
pub const EMOJI_NAME_MAX_LENGTH: usize = 64;

/// Reaction entity
///
/// Identified by the natural key `(user_id, post_id, emoji_name)`; at most
/// one row exists per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: Id,
    pub post_id: Id,
    pub emoji_name: String,
    /// Milliseconds since epoch, zero until persisted
    pub create_at: i64,
}

impl Reaction {
    /// Create a new, not yet persisted Reaction
    pub fn new(user_id: Id, post_id: Id, emoji_name: impl Into<String>) -> Self {
        Self {
            user_id,
            post_id,
            emoji_name: emoji_name.into(),
            create_at: 0,
        }
    }

    /// Assign the creation timestamp if the caller did not supply one
    pub fn pre_save(&mut self) {
        if self.create_at == 0 {
            self.create_at = now_millis();
        }
    }

    /// Check whether two reactions share the same natural key
    #[inline]
    pub fn same_key(&self, other: &Reaction) -> bool {
        self.user_id == other.user_id
            && self.post_id == other.post_id
            && self.emoji_name == other.emoji_name
    }

    /// Validate the emoji name
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_emoji_name(&self.emoji_name)
    }
}

/// Validate an emoji name: non-empty, bounded, `[A-Za-z0-9_+-]` only
pub fn validate_emoji_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() || name.len() > EMOJI_NAME_MAX_LENGTH {
        return Err(DomainError::InvalidEmojiName(name.to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
    {
        return Err(DomainError::InvalidEmojiName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_save_assigns_create_at_once() {
        let mut reaction = Reaction::new(Id::generate(), Id::generate(), "smile");
        assert_eq!(reaction.create_at, 0);

        reaction.pre_save();
        let first = reaction.create_at;
        assert!(first > 0);

        reaction.pre_save();
        assert_eq!(reaction.create_at, first);
    }

    #[test]
    fn test_same_key_ignores_create_at() {
        let user = Id::generate();
        let post = Id::generate();
        let mut a = Reaction::new(user, post, "smile");
        let b = Reaction::new(user, post, "smile");
        a.create_at = 42;
        assert!(a.same_key(&b));
        assert!(!a.same_key(&Reaction::new(user, post, "frown")));
    }

    #[test]
    fn test_emoji_name_validation() {
        assert!(validate_emoji_name("smile").is_ok());
        assert!(validate_emoji_name("+1").is_ok());
        assert!(validate_emoji_name("thumbs_up-2").is_ok());
        assert!(validate_emoji_name("").is_err());
        assert!(validate_emoji_name("has space").is_err());
        assert!(validate_emoji_name(&"a".repeat(EMOJI_NAME_MAX_LENGTH + 1)).is_err());
    }
}
