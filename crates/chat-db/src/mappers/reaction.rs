//! Reaction entity <-> model mapper

use chat_core::{DomainError, Reaction};

use super::column_id;
use crate::models::ReactionModel;

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            user_id: column_id("reactions.user_id", &model.user_id)?,
            post_id: column_id("reactions.post_id", &model.post_id)?,
            emoji_name: model.emoji_name,
            create_at: model.create_at,
        })
    }
}
