//! Post entity <-> model mapper

use chat_core::{DomainError, Post};

use super::column_id;
use crate::models::PostModel;

impl TryFrom<PostModel> for Post {
    type Error = DomainError;

    fn try_from(model: PostModel) -> Result<Self, Self::Error> {
        Ok(Post {
            id: column_id("posts.id", &model.id)?,
            channel_id: column_id("posts.channel_id", &model.channel_id)?,
            user_id: column_id("posts.user_id", &model.user_id)?,
            message: model.message,
            has_reactions: model.has_reactions,
            create_at: model.create_at,
            update_at: model.update_at,
        })
    }
}
