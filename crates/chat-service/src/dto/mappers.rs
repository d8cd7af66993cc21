//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chat_core::{Post, Reaction};

use super::responses::{PostResponse, ReactionResponse};

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            user_id: reaction.user_id.to_string(),
            post_id: reaction.post_id.to_string(),
            emoji_name: reaction.emoji_name.clone(),
            create_at: reaction.create_at,
        }
    }
}

impl From<Reaction> for ReactionResponse {
    fn from(reaction: Reaction) -> Self {
        Self::from(&reaction)
    }
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            channel_id: post.channel_id.to_string(),
            user_id: post.user_id.to_string(),
            message: post.message.clone(),
            has_reactions: post.has_reactions,
            create_at: post.create_at,
            update_at: post.update_at,
        }
    }
}
