//! Reaction service
//!
//! Saves, deletes and lists reactions on behalf of a session user. Every
//! mutation is cross-checked against the channel named in the request path,
//! committed once, and then announced to the channel's subscribers without
//! waiting for delivery.

use std::future::IntoFuture;

use chat_core::{
    now_millis, validate_emoji_name, BroadcastEvent, DomainError, EventType, Id, Post, Reaction,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::dto::{PostResponse, ReactionRequest, ReactionResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Save a reaction on a post
    ///
    /// Returns the persisted row; saving an existing reaction again returns
    /// it with its original `create_at`.
    #[instrument(skip(self, request))]
    pub async fn save_reaction(
        &self,
        session_user: Id,
        channel_id: &str,
        post_id: &str,
        request: ReactionRequest,
    ) -> ServiceResult<ReactionResponse> {
        let (channel_id, reaction) = self.prepare(session_user, channel_id, post_id, &request)?;
        let post = self.authorize_and_fetch(channel_id, session_user, reaction.post_id).await?;

        let committed = self.ctx.store().reaction().save(reaction).await?;
        let post_update_at = committed.post_update_at;
        let saved = committed.into_value();

        info!(
            post_id = %saved.post_id,
            user_id = %saved.user_id,
            emoji = %saved.emoji_name,
            "Reaction added"
        );

        self.announce(EventType::ReactionAdded, &post, post_update_at, &saved);
        Ok(ReactionResponse::from(saved))
    }

    /// Remove a reaction from a post; removing an absent one succeeds
    #[instrument(skip(self, request))]
    pub async fn delete_reaction(
        &self,
        session_user: Id,
        channel_id: &str,
        post_id: &str,
        request: ReactionRequest,
    ) -> ServiceResult<()> {
        let (channel_id, reaction) = self.prepare(session_user, channel_id, post_id, &request)?;
        let post = self.authorize_and_fetch(channel_id, session_user, reaction.post_id).await?;

        let committed = self.ctx.store().reaction().delete(reaction.clone()).await?;

        info!(
            post_id = %reaction.post_id,
            user_id = %reaction.user_id,
            emoji = %reaction.emoji_name,
            "Reaction removed"
        );

        self.announce(EventType::ReactionRemoved, &post, committed.post_update_at, &reaction);
        Ok(())
    }

    /// List the reactions on a post, oldest first
    #[instrument(skip(self))]
    pub async fn list_reactions(
        &self,
        session_user: Id,
        channel_id: &str,
        post_id: &str,
    ) -> ServiceResult<Vec<ReactionResponse>> {
        let channel_id = parse_path_id("channel_id", channel_id)?;
        let post_id = parse_path_id("post_id", post_id)?;

        let pending_post = self.ctx.store().post().get(post_id);
        let permission = PermissionService::new(self.ctx);
        let (access, post) = tokio::join!(
            permission.require_channel_read(channel_id, session_user),
            pending_post.into_future()
        );
        access?;
        cross_check(channel_id, &post?)?;

        let reactions = self.ctx.store().reaction().get_for_post(post_id, true).await?;
        Ok(reactions.iter().map(ReactionResponse::from).collect())
    }

    /// Remove every reaction using an emoji, across all posts
    ///
    /// Used when a custom emoji is deleted. Nothing is broadcast; clients
    /// pick the change up on their next read.
    #[instrument(skip(self))]
    pub async fn purge_emoji(&self, emoji_name: &str) -> ServiceResult<u64> {
        validate_emoji_name(emoji_name)?;

        let removed = self
            .ctx
            .store()
            .reaction()
            .delete_all_with_emoji_name(emoji_name)
            .await?
            .into_value();

        info!(emoji = %emoji_name, removed, "Emoji purged from reactions");
        Ok(removed)
    }

    /// Checks that need no store access: descriptor, ownership, path ids
    fn prepare(
        &self,
        session_user: Id,
        channel_id: &str,
        post_id: &str,
        request: &ReactionRequest,
    ) -> ServiceResult<(Id, Reaction)> {
        let reaction = request.to_reaction()?;

        if reaction.user_id != session_user {
            return Err(ServiceError::permission_denied("edit_other_users"));
        }

        let channel_id = parse_path_id("channel_id", channel_id)?;
        let post_id = parse_path_id("post_id", post_id)?;
        if post_id != reaction.post_id {
            return Err(ServiceError::validation(format!(
                "post_id {post_id} does not match the reaction's post {}",
                reaction.post_id
            )));
        }

        Ok((channel_id, reaction))
    }

    async fn authorize_and_fetch(
        &self,
        channel_id: Id,
        session_user: Id,
        post_id: Id,
    ) -> ServiceResult<Post> {
        PermissionService::new(self.ctx)
            .require_channel_read(channel_id, session_user)
            .await?;

        let post = self.ctx.store().post().get(post_id).await?;
        cross_check(channel_id, &post)?;
        Ok(post)
    }

    /// Drop the channel's cached post list and queue the realtime events
    ///
    /// The post list is invalidated before returning; the events are only
    /// enqueued. `post_update_at` is the stamp the durable layer wrote; the
    /// local clock is only used when it reported none.
    fn announce(
        &self,
        event_type: EventType,
        post: &Post,
        post_update_at: Option<i64>,
        reaction: &Reaction,
    ) {
        self.ctx
            .store()
            .post()
            .invalidate_cache_for_channel_posts(post.channel_id);

        let publisher = self.ctx.publisher();
        if let Some(payload) = encode(&ReactionResponse::from(reaction)) {
            let event = BroadcastEvent::new(event_type, post.channel_id).with("reaction", payload);
            publisher.publish(event);
        }

        let edited = match post_update_at {
            Some(update_at) => post.touched_at(update_at),
            None => post.touched_by_reaction(now_millis()),
        };
        if let Some(payload) = encode(&PostResponse::from(&edited)) {
            let event = BroadcastEvent::new(EventType::PostEdited, post.channel_id).with("post", payload);
            publisher.publish(event);
        }
    }
}

fn parse_path_id(field: &'static str, raw: &str) -> ServiceResult<Id> {
    Id::parse(raw).map_err(|e| DomainError::invalid_id(field, e).into())
}

fn cross_check(channel_id: Id, post: &Post) -> ServiceResult<()> {
    if post.belongs_to(channel_id) {
        return Ok(());
    }
    Err(ServiceError::ChannelMismatch {
        post_id: post.id,
        post_channel_id: post.channel_id,
        channel_id,
    })
}

fn encode<T: Serialize>(payload: &T) -> Option<String> {
    match serde_json::to_string(payload) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(error = %e, "Broadcast payload could not be encoded");
            None
        }
    }
}
