//! Post service
//!
//! Recent posts of a channel, served from the channel post-list cache.

use chat_core::{DomainError, Id};
use tracing::{debug, instrument};

use crate::dto::PostResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Most recent posts of a channel, newest first
    #[instrument(skip(self))]
    pub async fn recent_posts(
        &self,
        session_user: Id,
        channel_id: &str,
        limit: i64,
    ) -> ServiceResult<Vec<PostResponse>> {
        let channel_id =
            Id::parse(channel_id).map_err(|e| DomainError::invalid_id("channel_id", e))?;

        PermissionService::new(self.ctx)
            .require_channel_read(channel_id, session_user)
            .await?;

        let posts = self
            .ctx
            .store()
            .post()
            .get_for_channel(channel_id, limit, true)
            .await?;

        debug!(count = posts.len(), "Channel posts loaded");
        Ok(posts.iter().map(PostResponse::from).collect())
    }
}
