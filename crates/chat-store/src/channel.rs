//! Channel store

use std::sync::Arc;

use chat_core::{ChannelRepository, Id};
use tracing::instrument;

use crate::future::StoreFuture;

/// Channel membership lookups
#[derive(Clone)]
pub struct ChannelStore {
    repo: Arc<dyn ChannelRepository>,
}

impl ChannelStore {
    pub fn new(repo: Arc<dyn ChannelRepository>) -> Self {
        Self { repo }
    }

    /// Whether `user_id` is a member of `channel_id`
    #[instrument(skip(self))]
    pub fn has_member(&self, channel_id: Id, user_id: Id) -> StoreFuture<bool> {
        let repo = Arc::clone(&self.repo);
        StoreFuture::issue(async move { repo.is_member(channel_id, user_id).await })
    }
}

impl std::fmt::Debug for ChannelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelStore").finish_non_exhaustive()
    }
}
