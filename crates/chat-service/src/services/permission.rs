//! Permission service
//!
//! Read access to a channel means a membership row exists.

use chat_core::Id;
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Name reported when channel read access is missing
pub const READ_CHANNEL: &str = "read_channel";

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if a user can read a channel
    #[instrument(skip(self))]
    pub async fn can_read_channel(&self, channel_id: Id, user_id: Id) -> ServiceResult<bool> {
        let allowed = self.ctx.store().channel().has_member(channel_id, user_id).await?;
        debug!(allowed, "Channel read access checked");
        Ok(allowed)
    }

    /// Check channel read access and return error if denied
    pub async fn require_channel_read(&self, channel_id: Id, user_id: Id) -> ServiceResult<()> {
        if !self.can_read_channel(channel_id, user_id).await? {
            return Err(ServiceError::permission_denied(READ_CHANNEL));
        }
        Ok(())
    }
}
