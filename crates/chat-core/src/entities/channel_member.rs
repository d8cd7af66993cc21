//! Channel membership - grants read access to a channel

use crate::value_objects::Id;

/// Membership of a user in a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelMember {
    pub channel_id: Id,
    pub user_id: Id,
}

impl ChannelMember {
    pub fn new(channel_id: Id, user_id: Id) -> Self {
        Self {
            channel_id,
            user_id,
        }
    }
}
