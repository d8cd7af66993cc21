//! Domain entities - core business objects

mod channel_member;
mod post;
mod reaction;

pub use channel_member::ChannelMember;
pub use post::Post;
pub use reaction::{validate_emoji_name, Reaction, EMOJI_NAME_MAX_LENGTH};
