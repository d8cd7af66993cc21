//! # chat-core
//!
//! Domain layer containing entities, value objects, durable-layer traits and
//! realtime broadcast events. This crate has zero dependencies on
//! infrastructure (database, cache, web framework, etc.).

pub mod clock;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use clock::now_millis;
pub use entities::{validate_emoji_name, ChannelMember, Post, Reaction, EMOJI_NAME_MAX_LENGTH};
pub use error::DomainError;
pub use events::{BroadcastEvent, EventType};
pub use traits::{
    ChannelRepository, PostRepository, ReactionRepository, ReactionWrite, RepoResult,
};
pub use value_objects::{Id, IdParseError, ID_LENGTH};
