//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chat-core.

mod channel;
mod error;
mod post;
mod reaction;

pub use channel::PgChannelRepository;
pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
