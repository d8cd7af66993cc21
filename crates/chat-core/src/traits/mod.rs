//! Durable-layer traits

mod repositories;

pub use repositories::{
    ChannelRepository, PostRepository, ReactionRepository, ReactionWrite, RepoResult,
};
