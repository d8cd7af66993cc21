//! Database models - SQLx-compatible structs for PostgreSQL tables

mod post;
mod reaction;

pub use post::PostModel;
pub use reaction::ReactionModel;
