//! Business logic services
//!
//! Services borrow a [`ServiceContext`] for the duration of one request and
//! orchestrate store reads, mutations and broadcasts.

pub mod context;
pub mod error;
pub mod permission;
pub mod post;
pub mod reaction;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use permission::PermissionService;
pub use post::PostService;
pub use reaction::ReactionService;
