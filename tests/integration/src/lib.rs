//! Integration test utilities for the chat server
//!
//! Drives the full Axum application in-process over the in-memory durable
//! backend, so the HTTP surface can be exercised without PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
