//! # chat-db
//!
//! Durable layer for reactions, posts and channel membership.
//!
//! ## Overview
//!
//! Two implementations of the repository traits defined in `chat-core`:
//!
//! - PostgreSQL repositories via SQLx (`Pg*Repository`)
//! - An in-memory backend (`memory::MemoryBackend`) for tests and local runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use chat_db::repositories::PgReactionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use memory::MemoryBackend;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgChannelRepository, PgPostRepository, PgReactionRepository};
