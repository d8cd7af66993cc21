//! # chat-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

pub use auth::{Claims, JwtService};
pub use config::{
    AppConfig, AppSettings, BroadcastConfig, CacheSettings, ConfigError, DatabaseConfig,
    Environment, JwtConfig, RedisConfig, ServerConfig,
};
pub use error::{domain_status, AppError, AppResult};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
