//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BroadcastConfig, CacheSettings, ConfigError, DatabaseConfig,
    Environment, JwtConfig, RedisConfig, ServerConfig,
};
