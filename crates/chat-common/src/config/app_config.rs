//! Application configuration
//!
//! Loaded from environment variables, with a `.env` file honoured when present.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// Redis fan-out is optional; without it broadcasts stay in-process
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub cache: CacheSettings,
    pub broadcast: BroadcastConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: usize,
    /// Bound on waiting for, opening and recycling a pooled connection
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

/// Read-through cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of recent posts held per channel entry
    #[serde(default = "default_channel_posts_limit")]
    pub channel_posts_limit: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_posts_limit: default_channel_posts_limit(),
        }
    }
}

/// Realtime broadcast settings
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Capacity of the queue between request handlers and the dispatcher
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-subscriber buffer before events are dropped for that subscriber
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
    /// Longest one sink may spend on one event
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            subscriber_buffer: default_subscriber_buffer(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

fn default_app_name() -> String {
    "chat-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> usize {
    10
}

fn default_redis_timeout_ms() -> u64 {
    2_000
}

fn default_token_expiry() -> i64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_channel_posts_limit() -> i64 {
    60
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_subscriber_buffer() -> usize {
    64
}

fn default_delivery_timeout_ms() -> u64 {
    5_000
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Parse an optional variable, falling back when unset but failing on garbage
fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name, raw.to_string())),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let port_raw = required("API_PORT")?;
        let port = port_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("API_PORT", port_raw))?;

        let redis = match env::var("REDIS_URL") {
            Ok(url) if !url.trim().is_empty() => Some(RedisConfig {
                url,
                max_connections: parsed_or(
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections(),
                )?,
                timeout_ms: parsed_or("REDIS_TIMEOUT_MS", default_redis_timeout_ms())?,
            }),
            _ => None,
        };

        let cache_enabled = match env::var("CACHE_ENABLED") {
            Ok(raw) => parse_bool("CACHE_ENABLED", &raw)?,
            Err(_) => true,
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::from_name(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
            },
            redis,
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                token_expiry: parsed_or("JWT_TOKEN_EXPIRY", default_token_expiry())?,
            },
            cache: CacheSettings {
                enabled: cache_enabled,
                channel_posts_limit: parsed_or(
                    "CACHE_CHANNEL_POSTS_LIMIT",
                    default_channel_posts_limit(),
                )?,
            },
            broadcast: BroadcastConfig {
                queue_capacity: parsed_or("BROADCAST_QUEUE_CAPACITY", default_queue_capacity())?,
                subscriber_buffer: parsed_or(
                    "BROADCAST_SUBSCRIBER_BUFFER",
                    default_subscriber_buffer(),
                )?,
                delivery_timeout_ms: parsed_or(
                    "BROADCAST_DELIVERY_TIMEOUT_MS",
                    default_delivery_timeout_ms(),
                )?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
