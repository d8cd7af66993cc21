//! Test fixtures and data generators

use chat_common::{
    AppConfig, AppSettings, BroadcastConfig, CacheSettings, DatabaseConfig, Environment,
    JwtConfig, ServerConfig,
};
use chat_core::Id;
use serde_json::{json, Value};

/// Secret the test tokens are signed with
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Configuration for an in-process test app; nothing here is dialled
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "chat-server-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        redis: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            token_expiry: 3600,
        },
        cache: CacheSettings::default(),
        broadcast: BroadcastConfig::default(),
    }
}

/// Reaction descriptor body
pub fn reaction_body(user_id: Id, post_id: Id, emoji_name: &str) -> Value {
    json!({
        "user_id": user_id,
        "post_id": post_id,
        "emoji_name": emoji_name,
    })
}
