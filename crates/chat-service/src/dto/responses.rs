//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. The same shapes
//! are JSON-encoded into broadcast payloads, so connected clients and HTTP
//! callers see identical field names.

use serde::{Deserialize, Serialize};

/// Persisted reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
    pub create_at: i64,
}

/// Post as seen by clients after a reaction change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub message: String,
    pub has_reactions: bool,
    pub create_at: i64,
    pub update_at: i64,
}

/// Bare acknowledgement, `{"status": "OK"}`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "OK" }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
