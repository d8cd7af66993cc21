//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, posts, reactions};
use crate::state::AppState;

/// Create the main API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(channel_routes())
}

/// Channel routes
fn channel_routes() -> Router<AppState> {
    Router::new()
        .route("/channels/:channel_id/posts", get(posts::get_channel_posts))
        // Post reactions
        .route(
            "/channels/:channel_id/posts/:post_id/reactions",
            get(reactions::get_reactions),
        )
        .route(
            "/channels/:channel_id/posts/:post_id/reactions/save",
            post(reactions::save_reaction),
        )
        .route(
            "/channels/:channel_id/posts/:post_id/reactions/delete",
            post(reactions::delete_reaction),
        )
}
