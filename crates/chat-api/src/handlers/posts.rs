//! Post handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::{PostResponse, PostService};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Recent posts of a channel, newest first
///
/// GET /channels/{channel_id}/posts
pub async fn get_channel_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let limit = state.config().cache.channel_posts_limit;
    let posts = PostService::new(state.service_context())
        .recent_posts(auth.user_id, &channel_id, limit)
        .await?;
    Ok(Json(posts))
}
