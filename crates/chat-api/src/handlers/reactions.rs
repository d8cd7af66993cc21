//! Reaction handlers
//!
//! Endpoints for saving, removing and listing reactions on a post.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::{ReactionRequest, ReactionResponse, ReactionService, StatusResponse};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Save a reaction
///
/// POST /channels/{channel_id}/posts/{post_id}/reactions/save
pub async fn save_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((channel_id, post_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<ReactionRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let service = ReactionService::new(state.service_context());
    let reaction = service
        .save_reaction(auth.user_id, &channel_id, &post_id, request)
        .await?;
    Ok(Json(reaction))
}

/// Remove a reaction
///
/// POST /channels/{channel_id}/posts/{post_id}/reactions/delete
pub async fn delete_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((channel_id, post_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<ReactionRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let service = ReactionService::new(state.service_context());
    service
        .delete_reaction(auth.user_id, &channel_id, &post_id, request)
        .await?;
    Ok(Json(StatusResponse::ok()))
}

/// List reactions on a post
///
/// GET /channels/{channel_id}/posts/{post_id}/reactions
pub async fn get_reactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((channel_id, post_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionService::new(state.service_context());
    let reactions = service
        .list_reactions(auth.user_id, &channel_id, &post_id)
        .await?;
    Ok(Json(reactions))
}
