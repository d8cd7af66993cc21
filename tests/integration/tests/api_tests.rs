//! API Integration Tests
//!
//! Run the whole router in-process over the in-memory backend.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use axum::http::StatusCode;
use chat_core::{EventType, Id, Post};
use integration_tests::{error_code, reaction_body, TestApp};
use serde_json::Value;

fn app() -> TestApp {
    TestApp::new().expect("Failed to build test app")
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = app.get("/health", None).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = app();
    let path = app.reactions_path(app.channel, app.post.id, "");

    let (status, body) = app.get(&path, None).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = app();
    let path = app.reactions_path(app.channel, app.post.id, "");

    let (status, body) = app.get(&path, Some("not.a.jwt")).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_list_reaction() {
    let app = app();
    let body = reaction_body(app.user, app.post.id, "smile");

    let (status, saved) = app
        .post_json(
            &app.reactions_path(app.channel, app.post.id, "/save"),
            Some(&app.token),
            &body,
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["emoji_name"], "smile");
    assert_eq!(saved["user_id"], app.user.as_str());
    assert!(saved["create_at"].as_i64().unwrap() > 0);

    let (status, listed) = app
        .get(
            &app.reactions_path(app.channel, app.post.id, ""),
            Some(&app.token),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, Value::Array(vec![saved]));
}

#[tokio::test]
async fn test_delete_reaction_returns_ok_status() {
    let app = app();
    let body = reaction_body(app.user, app.post.id, "smile");
    app.post_json(
        &app.reactions_path(app.channel, app.post.id, "/save"),
        Some(&app.token),
        &body,
    )
    .await
    .unwrap();

    let (status, response) = app
        .post_json(
            &app.reactions_path(app.channel, app.post.id, "/delete"),
            Some(&app.token),
            &body,
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "OK");

    let (_, listed) = app
        .get(
            &app.reactions_path(app.channel, app.post.id, ""),
            Some(&app.token),
        )
        .await
        .unwrap();
    assert_eq!(listed, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();

    let (status, body) = app
        .post_raw(
            &app.reactions_path(app.channel, app.post.id, "/save"),
            Some(&app.token),
            "{not json",
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_BODY");
}

#[tokio::test]
async fn test_reacting_as_someone_else_is_forbidden() {
    let app = app();
    app.backend.reset_calls();
    let body = reaction_body(Id::generate(), app.post.id, "smile");

    let (status, response) = app
        .post_json(
            &app.reactions_path(app.channel, app.post.id, "/save"),
            Some(&app.token),
            &body,
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&response), "MISSING_PERMISSIONS");
    assert_eq!(app.backend.calls(), 0);
}

#[tokio::test]
async fn test_non_member_is_forbidden() {
    let app = app();
    let outsider = Id::generate();
    let token = app.token_for(outsider, false).unwrap();

    let (status, _) = app
        .get(
            &app.reactions_path(app.channel, app.post.id, ""),
            Some(&token),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_from_other_channel_is_mismatch() {
    let app = app();
    let other_channel = Id::generate();
    let foreign = Post::new(Id::generate(), other_channel, Id::generate(), "x", 1);
    app.backend.insert_post(foreign.clone());
    let body = reaction_body(app.user, foreign.id, "smile");

    let (status, response) = app
        .post_json(
            &app.reactions_path(app.channel, foreign.id, "/save"),
            Some(&app.token),
            &body,
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "CHANNEL_MISMATCH");
    assert!(app.backend.reactions_for(foreign.id).is_empty());

    let (status, response) = app
        .get(&app.reactions_path(app.channel, foreign.id, ""), Some(&app.token))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "CHANNEL_MISMATCH");
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let app = app();
    let missing = Id::generate();

    let (status, response) = app
        .get(&app.reactions_path(app.channel, missing, ""), Some(&app.token))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&response), "UNKNOWN_POST");
}

#[tokio::test]
async fn test_malformed_path_id_is_bad_request() {
    let app = app();

    let (status, response) = app
        .get(
            &format!("/api/v1/channels/short/posts/{}/reactions", app.post.id),
            Some(&app.token),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "INVALID_ID");
}

#[tokio::test]
async fn test_store_failure_hides_cause() {
    let app = app();
    app.backend.set_failing(true);

    let (status, response) = app
        .get(
            &app.reactions_path(app.channel, app.post.id, ""),
            Some(&app.token),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&response), "DATABASE_ERROR");
    assert_eq!(response["error"]["message"], "Internal server error");
}

// ============================================================================
// Broadcast Tests
// ============================================================================

#[tokio::test]
async fn test_subscribers_receive_reaction_envelope() {
    let app = app();
    let mut subscription = app.state.hub().subscribe(app.channel);
    let body = reaction_body(app.user, app.post.id, "wave");

    app.post_json(
        &app.reactions_path(app.channel, app.post.id, "/save"),
        Some(&app.token),
        &body,
    )
    .await
    .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.event_type, EventType::ReactionAdded);

    let envelope: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
    assert_eq!(envelope["type"], "reaction_added");
    assert_eq!(envelope["channel_id"], app.channel.as_str());
    let reaction: Value =
        serde_json::from_str(envelope["data"]["reaction"].as_str().unwrap()).unwrap();
    assert_eq!(reaction["emoji_name"], "wave");
}

// ============================================================================
// Channel Post Tests
// ============================================================================

#[tokio::test]
async fn test_channel_posts_reflect_reactions() {
    let app = app();
    let posts_path = format!("/api/v1/channels/{}/posts", app.channel);

    let (status, before) = app.get(&posts_path, Some(&app.token)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before[0]["has_reactions"], false);

    let body = reaction_body(app.user, app.post.id, "smile");
    app.post_json(
        &app.reactions_path(app.channel, app.post.id, "/save"),
        Some(&app.token),
        &body,
    )
    .await
    .unwrap();

    let (_, after) = app.get(&posts_path, Some(&app.token)).await.unwrap();
    assert_eq!(after[0]["has_reactions"], true);
}
