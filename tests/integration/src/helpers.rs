//! Test helpers for integration tests
//!
//! Provides an in-process application with a seeded channel, post and
//! member, plus request helpers built on `tower::ServiceExt::oneshot`.

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chat_api::{assemble_state, create_app, AppState};
use chat_cache::CacheConfig;
use chat_core::{ChannelMember, Id, Post};
use chat_db::MemoryBackend;
use chat_store::Store;
use serde_json::Value;
use tower::ServiceExt;

use crate::fixtures::test_config;

/// Application under test
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub backend: MemoryBackend,
    pub user: Id,
    pub token: String,
    pub channel: Id,
    pub post: Post,
}

impl TestApp {
    /// Build the app; must be called inside a tokio runtime
    pub fn new() -> Result<Self> {
        let backend = MemoryBackend::new();
        let user = Id::generate();
        let channel = Id::generate();
        let post = Post::new(Id::generate(), channel, Id::generate(), "hello", 1_000);
        backend.insert_post(post.clone());
        backend.add_member(ChannelMember::new(channel, user));

        let store = Store::from_backend(backend.clone(), CacheConfig::default());
        let state = assemble_state(test_config(), store)?;
        let token = state.jwt_service().issue_token(user)?;
        let app = create_app(state.clone());

        Ok(Self {
            app,
            state,
            backend,
            user,
            token,
            channel,
            post,
        })
    }

    /// `/api/v1/channels/<channel>/posts/<post>/reactions` plus a suffix
    pub fn reactions_path(&self, channel: Id, post: Id, suffix: &str) -> String {
        format!("/api/v1/channels/{channel}/posts/{post}/reactions{suffix}")
    }

    /// Token for another user, optionally made a member of the test channel
    pub fn token_for(&self, user: Id, member: bool) -> Result<String> {
        if member {
            self.backend.add_member(ChannelMember::new(self.channel, user));
        }
        Ok(self.state.jwt_service().issue_token(user)?)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, token, Some(body.to_string()))
            .await
    }

    /// POST an arbitrary body labelled as JSON
    pub async fn post_raw(
        &self,
        path: &str,
        token: Option<&str>,
        body: &str,
    ) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, token, Some(body.to_string()))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }
}

/// Error code of an error response body
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
