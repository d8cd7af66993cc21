//! # chat-service
//!
//! Application layer: the reaction orchestrator, channel authorization and
//! the request/response DTOs it speaks.

pub mod dto;
pub mod services;

pub use dto::{HealthResponse, PostResponse, ReactionRequest, ReactionResponse, StatusResponse};
pub use services::{
    PermissionService, PostService, ReactionService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
