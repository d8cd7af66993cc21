//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs and broadcast payloads
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::ReactionRequest;
pub use responses::{HealthResponse, PostResponse, ReactionResponse, StatusResponse};
