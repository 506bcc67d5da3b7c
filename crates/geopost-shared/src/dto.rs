//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /v1/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Confirmation returned after creating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreatedResponse {
    pub message: String,
    pub post_id: Uuid,
    pub author_id: String,
}

/// A full post record as returned by the read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub post_id: Uuid,
    pub author_google_id: String,
    pub title: String,
    pub content: String,
    pub longitude: f64,
    pub latitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Result of a proximity query; the shape depends on the configured
/// strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NearbyResponse {
    Posts { posts: Vec<PostResponse> },
    PostIds { post_ids: Vec<Uuid> },
}

/// Plain message body used by the liveness endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
