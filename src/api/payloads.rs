//! Wire payloads for the shortener service API
//!
//! Stats payloads deserialize directly into the canonical report type
//! (see `crate::report`); everything here covers the thin collaborator
//! endpoints: shorten, auth, URL management, health.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body the service attaches to non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShortenReply {
    pub short_url: String,
    pub original_url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthReply {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyUrlsReply {
    pub urls: Vec<UrlEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlEntry {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

/// Generic `{"message": "..."}` confirmation reply
#[derive(Debug, Clone, Deserialize)]
pub struct MessageReply {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthReply {
    pub status: String,
}
