//! Contracts for the two remote services the app talks to, plus their
//! reqwest implementations. Stores depend on the traits; [`HttpAuthService`]
//! and [`HttpClassifyService`] are the production wiring.

pub mod auth;
pub mod classify;

pub use auth::HttpAuthService;
pub use classify::HttpClassifyService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ClassificationResult, UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Bytes plus the metadata the upload endpoint wants alongside them.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;
    async fn register(&self, request: &RegisterRequest) -> Result<()>;
    /// Resolves the profile belonging to `token`. Rejected tokens are a
    /// distinct error so callers can log out silently.
    async fn resolve_user(&self, token: &str) -> Result<UserProfile>;
}

#[async_trait]
pub trait ClassificationService: Send + Sync {
    async fn classify(&self, upload: ImageUpload) -> Result<ClassificationResult>;
}

/// Error payload shapes observed from the backend: `{"msg": ...}`,
/// `{"error": ...}`, or express-validator style `{"errors": [{"msg": ...}]}`.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    msg: Option<String>,
    error: Option<String>,
    errors: Option<Vec<ServiceFieldError>>,
}

#[derive(Debug, Deserialize)]
struct ServiceFieldError {
    msg: Option<String>,
}

/// Best single message out of an error body, trying `msg`, then `error`,
/// then the first entry of `errors`.
pub(crate) fn service_error_message(body: &str) -> Option<String> {
    let parsed: ServiceErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .msg
        .or(parsed.error)
        .or_else(|| parsed.errors?.into_iter().next()?.msg)
        .filter(|message| !message.is_empty())
}

/// Every per-field message out of an error body, falling back to the single
/// message forms when there is no `errors` array.
pub(crate) fn service_error_messages(body: &str) -> Option<Vec<String>> {
    let parsed: ServiceErrorBody = serde_json::from_str(body).ok()?;
    if let Some(errors) = parsed.errors {
        let messages: Vec<String> = errors.into_iter().filter_map(|e| e.msg).collect();
        if !messages.is_empty() {
            return Some(messages);
        }
    }
    parsed.msg.or(parsed.error).map(|message| vec![message])
}
