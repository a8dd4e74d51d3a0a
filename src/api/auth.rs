//! reqwest implementation of [`AuthService`] against the EcoSort backend.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde_json::json;

use crate::error::{EcosortError, Result};
use crate::models::UserProfile;

use super::{
    service_error_message, service_error_messages, AuthService, LoginResponse, RegisterRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Header the backend reads the session token from.
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Shown when the service fails without a usable message of its own.
const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "An error occurred.";

#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthService {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EcosortError::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                debug!("login transport error: {e}");
                EcosortError::login_failed(LOGIN_FALLBACK)
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            serde_json::from_str(&body)
                .map_err(|e| EcosortError::http(format!("unexpected login response: {e}")))
        } else {
            debug!("login rejected with status {status}");
            Err(EcosortError::login_failed(
                service_error_message(&body).unwrap_or_else(|| LOGIN_FALLBACK.to_string()),
            ))
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                debug!("register transport error: {e}");
                EcosortError::RegistrationFailed {
                    errors: vec![REGISTER_FALLBACK.to_string()],
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        debug!("register rejected with status {status}");
        Err(EcosortError::RegistrationFailed {
            errors: service_error_messages(&body)
                .unwrap_or_else(|| vec![REGISTER_FALLBACK.to_string()]),
        })
    }

    async fn resolve_user(&self, token: &str) -> Result<UserProfile> {
        let response = self
            .client
            .get(self.endpoint("/auth"))
            .header(AUTH_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| EcosortError::http(format!("resolve user transport error: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(EcosortError::AuthInvalid);
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            serde_json::from_str(&body)
                .map_err(|e| EcosortError::http(format!("unexpected profile response: {e}")))
        } else {
            Err(EcosortError::http(format!(
                "resolve user failed with status {status}"
            )))
        }
    }
}
