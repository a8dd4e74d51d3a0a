//! Runtime configuration for the core.

use std::env;
use std::path::PathBuf;

/// Canonical backend base URL; auth and classification share it.
pub const DEFAULT_API_BASE_URL: &str = "https://smart-waste-backend.vercel.app/api";

/// Settings the embedding shell hands to [`crate::AppCore`].
///
/// `api_base_url` covers both the auth and classification endpoints (they
/// share one backend). `data_dir` is where the credential file lives; the
/// shell passes its app-data directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_dir: data_dir.into(),
        }
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }
}

fn default_api_base_url() -> String {
    env::var("ECOSORT_API_BASE_URL")
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}
