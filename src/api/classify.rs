//! reqwest implementation of [`ClassificationService`]: one multipart upload
//! per attempt, the image under the field name the backend expects.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart;

use crate::error::{EcosortError, Result};
use crate::models::ClassificationResult;

use super::{service_error_message, ClassificationService, ImageUpload};

/// Uploads ride through model inference on the backend, so this is well
/// above the auth timeout.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);
/// Multipart field name the backend reads the image from.
const UPLOAD_FIELD: &str = "wasteImage";

const CLASSIFY_FALLBACK: &str = "There was an error classifying the image. Please try again.";

#[derive(Debug, Clone)]
pub struct HttpClassifyService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifyService {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| EcosortError::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ClassificationService for HttpClassifyService {
    async fn classify(&self, upload: ImageUpload) -> Result<ClassificationResult> {
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)
            .map_err(|e| EcosortError::http(format!("invalid upload mime type: {e}")))?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(format!("{}/classify/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                debug!("classify transport error: {e}");
                EcosortError::upload_failed(CLASSIFY_FALLBACK)
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            serde_json::from_str(&body)
                .map_err(|e| EcosortError::http(format!("unexpected classification response: {e}")))
        } else {
            debug!("classify rejected with status {status}");
            Err(EcosortError::upload_failed(
                service_error_message(&body).unwrap_or_else(|| CLASSIFY_FALLBACK.to_string()),
            ))
        }
    }
}
