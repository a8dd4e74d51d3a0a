//! Error types shared across the EcoSort core.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the session, workflow, and service layers.
///
/// Variants map one-to-one onto the failure modes the stores expose to a
/// view: some are meant for inline display (`LoginFailed`,
/// `ClientValidation`), some are already surfaced through the notification
/// center when returned (`UploadFailed`, `ConfidenceOutOfRange`), and some
/// are silent-recovery markers that a caller normally never sees
/// (`AuthInvalid`).
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EcosortError {
    /// The stored token was rejected by the auth service. Recovered from
    /// silently: session state is cleared without a toast.
    #[error("session token is invalid or expired")]
    AuthInvalid,

    /// Login was rejected. Carries the service message when present so a
    /// form can show it inline.
    #[error("{message}")]
    LoginFailed { message: String },

    /// The auth service rejected a registration. One message per failed
    /// server-side rule, in service order.
    #[error("registration failed: {}", .errors.first().map(String::as_str).unwrap_or("unknown error"))]
    RegistrationFailed { errors: Vec<String> },

    /// Local registration-form validation failed; no network call was made.
    /// Keyed by field name, ordered, so forms render deterministically.
    #[error("registration form has {} invalid field(s)", .errors.len())]
    ClientValidation { errors: BTreeMap<String, String> },

    /// The classification upload failed. Already shown as an error toast by
    /// the workflow when this is returned.
    #[error("{message}")]
    UploadFailed { message: String },

    /// Classify was triggered with no image selected; no network call made.
    #[error("no image selected")]
    NoFileSelected,

    /// The selected bytes are not an accepted image (format or size).
    #[error("{message}")]
    InvalidImage { message: String },

    /// A classify call is already in flight; duplicates are rejected, never
    /// queued.
    #[error("a classification is already in progress")]
    SubmissionInFlight,

    /// The service returned a confidence outside 0-100. Contract violation,
    /// surfaced as an error instead of being clamped.
    #[error("confidence {value} is outside the 0-100 contract range")]
    ConfidenceOutOfRange { value: f64 },

    /// An operation was requested in a phase that does not allow it.
    #[error("'{action}' is not allowed in the {phase} phase")]
    InvalidTransition { action: String, phase: String },

    /// Transport failure or an unexpected HTTP status outside the mapped
    /// per-endpoint cases.
    #[error("http error: {message}")]
    Http { message: String },

    /// Credential-file I/O failure.
    #[error("io error: {message}")]
    Io { message: String },

    /// JSON (de)serialization failure.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl EcosortError {
    pub fn login_failed(message: impl Into<String>) -> Self {
        Self::LoginFailed {
            message: message.into(),
        }
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::UploadFailed {
            message: message.into(),
        }
    }

    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn invalid_transition(action: impl Into<String>, phase: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            phase: phase.into(),
        }
    }

    /// True for the silent-recovery variants that must never produce a toast.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::AuthInvalid)
    }
}

impl From<std::io::Error> for EcosortError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for EcosortError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, EcosortError>`.
pub type Result<T> = std::result::Result<T, EcosortError>;
