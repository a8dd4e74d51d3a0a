//! Client-side validation for the registration form. Submission is blocked
//! until every field passes, so the backend only sees plausible payloads.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api::RegisterRequest;
use crate::error::{EcosortError, Result};

const MIN_NAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Checks every field and returns the full error map on failure, keyed
    /// by the field names the form binds to.
    pub fn validate(&self) -> Result<()> {
        let mut errors: BTreeMap<String, String> = BTreeMap::new();

        if self.full_name.chars().count() < MIN_NAME_CHARS {
            errors.insert(
                "fullName".to_string(),
                "Full name must be at least 3 characters".to_string(),
            );
        }

        if !EMAIL_PATTERN.is_match(&self.email) {
            errors.insert(
                "email".to_string(),
                "Email address is invalid".to_string(),
            );
        }

        // The complexity message wins over the length message when both
        // apply, matching the form's historical behavior.
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.insert(
                "password".to_string(),
                "Password must be at least 8 characters".to_string(),
            );
        }
        if !password_has_required_classes(&self.password) {
            errors.insert(
                "password".to_string(),
                "Password must contain an uppercase, lowercase, number, and special character"
                    .to_string(),
            );
        }

        if self.confirm_password != self.password {
            errors.insert(
                "confirmPassword".to_string(),
                "Passwords do not match".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EcosortError::ClientValidation { errors })
        }
    }

    pub(crate) fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

fn password_has_required_classes(password: &str) -> bool {
    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    let mut special = false;
    for c in password.chars() {
        upper |= c.is_ascii_uppercase();
        lower |= c.is_ascii_lowercase();
        digit |= c.is_ascii_digit();
        special |= !c.is_ascii_alphanumeric();
    }
    upper && lower && digit && special
}
