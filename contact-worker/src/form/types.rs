//! Request-scoped data types.

use serde::{Deserialize, Serialize};

/// A sanitized contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Company name from the `intra_name` field
    pub company_name: Option<String>,
    /// Turnstile token, passed through untouched
    pub verification_token: String,
}

/// Turnstile siteverify reply.
///
/// A reply without `success` counts as a failed verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerificationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Option<Vec<String>>,
}

/// JSON body returned to the browser.
///
/// Exactly one of `message` or `error` is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(text.into()),
        }
    }
}
