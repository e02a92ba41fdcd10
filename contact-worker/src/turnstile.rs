//! Cloudflare Turnstile token verification.
//!
//! Reference: https://developers.cloudflare.com/turnstile/get-started/server-side-validation/

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;
use tracing::{info, warn};

use crate::form::VerificationResult;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to reach verification endpoint")]
    Transport(#[source] reqwest::Error),

    #[error("verification endpoint returned an undecodable body")]
    Decode(#[source] reqwest::Error),
}

/// Client for the siteverify endpoint.
#[derive(Debug, Clone)]
pub struct TurnstileVerifier {
    client: Client,
    verify_url: String,
}

impl TurnstileVerifier {
    pub fn new(client: Client, verify_url: impl Into<String>) -> Self {
        Self {
            client,
            verify_url: verify_url.into(),
        }
    }

    /// Verify a client token against the server secret.
    ///
    /// The reply body is authoritative: a `success: false` body is a
    /// rejection whatever the HTTP status. No retries.
    pub async fn verify(
        &self,
        token: &str,
        secret: &Secret<String>,
    ) -> Result<VerificationResult, VerifyError> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret.expose_secret().as_str()), ("response", token)])
            .send()
            .await
            .map_err(VerifyError::Transport)?;

        let status = response.status().as_u16();

        let result: VerificationResult = response.json().await.map_err(VerifyError::Decode)?;

        if result.success {
            info!(status_code = status, "turnstile_verified");
        } else {
            warn!(
                status_code = status,
                error_codes = ?result.error_codes,
                "turnstile_rejected"
            );
        }

        Ok(result)
    }
}
