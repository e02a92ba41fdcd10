//! Discord webhook delivery.

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::form::Submission;

#[derive(Debug, Error)]
#[error("failed to reach webhook")]
pub struct NotifyError(#[source] pub reqwest::Error);

/// Discord webhook execute payload.
#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub content: String,
}

/// Posts submissions to a Discord webhook.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: Client,
}

impl DiscordNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Post the submission to `webhook_url`.
    ///
    /// Returns `Ok(false)` when the webhook answers with a non-2xx status;
    /// the response body is logged. Only transport failures are errors.
    pub async fn notify(
        &self,
        webhook_url: &str,
        submission: &Submission,
    ) -> Result<bool, NotifyError> {
        let payload = WebhookPayload {
            content: format_message(submission),
        };

        let response = self
            .client
            .post(webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(NotifyError)?;

        let status = response.status();
        if status.is_success() {
            info!(status_code = status.as_u16(), "discord_delivered");
            return Ok(true);
        }

        let body = describe_body(response.text().await);
        error!(
            status_code = status.as_u16(),
            response_body = %body,
            "discord_delivery_failed"
        );

        Ok(false)
    }
}

/// Body text for failure logs; a failed read is reported in its place.
fn describe_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {e}>"),
    }
}

/// Render the submission as a Discord markdown message.
///
/// Fields are embedded as-is; they are expected to be sanitized already.
pub fn format_message(submission: &Submission) -> String {
    let mut content = format!(
        "**新しいお問い合わせが届きました**\n\n- **お名前:** {}\n- **メールアドレス:** {}\n",
        submission.name, submission.email
    );

    if let Some(company) = submission.company_name.as_deref().filter(|c| !c.is_empty()) {
        content.push_str(&format!("- **会社名:** {}\n", company));
    }

    content.push_str(&format!("- **メッセージ:** {}", submission.message));
    content
}
