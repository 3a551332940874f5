use crate::adapters::mail::{MailTransport, TransportError};
use crate::config::{MailConfig, ResendConfig};
use crate::domain::notification::NotificationMessage;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Longest provider error body kept for logging.
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize, Debug)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Delivers through an HTTP email API (Resend `POST /emails`).
#[derive(Clone)]
pub struct ResendTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl std::fmt::Debug for ResendTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendTransport").field("api_url", &self.api_url).field("from", &self.from).finish_non_exhaustive()
    }
}

impl ResendTransport {
    /// Builds the transport, or `None` when no usable API key is configured.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ResendConfig, mail: &MailConfig) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder().timeout(Duration::from_millis(config.resend_timeout_ms)).build()?;

        Ok(Some(Self {
            client,
            api_url: config.resend_api_url.clone(),
            api_key: api_key.to_string(),
            from: mail.sender.clone(),
        }))
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: [&message.to],
            reply_to: &message.reply_to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Other(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(TransportError::Rejected { status: status.as_u16(), body });
        }

        tracing::debug!(status = %status.as_u16(), "HTTP email API accepted message");
        Ok(())
    }
}
