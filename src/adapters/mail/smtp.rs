use crate::adapters::mail::{MailTransport, TransportError};
use crate::config::{SmtpConfig, SmtpSecurity};
use crate::domain::notification::NotificationMessage;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Picks the relay host for an account when none is configured explicitly.
#[must_use]
pub fn relay_host_for(account: &str) -> Option<String> {
    let (_, domain) = account.rsplit_once('@')?;
    let domain = domain.trim().to_ascii_lowercase();
    if domain.is_empty() {
        return None;
    }

    match domain.as_str() {
        "gmail.com" | "googlemail.com" => Some("smtp.gmail.com".to_string()),
        _ => Some(format!("smtp.{domain}")),
    }
}

fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| TransportError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Delivers through an authenticated SMTP relay using an account identity and app password.
///
/// A fresh relay transport is built for every message and dropped once the attempt ends,
/// so no connection outlives a single delivery.
#[derive(Clone)]
pub struct SmtpRelayTransport {
    host: String,
    port: u16,
    security: SmtpSecurity,
    timeout: Duration,
    username: String,
    password: String,
}

impl std::fmt::Debug for SmtpRelayTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpRelayTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl SmtpRelayTransport {
    /// Builds the transport, or `None` when the account identity or app password is missing.
    ///
    /// # Errors
    /// Returns an error if no relay host is configured and none can be derived from the account.
    pub fn from_config(config: &SmtpConfig) -> anyhow::Result<Option<Self>> {
        let Some((username, password)) = config.credentials() else {
            return Ok(None);
        };

        let host = match config.smtp_host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => host.to_string(),
            None => relay_host_for(&username)
                .ok_or_else(|| anyhow::anyhow!("cannot derive a relay host from account {username:?}"))?,
        };

        Ok(Some(Self {
            host,
            port: config.smtp_port,
            security: config.security(),
            timeout: Duration::from_millis(config.smtp_timeout_ms),
            username,
            password,
        }))
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    fn build_message(&self, message: &NotificationMessage) -> Result<Message, TransportError> {
        Message::builder()
            .from(mailbox(&self.username)?)
            .reply_to(mailbox(&message.reply_to)?)
            .to(mailbox(&message.to)?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| TransportError::Other(anyhow::anyhow!("failed to build message: {e}")))
    }

    fn relay(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, TransportError> {
        let builder = match self.security {
            SmtpSecurity::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| TransportError::Other(e.into()))?,
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| TransportError::Other(e.into()))?,
            SmtpSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(self.host.as_str()),
        };

        Ok(builder
            .port(self.port)
            .credentials(Credentials::new(self.username.clone(), self.password.clone()))
            .timeout(Some(self.timeout))
            .build())
    }
}

#[async_trait]
impl MailTransport for SmtpRelayTransport {
    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        let email = self.build_message(message)?;
        let relay = self.relay()?;

        match relay.test_connection().await {
            Ok(true) => {}
            Ok(false) => return Err(TransportError::VerifyFailed),
            Err(e) => {
                tracing::debug!(error = %e, host = %self.host, "Relay verification failed");
                return Err(TransportError::VerifyFailed);
            }
        }

        relay.send(email).await.map_err(|e| TransportError::Other(e.into()))?;
        tracing::debug!(host = %self.host, "Relay accepted message");
        Ok(())
    }
}
