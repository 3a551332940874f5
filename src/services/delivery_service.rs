use crate::adapters::mail::resend::ResendTransport;
use crate::adapters::mail::smtp::SmtpRelayTransport;
use crate::adapters::mail::{MailTransport, TransportError};
use crate::config::Config;
use crate::domain::notification::{NotificationMessage, Transport};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Fallback transport is not configured")]
    FallbackUnconfigured,
    #[error("Fallback transport failed: {0}")]
    Fallback(#[source] TransportError),
}

#[derive(Debug)]
pub enum DeliveryOutcome {
    Sent(Transport),
    Failed(DeliveryError),
}

#[derive(Clone, Debug)]
struct Metrics {
    attempts: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            attempts: meter
                .u64_counter("contact_delivery_attempts_total")
                .with_description("Delivery attempts per transport and result")
                .build(),
        }
    }

    fn record(&self, transport: Transport, result: &'static str) {
        self.attempts.add(1, &[KeyValue::new("transport", transport.as_str()), KeyValue::new("result", result)]);
    }
}

/// Sends each notification through the primary transport and, when that is
/// unavailable or fails, through the fallback relay.
#[derive(Clone, Debug)]
pub struct DeliveryService {
    primary: Option<Arc<dyn MailTransport>>,
    fallback: Option<Arc<dyn MailTransport>>,
    attempt_timeout: Duration,
    metrics: Metrics,
}

impl DeliveryService {
    #[must_use]
    pub fn new(
        primary: Option<Arc<dyn MailTransport>>,
        fallback: Option<Arc<dyn MailTransport>>,
        attempt_timeout: Duration,
    ) -> Self {
        Self { primary, fallback, attempt_timeout, metrics: Metrics::new() }
    }

    /// Builds the service from configuration. A transport is only used when its
    /// credentials are configured; overrides replace the concrete adapter but not that check.
    ///
    /// # Errors
    /// Returns an error if a configured adapter cannot be constructed.
    pub fn from_config(
        config: &Config,
        primary_override: Option<Arc<dyn MailTransport>>,
        fallback_override: Option<Arc<dyn MailTransport>>,
    ) -> anyhow::Result<Self> {
        let primary: Option<Arc<dyn MailTransport>> = if config.resend.is_configured() {
            match primary_override {
                Some(transport) => Some(transport),
                None => ResendTransport::from_config(&config.resend, &config.mail)?
                    .map(|t| Arc::new(t) as Arc<dyn MailTransport>),
            }
        } else {
            None
        };

        let fallback: Option<Arc<dyn MailTransport>> = if config.smtp.is_configured() {
            match fallback_override {
                Some(transport) => Some(transport),
                None => SmtpRelayTransport::from_config(&config.smtp)?.map(|t| Arc::new(t) as Arc<dyn MailTransport>),
            }
        } else {
            None
        };

        tracing::info!(
            primary = primary.is_some(),
            fallback = fallback.is_some(),
            "Delivery transports configured"
        );

        Ok(Self::new(primary, fallback, config.delivery.attempt_timeout()))
    }

    #[must_use]
    pub const fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    #[must_use]
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    async fn attempt(
        &self,
        transport: &dyn MailTransport,
        message: &NotificationMessage,
    ) -> Result<(), TransportError> {
        match tokio::time::timeout(self.attempt_timeout, transport.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.attempt_timeout)),
        }
    }

    pub async fn deliver(&self, message: &NotificationMessage) -> DeliveryOutcome {
        if let Some(primary) = &self.primary {
            let result = self.attempt(primary.as_ref(), message).instrument(tracing::info_span!("deliver_primary")).await;
            match result {
                Ok(()) => {
                    self.metrics.record(Transport::Primary, "sent");
                    tracing::info!(transport = %Transport::Primary, "Notification sent");
                    return DeliveryOutcome::Sent(Transport::Primary);
                }
                Err(e) => {
                    self.metrics.record(Transport::Primary, "failed");
                    tracing::warn!(error = %e, "Primary transport failed, trying fallback");
                }
            }
        } else {
            tracing::info!("Primary transport not configured, using fallback");
        }

        let Some(fallback) = &self.fallback else {
            tracing::error!("Fallback transport credentials are not configured");
            return DeliveryOutcome::Failed(DeliveryError::FallbackUnconfigured);
        };

        let result = self.attempt(fallback.as_ref(), message).instrument(tracing::info_span!("deliver_fallback")).await;
        match result {
            Ok(()) => {
                self.metrics.record(Transport::Fallback, "sent");
                tracing::info!(transport = %Transport::Fallback, "Notification sent");
                DeliveryOutcome::Sent(Transport::Fallback)
            }
            Err(e) => {
                self.metrics.record(Transport::Fallback, "failed");
                tracing::error!(error = %e, "Fallback transport failed");
                DeliveryOutcome::Failed(DeliveryError::Fallback(e))
            }
        }
    }
}
