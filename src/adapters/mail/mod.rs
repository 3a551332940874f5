use crate::domain::notification::NotificationMessage;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod resend;
pub mod smtp;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Relay connection could not be verified")]
    VerifyFailed,
    #[error("External service error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug {
    /// Delivers one notification.
    ///
    /// # Errors
    /// Returns a `TransportError` for any failure; the caller decides whether another transport is tried.
    async fn send(&self, message: &NotificationMessage) -> Result<(), TransportError>;
}
