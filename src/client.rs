//! Client side of the contact form: an HTTP client for `POST /api/contact` and a
//! UI-agnostic controller holding the field values and submission state.

use crate::api::schemas::contact::{CONFIRMATION_MESSAGE, ContactAccepted, ContactForm, ErrorBody};
use crate::error::GENERIC_FAILURE_MESSAGE;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with an error; the text is safe to show to the user.
    #[error("{0}")]
    Rejected(String),
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Transport(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint: format!("{}/api/contact", base_url.trim_end_matches('/')) })
    }

    /// Submits the form and returns the confirmation text to display.
    ///
    /// # Errors
    /// Returns `ClientError::Rejected` with the server's message (or a generic one) on a non-2xx reply,
    /// and `ClientError::Transport` if the request could not be completed.
    pub async fn submit(&self, form: &ContactForm) -> Result<String, ClientError> {
        let response = self.http.post(&self.endpoint).json(form).send().await?;

        if response.status().is_success() {
            let message = response
                .json::<ContactAccepted>()
                .await
                .map(|accepted| accepted.message)
                .unwrap_or_else(|_| CONFIRMATION_MESSAGE.to_string());
            return Ok(message);
        }

        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| GENERIC_FAILURE_MESSAGE.to_string());

        tracing::debug!(status = %status.as_u16(), "Contact submission rejected");
        Err(ClientError::Rejected(message))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Drives one contact form through `Idle -> Submitting -> Idle`.
#[derive(Debug, Default)]
pub struct FormController {
    pub fields: ContactForm,
    state: FormState,
    notice: Option<Notice>,
}

impl FormController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state == FormState::Idle
    }

    /// Starts a submission and returns the payload to send, or `None` if one is already in flight.
    pub fn begin_submit(&mut self) -> Option<ContactForm> {
        if self.state == FormState::Submitting {
            return None;
        }
        self.state = FormState::Submitting;
        self.notice = None;
        Some(self.fields.clone())
    }

    /// Ends the in-flight submission. Success clears the fields; failure keeps them.
    pub fn finish(&mut self, result: Result<String, ClientError>) {
        self.state = FormState::Idle;
        self.notice = Some(match result {
            Ok(message) => {
                self.fields = ContactForm::default();
                Notice::Success(message)
            }
            Err(e) => Notice::Error(e.user_message()),
        });
    }

    /// Runs one full submission cycle against `client`.
    pub async fn submit(&mut self, client: &ContactClient) -> Option<&Notice> {
        let payload = self.begin_submit()?;
        let result = client.submit(&payload).await;
        self.finish(result);
        self.notice.as_ref()
    }
}
