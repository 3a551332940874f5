use crate::domain::submission::SubmissionFields;
use serde::{Deserialize, Serialize};

pub const CONFIRMATION_MESSAGE: &str = "お問い合わせありがとうございます。48時間以内にご返信いたします。";

/// Body of `POST /api/contact`. Every field is optional on the wire; presence is checked by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ContactForm> for SubmissionFields {
    fn from(form: ContactForm) -> Self {
        Self {
            company: form.company,
            name: form.name,
            email: form.email,
            industry: form.industry,
            message: form.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactAccepted {
    pub success: bool,
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
