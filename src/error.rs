use crate::api::schemas::contact::ErrorBody;
use crate::domain::submission::ValidationError;
use crate::services::delivery_service::DeliveryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The only failure text callers ever see for server-side problems.
pub const GENERIC_FAILURE_MESSAGE: &str = "送信に失敗しました。恐れ入りますが、再度お試しください。";

pub const RATE_LIMITED_MESSAGE: &str = "送信回数が上限に達しました。しばらく時間をおいてから再度お試しください。";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),
    #[error("Malformed request body: {0}")]
    MalformedRequestBody(String),
    #[error("Email delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(e) => {
                tracing::debug!(reason = %e, "Validation failed");
                (StatusCode::BAD_REQUEST, e.user_message())
            }
            Self::MalformedRequestBody(detail) => {
                tracing::warn!(detail = %detail, "Request body could not be parsed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE.to_string())
            }
            Self::DeliveryFailed(e) => {
                tracing::error!(error = %e, "Email delivery failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE.to_string())
            }
            Self::Internal => {
                tracing::error!("Internal server error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
