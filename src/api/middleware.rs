use crate::api::schemas::contact::ErrorBody;
use crate::error::{GENERIC_FAILURE_MESSAGE, RATE_LIMITED_MESSAGE};
use axum::{
    Json,
    http::{HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_governor::GovernorError;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Generates a UUID v4 request id when the caller did not send one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}

/// Turns a handler panic into the same generic 500 body used for delivery failures.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "Request handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(GENERIC_FAILURE_MESSAGE))).into_response()
}

/// Renders limiter rejections with the usual error body, keeping its `retry-after` headers.
pub fn rate_limited_response(err: GovernorError) -> Response {
    let (status, message, headers) = match err {
        GovernorError::TooManyRequests { headers, .. } => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE, headers),
        GovernorError::UnableToExtractKey => {
            tracing::error!("Could not determine client address for rate limiting");
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE, None)
        }
        GovernorError::Other { code, msg, headers } => {
            tracing::warn!(status = %code, detail = ?msg, "Rate limiter rejected request");
            (code, GENERIC_FAILURE_MESSAGE, headers)
        }
    };

    let mut response = (status, Json(ErrorBody::new(message))).into_response();
    if let Some(headers) = headers {
        response.headers_mut().extend(headers);
    }
    response
}
