use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

const fn label(configured: bool) -> &'static str {
    if configured { "configured" } else { "unconfigured" }
}

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: ready when at least one delivery transport is configured.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let readiness = state.health_service.check_transports();

    let status_code = if readiness.is_ready() {
        StatusCode::OK
    } else {
        tracing::warn!(component = "delivery", "Readiness probe failed: no transport configured");
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if readiness.is_ready() { "ok" } else { "error" }.to_string(),
        primary: label(readiness.primary).to_string(),
        fallback: label(readiness.fallback).to_string(),
    };

    (status_code, Json(response))
}
