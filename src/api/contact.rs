use crate::api::AppState;
use crate::api::schemas::contact::{CONFIRMATION_MESSAGE, ContactAccepted, ContactForm};
use crate::error::{AppError, Result};
use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};

pub async fn submit_contact(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    tracing::info!("Contact form submission received");

    let Json(form) = payload.map_err(|e| AppError::MalformedRequestBody(e.body_text()))?;
    let transport = state.contact_service.submit(form.into()).await?;

    tracing::info!(transport = %transport, "Contact form submission delivered");
    Ok(Json(ContactAccepted { success: true, message: CONFIRMATION_MESSAGE.to_string() }))
}
