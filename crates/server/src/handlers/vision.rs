use super::{parse_json_body, relay};
use crate::{errors::AppError, state::AppState};
use axum::{body::Bytes, extract::State, response::Response};
use tracing::info;

const CONTEXT: &str = "Failed to process Vision API request";

/// `POST /api/vision`: forwards an `images:annotate` request with the API key.
pub async fn vision_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let api_key = app_state
        .config
        .vision_key()
        .ok_or(AppError::Configuration(None))?;
    let payload = parse_json_body(&body, CONTEXT)?;

    info!("Forwarding text detection request");
    let response = app_state
        .http
        .post(&app_state.config.vision_api_url)
        .query(&[("key", api_key)])
        .json(&payload)
        .send()
        .await
        .map_err(|e| AppError::upstream(CONTEXT, e))?;

    relay(response, CONTEXT).await
}
