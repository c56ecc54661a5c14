use super::{parse_json_body, relay};
use crate::{errors::AppError, state::AppState};
use axum::{body::Bytes, extract::State, response::Response};
use tracing::info;

const CONTEXT: &str = "Failed to process DeepSeek API request";

/// `POST /api/text-analysis`: forwards a chat completion with the bearer key.
pub async fn text_analysis_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let api_key = app_state
        .config
        .deepseek_key()
        .ok_or(AppError::Configuration(None))?;
    let payload = parse_json_body(&body, CONTEXT)?;

    info!("Forwarding chat completion request");
    let response = app_state
        .http
        .post(&app_state.config.deepseek_api_url)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| AppError::upstream(CONTEXT, e))?;

    relay(response, CONTEXT).await
}
