//! # Route Handlers
//!
//! One module per proxied service. Each handler attaches the server-held
//! credential, forwards the request and relays the upstream status and JSON
//! body back unchanged.

pub mod drive;
pub mod sheets;
pub mod text_analysis;
pub mod vision;

use crate::errors::AppError;
use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "sitelog proxy is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Parses the incoming body as JSON so that garbage is rejected before any
/// upstream call is made.
pub(crate) fn parse_json_body(body: &Bytes, context: &'static str) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::upstream(context, e))
}

/// Turns an upstream response into ours: same status, same body.
pub(crate) async fn relay(
    response: reqwest::Response,
    context: &'static str,
) -> Result<Response, AppError> {
    let status = StatusCode::from_u16(response.status().as_u16())
        .map_err(|e| AppError::upstream(context, e))?;
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::upstream(context, e))?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}
