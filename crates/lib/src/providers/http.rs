//! Shared helpers for turning unsuccessful HTTP responses into `SiteError`s.

use crate::errors::SiteError;
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// Status and best-effort message of a failed upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedResponse {
    pub status: StatusCode,
    pub message: String,
}

impl FailedResponse {
    /// Consumes a non-success response, pulling the error message out of its
    /// JSON body when there is one.
    ///
    /// A JSON body without a recognizable message yields `fallback`; a body
    /// that is not JSON yields `HTTP <status>`.
    pub async fn read(response: Response, fallback: &str) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<Value>(&body) {
            Ok(json) => message_from_json(&json).unwrap_or_else(|| fallback.to_string()),
            Err(_) => format!("HTTP {status}"),
        };
        Self { status, message }
    }

    /// Generic classification shared by every service; callers match their
    /// service-specific cases first and fall back to this.
    pub fn into_error(self, service: &str) -> SiteError {
        let service = service.to_string();
        let message = self.message;
        match self.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SiteError::Auth { service, message },
            StatusCode::NOT_FOUND => SiteError::NotFound { service, message },
            StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => {
                SiteError::QuotaOrRateLimit { service, message }
            }
            status => SiteError::Upstream {
                service,
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Looks for `error.message`, then `message`, then a string `error`.
pub fn message_from_json(json: &Value) -> Option<String> {
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| json.get("message").and_then(Value::as_str))
        .or_else(|| json.get("error").and_then(Value::as_str))
        .map(str::to_string)
}
