use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// A custom error type for the proxy server.
///
/// Each variant maps to the JSON error body the browser client expects.
/// Upstream HTTP errors are not represented here: those responses are relayed
/// to the caller unchanged.
#[derive(Debug)]
pub enum AppError {
    /// The route exists but not for this HTTP method.
    MethodNotAllowed,
    /// A secret the route needs is not configured. The optional detail is
    /// returned as `message`.
    Configuration(Option<String>),
    /// The request itself is unusable.
    BadRequest(String),
    /// Talking to the upstream service failed before a response arrived.
    Upstream {
        context: &'static str,
        source: anyhow::Error,
    },
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn upstream(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Upstream {
            context,
            source: source.into(),
        }
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            AppError::Configuration(message) => {
                error!("Server configuration error: {:?}", message);
                let body = match message {
                    Some(message) => {
                        json!({ "error": "Server configuration error", "message": message })
                    }
                    None => json!({ "error": "Server configuration error" }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AppError::Upstream { context, source } => {
                error!("{context}: {source:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": context, "message": source.to_string() }),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred.", "message": err.to_string() }),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
