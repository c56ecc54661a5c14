use super::{errors::AppError, handlers, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Base64 photos of up to 10 MiB grow by a third in transit.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Creates the Axum router with all the proxy routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/vision",
            post(handlers::vision::vision_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/text-analysis",
            post(handlers::text_analysis::text_analysis_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/sheets",
            get(handlers::sheets::sheets_handler)
                .post(handlers::sheets::sheets_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/drive",
            post(handlers::drive::drive_handler).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
