//! # Application State
//!
//! The shared state every handler receives: the resolved configuration and a
//! single HTTP client reused for all upstream calls.

use crate::config::AppConfig;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded at startup.
    pub config: Arc<AppConfig>,
    /// The client for Google and DeepSeek requests.
    pub http: Client,
}

/// Builds the shared application state from the configuration.
///
/// Missing secrets are not an error here: each route reports its own missing
/// configuration when it is called, so one unconfigured service does not take
/// the others down.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let http = Client::builder().build()?;
    for (route, configured) in [
        ("/api/vision", config.vision_key().is_some()),
        ("/api/text-analysis", config.deepseek_key().is_some()),
        (
            "/api/sheets",
            config.sheet_id().is_some()
                && (config.sheets_key().is_some() || config.service_account().is_some()),
        ),
        ("/api/drive", config.drive_oauth().is_some()),
    ] {
        if !configured {
            tracing::warn!("{route} is not configured and will answer with a configuration error.");
        }
    }
    Ok(AppState {
        config: Arc::new(config),
        http,
    })
}
