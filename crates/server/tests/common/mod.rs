//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with every upstream URL
//! pointed at an `httpmock::MockServer`, so each test can assert on exactly
//! what the proxy forwarded.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use reqwest::Client;
use serde_json::{json, Value};
use sitelog_server::{config::AppConfig, router, state::build_app_state};
use std::net::SocketAddr;
use tokio::{net::TcpListener, task::JoinHandle};

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// A configuration with every secret set and every upstream on `mock_server`.
/// `overrides` is merged on top, so a test can blank out a single secret.
pub fn mock_config(mock_server: &MockServer, overrides: Value) -> Result<AppConfig> {
    let mut config = json!({
        "port": 0,
        "vision_api_key": "vision-key",
        "vision_api_url": mock_server.url("/v1/images:annotate"),
        "deepseek_api_key": "deepseek-key",
        "deepseek_api_url": mock_server.url("/v1/chat/completions"),
        "sheets_api_key": "sheets-key",
        "sheet_id": "sheet-123",
        "sheet_name": "Sites",
        "sheets_api_base": mock_server.url("/v4/spreadsheets"),
        "google_oauth_client_id": "client-id",
        "google_oauth_client_secret": "client-secret",
        "google_oauth_refresh_token": "refresh-token",
        "google_drive_folder_id": "folder-9",
        "drive_upload_url": mock_server.url("/upload/drive/v3/files"),
        "oauth_token_url": mock_server.url("/token"),
    });
    if let (Some(base), Some(extra)) = (config.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    Ok(serde_json::from_value(config)?)
}

impl TestApp {
    /// Spawns the server with the default mock configuration.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(json!({})).await
    }

    pub async fn spawn_with(overrides: Value) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let config = mock_config(&mock_server, overrides)?;
        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
