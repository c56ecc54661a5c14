//! # Application Configuration
//!
//! This module defines the configuration structure for the `sitelog-server`
//! proxy and loads it from an optional `config.yml` file and environment
//! variables. Secrets normally come straight from the environment
//! (`VISION_API_KEY`, `DEEPSEEK_API_KEY`, ...); the file is useful for the
//! non-secret settings and for pointing the upstream URLs at test servers.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use thiserror::Error;
use tracing::info;

/// Why the proxy configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The `config` crate rejected a source, or a value failed to deserialize.
    #[error("Configuration error: {0}")]
    General(String),
    /// An explicitly requested configuration file was not found.
    #[error("{0}")]
    NotFound(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
///
/// Every key can also be set through an environment variable of the same name
/// in upper case (`SHEET_ID`, `GOOGLE_DRIVE_FOLDER_ID`, ...), or with a
/// `PROXY_` prefix to override a value coming from the file.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,

    // --- Vision ---
    #[serde(default)]
    pub vision_api_key: Option<String>,
    #[serde(default = "default_vision_api_url")]
    pub vision_api_url: String,

    // --- Text analysis ---
    #[serde(default)]
    pub deepseek_api_key: Option<String>,
    #[serde(default = "default_deepseek_api_url")]
    pub deepseek_api_url: String,

    // --- Sheets ---
    #[serde(default)]
    pub sheets_api_key: Option<String>,
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_sheets_api_base")]
    pub sheets_api_base: String,
    /// Service-account credentials. When set they take precedence over the
    /// API key, which can only read public sheets.
    #[serde(default)]
    pub google_service_account_email: Option<String>,
    #[serde(default)]
    pub google_service_account_private_key: Option<String>,

    // --- Drive ---
    #[serde(default)]
    pub google_oauth_client_id: Option<String>,
    #[serde(default)]
    pub google_oauth_client_secret: Option<String>,
    #[serde(default)]
    pub google_oauth_refresh_token: Option<String>,
    #[serde(default)]
    pub google_drive_folder_id: Option<String>,
    #[serde(default = "default_drive_upload_url")]
    pub drive_upload_url: String,

    /// Token endpoint for both the refresh-token and service-account exchanges.
    #[serde(default = "default_oauth_token_url")]
    pub oauth_token_url: String,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    8888
}

fn default_vision_api_url() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_deepseek_api_url() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_sheet_name() -> String {
    "Sites".to_string()
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

fn default_drive_upload_url() -> String {
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id,name,webViewLink"
        .to_string()
}

fn default_oauth_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Service-account credentials, present only when both halves are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
}

impl AppConfig {
    pub fn vision_key(&self) -> Option<&str> {
        secret(&self.vision_api_key)
    }

    pub fn deepseek_key(&self) -> Option<&str> {
        secret(&self.deepseek_api_key)
    }

    pub fn sheets_key(&self) -> Option<&str> {
        secret(&self.sheets_api_key)
    }

    pub fn sheet_id(&self) -> Option<&str> {
        secret(&self.sheet_id)
    }

    pub fn service_account(&self) -> Option<ServiceAccount> {
        let client_email = secret(&self.google_service_account_email)?;
        let private_key = secret(&self.google_service_account_private_key)?;
        Some(ServiceAccount {
            client_email: client_email.to_string(),
            // Keys pasted into a single-line env var carry literal `\n`.
            private_key: private_key.replace("\\n", "\n"),
        })
    }

    /// `(client_id, client_secret, refresh_token)` for the Drive upload.
    pub fn drive_oauth(&self) -> Option<(&str, &str, &str)> {
        Some((
            secret(&self.google_oauth_client_id)?,
            secret(&self.google_oauth_client_secret)?,
            secret(&self.google_oauth_refresh_token)?,
        ))
    }

    /// The upload folder, `root` when unset.
    pub fn drive_folder(&self) -> &str {
        secret(&self.google_drive_folder_id).unwrap_or("root")
    }

    /// A copy safe to log: every secret is replaced by a marker.
    pub fn redacted(&self) -> AppConfig {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
        AppConfig {
            vision_api_key: mask(&self.vision_api_key),
            deepseek_api_key: mask(&self.deepseek_api_key),
            sheets_api_key: mask(&self.sheets_api_key),
            google_service_account_private_key: mask(&self.google_service_account_private_key),
            google_oauth_client_secret: mask(&self.google_oauth_client_secret),
            google_oauth_refresh_token: mask(&self.google_oauth_refresh_token),
            ..self.clone()
        }
    }
}

/// A trimmed, non-empty secret.
fn secret(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Layer 1: serde defaults on [`AppConfig`].
/// - Layer 2: `config.yml` next to the crate manifest, or the file named by
///   `config_path_override` (which must exist). `${VAR}` placeholders are
///   replaced from the environment.
/// - Layer 3: plain environment variables (`PORT`, `VISION_API_KEY`, ...).
/// - Layer 4: `PROXY_`-prefixed environment variables, for overrides.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => format!("{base_path}/config.yml"),
    };
    match read_and_substitute(&config_path)? {
        Some(content) => {
            info!("Loading configuration from '{config_path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None if config_path_override.is_some() => {
            return Err(ConfigError::NotFound(format!(
                "Config file not found at '{config_path}'."
            )));
        }
        None => info!("No config file at '{config_path}', using environment only."),
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("PROXY")
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
