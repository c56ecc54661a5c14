//! # Client Configuration
//!
//! The endpoints and settings every client in this crate is constructed from.
//! A `ClientConfig` is validated once at startup; clients never read global
//! state afterwards.

use crate::errors::SiteError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Which field extractor turns OCR text into structured fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Regex heuristics only, no model call.
    Heuristic,
    /// Delegate to the text-analysis endpoint.
    #[default]
    Model,
}

impl std::str::FromStr for ExtractionStrategy {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(ExtractionStrategy::Heuristic),
            "model" => Ok(ExtractionStrategy::Model),
            other => Err(SiteError::Configuration(format!(
                "Unknown extraction strategy '{other}'. Use 'heuristic' or 'model'."
            ))),
        }
    }
}

/// Endpoints of the credential-hiding proxies and the sheet/model settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    /// Proxy endpoint for text detection. Required.
    #[serde(default)]
    pub vision_api_endpoint: String,
    /// Proxy endpoint for chat completions. Required for the model strategy.
    #[serde(default)]
    pub text_analysis_endpoint: String,
    /// Proxy endpoint for spreadsheet reads and writes. Required.
    #[serde(default)]
    pub sheets_api_endpoint: String,
    /// Proxy endpoint for photo archival. Archival is skipped when unset.
    #[serde(default)]
    pub drive_api_endpoint: Option<String>,
    /// The tab within the spreadsheet that holds site rows.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// The model name sent to the text-analysis endpoint.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub strategy: ExtractionStrategy,
}

fn default_sheet_name() -> String {
    "Sites".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            vision_api_endpoint: String::new(),
            text_analysis_endpoint: String::new(),
            sheets_api_endpoint: String::new(),
            drive_api_endpoint: None,
            sheet_name: default_sheet_name(),
            model: default_model(),
            strategy: ExtractionStrategy::default(),
        }
    }
}

impl ClientConfig {
    /// Checks that every endpoint the configured pipeline needs is present and
    /// parses as a URL.
    pub fn validate(&self) -> Result<(), SiteError> {
        require_url("Vision API endpoint", &self.vision_api_endpoint)?;
        require_url("Google Sheets API endpoint", &self.sheets_api_endpoint)?;
        if self.strategy == ExtractionStrategy::Model {
            require_url("DeepSeek API endpoint", &self.text_analysis_endpoint)?;
            if self.model.trim().is_empty() {
                return Err(SiteError::Configuration(
                    "A model name is required for model-assisted extraction.".to_string(),
                ));
            }
        }
        if let Some(drive) = self.archive_endpoint() {
            require_url("Google Drive API endpoint", drive)?;
        }
        if self.sheet_name.trim().is_empty() {
            return Err(SiteError::Configuration(
                "The sheet name must not be empty.".to_string(),
            ));
        }
        Ok(())
    }

    /// The archive endpoint, treating an empty string the same as unset.
    pub fn archive_endpoint(&self) -> Option<&str> {
        self.drive_api_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Names of required settings that are missing, for diagnostics.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.vision_api_endpoint.trim().is_empty() {
            missing.push("vision_api_endpoint");
        }
        if self.sheets_api_endpoint.trim().is_empty() {
            missing.push("sheets_api_endpoint");
        }
        if self.strategy == ExtractionStrategy::Model && self.text_analysis_endpoint.trim().is_empty()
        {
            missing.push("text_analysis_endpoint");
        }
        missing
    }
}

fn require_url(name: &str, value: &str) -> Result<(), SiteError> {
    if value.trim().is_empty() {
        return Err(SiteError::Configuration(format!(
            "{name} is not configured."
        )));
    }
    Url::parse(value.trim())
        .map(|_| ())
        .map_err(|e| SiteError::Configuration(format!("{name} is not a valid URL: {e}")))
}
