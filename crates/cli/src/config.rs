//! # CLI Configuration
//!
//! Builds the [`ClientConfig`] the commands run with. Sources, lowest
//! precedence first:
//!
//! 1. the serde defaults of `ClientConfig`,
//! 2. `sitelog.yml` in the working directory, or the file passed with
//!    `--config` (which must exist). `${VAR}` placeholders are expanded,
//! 3. `SITELOG_`-prefixed environment variables, e.g.
//!    `SITELOG_VISION_API_ENDPOINT` or `SITELOG_STRATEGY=heuristic`.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::{Captures, Regex};
use reqwest::Url;
use sitelog::ClientConfig;
use std::{env, fs, path::Path};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "sitelog.yml";

#[derive(Error, Debug)]
pub enum CliConfigError {
    #[error("Config file not found at '{0}'.")]
    NotFound(String),
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    Invalid(#[from] config::ConfigError),
    #[error("Invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Replaces every `${VAR}` with the value of that environment variable, or
/// with nothing when it is unset.
pub fn substitute_env(content: &str) -> Result<String, CliConfigError> {
    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")?;
    Ok(re
        .replace_all(content, |caps: &Captures| {
            env::var(&caps["var"]).unwrap_or_default()
        })
        .into_owned())
}

/// Loads the layered configuration. It is not validated here; each command
/// validates what it needs.
pub fn load_config(path_override: Option<&str>) -> Result<ClientConfig, CliConfigError> {
    let path = path_override.unwrap_or(DEFAULT_CONFIG_FILE);
    let mut builder = ConfigBuilder::builder();

    if Path::new(path).exists() {
        let content = fs::read_to_string(path).map_err(|source| CliConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        info!("Loading configuration from '{path}'.");
        builder = builder.add_source(File::from_str(&substitute_env(&content)?, FileFormat::Yaml));
    } else if path_override.is_some() {
        return Err(CliConfigError::NotFound(path.to_string()));
    }

    let config: ClientConfig = builder
        .add_source(
            Environment::with_prefix("SITELOG")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;
    debug!(?config, "Client configuration loaded");
    Ok(config)
}

/// Renders an endpoint for display with any query string hidden, since
/// proxies are sometimes deployed with a token in the URL.
pub fn mask_endpoint(value: &str) -> String {
    match Url::parse(value.trim()) {
        Ok(mut url) if url.query().is_some() => {
            url.set_query(Some("********"));
            url.to_string()
        }
        Ok(url) => url.to_string(),
        Err(_) => value.trim().to_string(),
    }
}
