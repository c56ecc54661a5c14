//! # Google OAuth Token Exchange
//!
//! Two ways of turning server-held credentials into a short-lived bearer
//! token: a stored OAuth refresh token (used for Drive uploads), and a
//! service-account key signed into an RS256 JWT assertion (used for Sheets).

use crate::config::ServiceAccount;
use anyhow::{anyhow, Context};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The claims of a service-account assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Signs the JWT that the token endpoint exchanges for an access token.
pub fn service_account_assertion(
    account: &ServiceAccount,
    scope: &str,
    token_url: &str,
) -> anyhow::Result<String> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        iss: account.client_email.clone(),
        scope: scope.to_string(),
        aud: token_url.to_string(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };
    let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
        .context("Service account private key is not a valid RSA PEM key")?;
    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .context("Failed to sign service account assertion")
}

/// Exchanges a service-account assertion for an access token.
pub async fn service_account_token(
    http: &Client,
    token_url: &str,
    account: &ServiceAccount,
    scope: &str,
) -> anyhow::Result<String> {
    let assertion = service_account_assertion(account, scope, token_url)?;
    info!(client_email = %account.client_email, "Requesting service account access token");
    request_token(
        http,
        token_url,
        &[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)],
    )
    .await
}

/// Exchanges a stored refresh token for a fresh access token.
pub async fn refresh_access_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> anyhow::Result<String> {
    info!("Refreshing OAuth access token");
    request_token(
        http,
        token_url,
        &[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ],
    )
    .await
    .context("Failed to obtain access token from refresh token. Your refresh token may be invalid or expired.")
}

async fn request_token(
    http: &Client,
    token_url: &str,
    form: &[(&str, &str)],
) -> anyhow::Result<String> {
    let response = http.post(token_url).form(form).send().await?;
    let status = response.status();
    let body: TokenResponse = response
        .json()
        .await
        .with_context(|| format!("Unreadable token response (HTTP {status})"))?;

    match body.access_token {
        Some(token) if status.is_success() && !token.is_empty() => Ok(token),
        _ => Err(anyhow!(
            "Token endpoint returned HTTP {status}: {}",
            body.error_description
                .or(body.error)
                .unwrap_or_else(|| "no access token".to_string())
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pem_keys() {
        let account = ServiceAccount {
            client_email: "svc@example.iam.gserviceaccount.com".to_string(),
            private_key: "not a key".to_string(),
        };
        let err = service_account_assertion(&account, SHEETS_SCOPE, "https://oauth2.example/token")
            .unwrap_err();
        assert!(err.to_string().contains("not a valid RSA PEM key"));
    }
}
