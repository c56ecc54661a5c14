use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitelog::{errors::SiteError, providers::http::FailedResponse};
use std::fmt::Debug;
use tracing::{error, info};

const SERVICE: &str = "Google Sheets API";

/// Raw cell access to a spreadsheet, addressed in A1 notation.
#[async_trait]
pub trait SheetStore: Send + Sync + Debug {
    /// Returns every non-empty row of `range`, header row included.
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SiteError>;
    /// Appends `row` after the last row of `range`.
    async fn append(&self, range: &str, row: Vec<String>) -> Result<(), SiteError>;
    /// Overwrites the cells of `range` with `row`.
    async fn update(&self, range: &str, row: Vec<String>) -> Result<(), SiteError>;
}

#[derive(Deserialize, Debug, Default)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct ValuesBody<'a> {
    values: [&'a [String]; 1],
}

/// Talks to the spreadsheet proxy: `?action=read|append|update`.
#[derive(Clone, Debug)]
pub struct SheetsProxyClient {
    client: ReqwestClient,
    api_url: String,
}

impl SheetsProxyClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, SiteError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(SiteError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    async fn write(
        &self,
        query: [(&str, &str); 2],
        row: &[String],
        fallback: &str,
    ) -> Result<(), SiteError> {
        let response = self
            .client
            .post(&self.api_url)
            .query(&query)
            .json(&ValuesBody { values: [row] })
            .send()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;

        if !response.status().is_success() {
            let failed = FailedResponse::read(response, fallback).await;
            return Err(classify_sheets_failure(failed));
        }
        Ok(())
    }
}

#[async_trait]
impl SheetStore for SheetsProxyClient {
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SiteError> {
        info!(range, "Reading sheet");
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "read"), ("range", range)])
            .send()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;

        if !response.status().is_success() {
            let failed = FailedResponse::read(response, "Failed to fetch sheet data").await;
            return Err(classify_sheets_failure(failed));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;
        let value_range: ValueRange = serde_json::from_str(&body).map_err(|e| {
            error!(raw = %body, "Unreadable sheet data");
            SiteError::malformed(SERVICE, e.to_string())
        })?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append(&self, range: &str, row: Vec<String>) -> Result<(), SiteError> {
        info!(range, "Appending row");
        self.write(
            [("action", "append"), ("range", range)],
            &row,
            "Failed to add site to sheet",
        )
        .await
    }

    async fn update(&self, range: &str, row: Vec<String>) -> Result<(), SiteError> {
        info!(range, "Updating row");
        self.write(
            [("action", "update"), ("updateRange", range)],
            &row,
            "Failed to update site in sheet",
        )
        .await
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn classify_sheets_failure(failed: FailedResponse) -> SiteError {
    let service = SERVICE.to_string();
    match failed.status {
        StatusCode::BAD_REQUEST => SiteError::Configuration(
            "Invalid request. Please check your Google Sheets configuration.".to_string(),
        ),
        StatusCode::FORBIDDEN => SiteError::Auth {
            service,
            message: "Permission denied. Please ensure the Sheet is shared with the account used by the proxy.".to_string(),
        },
        StatusCode::NOT_FOUND => SiteError::NotFound {
            service,
            message: "Sheet not found. Please verify the sheet ID and sheet name.".to_string(),
        },
        _ => failed.into_error(SERVICE),
    }
}
