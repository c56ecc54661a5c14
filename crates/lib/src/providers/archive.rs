use crate::{errors::SiteError, photo::PhotoBlob, providers::http::FailedResponse};
use async_trait::async_trait;
use chrono::NaiveDate;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{error, info};

const SERVICE: &str = "Google Drive API";

/// The JSON body accepted by the archive proxy.
#[derive(Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveUpload {
    pub file_name: String,
    /// Base64-encoded file contents.
    pub file_data: String,
    pub mime_type: String,
}

impl Debug for ArchiveUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("file_data_len", &self.file_data.len())
            .finish()
    }
}

impl ArchiveUpload {
    /// Prepares a photo for upload under `<date>_<address>.<ext>`.
    pub fn for_photo(photo: &PhotoBlob, address: &str, date: NaiveDate) -> Self {
        Self {
            file_name: photo.archive_file_name(address, date),
            file_data: photo.to_base64(),
            mime_type: photo.mime_type().to_string(),
        }
    }
}

/// The stored file as reported by the archive proxy.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedFile {
    pub file_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

/// A trait for best-effort photo backup.
#[async_trait]
pub trait PhotoArchiver: Send + Sync + Debug + DynClone {
    async fn upload(&self, upload: &ArchiveUpload) -> Result<ArchivedFile, SiteError>;
}

dyn_clone::clone_trait_object!(PhotoArchiver);

/// Uploads photos through the Drive proxy endpoint.
#[derive(Clone, Debug)]
pub struct DriveArchiver {
    client: ReqwestClient,
    api_url: String,
}

impl DriveArchiver {
    pub fn new(api_url: impl Into<String>) -> Result<Self, SiteError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(SiteError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl PhotoArchiver for DriveArchiver {
    async fn upload(&self, upload: &ArchiveUpload) -> Result<ArchivedFile, SiteError> {
        info!(file_name = %upload.file_name, "Uploading photo to archive");
        let response = self
            .client
            .post(&self.api_url)
            .json(upload)
            .send()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;

        if !response.status().is_success() {
            let failed =
                FailedResponse::read(response, "Failed to upload photo to Google Drive").await;
            return Err(failed.into_error(SERVICE));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;
        serde_json::from_str(&body).map_err(|e| {
            error!(raw = %body, "Unreadable archive response");
            SiteError::malformed(SERVICE, e.to_string())
        })
    }
}
