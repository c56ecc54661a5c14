use crate::{auth::google::refresh_access_token, errors::AppError, state::AppState};
use anyhow::anyhow;
use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sitelog::providers::http::message_from_json;
use tracing::info;

const CONTEXT: &str = "Failed to upload file to Google Drive";
const BOUNDARY: &str = "-------314159265358979323846";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DriveUploadRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    /// Base64-encoded file contents.
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DriveUploadResponse {
    pub success: bool,
    pub file_id: String,
    pub file_name: String,
    pub web_view_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

/// Assembles a `multipart/related` body: JSON metadata, then the base64 file.
pub fn multipart_related_body(
    file_name: &str,
    mime_type: &str,
    file_data: &str,
    folder_id: &str,
) -> String {
    let metadata = json!({ "name": file_name, "parents": [folder_id] });
    let delimiter = format!("\r\n--{BOUNDARY}\r\n");
    let close_delimiter = format!("\r\n--{BOUNDARY}--");
    format!(
        "{delimiter}Content-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\
         {delimiter}Content-Type: {mime_type}\r\nContent-Transfer-Encoding: base64\r\n\r\n{file_data}\
         {close_delimiter}"
    )
}

/// `POST /api/drive`: uploads a photo into the configured folder.
pub async fn drive_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<Json<DriveUploadResponse>, AppError> {
    let config = &app_state.config;
    let (client_id, client_secret, refresh_token) = config.drive_oauth().ok_or_else(|| {
        AppError::Configuration(Some(
            "OAuth credentials not configured. Please set GOOGLE_OAUTH_CLIENT_ID, GOOGLE_OAUTH_CLIENT_SECRET, and GOOGLE_OAUTH_REFRESH_TOKEN environment variables.".to_string(),
        ))
    })?;

    let request: DriveUploadRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::upstream(CONTEXT, e))?;
    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    let (Some(file_name), Some(file_data), Some(mime_type)) = (
        present(&request.file_name),
        present(&request.file_data),
        present(&request.mime_type),
    ) else {
        return Err(AppError::BadRequest(
            "Missing required fields: fileName, fileData, mimeType".to_string(),
        ));
    };

    let access_token = refresh_access_token(
        &app_state.http,
        &config.oauth_token_url,
        client_id,
        client_secret,
        refresh_token,
    )
    .await
    .map_err(|e| AppError::upstream(CONTEXT, e))?;

    let folder_id = config.drive_folder();
    info!(file_name = %file_name, folder_id, "Uploading file to Drive");
    let response = app_state
        .http
        .post(&config.drive_upload_url)
        .bearer_auth(access_token)
        .header(
            reqwest::header::CONTENT_TYPE,
            format!("multipart/related; boundary={BOUNDARY}"),
        )
        .body(multipart_related_body(&file_name, &mime_type, &file_data, folder_id))
        .send()
        .await
        .map_err(|e| AppError::upstream(CONTEXT, e))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| message_from_json(&v))
            .unwrap_or_else(|| status.to_string());
        return Err(AppError::upstream(
            CONTEXT,
            anyhow!("Failed to upload file: {detail}"),
        ));
    }

    let file: DriveFile = response
        .json()
        .await
        .map_err(|e| AppError::upstream(CONTEXT, e))?;
    info!(file_id = %file.id, "Drive upload complete");

    Ok(Json(DriveUploadResponse {
        success: true,
        file_id: file.id,
        file_name: file.name,
        web_view_link: file.web_view_link,
    }))
}
