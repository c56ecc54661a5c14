use crate::{errors::SiteError, providers::http::FailedResponse};
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{error, info};

const SERVICE: &str = "Google Vision API";

/// A trait for services that turn an image into text.
#[async_trait]
pub trait OcrProvider: Send + Sync + Debug + DynClone {
    /// Returns the full text detected in a base64-encoded image.
    async fn detect_text(&self, image_base64: &str) -> Result<String, SiteError>;
}

dyn_clone::clone_trait_object!(OcrProvider);

// --- Vision-specific request and response structures ---

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: Image<'a>,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct Image<'a> {
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

#[derive(Deserialize, Debug, Default)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
}

#[derive(Deserialize, Debug)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

// --- Vision Provider implementation ---

/// Text detection through the Vision `images:annotate` API, reached via the
/// credential-hiding proxy.
#[derive(Clone, Debug)]
pub struct VisionProvider {
    client: ReqwestClient,
    api_url: String,
}

impl VisionProvider {
    /// Creates a new `VisionProvider` posting to `api_url`.
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
impl OcrProvider for VisionProvider {
    async fn detect_text(&self, image_base64: &str) -> Result<String, SiteError> {
        let request_body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: Image {
                    content: image_base64,
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                    max_results: 1,
                }],
            }],
        };

        info!(url = %self.api_url, "Requesting text detection");
        let response = self
            .client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;

        if !response.status().is_success() {
            let failed = FailedResponse::read(response, "Request failed").await;
            return Err(classify_vision_failure(failed));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;
        let parsed: AnnotateResponse = serde_json::from_str(&body).map_err(|e| {
            error!(raw = %body, "Unreadable Vision API response");
            SiteError::malformed(SERVICE, e.to_string())
        })?;

        parsed
            .responses
            .into_iter()
            .next()
            .and_then(|r| r.text_annotations.into_iter().next())
            .map(|a| a.description)
            .ok_or_else(|| SiteError::NoTextDetected {
                service: SERVICE.to_string(),
            })
    }
}

/// Maps a failed Vision response onto an actionable error.
fn classify_vision_failure(failed: FailedResponse) -> SiteError {
    let service = SERVICE.to_string();
    let lower = failed.message.to_lowercase();
    match failed.status {
        StatusCode::BAD_REQUEST if lower.contains("api key") => SiteError::Auth {
            service,
            message: "Invalid API key. Please check the Google Vision API key.".to_string(),
        },
        StatusCode::FORBIDDEN if lower.contains("expired") => SiteError::Auth {
            service,
            message: "API key expired. Please renew your Google Vision API key in Google Cloud Console.".to_string(),
        },
        StatusCode::FORBIDDEN if lower.contains("not enabled") => SiteError::Configuration(
            "Google Vision API is not enabled. Please enable it in Google Cloud Console.".to_string(),
        ),
        StatusCode::FORBIDDEN if lower.contains("quota") => SiteError::QuotaOrRateLimit {
            service,
            message: "API quota exceeded. Please check your usage limits in Google Cloud Console.".to_string(),
        },
        StatusCode::FORBIDDEN => SiteError::Auth {
            service,
            message: "Access denied. Please check API key restrictions in Google Cloud Console.".to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => SiteError::QuotaOrRateLimit {
            service,
            message: "Too many requests. Please wait a moment and try again.".to_string(),
        },
        _ => failed.into_error(SERVICE),
    }
}
