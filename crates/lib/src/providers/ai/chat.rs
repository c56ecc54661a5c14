use crate::{
    errors::SiteError,
    providers::{ai::AiProvider, http::FailedResponse},
};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{error, info};

const SERVICE: &str = "DeepSeek API";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

// --- Chat completion provider implementation ---

/// A provider for an OpenAI-compatible `chat/completions` endpoint, such as
/// DeepSeek or the text-analysis proxy in front of it.
#[derive(Clone, Debug)]
pub struct ChatCompletionProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionProvider {
    /// Creates a new provider. `api_key` is only needed when talking to the
    /// upstream directly; the proxy attaches its own.
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self, SiteError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(SiteError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
            model: model.into(),
            temperature: 0.1,
            max_tokens: 500,
        })
    }
}

#[async_trait]
impl AiProvider for ChatCompletionProvider {
    async fn generate(&self, prompt: &str) -> Result<String, SiteError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        info!(url = %self.api_url, model = %self.model, "Requesting text analysis");
        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;

        if !response.status().is_success() {
            let failed = FailedResponse::read(response, "Request failed").await;
            return Err(classify_chat_failure(failed));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SiteError::network(SERVICE, e))?;
        let chat_response: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!(raw = %body, "Unreadable chat completion response");
            SiteError::malformed(SERVICE, e.to_string())
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SiteError::malformed(SERVICE, "response has no message content"))
    }
}

fn classify_chat_failure(failed: FailedResponse) -> SiteError {
    let service = SERVICE.to_string();
    match failed.status {
        StatusCode::UNAUTHORIZED => SiteError::Auth {
            service,
            message: "Invalid or expired API key. Please check your DeepSeek API key or renew it at platform.deepseek.com".to_string(),
        },
        StatusCode::FORBIDDEN => SiteError::Auth {
            service,
            message: "Access denied. Please verify your DeepSeek API key has the necessary permissions.".to_string(),
        },
        StatusCode::PAYMENT_REQUIRED => SiteError::QuotaOrRateLimit {
            service,
            message: "Insufficient credits. Please add credits to your DeepSeek account.".to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => SiteError::QuotaOrRateLimit {
            service,
            message: "Rate limit exceeded. Please wait a moment and try again.".to_string(),
        },
        _ => failed.into_error(SERVICE),
    }
}
