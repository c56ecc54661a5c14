use super::{ensure_text, FieldExtractor};
use crate::{
    errors::SiteError, prompts::site_extraction_prompt, providers::ai::AiProvider,
    types::ExtractedFields,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{error, info};

const SERVICE: &str = "DeepSeek API";

/// Extraction delegated to a text-generation model.
#[derive(Debug, Clone)]
pub struct ModelExtractor {
    ai_provider: Box<dyn AiProvider>,
}

impl ModelExtractor {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }
}

#[async_trait]
impl FieldExtractor for ModelExtractor {
    async fn extract(&self, raw_text: &str) -> Result<ExtractedFields, SiteError> {
        ensure_text(raw_text)?;
        let prompt = site_extraction_prompt(raw_text);
        let reply = self.ai_provider.generate(&prompt).await?;
        info!("Received model reply ({} chars)", reply.len());

        let mut fields = parse_model_reply(&reply)?;
        fields.raw_text = raw_text.to_string();
        Ok(fields)
    }
}

/// Removes Markdown code fences (with or without a `json` tag) and trims.
pub fn strip_code_fences(reply: &str) -> String {
    match Regex::new(r"(?i)```(?:json)?\r?\n?") {
        Ok(re) => re.replace_all(reply, "").trim().to_string(),
        Err(_) => reply.trim().to_string(),
    }
}

/// Parses the model's JSON reply, keeping only the known keys.
///
/// Missing, `null` or non-scalar values become empty strings. Anything that is
/// not a JSON object is an error that carries the raw reply.
pub fn parse_model_reply(reply: &str) -> Result<ExtractedFields, SiteError> {
    let cleaned = strip_code_fences(reply);
    let unparseable = |message: String| {
        error!(raw = %reply, "Failed to parse model reply");
        SiteError::UnparseableModelOutput {
            service: SERVICE.to_string(),
            message,
            raw: reply.to_string(),
        }
    };

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| unparseable(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| unparseable("expected a JSON object".to_string()))?;

    Ok(ExtractedFields {
        address: field(object, "address"),
        company_name: field(object, "companyName"),
        contact_name: field(object, "contactName"),
        email: field(object, "email"),
        website: field(object, "website"),
        phone: field(object, "phone"),
        raw_text: String::new(),
    })
}

fn field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
