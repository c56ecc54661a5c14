//! # Field Extraction
//!
//! Turns raw OCR text into [`ExtractedFields`]. Two interchangeable strategies
//! implement [`FieldExtractor`]: regex heuristics and a model-assisted
//! extractor backed by an [`AiProvider`](crate::providers::AiProvider).

pub mod heuristic;
pub mod model;

pub use heuristic::HeuristicExtractor;
pub use model::ModelExtractor;

use crate::{errors::SiteError, types::ExtractedFields};
use async_trait::async_trait;
use std::fmt::Debug;

/// Text in, structured fields out.
///
/// Implementations never invent values: a field that cannot be found is left
/// as an empty string. The returned `raw_text` is always the input text.
#[async_trait]
pub trait FieldExtractor: Send + Sync + Debug {
    async fn extract(&self, raw_text: &str) -> Result<ExtractedFields, SiteError>;
}

pub(crate) fn ensure_text(raw_text: &str) -> Result<(), SiteError> {
    if raw_text.trim().is_empty() {
        return Err(SiteError::NoTextDetected {
            service: "Field extractor".to_string(),
        });
    }
    Ok(())
}
