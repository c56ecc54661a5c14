//! # Submission Controller
//!
//! A UI-agnostic driver for one photo submission: select a photo, analyze it,
//! let the user review the fields, then submit. Any front-end (the CLI, a web
//! handler, a test) calls the same three event methods.

use crate::{
    errors::SiteError,
    extract::FieldExtractor,
    photo::PhotoBlob,
    providers::{ArchiveUpload, ArchivedFile, OcrProvider, PhotoArchiver},
    types::{ExtractedFields, SiteRecord, UpsertOutcome},
};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{info, warn};

/// Where reconciled site records are persisted.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// Updates the row whose address matches `record`, or appends a new one.
    async fn upsert(&self, record: &SiteRecord) -> Result<UpsertOutcome, SiteError>;
}

/// What happened to the photo backup during a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArchiveStatus {
    Uploaded(ArchivedFile),
    /// No photo was attached or no archiver is configured.
    Skipped,
    /// The upload failed. The record itself was still saved.
    Failed { warning: String },
}

/// The result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub outcome: UpsertOutcome,
    pub archive: ArchiveStatus,
}

impl SubmissionReport {
    /// The user-facing summary line, with the archive warning appended if any.
    pub fn message(&self) -> String {
        match &self.archive {
            ArchiveStatus::Failed { warning } => {
                format!("{} (Photo upload to Drive failed: {warning})", self.outcome)
            }
            _ => self.outcome.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct SubmissionController {
    ocr: Box<dyn OcrProvider>,
    extractor: Box<dyn FieldExtractor>,
    store: Box<dyn RecordStore>,
    archiver: Option<Box<dyn PhotoArchiver>>,
    photo: Option<PhotoBlob>,
    extracted: Option<ExtractedFields>,
    prefill_address: Option<String>,
}

impl SubmissionController {
    pub fn new(
        ocr: Box<dyn OcrProvider>,
        extractor: Box<dyn FieldExtractor>,
        store: Box<dyn RecordStore>,
        archiver: Option<Box<dyn PhotoArchiver>>,
    ) -> Self {
        Self {
            ocr,
            extractor,
            store,
            archiver,
            photo: None,
            extracted: None,
            prefill_address: None,
        }
    }

    /// An address supplied up-front, used when extraction finds none.
    pub fn set_prefill_address(&mut self, address: impl Into<String>) {
        let address = address.into();
        let trimmed = address.trim();
        self.prefill_address = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn prefill_address(&self) -> Option<&str> {
        self.prefill_address.as_deref()
    }

    pub fn photo(&self) -> Option<&PhotoBlob> {
        self.photo.as_ref()
    }

    pub fn extracted(&self) -> Option<&ExtractedFields> {
        self.extracted.as_ref()
    }

    /// Stores a newly selected photo and forgets any previous analysis.
    pub fn on_photo_selected(&mut self, photo: PhotoBlob) {
        info!(file_name = photo.file_name(), bytes = photo.len(), "Photo selected");
        self.photo = Some(photo);
        self.extracted = None;
    }

    /// Runs OCR and field extraction on the selected photo.
    pub async fn on_analyze_requested(&mut self) -> Result<ExtractedFields, SiteError> {
        let photo = self.photo.as_ref().ok_or_else(|| {
            SiteError::Validation("Please select a photo first.".to_string())
        })?;

        info!("Extracting text from photo");
        let text = self.ocr.detect_text(&photo.to_base64()).await?;
        info!("Analyzing extracted text ({} chars)", text.len());
        let mut fields = self.extractor.extract(&text).await?;

        if fields.address.trim().is_empty() {
            if let Some(prefill) = &self.prefill_address {
                fields.address = prefill.clone();
            }
        }

        self.extracted = Some(fields.clone());
        Ok(fields)
    }

    /// Persists the reviewed record, archiving the photo alongside.
    ///
    /// The archive upload never fails the submission; its error is reported in
    /// [`SubmissionReport::archive`]. On success the photo and extraction are
    /// cleared so the controller is ready for the next site.
    pub async fn on_submit(&mut self, record: SiteRecord) -> Result<SubmissionReport, SiteError> {
        if record.address.trim().is_empty() {
            return Err(SiteError::Validation("Address is required.".to_string()));
        }

        let upload = match (&self.photo, &self.archiver) {
            (Some(photo), Some(_)) => Some(ArchiveUpload::for_photo(
                photo,
                &record.address,
                record.picture_date,
            )),
            _ => None,
        };

        let archive_task = async {
            match (upload, &self.archiver) {
                (Some(upload), Some(archiver)) => match archiver.upload(&upload).await {
                    Ok(file) => {
                        info!(file_id = %file.file_id, "Photo archived");
                        ArchiveStatus::Uploaded(file)
                    }
                    Err(e) => {
                        warn!("Photo archive failed: {e}");
                        ArchiveStatus::Failed {
                            warning: e.to_string(),
                        }
                    }
                },
                _ => ArchiveStatus::Skipped,
            }
        };

        let (archive, outcome) = tokio::join!(archive_task, self.store.upsert(&record));
        let outcome = outcome?;
        info!(address = %record.address, "{outcome}");

        self.reset();
        Ok(SubmissionReport { outcome, archive })
    }

    /// Drops the photo and extraction. The prefill address is kept.
    pub fn reset(&mut self) {
        self.photo = None;
        self.extracted = None;
    }
}
