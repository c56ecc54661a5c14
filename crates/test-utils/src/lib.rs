use async_trait::async_trait;
use sitelog::controller::RecordStore;
use sitelog::errors::SiteError;
use sitelog::providers::{AiProvider, ArchiveUpload, ArchivedFile, OcrProvider, PhotoArchiver};
use sitelog::types::{SiteRecord, UpsertOutcome};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, SiteError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(SiteError::Configuration(format!(
            "MockAiProvider: No response programmed for prompt. Got: '{prompt}'"
        )))
    }
}

// --- Mock OCR Provider ---

/// Returns the same text for every image. Empty text behaves like a photo
/// without any readable text.
#[derive(Clone, Debug, Default)]
pub struct MockOcrProvider {
    text: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockOcrProvider {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The base64 payloads received so far.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrProvider for MockOcrProvider {
    async fn detect_text(&self, image_base64: &str) -> Result<String, SiteError> {
        self.calls.lock().unwrap().push(image_base64.to_string());
        if self.text.trim().is_empty() {
            return Err(SiteError::NoTextDetected {
                service: "MockOcrProvider".to_string(),
            });
        }
        Ok(self.text.clone())
    }
}

// --- Mock Archiver ---

#[derive(Clone, Debug, Default)]
pub struct MockArchiver {
    failure: Option<String>,
    uploads: Arc<Mutex<Vec<ArchiveUpload>>>,
}

impl MockArchiver {
    /// An archiver whose uploads always succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// An archiver whose uploads always fail with an upstream error.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_uploads(&self) -> Vec<ArchiveUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoArchiver for MockArchiver {
    async fn upload(&self, upload: &ArchiveUpload) -> Result<ArchivedFile, SiteError> {
        self.uploads.lock().unwrap().push(upload.clone());
        if let Some(message) = &self.failure {
            return Err(SiteError::Upstream {
                service: "Google Drive API".to_string(),
                status: 500,
                message: message.clone(),
            });
        }
        let count = self.uploads.lock().unwrap().len();
        Ok(ArchivedFile {
            file_id: format!("mock-file-{count}"),
            file_name: upload.file_name.clone(),
            web_view_link: Some(format!("https://drive.example/mock-file-{count}")),
        })
    }
}

// --- Mock Record Store ---

/// Remembers every record it is given. The first record for an address is an
/// insert, later ones update row `index + 2`.
#[derive(Clone, Debug, Default)]
pub struct MockRecordStore {
    records: Arc<Mutex<Vec<SiteRecord>>>,
    failure: Option<String>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write as a permissions problem.
    pub fn failing(message: &str) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            failure: Some(message.to_string()),
        }
    }

    pub fn get_records(&self) -> Vec<SiteRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn upsert(&self, record: &SiteRecord) -> Result<UpsertOutcome, SiteError> {
        if let Some(message) = &self.failure {
            return Err(SiteError::Auth {
                service: "Google Sheets API".to_string(),
                message: message.clone(),
            });
        }
        let mut records = self.records.lock().unwrap();
        let key = record.normalized_address();
        match records.iter().position(|r| r.normalized_address() == key) {
            Some(index) => {
                records[index] = record.clone();
                Ok(UpsertOutcome::Updated { row: index + 2 })
            }
            None => {
                records.push(record.clone());
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}
