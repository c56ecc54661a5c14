//! # Site Photo Log
//!
//! This crate turns a photo of a construction-site sign into a row in a site
//! spreadsheet. The photo is sent through an OCR provider, the detected text is
//! turned into structured fields by a [`FieldExtractor`], and the reviewed
//! record is handed to a [`RecordStore`] which updates the existing row for
//! that address or appends a new one. The photo can also be archived on the
//! side without holding up the spreadsheet write.

pub mod config;
pub mod controller;
pub mod errors;
pub mod extract;
pub mod photo;
pub mod prompts;
pub mod providers;
pub mod types;

pub use config::{ClientConfig, ExtractionStrategy};
pub use controller::{ArchiveStatus, RecordStore, SubmissionController, SubmissionReport};
pub use errors::{ErrorKind, SiteError};
pub use extract::{FieldExtractor, HeuristicExtractor, ModelExtractor};
pub use photo::PhotoBlob;
pub use types::{normalize_address, ExtractedFields, SiteRecord, UpsertOutcome};
