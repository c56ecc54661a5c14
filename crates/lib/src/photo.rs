//! # Photo Capture
//!
//! Validation and base64 encoding of the user-selected site photo, plus the
//! file-name convention used when the photo is archived.

use crate::errors::SiteError;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDate;
use std::path::Path;

/// The largest photo the OCR endpoint accepts.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_EXTENSION: &str = "jpg";

/// An in-memory photo for the duration of one submission.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoBlob {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for PhotoBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoBlob")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PhotoBlob {
    /// Wraps raw bytes, rejecting anything that is not an image or is too large.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, SiteError> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(SiteError::Validation(
                "Please select a valid image file.".to_string(),
            ));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(SiteError::Validation(
                "Image file is too large. Please select an image smaller than 10MB.".to_string(),
            ));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    /// Reads a photo from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SiteError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SiteError::Validation(format!("Could not read '{}': {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_file_name(&file_name);
        Self::new(file_name, mime_type, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The photo as a bare base64 string (no `data:` prefix).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// The extension after the last dot of the file name, or `jpg`.
    pub fn extension(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => DEFAULT_EXTENSION,
        }
    }

    /// The archive file name: `<YYYY-MM-DD>_<sanitized address>.<ext>`.
    pub fn archive_file_name(&self, address: &str, date: NaiveDate) -> String {
        archive_file_name(address, date, self.extension())
    }
}

/// Builds `<YYYY-MM-DD>_<address>.<ext>`, replacing every character of the
/// address that is not an ASCII letter or digit with `_`.
pub fn archive_file_name(address: &str, date: NaiveDate, extension: &str) -> String {
    let sanitized: String = address
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{sanitized}.{extension}", date.format("%Y-%m-%d"))
}

/// Maps common image extensions to their MIME types.
///
/// Unknown extensions map to `application/octet-stream`, which `PhotoBlob::new`
/// then rejects as not being an image.
pub fn mime_from_file_name(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}
