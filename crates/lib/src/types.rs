use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fields pulled out of one photo's OCR text.
///
/// Every field defaults to an empty string. Nothing here is persisted on its
/// own; the user reviews and edits these values before they become a
/// [`SiteRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub address: String,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub website: String,
    pub phone: String,
    /// The full OCR transcript the other fields were extracted from.
    pub raw_text: String,
}

/// One submission for a physical site, ready to be reconciled into the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub address: String,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub website: String,
    pub phone: String,
    pub extracted_text: String,
    pub picture_date: NaiveDate,
    pub picture_taken: bool,
}

impl SiteRecord {
    /// Builds a record from reviewed fields, trimming every value.
    pub fn from_fields(fields: &ExtractedFields, picture_date: NaiveDate) -> Self {
        Self {
            address: fields.address.trim().to_string(),
            company_name: fields.company_name.trim().to_string(),
            contact_name: fields.contact_name.trim().to_string(),
            email: fields.email.trim().to_string(),
            website: fields.website.trim().to_string(),
            phone: fields.phone.trim().to_string(),
            extracted_text: fields.raw_text.trim().to_string(),
            picture_date,
            picture_taken: true,
        }
    }

    /// The key used to find this site's row.
    pub fn normalized_address(&self) -> String {
        normalize_address(&self.address)
    }
}

/// Lower-cases and trims an address so that spelling variations in case or
/// surrounding whitespace resolve to the same site.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// What the reconciler did with a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// An existing row was merged in place. `row` is the 1-based sheet row.
    Updated { row: usize },
    /// A new row was appended.
    Inserted,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Updated { row } => write!(f, "Site updated successfully! (Row {row})"),
            UpsertOutcome::Inserted => write!(f, "New site added successfully!"),
        }
    }
}
