//! Mapping between sheet header names and the fields of a `SiteRecord`.

use crate::SheetError;
use sitelog::types::SiteRecord;

/// A record field that has a column in the site sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Address,
    PictureDate,
    Builder,
    Website,
    ContactName,
    ContactNumber,
    Email,
    PictureTaken,
    ExtractedText,
}

impl LogicalField {
    pub const ALL: [LogicalField; 9] = [
        LogicalField::Address,
        LogicalField::PictureDate,
        LogicalField::Builder,
        LogicalField::Website,
        LogicalField::ContactName,
        LogicalField::ContactNumber,
        LogicalField::Email,
        LogicalField::PictureTaken,
        LogicalField::ExtractedText,
    ];

    /// The header name written by a freshly created sheet.
    pub fn canonical_header(self) -> &'static str {
        match self {
            LogicalField::Address => "Address",
            LogicalField::PictureDate => "Picture Date",
            LogicalField::Builder => "Builder",
            LogicalField::Website => "Website",
            LogicalField::ContactName => "Contact Name",
            LogicalField::ContactNumber => "Contact Number",
            LogicalField::Email => "Email",
            LogicalField::PictureTaken => "Picture taken",
            LogicalField::ExtractedText => "Extracted Text",
        }
    }

    /// Other header names accepted for the same field.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::Address => &["Site Address"],
            LogicalField::PictureDate => &["Last Picture Date"],
            LogicalField::Builder => &["Company", "Company Name"],
            LogicalField::Website => &["URL"],
            LogicalField::ContactName => &["Contact"],
            LogicalField::ContactNumber => &["Phone"],
            LogicalField::Email => &["Email Address"],
            LogicalField::PictureTaken => &[],
            LogicalField::ExtractedText => &["OCR Text"],
        }
    }

    /// Case-insensitive, whitespace-trimmed comparison against the canonical
    /// name and the aliases. Blank headers never match.
    pub fn matches(self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        if header.is_empty() {
            return false;
        }
        std::iter::once(self.canonical_header())
            .chain(self.aliases().iter().copied())
            .any(|name| name.to_lowercase() == header)
    }

    /// Resolves a header cell to a field, if any.
    pub fn from_header(header: &str) -> Option<LogicalField> {
        Self::ALL.into_iter().find(|field| field.matches(header))
    }

    /// The cell value this field contributes for `record`.
    pub fn value(self, record: &SiteRecord) -> String {
        match self {
            LogicalField::Address => record.address.clone(),
            LogicalField::PictureDate => record.picture_date.format("%-m/%-d/%Y").to_string(),
            LogicalField::Builder => record.company_name.clone(),
            LogicalField::Website => record.website.clone(),
            LogicalField::ContactName => record.contact_name.clone(),
            LogicalField::ContactNumber => record.phone.clone(),
            LogicalField::Email => record.email.clone(),
            LogicalField::PictureTaken if record.picture_taken => "Yes".to_string(),
            LogicalField::PictureTaken => String::new(),
            LogicalField::ExtractedText => record.extracted_text.clone(),
        }
    }
}

/// Column index → field binding for one header row.
///
/// Each field binds to the first header that names it; later duplicates and
/// unrecognized headers stay unmapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<Option<LogicalField>>,
    address_column: usize,
}

impl HeaderMap {
    pub fn build(header: &[String]) -> Result<Self, SheetError> {
        if header.iter().all(|h| h.trim().is_empty()) {
            return Err(SheetError::EmptyHeaderRow);
        }

        let mut columns: Vec<Option<LogicalField>> = Vec::with_capacity(header.len());
        for cell in header {
            let field = LogicalField::from_header(cell).filter(|f| !columns.contains(&Some(*f)));
            columns.push(field);
        }

        let address_column = columns
            .iter()
            .position(|c| *c == Some(LogicalField::Address))
            .ok_or(SheetError::MissingAddressColumn)?;

        Ok(Self {
            columns,
            address_column,
        })
    }

    /// Number of columns in the header row, mapped or not.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn address_column(&self) -> usize {
        self.address_column
    }

    pub fn field_at(&self, index: usize) -> Option<LogicalField> {
        self.columns.get(index).copied().flatten()
    }

    pub fn column_of(&self, field: LogicalField) -> Option<usize> {
        self.columns.iter().position(|c| *c == Some(field))
    }
}
