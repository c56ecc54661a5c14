//! # `sitelog-sheets`: Google Sheets Record Store
//!
//! This crate keeps one row per construction site in a Google Sheet. It
//! implements the `RecordStore` trait from the core `sitelog` library: each
//! submission is matched to an existing row by normalized address and merged
//! in place, or appended as a new row when the address is new.
//!
//! The sheet is reached through the spreadsheet proxy ([`SheetsProxyClient`])
//! or any other [`SheetStore`]. Column order is never assumed: every write is
//! laid out according to the header row read at the start of the operation.

pub mod columns;
pub mod header;
pub mod reconciler;
pub mod store;

pub use columns::column_letter;
pub use header::{HeaderMap, LogicalField};
pub use reconciler::{build_insert_row, build_update_row, find_site_row, Reconciler};
pub use store::{SheetStore, SheetsProxyClient};

use sitelog::errors::SiteError;
use thiserror::Error;

// --- Error Definitions ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("The sheet has no 'Address' column. Add an 'Address' header to the first row.")]
    MissingAddressColumn,
    #[error("The sheet has no header row. Add column names to the first row.")]
    EmptyHeaderRow,
}

/// Converts the sheet-specific error into the pipeline-wide `SiteError`.
impl From<SheetError> for SiteError {
    fn from(err: SheetError) -> Self {
        SiteError::Configuration(err.to_string())
    }
}
