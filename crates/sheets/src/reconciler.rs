//! # Address-keyed upsert
//!
//! Every operation reads the grid fresh, resolves the header, then performs
//! exactly one write: an update of the first row whose address matches, or an
//! append.

use crate::{
    columns::{append_range, row_range},
    header::HeaderMap,
    store::SheetStore,
    SheetError,
};
use async_trait::async_trait;
use sitelog::{
    controller::RecordStore,
    errors::SiteError,
    types::{normalize_address, SiteRecord, UpsertOutcome},
};
use tracing::{debug, info};

/// Returns the grid index (header is index 0) of the first data row whose
/// address cell matches `address` after normalization.
pub fn find_site_row(grid: &[Vec<String>], map: &HeaderMap, address: &str) -> Option<usize> {
    let wanted = normalize_address(address);
    grid.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| {
            row.get(map.address_column())
                .is_some_and(|cell| normalize_address(cell) == wanted)
        })
        .map(|(index, _)| index)
}

/// A full row for a new site. Unmapped columns are left blank.
pub fn build_insert_row(map: &HeaderMap, record: &SiteRecord) -> Vec<String> {
    (0..map.width())
        .map(|i| {
            map.field_at(i)
                .map(|field| field.value(record))
                .unwrap_or_default()
        })
        .collect()
}

/// Merges `record` into `existing`.
///
/// Mapped columns take the submitted value, blank included, so a cleared
/// field clears its cell. Unmapped columns keep their previous value; short
/// rows read as blank cells.
pub fn build_update_row(map: &HeaderMap, record: &SiteRecord, existing: &[String]) -> Vec<String> {
    (0..map.width())
        .map(|i| match map.field_at(i) {
            Some(field) => field.value(record),
            None => existing.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Keeps one row per site in a sheet tab.
#[derive(Debug)]
pub struct Reconciler {
    store: Box<dyn SheetStore>,
    sheet_name: String,
}

impl Reconciler {
    pub fn new(store: Box<dyn SheetStore>, sheet_name: impl Into<String>) -> Self {
        Self {
            store,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Looks up the 1-based sheet row holding `address`, without writing.
    pub async fn find_site(&self, address: &str) -> Result<Option<usize>, SiteError> {
        let grid = self.store.read(&self.sheet_name).await?;
        let Some(header) = grid.first() else {
            return Ok(None);
        };
        let map = HeaderMap::build(header)?;
        Ok(find_site_row(&grid, &map, address).map(|index| index + 1))
    }

    pub async fn upsert(&self, record: &SiteRecord) -> Result<UpsertOutcome, SiteError> {
        let grid = self.store.read(&self.sheet_name).await?;
        let header = grid.first().ok_or(SheetError::EmptyHeaderRow)?;
        let map = HeaderMap::build(header)?;
        debug!(width = map.width(), rows = grid.len(), "Resolved sheet header");

        match find_site_row(&grid, &map, &record.address) {
            Some(index) => {
                let row_number = index + 1;
                let row = build_update_row(&map, record, &grid[index]);
                let range = row_range(&self.sheet_name, row_number, map.width());
                info!(address = %record.address, row = row_number, "Updating existing site");
                self.store.update(&range, row).await?;
                Ok(UpsertOutcome::Updated { row: row_number })
            }
            None => {
                let row = build_insert_row(&map, record);
                let range = append_range(&self.sheet_name, map.width());
                info!(address = %record.address, "Adding new site");
                self.store.append(&range, row).await?;
                Ok(UpsertOutcome::Inserted)
            }
        }
    }
}

#[async_trait]
impl RecordStore for Reconciler {
    async fn upsert(&self, record: &SiteRecord) -> Result<UpsertOutcome, SiteError> {
        Reconciler::upsert(self, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn record(address: &str, company: &str, website: &str) -> SiteRecord {
        SiteRecord {
            address: address.to_string(),
            company_name: company.to_string(),
            contact_name: String::new(),
            email: String::new(),
            website: website.to_string(),
            phone: String::new(),
            extracted_text: String::new(),
            picture_date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            picture_taken: true,
        }
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let g = grid(&[&["Builder", "Address"], &["Acme", "1 A St"], &["Bo", " 123 main st "]]);
        let map = HeaderMap::build(&g[0]).unwrap();
        assert_eq!(find_site_row(&g, &map, "123 Main St"), Some(2));
        assert_eq!(find_site_row(&g, &map, "999 Nowhere"), None);
    }

    #[test]
    fn first_duplicate_address_wins() {
        let g = grid(&[&["Address"], &["1 A St"], &["1 a st"]]);
        let map = HeaderMap::build(&g[0]).unwrap();
        assert_eq!(find_site_row(&g, &map, "1 A St"), Some(1));
    }

    #[test]
    fn insert_follows_header_order() {
        let header = grid(&[&["Notes", "Picture Date", "Address", "Picture taken", "Builder"]]);
        let map = HeaderMap::build(&header[0]).unwrap();
        let row = build_insert_row(&map, &record("5 B Rd", "Acme", ""));
        assert_eq!(row, vec!["", "7/4/2024", "5 B Rd", "Yes", "Acme"]);
    }

    #[test]
    fn update_overwrites_mapped_and_preserves_unmapped() {
        let g = grid(&[
            &["Address", "Builder", "Website", "Notes"],
            &["123 Main St", "Acme", "acme.com", "gate code 42"],
        ]);
        let map = HeaderMap::build(&g[0]).unwrap();

        let repeated_company = record("123 Main St", "Acme", "https://acme.example");
        assert_eq!(
            build_update_row(&map, &repeated_company, &g[1]),
            vec!["123 Main St", "Acme", "https://acme.example", "gate code 42"]
        );

        let cleared_company = record("123 Main St", "", "https://acme.example");
        assert_eq!(
            build_update_row(&map, &cleared_company, &g[1]),
            vec!["123 Main St", "", "https://acme.example", "gate code 42"]
        );
    }

    #[test]
    fn short_existing_row_reads_as_blank() {
        let g = grid(&[&["Address", "Builder", "Notes"], &["1 A St"]]);
        let map = HeaderMap::build(&g[0]).unwrap();
        let row = build_update_row(&map, &record("1 A St", "", ""), &g[1]);
        assert_eq!(row, vec!["1 A St", "", ""]);
    }
}
