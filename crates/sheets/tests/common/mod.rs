#![allow(dead_code)]
//! # Common Test Utilities
//!
//! An in-memory `SheetStore` that behaves like the spreadsheet proxy closely
//! enough to exercise the reconciler without a network.

use async_trait::async_trait;
use sitelog::errors::SiteError;
use sitelog_sheets::SheetStore;
use std::sync::{Arc, Mutex};

/// One write as seen by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Append { range: String, row: Vec<String> },
    Update { range: String, row: Vec<String> },
}

#[derive(Clone, Debug, Default)]
pub struct MemorySheetStore {
    grid: Arc<Mutex<Vec<Vec<String>>>>,
    writes: Arc<Mutex<Vec<Write>>>,
}

impl MemorySheetStore {
    pub fn new(rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        Self {
            grid: Arc::new(Mutex::new(grid)),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn grid(&self) -> Vec<Vec<String>> {
        self.grid.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    /// Edits one cell directly, as someone working in the sheet would.
    pub fn set_cell(&self, row: usize, column: usize, value: &str) {
        let mut grid = self.grid.lock().unwrap();
        let cells = &mut grid[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.to_string();
    }
}

/// Pulls the row number out of `Sheet!A<row>:<col><row>`.
fn row_of(range: &str) -> Option<usize> {
    let cells = range.rsplit_once('!')?.1;
    let start = cells.split(':').next()?;
    start.trim_start_matches(|c: char| c.is_ascii_alphabetic()).parse().ok()
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn read(&self, _range: &str) -> Result<Vec<Vec<String>>, SiteError> {
        Ok(self.grid())
    }

    async fn append(&self, range: &str, row: Vec<String>) -> Result<(), SiteError> {
        self.writes.lock().unwrap().push(Write::Append {
            range: range.to_string(),
            row: row.clone(),
        });
        self.grid.lock().unwrap().push(row);
        Ok(())
    }

    async fn update(&self, range: &str, row: Vec<String>) -> Result<(), SiteError> {
        self.writes.lock().unwrap().push(Write::Update {
            range: range.to_string(),
            row: row.clone(),
        });
        let index = row_of(range)
            .and_then(|r| r.checked_sub(1))
            .ok_or_else(|| SiteError::Configuration(format!("bad update range {range}")))?;
        let mut grid = self.grid.lock().unwrap();
        match grid.get_mut(index) {
            Some(existing) => {
                *existing = row;
                Ok(())
            }
            None => Err(SiteError::Configuration(format!("row {index} out of range"))),
        }
    }
}
