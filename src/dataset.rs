//! # Record Table Module
//!
//! ## Purpose
//! Owns the immutable in-memory dataset: one logical table built at startup
//! by concatenating every configured CSV source in listed order. The table is
//! never mutated after construction; requests only scan it.
//!
//! ## Input/Output Specification
//! - **Input**: Ordered list of CSV source paths (header row required)
//! - **Output**: One `RecordTable` holding headers and row-major cells
//! - **Failure policy**: fail closed — any unreadable source or column-set
//!   mismatch makes the whole table unavailable
//!
//! ## Key Features
//! - Row order preserved within each source; earlier sources precede later
//! - Column-set mismatch across sources is a load-time error
//! - Cells trimmed and BOM-stripped on the way in
//! - Per-source load logging

use crate::errors::{LookupError, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Immutable in-memory table of raw records
#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: Vec<String>,
    header_index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Build a table directly from headers and rows. Rows shorter than the
    /// header are padded with empty cells; longer rows are truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let header_index = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            headers,
            header_index,
            rows,
        }
    }

    /// Column names, in source order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of a named column, if present
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header_index.get(name).copied()
    }

    /// Number of rows in the table
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Raw cell at (row, column); rows are width-normalized at construction
    pub fn cell(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Iterate row indices in table order
    pub fn row_indices(&self) -> std::ops::Range<usize> {
        0..self.rows.len()
    }
}

/// Load every configured source and concatenate them into one table.
///
/// Sources are read in listed order and their rows appended in that order, so
/// the first source's rows precede the second's. All sources must agree on
/// the column set; a mismatch is a load-time error, not a partial load.
pub fn load_sources(sources: &[PathBuf]) -> Result<RecordTable> {
    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for path in sources {
        tracing::info!("Loading source {:?}...", path);
        let (source_headers, source_rows) = read_source(path)?;

        match &headers {
            None => headers = Some(source_headers),
            Some(expected) => {
                if *expected != source_headers {
                    return Err(LookupError::ColumnMismatch {
                        source_path: path.display().to_string(),
                        details: format!(
                            "expected columns {:?}, found {:?}",
                            expected, source_headers
                        ),
                    });
                }
            }
        }

        tracing::info!("Loaded {} rows from {:?}", source_rows.len(), path);
        rows.extend(source_rows);
    }

    let headers = headers.ok_or_else(|| LookupError::DatasetUnavailable {
        details: "no sources configured".to_string(),
    })?;

    tracing::info!(
        "Dataset ready: {} rows across {} sources",
        rows.len(),
        sources.len()
    );
    Ok(RecordTable::from_rows(headers, rows))
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read one CSV source into (headers, rows)
fn read_source(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LookupError::SourceRead {
            source_path: path.display().to_string(),
            details: e.to_string(),
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LookupError::SourceRead {
            source_path: path.display().to_string(),
            details: e.to_string(),
        })?
        .iter()
        .map(normalize_cell)
        .collect();

    if headers.is_empty() {
        return Err(LookupError::SourceRead {
            source_path: path.display().to_string(),
            details: "source has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LookupError::SourceRead {
            source_path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        // Spreadsheet exports often end in fully blank lines; skip them.
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn single_source_preserves_row_order() {
        let file = write_csv("DOT_NUMBER,COMPANY_NAME\n1,First\n2,Second\n3,Third\n");
        let table = load_sources(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(table.row_count(), 3);
        let name = table.column("COMPANY_NAME").unwrap();
        assert_eq!(table.cell(0, name), "First");
        assert_eq!(table.cell(2, name), "Third");
    }

    #[test]
    fn concatenation_appends_sources_in_listed_order() {
        let first = write_csv("DOT_NUMBER,COMPANY_NAME\n1,A\n2,B\n");
        let second = write_csv("DOT_NUMBER,COMPANY_NAME\n3,C\n");
        let table =
            load_sources(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap();
        assert_eq!(table.row_count(), 3);
        let dot = table.column("DOT_NUMBER").unwrap();
        assert_eq!(table.cell(0, dot), "1");
        assert_eq!(table.cell(1, dot), "2");
        assert_eq!(table.cell(2, dot), "3");
    }

    #[test]
    fn column_mismatch_fails_the_whole_load() {
        let first = write_csv("DOT_NUMBER,COMPANY_NAME\n1,A\n");
        let second = write_csv("DOT_NUMBER,PHONE\n2,5550000000\n");
        let err =
            load_sources(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, LookupError::ColumnMismatch { .. }));
    }

    #[test]
    fn missing_source_fails_closed() {
        let err = load_sources(&[PathBuf::from("/nonexistent/data.csv")]).unwrap_err();
        assert!(matches!(err, LookupError::SourceRead { .. }));
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let file = write_csv("A,B,C\n1,2\n");
        let table = load_sources(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(table.cell(0, table.column("C").unwrap()), "");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let file = write_csv("A,B\n1,2\n,\n3,4\n");
        let table = load_sources(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(table.row_count(), 2);
    }
}
