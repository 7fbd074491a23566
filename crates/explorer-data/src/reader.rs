//! CSV loading for the explorer.
//!
//! Reads the metadata file into a [`RawTable`] without validating row
//! content; that is the cleaner's job.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::models::{RawRecord, RawTable, ABSTRACT, AUTHORS, JOURNAL, PUBLISH_TIME, TITLE};
use tracing::{debug, info};

/// Cell values read as "no value", in addition to the empty cell.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the CSV file at `path` into a [`RawTable`].
///
/// Fails with [`ExplorerError::DataSourceNotFound`] when `path` does not
/// exist.
pub fn load_raw_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(ExplorerError::DataSourceNotFound(path.to_path_buf()));
    }

    info!("Loading data from {}", path.display());
    let file = std::fs::File::open(path).map_err(|source| ExplorerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_raw_table(file)?;
    info!(
        "Data loaded successfully. Shape: ({}, {})",
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Parse CSV from any reader. The first row is the header.
///
/// Rows shorter than the header are accepted; their missing trailing cells
/// are absent.
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(map_row(&columns, &row));
    }

    debug!("Read {} rows with columns {:?}", records.len(), columns);
    Ok(RawTable::new(columns, records))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn map_row(columns: &[String], row: &csv::StringRecord) -> RawRecord {
    let mut record = RawRecord {
        extra: BTreeMap::new(),
        ..Default::default()
    };

    for (name, cell) in columns.iter().zip(row.iter()) {
        let Some(value) = cell_value(cell) else {
            continue;
        };
        match name.as_str() {
            TITLE => record.title = Some(value),
            ABSTRACT => record.abstract_text = Some(value),
            PUBLISH_TIME => record.publish_time = Some(value),
            JOURNAL => record.journal = Some(value),
            AUTHORS => record.authors = Some(value),
            other => {
                record.extra.insert(other.to_string(), value);
            }
        }
    }

    record
}

/// `None` for empty cells and NA markers, otherwise the cell text unchanged.
fn cell_value(cell: &str) -> Option<String> {
    if cell.is_empty() || NA_MARKERS.contains(&cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
