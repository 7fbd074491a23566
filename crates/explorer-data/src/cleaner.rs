//! Record-level validation and derivation.
//!
//! The rules run in a fixed order: drop rows without a title, impute the
//! empty string for a missing abstract, drop rows whose `publish_time` does
//! not parse, then derive `year` and `abstract_word_count`. Title and date
//! are dropped while abstract is imputed; that asymmetry is per-field policy.

use chrono::Datelike;
use explorer_core::dates::parse_publish_date;
use explorer_core::models::{CleanedTable, PaperRecord, RawRecord, RawTable};
use serde::Serialize;
use tracing::info;

/// Row counts observed while cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub missing_title: usize,
    pub unparseable_date: usize,
    pub output_rows: usize,
}

/// Clean `raw` into an analysis-ready table. Never fails; rows that do not
/// meet the preconditions are dropped.
pub fn clean(raw: &RawTable) -> CleanedTable {
    clean_with_report(raw).0
}

/// Same as [`clean`], also returning how many rows each rule dropped.
pub fn clean_with_report(raw: &RawTable) -> (CleanedTable, CleaningReport) {
    let mut report = CleaningReport {
        input_rows: raw.len(),
        ..Default::default()
    };

    let mut records = Vec::with_capacity(raw.len());
    for record in &raw.records {
        match clean_record(record) {
            Ok(paper) => records.push(paper),
            Err(Dropped::MissingTitle) => report.missing_title += 1,
            Err(Dropped::UnparseableDate) => report.unparseable_date += 1,
        }
    }
    report.output_rows = records.len();

    info!(
        "Dropped {} rows with missing titles, {} rows with unusable publish_time",
        report.missing_title, report.unparseable_date
    );
    info!("Cleaned data rows: {}", report.output_rows);

    (CleanedTable::new(records), report)
}

/// Count whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

enum Dropped {
    MissingTitle,
    UnparseableDate,
}

fn clean_record(record: &RawRecord) -> Result<PaperRecord, Dropped> {
    let title = record
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or(Dropped::MissingTitle)?;

    let abstract_text = record.abstract_text.clone().unwrap_or_default();

    let publish_time = record.publish_time.as_deref().ok_or(Dropped::UnparseableDate)?;
    let publish_date = parse_publish_date(publish_time).ok_or(Dropped::UnparseableDate)?;

    Ok(PaperRecord {
        year: publish_date.year(),
        abstract_word_count: word_count(&abstract_text),
        title,
        abstract_text,
        publish_time: publish_time.to_string(),
        publish_date,
        journal: record.journal.clone(),
        authors: record.authors.clone(),
        extra: record.extra.clone(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
