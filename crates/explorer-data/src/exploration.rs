//! First look at a freshly loaded table, before any cleaning.

use std::fmt;

use explorer_core::models::{RawTable, KEY_COLUMNS};
use explorer_core::stats::{describe, Describe};
use serde::Serialize;
use tracing::info;

/// Value type inferred from every present cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
        };
        f.pad(name)
    }
}

/// Type and statistics of one raw column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    /// Rows with a value in this column.
    pub present: usize,
    /// `None` for text columns and for columns with no values.
    pub stats: Option<Describe>,
}

/// Shape and completeness of a raw table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorationReport {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    /// One entry per header column, in file order.
    pub column_summaries: Vec<ColumnSummary>,
    /// Missing counts for [`KEY_COLUMNS`], in that order. A key column absent
    /// from the header counts every row as missing.
    pub missing: Vec<(String, usize)>,
}

impl ExplorationReport {
    /// Summaries of the integer and float columns.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.column_summaries
            .iter()
            .filter(|c| c.kind != ColumnKind::Text)
    }
}

pub fn explore(raw: &RawTable) -> ExplorationReport {
    let missing = KEY_COLUMNS
        .iter()
        .map(|col| (col.to_string(), raw.missing_count(col)))
        .collect();

    let report = ExplorationReport {
        rows: raw.len(),
        columns: raw.columns.len(),
        column_names: raw.columns.clone(),
        column_summaries: raw
            .columns
            .iter()
            .map(|name| summarize_column(raw, name))
            .collect(),
        missing,
    };
    info!(
        "DataFrame dimensions: {} rows, {} columns",
        report.rows, report.columns
    );
    report
}

fn summarize_column(raw: &RawTable, name: &str) -> ColumnSummary {
    let values: Vec<&str> = raw
        .records
        .iter()
        .filter_map(|r| r.field(name))
        .map(str::trim)
        .collect();

    let kind = infer_kind(&values);
    let stats = match kind {
        ColumnKind::Text => None,
        ColumnKind::Integer | ColumnKind::Float => {
            let numbers: Vec<f64> = values.iter().filter_map(|v| v.parse().ok()).collect();
            describe(&numbers)
        }
    };

    ColumnSummary {
        name: name.to_string(),
        kind,
        present: values.len(),
        stats,
    }
}

/// A column with no values is text.
fn infer_kind(values: &[&str]) -> ColumnKind {
    if values.is_empty() {
        ColumnKind::Text
    } else if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::models::RawRecord;

    #[test]
    fn test_explore_counts_shape_and_missing() {
        let raw = RawTable::new(
            vec![
                "cord_uid".to_string(),
                "title".to_string(),
                "abstract".to_string(),
                "publish_time".to_string(),
                "journal".to_string(),
                "authors".to_string(),
            ],
            vec![
                RawRecord {
                    title: Some("A".to_string()),
                    publish_time: Some("2020".to_string()),
                    ..Default::default()
                },
                RawRecord {
                    title: Some("B".to_string()),
                    abstract_text: Some("text".to_string()),
                    journal: Some("J".to_string()),
                    ..Default::default()
                },
            ],
        );

        let report = explore(&raw);
        assert_eq!(report.rows, 2);
        assert_eq!(report.columns, 6);
        assert_eq!(report.column_names[0], "cord_uid");
        assert_eq!(
            report.missing,
            vec![
                ("title".to_string(), 0),
                ("abstract".to_string(), 1),
                ("publish_time".to_string(), 1),
                ("journal".to_string(), 1),
                ("authors".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_explore_empty_table() {
        let report = explore(&RawTable::default());
        assert_eq!(report.rows, 0);
        assert_eq!(report.columns, 0);
        assert!(report.column_summaries.is_empty());
        assert!(report.missing.iter().all(|(_, n)| *n == 0));
    }

    fn record(title: &str, extra: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            extra: extra
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_explore_column_kinds_and_stats() {
        let raw = RawTable::new(
            vec![
                "title".to_string(),
                "citations".to_string(),
                "score".to_string(),
                "pmcid".to_string(),
            ],
            vec![
                record("A", &[("citations", "4"), ("score", "0.5"), ("pmcid", "PMC1")]),
                record("B", &[("citations", " 8 "), ("score", "2")]),
                record("C", &[("score", "1.5"), ("pmcid", "PMC3")]),
            ],
        );

        let report = explore(&raw);
        let kinds: Vec<(&str, ColumnKind, usize)> = report
            .column_summaries
            .iter()
            .map(|c| (c.name.as_str(), c.kind, c.present))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("title", ColumnKind::Text, 3),
                ("citations", ColumnKind::Integer, 2),
                ("score", ColumnKind::Float, 3),
                ("pmcid", ColumnKind::Text, 2),
            ]
        );

        let citations = report.column_summaries[1].stats.as_ref().unwrap();
        assert_eq!(citations.count, 2);
        assert_eq!(citations.mean, 6.0);
        assert_eq!(citations.max, 8.0);
        let score = report.column_summaries[2].stats.as_ref().unwrap();
        assert_eq!(score.min, 0.5);
        assert_eq!(score.p50, 1.5);
        assert!(report.column_summaries[0].stats.is_none());

        let numeric: Vec<&str> = report.numeric_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric, vec!["citations", "score"]);
    }

    #[test]
    fn test_column_without_values_is_text() {
        let raw = RawTable::new(vec!["doi".to_string()], vec![RawRecord::default()]);
        let report = explore(&raw);
        assert_eq!(report.column_summaries[0].kind, ColumnKind::Text);
        assert_eq!(report.column_summaries[0].present, 0);
        assert_eq!(ColumnKind::Float.to_string(), "float");
    }
}
