//! One-shot batch report: load, explore, clean, analyse, export charts and
//! print the key findings.

use std::io::Write;

use explorer_charts::export_charts;
use explorer_core::error::Result;
use explorer_core::formatting::format_stat;
use explorer_core::settings::Settings;
use explorer_core::stats::Describe;
use explorer_data::analysis::{analyze, AnalysisOptions, KeyFindings};
use explorer_data::exploration::explore;
use explorer_data::reader::load_raw_table;

/// Run the report, writing progress and findings to `out`.
///
/// Failures are reported on `out` and do not make the run fail; only a
/// broken `out` does.
pub fn run<W: Write>(settings: &Settings, out: &mut W) -> std::io::Result<()> {
    match generate(settings, out) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "report failed");
            writeln!(out, "{}", e.user_message())
        }
    }
}

pub fn options_from(settings: &Settings) -> AnalysisOptions {
    AnalysisOptions {
        top_journals: settings.top_journals as usize,
        top_words: settings.top_words as usize,
        ..AnalysisOptions::default()
    }
}

fn generate<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    writeln!(out, "Loading data...")?;
    let raw = load_raw_table(&settings.data)?;
    writeln!(
        out,
        "Data loaded successfully. Shape: ({}, {})",
        raw.len(),
        raw.columns.len()
    )?;

    writeln!(out, "\n=== BASIC DATA EXPLORATION ===")?;
    let exploration = explore(&raw);
    writeln!(
        out,
        "Dimensions: {} rows, {} columns",
        exploration.rows, exploration.columns
    )?;
    writeln!(out, "Columns: {}", exploration.column_names.join(", "))?;
    writeln!(out, "\nColumn types:")?;
    for column in &exploration.column_summaries {
        writeln!(
            out,
            "  {:<14}{:<9}{} non-missing",
            column.name, column.kind, column.present
        )?;
    }
    writeln!(out, "\nMissing values in important columns:")?;
    for (column, count) in &exploration.missing {
        writeln!(out, "  {column:<14}{count}")?;
    }

    writeln!(out, "\nBasic statistics:")?;
    let mut numeric = exploration.numeric_columns().peekable();
    if numeric.peek().is_none() {
        writeln!(out, "  no numeric columns")?;
    }
    for column in numeric {
        writeln!(out, "  {}", column.name)?;
        for line in describe_lines(column.stats.as_ref()) {
            writeln!(out, "    {line}")?;
        }
    }

    writeln!(out, "\n=== DATA CLEANING AND PREPARATION ===")?;
    let result = analyze(&raw, &options_from(settings));
    let cleaning = &result.metadata.cleaning;
    writeln!(
        out,
        "Dropped {} rows with missing titles",
        cleaning.missing_title
    )?;
    writeln!(
        out,
        "Dropped {} rows with missing or unparseable publish_time",
        cleaning.unparseable_date
    )?;
    writeln!(out, "Cleaned data: {} rows", cleaning.output_rows)?;

    writeln!(out, "\n=== DATA ANALYSIS ===")?;
    writeln!(out, "Most common title words:")?;
    for (word, count) in &result.word_frequency {
        writeln!(out, "  {word:<20}{count}")?;
    }

    writeln!(out, "\n=== CREATING VISUALIZATIONS ===")?;
    let written = export_charts(&result, &settings.output_dir)?;
    for path in &written {
        tracing::debug!(path = %path.display(), "chart written");
    }
    writeln!(
        out,
        "Visualizations saved to {}",
        settings.output_dir.display()
    )?;

    writeln!(out, "\n=== ANALYSIS COMPLETE ===")?;
    for line in findings_lines(&result.findings) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// `describe()`-style rows, one statistic per line.
pub fn describe_lines(stats: Option<&Describe>) -> Vec<String> {
    let rows: [(&str, Option<f64>); 8] = [
        ("count", stats.map(|d| d.count as f64)),
        ("mean", stats.map(|d| d.mean)),
        ("std", stats.and_then(|d| d.std)),
        ("min", stats.map(|d| d.min)),
        ("25%", stats.map(|d| d.p25)),
        ("50%", stats.map(|d| d.p50)),
        ("75%", stats.map(|d| d.p75)),
        ("max", stats.map(|d| d.max)),
    ];
    rows.into_iter()
        .map(|(name, value)| format!("{name:<6}{}", format_stat(value)))
        .collect()
}

/// The key-findings block; absent facts read "n/a".
pub fn findings_lines(findings: &KeyFindings) -> Vec<String> {
    let na = || "n/a".to_string();
    vec![
        "Key findings:".to_string(),
        format!(
            "- Data covers publications from {}",
            findings
                .year_range
                .map(|(min, max)| format!("{min} to {max}"))
                .unwrap_or_else(na)
        ),
        format!(
            "- Peak publication year: {}",
            findings
                .peak_year
                .map(|(year, n)| format!("{year} with {n} papers"))
                .unwrap_or_else(na)
        ),
        format!(
            "- Top journal: {}",
            findings
                .top_journal
                .as_ref()
                .map(|(journal, n)| format!("{journal} with {n} papers"))
                .unwrap_or_else(na)
        ),
        format!(
            "- Most common word in titles: {}",
            findings
                .top_word
                .as_ref()
                .map(|(word, n)| format!("'{word}' (appears {n} times)"))
                .unwrap_or_else(na)
        ),
    ]
}
