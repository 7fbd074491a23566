//! Batch analysis pipeline.
//!
//! Cleans a raw table and computes every aggregate the report needs,
//! returning an [`AnalysisResult`] ready for chart export and the console
//! summary.

use std::collections::HashSet;

use chrono::Utc;
use explorer_core::models::{CleanedTable, Column, RawTable};
use tracing::info;

use crate::aggregator::{default_stop_words, Histogram, PaperAggregator};
use crate::cleaner::{clean_with_report, CleaningReport};

// ── Public types ──────────────────────────────────────────────────────────────

/// Tunables for [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Journals in the top-journals ranking.
    pub top_journals: usize,
    /// Journals in the papers-by-journal distribution.
    pub journal_distribution: usize,
    /// Title tokens in the word ranking.
    pub top_words: usize,
    /// Title tokens fed to the word cloud.
    pub cloud_words: usize,
    pub histogram_bins: usize,
    pub histogram_max: f64,
    pub stop_words: HashSet<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_journals: 10,
            journal_distribution: 15,
            top_words: 20,
            cloud_words: 100,
            histogram_bins: 50,
            histogram_max: 1000.0,
            stop_words: default_stop_words(),
        }
    }
}

/// Headline facts printed at the end of a batch run. Each is `None` when
/// the cleaned table has nothing to report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFindings {
    /// First and last publication year.
    pub year_range: Option<(i32, i32)>,
    /// Year with the most papers; ties go to the earliest year.
    pub peak_year: Option<(i32, usize)>,
    pub top_journal: Option<(String, usize)>,
    pub top_word: Option<(String, usize)>,
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub cleaning: CleaningReport,
    /// Wall-clock seconds spent cleaning and aggregating.
    pub analysis_time_seconds: f64,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub table: CleanedTable,
    pub yearly_counts: Vec<(i32, usize)>,
    pub top_journals: Vec<(String, usize)>,
    pub papers_by_journal: Vec<(String, usize)>,
    pub word_frequency: Vec<(String, usize)>,
    pub cloud_words: Vec<(String, usize)>,
    pub abstract_lengths: Histogram,
    pub findings: KeyFindings,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the batch pipeline over `raw`.
///
/// 1. Clean the table.
/// 2. Compute yearly counts, journal rankings and title word frequencies.
/// 3. Bin abstract lengths.
/// 4. Derive the key findings.
pub fn analyze(raw: &RawTable, options: &AnalysisOptions) -> AnalysisResult {
    let start = std::time::Instant::now();

    // ── Step 1: Clean ─────────────────────────────────────────────────────────
    let (table, cleaning) = clean_with_report(raw);

    // ── Step 2: Aggregates ────────────────────────────────────────────────────
    let yearly_counts = PaperAggregator::yearly_counts(&table);
    let top_journals = PaperAggregator::top_entities(&table, Column::Journal, options.top_journals);
    let papers_by_journal =
        PaperAggregator::top_entities(&table, Column::Journal, options.journal_distribution);
    let word_frequency =
        PaperAggregator::word_frequency(&table, Column::Title, &options.stop_words, options.top_words);
    let cloud_words =
        PaperAggregator::word_frequency(&table, Column::Title, &options.stop_words, options.cloud_words);

    // ── Step 3: Histogram ─────────────────────────────────────────────────────
    let abstract_lengths = PaperAggregator::abstract_length_histogram(
        &table,
        options.histogram_bins,
        options.histogram_max,
    );

    // ── Step 4: Findings ──────────────────────────────────────────────────────
    let findings = key_findings(&yearly_counts, &top_journals, &word_frequency);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        cleaning,
        analysis_time_seconds: start.elapsed().as_secs_f64(),
    };
    info!(
        "Analysis complete: {} papers across {} years",
        table.len(),
        yearly_counts.len()
    );

    AnalysisResult {
        table,
        yearly_counts,
        top_journals,
        papers_by_journal,
        word_frequency,
        cloud_words,
        abstract_lengths,
        findings,
        metadata,
    }
}

/// Derive [`KeyFindings`] from already-ranked aggregates.
pub fn key_findings(
    yearly_counts: &[(i32, usize)],
    top_journals: &[(String, usize)],
    word_frequency: &[(String, usize)],
) -> KeyFindings {
    let year_range = match (yearly_counts.first(), yearly_counts.last()) {
        (Some((first, _)), Some((last, _))) => Some((*first, *last)),
        _ => None,
    };

    // Strict comparison keeps the earliest year on ties.
    let peak_year = yearly_counts
        .iter()
        .fold(None, |best: Option<(i32, usize)>, &(year, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((year, count)),
        });

    KeyFindings {
        year_range,
        peak_year,
        top_journal: top_journals.first().cloned(),
        top_word: word_frequency.first().cloned(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
