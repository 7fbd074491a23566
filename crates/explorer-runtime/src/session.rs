//! Dashboard session state.
//!
//! [`DashboardSession`] holds the cleaned table together with the current
//! filter selection and turns them into a [`DashboardSnapshot`] on demand.
//! The UI layer only reads snapshots and sends filter edits back, so every
//! redraw reflects exactly one consistent filter state.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use explorer_core::error::Result;
use explorer_core::models::{CleanedTable, Column};
use explorer_core::stats::Describe;
use explorer_data::aggregator::{default_stop_words, Histogram, PaperAggregator};
use explorer_data::cleaner::CleaningReport;
use explorer_data::filter::{filter, journal_options, JournalFilter, YearRange};

use crate::dataset_cache::DatasetCache;

pub const DEFAULT_SAMPLE_ROWS: usize = 10;
pub const MIN_SAMPLE_ROWS: usize = 5;
pub const MAX_SAMPLE_ROWS: usize = 50;

const TOP_JOURNALS: usize = 10;
const TOP_WORDS: usize = 20;
const HISTOGRAM_BINS: usize = 50;
const HISTOGRAM_MAX: f64 = 1000.0;

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// One row of the sample table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub title: String,
    pub journal: Option<String>,
    pub year: i32,
    pub abstract_word_count: usize,
}

/// Everything the dashboard draws for one filter state.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Papers in the unfiltered table.
    pub total_papers: usize,
    pub filtered_papers: usize,
    /// Year range of the unfiltered table.
    pub time_span: Option<YearRange>,
    /// Distinct journals in the unfiltered table.
    pub unique_journals: usize,
    pub years: Option<YearRange>,
    pub journal: JournalFilter,
    /// 1-based position of `journal` among the journal choices, and their count.
    pub journal_choice: Option<(usize, usize)>,
    pub yearly_counts: Vec<(i32, usize)>,
    pub top_journals: Vec<(String, usize)>,
    pub top_words: Vec<(String, usize)>,
    pub abstract_lengths: Histogram,
    /// Requested sample size.
    pub sample_rows: usize,
    /// Empty unless sample rows are shown.
    pub sample: Vec<SampleRow>,
    pub year_stats: Option<Describe>,
    pub abstract_stats: Option<Describe>,
    pub missing: Vec<(Column, usize)>,
    /// Rows dropped while cleaning the loaded file; `None` for a table not
    /// loaded through the cache.
    pub cleaning: Option<CleaningReport>,
    pub show_sample: bool,
    pub show_summary: bool,
}

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    table: CleanedTable,
    bounds: Option<YearRange>,
    years: Option<YearRange>,
    journal: JournalFilter,
    journals: Vec<JournalFilter>,
    sample_rows: usize,
    show_sample: bool,
    show_summary: bool,
    stop_words: HashSet<String>,
    cleaning: Option<CleaningReport>,
}

impl DashboardSession {
    /// Start a session over `table` with every filter at its widest.
    pub fn new(table: CleanedTable) -> Self {
        let bounds = YearRange::of(&table);
        let journals = journal_options(&table);
        Self {
            table,
            bounds,
            years: bounds,
            journal: JournalFilter::All,
            journals,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            show_sample: false,
            show_summary: false,
            stop_words: default_stop_words(),
            cleaning: None,
        }
    }

    /// Load the table for `path` through `cache` and start a session.
    pub fn open(cache: &mut DatasetCache, path: &Path) -> Result<Self> {
        let table = cache.get(path)?.clone();
        let mut session = Self::new(table);
        session.cleaning = cache.cleaning_report().cloned();
        Ok(session)
    }

    /// Re-read `path` through `cache`. With `force` the cache is dropped
    /// first. Filters that still fit the new table are kept.
    ///
    /// Returns `true` when the cache actually read the file again. A session
    /// not opened through `cache` is only refreshed once the file changes.
    pub fn reload(&mut self, cache: &mut DatasetCache, path: &Path, force: bool) -> Result<bool> {
        if force {
            cache.invalidate();
        }
        let loads = cache.load_count();
        cache.get(path)?;
        if cache.load_count() == loads {
            return Ok(false);
        }
        let table = cache.get(path)?.clone();
        self.replace_table(table);
        self.cleaning = cache.cleaning_report().cloned();
        Ok(true)
    }

    /// Swap in a new table, clamping the year range and dropping a journal
    /// selection the table no longer contains.
    pub fn replace_table(&mut self, table: CleanedTable) {
        self.bounds = YearRange::of(&table);
        self.journals = journal_options(&table);
        self.table = table;

        self.years = match (self.years, self.bounds) {
            (Some(current), Some(_)) => Some(self.clamp(current)),
            (_, bounds) => bounds,
        };
        if !self.journals.contains(&self.journal) {
            self.journal = JournalFilter::All;
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn table(&self) -> &CleanedTable {
        &self.table
    }

    pub fn bounds(&self) -> Option<YearRange> {
        self.bounds
    }

    pub fn years(&self) -> Option<YearRange> {
        self.years
    }

    pub fn journal(&self) -> &JournalFilter {
        &self.journal
    }

    pub fn journal_choices(&self) -> &[JournalFilter] {
        &self.journals
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    pub fn show_sample(&self) -> bool {
        self.show_sample
    }

    pub fn show_summary(&self) -> bool {
        self.show_summary
    }

    pub fn cleaning(&self) -> Option<&CleaningReport> {
        self.cleaning.as_ref()
    }

    // ── Filter edits ──────────────────────────────────────────────────────

    /// Set both year bounds. Values are clamped to the data range and
    /// reordered so that `min <= max`.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        if self.bounds.is_some() {
            self.years = Some(self.clamp(YearRange::new(from, to)));
        }
    }

    /// Move the lower bound by `delta` years, never past the upper bound.
    pub fn shift_from_year(&mut self, delta: i32) {
        if let (Some(years), Some(bounds)) = (self.years, self.bounds) {
            let min = (years.min + delta).clamp(bounds.min, years.max);
            self.years = Some(YearRange { min, ..years });
        }
    }

    /// Move the upper bound by `delta` years, never below the lower bound.
    pub fn shift_to_year(&mut self, delta: i32) {
        if let (Some(years), Some(bounds)) = (self.years, self.bounds) {
            let max = (years.max + delta).clamp(years.min, bounds.max);
            self.years = Some(YearRange { max, ..years });
        }
    }

    pub fn set_journal(&mut self, journal: JournalFilter) {
        self.journal = journal;
    }

    /// Step through the journal choices, wrapping at either end.
    pub fn cycle_journal(&mut self, forward: bool) {
        if self.journals.is_empty() {
            return;
        }
        let len = self.journals.len();
        let current = self
            .journals
            .iter()
            .position(|j| j == &self.journal)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.journal = self.journals[next].clone();
    }

    pub fn set_sample_rows(&mut self, rows: usize) {
        self.sample_rows = rows.clamp(MIN_SAMPLE_ROWS, MAX_SAMPLE_ROWS);
    }

    pub fn shift_sample_rows(&mut self, delta: i64) {
        let rows = (self.sample_rows as i64 + delta).max(0) as usize;
        self.set_sample_rows(rows);
    }

    pub fn toggle_sample(&mut self) {
        self.show_sample = !self.show_sample;
    }

    pub fn toggle_summary(&mut self) {
        self.show_summary = !self.show_summary;
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    /// Apply the current filters and compute every dashboard view.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let filtered = match self.years {
            Some(years) => filter(&self.table, years, &self.journal),
            None => CleanedTable::default(),
        };

        let unique_journals = self
            .table
            .iter()
            .filter_map(|r| r.journal.as_deref())
            .collect::<BTreeSet<_>>()
            .len();

        let choices = self.journal_choices();
        let journal_choice = choices
            .iter()
            .position(|j| j == &self.journal)
            .map(|i| (i + 1, choices.len()));

        let sample = if self.show_sample {
            filtered
                .iter()
                .take(self.sample_rows)
                .map(|r| SampleRow {
                    title: r.title.clone(),
                    journal: r.journal.clone(),
                    year: r.year,
                    abstract_word_count: r.abstract_word_count,
                })
                .collect()
        } else {
            Vec::new()
        };

        DashboardSnapshot {
            total_papers: self.table.len(),
            filtered_papers: filtered.len(),
            time_span: self.bounds,
            unique_journals,
            years: self.years,
            journal: self.journal.clone(),
            journal_choice,
            yearly_counts: PaperAggregator::yearly_counts(&filtered),
            top_journals: PaperAggregator::top_entities(&filtered, Column::Journal, TOP_JOURNALS),
            top_words: PaperAggregator::word_frequency(
                &filtered,
                Column::Title,
                &self.stop_words,
                TOP_WORDS,
            ),
            abstract_lengths: PaperAggregator::abstract_length_histogram(
                &filtered,
                HISTOGRAM_BINS,
                HISTOGRAM_MAX,
            ),
            sample_rows: self.sample_rows,
            sample,
            year_stats: PaperAggregator::describe_years(&filtered),
            abstract_stats: PaperAggregator::describe_abstract_lengths(&filtered),
            missing: PaperAggregator::missing_values(&filtered),
            cleaning: self.cleaning.clone(),
            show_sample: self.show_sample,
            show_summary: self.show_summary,
        }
    }

    fn clamp(&self, range: YearRange) -> YearRange {
        match self.bounds {
            Some(bounds) => YearRange::new(
                range.min.clamp(bounds.min, bounds.max),
                range.max.clamp(bounds.min, bounds.max),
            ),
            None => range,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
