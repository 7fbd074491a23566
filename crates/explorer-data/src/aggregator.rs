//! Derived views over a cleaned (possibly filtered) table.
//!
//! Every function here is pure: the same table always yields the same view,
//! and an empty table yields an empty view rather than an error.
//!
//! Ranked views break count ties by first appearance in the table, so the
//! paper (or token) seen earliest wins.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use explorer_core::models::{CleanedTable, Column};
use explorer_core::stats::{describe, Describe};
use regex::Regex;

/// Stop words removed from title word counts.
pub const DEFAULT_STOP_WORDS: [&str; 20] = [
    "the", "of", "and", "in", "to", "a", "for", "on", "with", "by", "an", "from", "as", "at", "is",
    "that", "this", "are", "be", "which",
];

/// Columns whose missing values the dashboard summary reports.
pub const SUMMARY_COLUMNS: [Column; 4] = [
    Column::Title,
    Column::Abstract,
    Column::Journal,
    Column::Authors,
];

pub fn default_stop_words() -> HashSet<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// Equal-width histogram over `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
    /// Values above `upper`.
    pub overflow: usize,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            (self.upper - self.lower) / self.counts.len() as f64
        }
    }

    /// `[start, end)` of bin `index`.
    pub fn bin_range(&self, index: usize) -> (f64, f64) {
        let width = self.bin_width();
        let start = self.lower + width * index as f64;
        (start, start + width)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.overflow
    }
}

// ── PaperAggregator ───────────────────────────────────────────────────────────

/// Stateless helper computing the aggregate views.
pub struct PaperAggregator;

impl PaperAggregator {
    /// Papers per publication year, ascending by year.
    pub fn yearly_counts(table: &CleanedTable) -> Vec<(i32, usize)> {
        let mut map: BTreeMap<i32, usize> = BTreeMap::new();
        for record in table {
            *map.entry(record.year).or_insert(0) += 1;
        }
        map.into_iter().collect()
    }

    /// The `k` most frequent values of `column`, descending by count.
    ///
    /// Rows where the column is absent are ignored.
    pub fn top_entities(table: &CleanedTable, column: Column, k: usize) -> Vec<(String, usize)> {
        let values = table.iter().filter_map(|r| column.value(r));
        let mut ranked = count_first_seen(values);
        ranked.truncate(k);
        ranked
    }

    /// The `k` most frequent title (or other text column) tokens, excluding
    /// `stop_words`.
    ///
    /// All present values are joined with a single space, lowercased, and
    /// split into maximal runs of word characters. Stop words match
    /// case-insensitively and are removed before truncating to `k`.
    pub fn word_frequency(
        table: &CleanedTable,
        column: Column,
        stop_words: &HashSet<String>,
        k: usize,
    ) -> Vec<(String, usize)> {
        let joined = table
            .iter()
            .filter_map(|r| column.value(r))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let stop: HashSet<String> = stop_words.iter().map(|w| w.to_lowercase()).collect();
        let tokens = tokenize(&joined).filter(|t| !stop.contains(*t));
        let mut ranked = count_first_seen(tokens);
        ranked.truncate(k);
        ranked
    }

    /// Histogram of `abstract_word_count` with `bins` equal-width bins over
    /// `[0, upper]`. The top edge is inclusive; larger values land in
    /// `overflow`.
    pub fn abstract_length_histogram(table: &CleanedTable, bins: usize, upper: f64) -> Histogram {
        let mut hist = Histogram {
            lower: 0.0,
            upper,
            counts: vec![0; bins],
            overflow: 0,
        };
        if bins == 0 {
            hist.overflow = table.len();
            return hist;
        }

        let width = hist.bin_width();
        for record in table {
            let value = record.abstract_word_count as f64;
            if value > upper {
                hist.overflow += 1;
                continue;
            }
            let index = ((value / width) as usize).min(bins - 1);
            hist.counts[index] += 1;
        }
        hist
    }

    /// Descriptive statistics of `year`.
    pub fn describe_years(table: &CleanedTable) -> Option<Describe> {
        let values: Vec<f64> = table.iter().map(|r| f64::from(r.year)).collect();
        describe(&values)
    }

    /// Descriptive statistics of `abstract_word_count`.
    pub fn describe_abstract_lengths(table: &CleanedTable) -> Option<Describe> {
        let values: Vec<f64> = table
            .iter()
            .map(|r| r.abstract_word_count as f64)
            .collect();
        describe(&values)
    }

    /// Missing-value counts for [`SUMMARY_COLUMNS`].
    pub fn missing_values(table: &CleanedTable) -> Vec<(Column, usize)> {
        SUMMARY_COLUMNS
            .iter()
            .map(|&col| {
                let missing = table.iter().filter(|r| col.value(r).is_none()).count();
                (col, missing)
            })
            .collect()
    }
}

// ── Tokenizer ─────────────────────────────────────────────────────────────────

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("regex is valid"))
}

/// Maximal runs of word characters (letters, digits, underscore) in `text`.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    word_regex().find_iter(text).map(|m| m.as_str())
}

/// Count occurrences and rank descending by count, ties in first-seen order.
fn count_first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use explorer_core::models::PaperRecord;
    use std::collections::BTreeMap;

    fn paper(title: &str, year: i32, journal: Option<&str>, words: usize) -> PaperRecord {
        let abstract_text = vec!["w"; words].join(" ");
        PaperRecord {
            title: title.to_string(),
            abstract_text,
            publish_time: format!("{year}-01-01"),
            publish_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            year,
            journal: journal.map(str::to_string),
            authors: None,
            abstract_word_count: words,
            extra: BTreeMap::new(),
        }
    }

    fn scenario_table() -> CleanedTable {
        CleanedTable::new(vec![
            paper("A", 2020, Some("J1"), 3),
            paper("C", 2019, Some("J1"), 0),
        ])
    }

    // ── yearly_counts ─────────────────────────────────────────────────────────

    #[test]
    fn test_yearly_counts_scenario() {
        let counts = PaperAggregator::yearly_counts(&scenario_table());
        assert_eq!(counts, vec![(2019, 1), (2020, 1)]);
    }

    #[test]
    fn test_yearly_counts_sum_and_bounds() {
        let table = CleanedTable::new(vec![
            paper("a", 2021, None, 1),
            paper("b", 2003, None, 1),
            paper("c", 2021, None, 1),
            paper("d", 2010, None, 1),
        ]);
        let counts = PaperAggregator::yearly_counts(&table);
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, table.len());

        let (min, max) = table.year_bounds().unwrap();
        assert!(counts.iter().all(|(y, _)| (min..=max).contains(y)));
        assert!(counts.windows(2).all(|w| w[0].0 < w[1].0));
    }

    // ── top_entities ──────────────────────────────────────────────────────────

    #[test]
    fn test_top_entities_scenario() {
        let top = PaperAggregator::top_entities(&scenario_table(), Column::Journal, 1);
        assert_eq!(top, vec![("J1".to_string(), 2)]);
    }

    #[test]
    fn test_top_entities_ignores_absent_values() {
        let table = CleanedTable::new(vec![
            paper("a", 2020, None, 0),
            paper("b", 2020, Some("Lancet"), 0),
            paper("c", 2020, None, 0),
        ]);
        let top = PaperAggregator::top_entities(&table, Column::Journal, 10);
        assert_eq!(top, vec![("Lancet".to_string(), 1)]);
        let total: usize = top.iter().map(|(_, c)| c).sum();
        assert!(total <= table.len());
    }

    #[test]
    fn test_top_entities_ties_keep_first_seen_order() {
        let table = CleanedTable::new(vec![
            paper("a", 2020, Some("Zeta"), 0),
            paper("b", 2020, Some("Alpha"), 0),
            paper("c", 2020, Some("Mu"), 0),
            paper("d", 2020, Some("Alpha"), 0),
            paper("e", 2020, Some("Zeta"), 0),
        ]);
        let top = PaperAggregator::top_entities(&table, Column::Journal, 10);
        assert_eq!(
            top,
            vec![
                ("Zeta".to_string(), 2),
                ("Alpha".to_string(), 2),
                ("Mu".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_entities_k_larger_than_groups() {
        let top = PaperAggregator::top_entities(&scenario_table(), Column::Journal, 15);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_top_entities_truncates_to_k() {
        let table = CleanedTable::new(
            (0..30)
                .map(|i| paper("t", 2020, Some(&format!("J{}", i % 12)), 0))
                .collect(),
        );
        let top = PaperAggregator::top_entities(&table, Column::Journal, 10);
        assert_eq!(top.len(), 10);
        let min_returned = top.iter().map(|(_, c)| *c).min().unwrap();
        let all = PaperAggregator::top_entities(&table, Column::Journal, 100);
        assert!(all[10..].iter().all(|(_, c)| *c <= min_returned));
    }

    // ── word_frequency ────────────────────────────────────────────────────────

    #[test]
    fn test_word_frequency_title_scenario() {
        let table = CleanedTable::new(vec![
            paper("Covid-19 Study of the Virus", 2020, None, 0),
            paper("New Virus Study", 2020, None, 0),
        ]);
        let mut stop = HashSet::new();
        stop.insert("the".to_string());

        let freq = PaperAggregator::word_frequency(&table, Column::Title, &stop, 20);
        let lookup: HashMap<&str, usize> = freq.iter().map(|(w, c)| (w.as_str(), *c)).collect();

        assert_eq!(lookup.get("study"), Some(&2));
        assert_eq!(lookup.get("virus"), Some(&2));
        assert_eq!(lookup.get("covid"), Some(&1));
        assert_eq!(lookup.get("19"), Some(&1));
        assert!(!lookup.contains_key("the"));
    }

    #[test]
    fn test_word_frequency_ties_keep_first_seen_order() {
        let table = CleanedTable::new(vec![
            paper("Covid-19 Study of the Virus", 2020, None, 0),
            paper("New Virus Study", 2020, None, 0),
        ]);
        let freq = PaperAggregator::word_frequency(&table, Column::Title, &default_stop_words(), 20);
        let words: Vec<&str> = freq.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["study", "virus", "covid", "19", "new"]);
    }

    #[test]
    fn test_word_frequency_removes_stop_words_before_truncating() {
        let table = CleanedTable::new(vec![
            paper("the the the of of and", 2020, None, 0),
            paper("vaccine trial", 2021, None, 0),
        ]);
        let freq = PaperAggregator::word_frequency(&table, Column::Title, &default_stop_words(), 2);
        assert_eq!(
            freq,
            vec![("vaccine".to_string(), 1), ("trial".to_string(), 1)]
        );
    }

    #[test]
    fn test_word_frequency_stop_words_case_insensitive() {
        let table = CleanedTable::new(vec![
            paper("The Virus", 2020, None, 0),
            paper("the study", 2021, None, 0),
        ]);
        let stop: HashSet<String> = ["The".to_string()].into_iter().collect();
        let freq = PaperAggregator::word_frequency(&table, Column::Title, &stop, 10);
        assert_eq!(
            freq,
            vec![("virus".to_string(), 1), ("study".to_string(), 1)]
        );
    }

    #[test]
    fn test_word_frequency_counts_are_exact() {
        let table = CleanedTable::new(vec![
            paper("SARS-CoV-2 spike; SARS", 2020, None, 0),
            paper("sars_cov_2 spike", 2020, None, 0),
        ]);
        let freq = PaperAggregator::word_frequency(&table, Column::Title, &HashSet::new(), 10);
        let lookup: HashMap<&str, usize> = freq.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        assert_eq!(lookup.get("sars"), Some(&2));
        assert_eq!(lookup.get("spike"), Some(&2));
        assert_eq!(lookup.get("sars_cov_2"), Some(&1));
        assert_eq!(lookup.get("cov"), Some(&1));
    }

    #[test]
    fn test_tokenize_unicode_words() {
        let tokens: Vec<&str> = tokenize("étude über covid-19").collect();
        assert_eq!(tokens, vec!["étude", "über", "covid", "19"]);
    }

    // ── empty tables ──────────────────────────────────────────────────────────

    #[test]
    fn test_empty_table_yields_empty_views() {
        let empty = CleanedTable::default();
        assert!(PaperAggregator::yearly_counts(&empty).is_empty());
        assert!(PaperAggregator::top_entities(&empty, Column::Journal, 10).is_empty());
        assert!(
            PaperAggregator::word_frequency(&empty, Column::Title, &default_stop_words(), 20)
                .is_empty()
        );
        assert!(PaperAggregator::describe_years(&empty).is_none());
        let hist = PaperAggregator::abstract_length_histogram(&empty, 50, 1000.0);
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.counts.len(), 50);
    }

    // ── abstract_length_histogram ─────────────────────────────────────────────

    #[test]
    fn test_histogram_binning() {
        let table = CleanedTable::new(vec![
            paper("a", 2020, None, 0),
            paper("b", 2020, None, 19),
            paper("c", 2020, None, 20),
            paper("d", 2020, None, 1000),
            paper("e", 2020, None, 1001),
        ]);
        let hist = PaperAggregator::abstract_length_histogram(&table, 50, 1000.0);
        assert_eq!(hist.bin_width(), 20.0);
        assert_eq!(hist.counts[0], 2);
        assert_eq!(hist.counts[1], 1);
        assert_eq!(hist.counts[49], 1);
        assert_eq!(hist.overflow, 1);
        assert_eq!(hist.total(), table.len());
        assert_eq!(hist.bin_range(1), (20.0, 40.0));
    }

    // ── describe / missing ────────────────────────────────────────────────────

    #[test]
    fn test_describe_columns() {
        let table = CleanedTable::new(vec![
            paper("a", 2019, None, 100),
            paper("b", 2021, None, 300),
        ]);
        let years = PaperAggregator::describe_years(&table).unwrap();
        assert_eq!(years.count, 2);
        assert!((years.mean - 2020.0).abs() < 1e-9);

        let lengths = PaperAggregator::describe_abstract_lengths(&table).unwrap();
        assert_eq!(lengths.min, 100.0);
        assert_eq!(lengths.max, 300.0);
    }

    #[test]
    fn test_missing_values() {
        let table = CleanedTable::new(vec![
            paper("a", 2019, None, 1),
            paper("b", 2021, Some("J"), 1),
        ]);
        let missing = PaperAggregator::missing_values(&table);
        assert_eq!(
            missing,
            vec![
                (Column::Title, 0),
                (Column::Abstract, 0),
                (Column::Journal, 1),
                (Column::Authors, 2),
            ]
        );
    }
}
