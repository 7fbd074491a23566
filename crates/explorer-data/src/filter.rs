//! Dashboard filtering of a cleaned table.

use std::collections::BTreeSet;
use std::fmt;

use explorer_core::models::CleanedTable;

/// Inclusive year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Build a range, swapping the bounds if given in reverse.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// The full range covered by `table`, or `None` when it is empty.
    pub fn of(table: &CleanedTable) -> Option<Self> {
        table.year_bounds().map(|(min, max)| Self { min, max })
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Journal selection. `All` disables the journal predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JournalFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the journal name.
    Only(String),
}

impl JournalFilter {
    pub fn matches(&self, journal: Option<&str>) -> bool {
        match self {
            JournalFilter::All => true,
            JournalFilter::Only(name) => journal == Some(name.as_str()),
        }
    }
}

impl fmt::Display for JournalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalFilter::All => f.write_str("All"),
            JournalFilter::Only(name) => f.write_str(name),
        }
    }
}

/// Rows of `table` inside `years` whose journal satisfies `journal`.
///
/// Order is preserved. The input is left untouched.
pub fn filter(table: &CleanedTable, years: YearRange, journal: &JournalFilter) -> CleanedTable {
    let records = table
        .iter()
        .filter(|r| years.contains(r.year) && journal.matches(r.journal.as_deref()))
        .cloned()
        .collect();
    CleanedTable::new(records)
}

/// Choices for the journal selector: `All` followed by every distinct
/// journal in sorted order.
pub fn journal_options(table: &CleanedTable) -> Vec<JournalFilter> {
    let names: BTreeSet<&str> = table.iter().filter_map(|r| r.journal.as_deref()).collect();

    std::iter::once(JournalFilter::All)
        .chain(names.into_iter().map(|n| JournalFilter::Only(n.to_string())))
        .collect()
}
