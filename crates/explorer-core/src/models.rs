use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Column names the explorer reads by name. Every other column is carried
/// through untouched in [`RawRecord::extra`].
pub const TITLE: &str = "title";
pub const ABSTRACT: &str = "abstract";
pub const PUBLISH_TIME: &str = "publish_time";
pub const JOURNAL: &str = "journal";
pub const AUTHORS: &str = "authors";

/// The columns inspected for missing values before cleaning.
pub const KEY_COLUMNS: [&str; 5] = [TITLE, ABSTRACT, PUBLISH_TIME, JOURNAL, AUTHORS];

/// One paper exactly as read from the source file.
///
/// `None` means the cell was empty, which is the CSV "no value" convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publish_time: Option<String>,
    pub journal: Option<String>,
    pub authors: Option<String>,
    /// Passthrough columns keyed by header name; empty cells are omitted.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl RawRecord {
    /// Look up a column by its header name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            TITLE => self.title.as_deref(),
            ABSTRACT => self.abstract_text.as_deref(),
            PUBLISH_TIME => self.publish_time.as_deref(),
            JOURNAL => self.journal.as_deref(),
            AUTHORS => self.authors.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }
}

/// The unvalidated record set produced by the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header names in file order.
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, records: Vec<RawRecord>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count records whose `column` is absent.
    pub fn missing_count(&self, column: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.field(column).is_none())
            .count()
    }
}

/// A record that survived cleaning, with its derived attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    /// Absent abstracts are normalised to the empty string.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// The original `publish_time` text.
    pub publish_time: String,
    /// `publish_time` resolved to a calendar date.
    pub publish_date: NaiveDate,
    pub year: i32,
    pub journal: Option<String>,
    pub authors: Option<String>,
    pub abstract_word_count: usize,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// The analysis-ready table. Treated as immutable once built: filtering
/// produces a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTable {
    pub records: Vec<PaperRecord>,
}

impl CleanedTable {
    pub fn new(records: Vec<PaperRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaperRecord> {
        self.records.iter()
    }

    /// Smallest and largest `year`, or `None` for an empty table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a CleanedTable {
    type Item = &'a PaperRecord;
    type IntoIter = std::slice::Iter<'a, PaperRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Text columns of a cleaned table that aggregates can group or tokenize by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Abstract,
    Journal,
    Authors,
}

impl Column {
    /// Read this column from `record`. Title and abstract are never absent
    /// after cleaning.
    pub fn value<'a>(&self, record: &'a PaperRecord) -> Option<&'a str> {
        match self {
            Column::Title => Some(record.title.as_str()),
            Column::Abstract => Some(record.abstract_text.as_str()),
            Column::Journal => record.journal.as_deref(),
            Column::Authors => record.authors.as_deref(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::Title => TITLE,
            Column::Abstract => ABSTRACT,
            Column::Journal => JOURNAL,
            Column::Authors => AUTHORS,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TITLE => Ok(Column::Title),
            ABSTRACT => Ok(Column::Abstract),
            JOURNAL => Ok(Column::Journal),
            AUTHORS => Ok(Column::Authors),
            other => Err(format!("unknown column: {other}")),
        }
    }
}
