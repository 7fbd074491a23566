use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the CORD-19 explorer.
///
/// Rows that fail a cleaning precondition are not represented here: the
/// cleaner filters them silently and only counts them.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The configured input file does not exist.
    #[error("Data source not found: {0}")]
    DataSourceNotFound(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader could not decode the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A chart could not be drawn or written.
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    /// Raw mode, the alternate screen or a draw failed in the dashboard.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    /// `true` for the missing-input case, which entry points report with a
    /// friendly message instead of the generic failure text.
    pub fn is_data_source_not_found(&self) -> bool {
        matches!(self, ExplorerError::DataSourceNotFound(_))
    }

    /// Message shown to the user by the report and the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::DataSourceNotFound(path) => format!(
                "The data file was not found. Please make sure '{}' exists.",
                path.display()
            ),
            other => format!("An error occurred: {other}"),
        }
    }
}

/// Convenience alias used throughout the explorer crates.
pub type Result<T> = std::result::Result<T, ExplorerError>;
