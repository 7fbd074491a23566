//! Shared foundation for the CORD-19 explorer.
//!
//! Holds the record and table models, the error taxonomy, `publish_time`
//! parsing, descriptive statistics, number formatting and CLI settings.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{ExplorerError, Result};
