//! Chart export for the CORD-19 explorer batch report.
//!
//! Renders the analysis aggregates to PNG files with `plotters`.

pub mod export;
pub mod fonts;

pub use export::export_charts;
