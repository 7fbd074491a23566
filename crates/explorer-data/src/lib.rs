//! Data layer for the CORD-19 explorer.
//!
//! Loads the metadata CSV, cleans it into analysis-ready records, filters
//! it for the dashboard and computes the aggregate views shared by the
//! batch report and the dashboard.

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod exploration;
pub mod filter;
pub mod reader;

pub use explorer_core as core;
