//! Runtime layer for the CORD-19 explorer dashboard.
//!
//! Caches the cleaned dataset and holds the dashboard's filter state,
//! turning it into snapshots for the UI layer.

pub mod dataset_cache;
pub mod session;

pub use explorer_core as core;
pub use explorer_data as data;
