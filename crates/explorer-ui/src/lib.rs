//! Terminal UI layer for the CORD-19 explorer.
//!
//! Provides themes, header, metric and ranked-bar components, the dashboard
//! view, and the application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod themes;

pub use app::App;
pub use explorer_core as core;
