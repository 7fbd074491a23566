use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Application directory under the user's home.
fn app_dir_in(home: &Path) -> PathBuf {
    home.join(".cord-explorer")
}

/// Ensure `~/.cord-explorer/` and `~/.cord-explorer/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

fn ensure_directories_in(home: &Path) -> anyhow::Result<()> {
    let app_dir = app_dir_in(home);
    std::fs::create_dir_all(&app_dir)?;
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(())
}

/// Where log output goes: `--log-file` when given, otherwise
/// `~/.cord-explorer/logs/cord-explorer.log` for the dashboard. `None`
/// means stderr.
pub fn log_file_path(explicit: Option<&PathBuf>, dashboard: bool) -> Option<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    log_file_path_in(&home, explicit, dashboard)
}

fn log_file_path_in(home: &Path, explicit: Option<&PathBuf>, dashboard: bool) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.clone()),
        None if dashboard => Some(app_dir_in(home).join("logs").join("cord-explorer.log")),
        None => None,
    }
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to an [`EnvFilter`] directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber, writing to `log_file` when
/// set and to stderr otherwise.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
