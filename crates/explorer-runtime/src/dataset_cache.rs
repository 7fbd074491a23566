//! Cleaned-dataset cache for the dashboard.
//!
//! Loading and cleaning the metadata file is the only expensive step of a
//! dashboard refresh, so the cleaned table is kept in memory keyed by the
//! file's path and modification time. A key mismatch triggers a reload; a
//! reload always produces the same table as a cold start.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use explorer_core::error::{ExplorerError, Result};
use explorer_core::models::CleanedTable;
use explorer_data::cleaner::{clean_with_report, CleaningReport};
use explorer_data::reader::load_raw_table;

/// Identity of a loaded data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub path: PathBuf,
    /// `None` on platforms that do not report modification times.
    pub modified: Option<SystemTime>,
}

impl CacheKey {
    /// Stat `path`. Fails with [`ExplorerError::DataSourceNotFound`] when it
    /// does not exist.
    pub fn for_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExplorerError::DataSourceNotFound(path.to_path_buf()),
            _ => ExplorerError::FileRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
        })
    }
}

struct CacheEntry {
    key: CacheKey,
    table: CleanedTable,
    cleaning: CleaningReport,
    loaded_at: Instant,
}

/// Single-entry cache of the cleaned table.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use explorer_runtime::dataset_cache::DatasetCache;
///
/// let mut cache = DatasetCache::new();
/// let table = cache.get(Path::new("data/metadata.csv")).unwrap();
/// println!("{} papers", table.len());
/// ```
#[derive(Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
    /// Number of times the file was actually read.
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the cleaned table for `path`, loading it when the cache is
    /// empty or keyed on a different path or modification time.
    ///
    /// On failure the previous entry is kept.
    pub fn get(&mut self, path: &Path) -> Result<&CleanedTable> {
        let key = CacheKey::for_path(path)?;

        let entry = match self.entry.take() {
            Some(entry) if entry.key == key => {
                tracing::debug!(path = %path.display(), "returning cached dataset");
                entry
            }
            stale => match self.load(key) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "dataset load failed; keeping previous cache");
                    self.entry = stale;
                    return Err(e);
                }
            },
        };

        Ok(&self.entry.insert(entry).table)
    }

    /// Discard the cached table so the next [`get`](Self::get) reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
        tracing::debug!("dataset cache invalidated");
    }

    /// Time since the cached table was loaded, or `None` when empty.
    pub fn cache_age(&self) -> Option<Duration> {
        self.entry.as_ref().map(|e| e.loaded_at.elapsed())
    }

    /// Cleaning counts for the cached table.
    pub fn cleaning_report(&self) -> Option<&CleaningReport> {
        self.entry.as_ref().map(|e| &e.cleaning)
    }

    pub fn load_count(&self) -> usize {
        self.loads
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn load(&mut self, key: CacheKey) -> Result<CacheEntry> {
        let raw = load_raw_table(&key.path)?;
        let (table, cleaning) = clean_with_report(&raw);
        self.loads += 1;
        tracing::debug!(
            rows = table.len(),
            loads = self.loads,
            "dataset cache updated"
        );
        Ok(CacheEntry {
            key,
            table,
            cleaning,
            loaded_at: Instant::now(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
