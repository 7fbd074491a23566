use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore CORD-19 research-paper metadata
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cord-explorer",
    about = "Explore CORD-19 research-paper metadata",
    version
)]
pub struct Settings {
    /// Run mode: one-shot report with chart export, or interactive dashboard
    #[arg(long, default_value = "report", value_parser = ["report", "dashboard"])]
    pub mode: String,

    /// Path to the metadata CSV file
    #[arg(long, default_value = "data/metadata.csv")]
    pub data: PathBuf,

    /// Directory the report writes its charts into
    #[arg(long, default_value = "visualizations")]
    pub output_dir: PathBuf,

    /// Number of journals in the top-journals chart
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub top_journals: u32,

    /// Number of title words in the word-frequency table
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..=200))]
    pub top_words: u32,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (dashboard default: ~/.cord-explorer/logs/cord-explorer.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    pub fn is_dashboard(&self) -> bool {
        self.mode == "dashboard"
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.cord-explorer/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_journals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_words: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".cord-explorer").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> crate::error::Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. 'mode' is never loaded from last-used.
        if !is_arg_explicitly_set(&matches, "data") {
            if let Some(v) = last.data {
                settings.data = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "output_dir") {
            if let Some(v) = last.output_dir {
                settings.output_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_journals") {
            if let Some(v) = last.top_journals {
                settings.top_journals = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_words") {
            if let Some(v) = last.top_words {
                settings.top_words = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("could not persist settings: {}", e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data: Some(s.data.clone()),
            output_dir: Some(s.output_dir.clone()),
            theme: Some(s.theme.clone()),
            top_journals: Some(s.top_journals),
            top_words: Some(s.top_words),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data: Some(PathBuf::from("/data/cord19/metadata.csv")),
            output_dir: Some(PathBuf::from("charts")),
            theme: Some("dark".to_string()),
            top_journals: Some(12),
            top_words: Some(30),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(
            loaded.data,
            Some(PathBuf::from("/data/cord19/metadata.csv"))
        );
        assert_eq!(loaded.output_dir, Some(PathBuf::from("charts")));
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.top_journals, Some(12));
        assert_eq!(loaded.top_words, Some(30));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.data.is_none());
        assert!(loaded.theme.is_none());
        assert!(loaded.top_words.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.theme.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── Settings parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["cord-explorer"]);

        assert_eq!(settings.mode, "report");
        assert!(!settings.is_dashboard());
        assert_eq!(settings.data, PathBuf::from("data/metadata.csv"));
        assert_eq!(settings.output_dir, PathBuf::from("visualizations"));
        assert_eq!(settings.top_journals, 10);
        assert_eq!(settings.top_words, 20);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_dashboard_mode() {
        let settings = Settings::parse_from(["cord-explorer", "--mode", "dashboard"]);
        assert!(settings.is_dashboard());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_mode() {
        let result = Settings::try_parse_from(["cord-explorer", "--mode", "server"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_rejects_zero_top_words() {
        let result = Settings::try_parse_from(["cord-explorer", "--top-words", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_settings_to_last_used() {
        let settings = Settings::parse_from([
            "cord-explorer",
            "--data",
            "papers.csv",
            "--theme",
            "classic",
            "--top-journals",
            "15",
        ]);
        let last = LastUsedParams::from(&settings);
        assert_eq!(last.data, Some(PathBuf::from("papers.csv")));
        assert_eq!(last.theme, Some("classic".to_string()));
        assert_eq!(last.top_journals, Some(15));
        assert_eq!(last.top_words, Some(20));
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data: Some(PathBuf::from("saved.csv")),
            theme: Some("dark".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["cord-explorer".into()], &config_path);
        assert_eq!(settings.data, PathBuf::from("saved.csv"));
        assert_eq!(settings.theme, "dark");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data: Some(PathBuf::from("saved.csv")),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["cord-explorer".into(), "--data".into(), "fresh.csv".into()],
            &config_path,
        );
        assert_eq!(settings.data, PathBuf::from("fresh.csv"));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        Settings::load_with_last_used_impl(
            vec!["cord-explorer".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            vec!["cord-explorer".into(), "--debug".into()],
            &tmp_config_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["cord-explorer".into(), "--top-words".into(), "25".into()],
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.top_words, Some(25));
    }
}
