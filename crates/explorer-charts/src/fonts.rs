//! Font registration for chart text.
//!
//! Charts are rasterized with the pure-Rust glyph backend, which only knows
//! fonts registered at runtime. The first readable TrueType file from
//! [`FONT_ENV_VAR`] or a list of common system locations is registered as
//! `sans-serif`. Without one, charts are drawn without text.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};
use tracing::{debug, warn};

/// Environment variable naming a `.ttf` file to use for chart text.
pub const FONT_ENV_VAR: &str = "CORD_EXPLORER_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register a font once per process. Returns whether chart text can be
/// drawn.
pub fn text_available() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    *REGISTERED.get_or_init(register_first_available)
}

fn candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(custom) = std::env::var_os(FONT_ENV_VAR) {
        paths.push(PathBuf::from(custom));
    }
    paths.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
    paths
}

fn register_first_available() -> bool {
    for path in candidates() {
        if try_register(&path) {
            debug!("Registered chart font {}", path.display());
            return true;
        }
    }
    warn!("No usable TrueType font found; charts will be drawn without text (set {FONT_ENV_VAR})");
    false
}

fn try_register(path: &Path) -> bool {
    let Ok(bytes) = std::fs::read(path) else {
        return false;
    };
    // The glyph backend keeps a reference for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font("sans-serif", FontStyle::Normal, bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_file_is_rejected() {
        assert!(!try_register(Path::new("/definitely/not/a/font.ttf")));
    }

    #[test]
    fn test_candidates_include_system_paths() {
        let paths = candidates();
        assert!(paths.len() >= SYSTEM_FONTS.len());
    }

    #[test]
    fn test_text_available_is_stable() {
        assert_eq!(text_available(), text_available());
    }
}
