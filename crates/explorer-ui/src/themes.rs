use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        return background_from_colorfgbg(&val);
    }
    BackgroundType::Dark
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Dark,
    }
}

/// Every style the dashboard draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Filters ──────────────────────────────────────────────────────────────
    /// The filter row that arrow keys currently adjust.
    pub focused: Style,
    pub block_border: Style,
    pub block_title: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub bar_years: Style,
    pub bar_journals: Style,
    pub bar_histogram: Style,
    pub bar_value: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focused: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            block_border: Style::default().fg(Color::DarkGray),
            block_title: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            bar_years: Style::default().fg(Color::LightBlue),
            bar_journals: Style::default().fg(Color::LightRed),
            bar_histogram: Style::default().fg(Color::LightGreen),
            bar_value: Style::default().fg(Color::Black).bg(Color::LightBlue),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focused: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            block_border: Style::default().fg(Color::Gray),
            block_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            bar_years: Style::default().fg(Color::Blue),
            bar_journals: Style::default().fg(Color::Red),
            bar_histogram: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::White).bg(Color::Blue),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette,
    /// without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            focused: Style::default().fg(Color::Black).bg(Color::White),
            block_border: Style::default().fg(Color::DarkGray),
            block_title: Style::default().fg(Color::Yellow),

            bar_years: Style::default().fg(Color::Cyan),
            bar_journals: Style::default().fg(Color::Red),
            bar_histogram: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Cyan),

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Row style for zebra-striped tables.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }

    /// Style for a ranked list entry: the leader is emphasised, the tail dimmed.
    pub fn rank_style(&self, rank: usize, len: usize) -> Style {
        if rank == 0 {
            self.value
        } else if len > 3 && rank >= len * 3 / 4 {
            self.label
        } else {
            self.text
        }
    }

    /// Style for a filter row depending on focus.
    pub fn filter_style(&self, focused: bool) -> Style {
        if focused {
            self.focused
        } else {
            self.text
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.success.fg, Some(Color::Green));
        assert_eq!(t.error.fg, Some(Color::Red));
        assert_eq!(t.bar_years.fg, Some(Color::LightBlue));
        assert_eq!(t.focused.bg, Some(Color::Cyan));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(!t.block_title.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert_eq!(Theme::from_name("classic").focused.bg, Some(Color::White));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    // ── background detection ─────────────────────────────────────────────────

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("garbage"), BackgroundType::Dark);
    }

    // ── helpers ──────────────────────────────────────────────────────────────

    #[test]
    fn test_row_style_alternates() {
        let t = Theme::dark();
        assert_eq!(t.row_style(0), t.table_row);
        assert_eq!(t.row_style(1), t.table_row_alt);
        assert_eq!(t.row_style(2), t.table_row);
    }

    #[test]
    fn test_rank_style() {
        let t = Theme::dark();
        assert_eq!(t.rank_style(0, 20), t.value);
        assert_eq!(t.rank_style(5, 20), t.text);
        assert_eq!(t.rank_style(19, 20), t.label);
        assert_eq!(t.rank_style(2, 3), t.text);
    }

    #[test]
    fn test_filter_style() {
        let t = Theme::dark();
        assert_eq!(t.filter_style(true), t.focused);
        assert_eq!(t.filter_style(false), t.text);
    }
}
