use std::time::Duration;

use crate::themes::Theme;
use explorer_core::formatting::format_count;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Dashboard header rendering three lines:
///
/// 1. Application title with accent decorations.
/// 2. A 60-column `=` separator.
/// 3. Data source and paper count in `[ source | N papers ]` format, with
///    `| loaded 12s ago` appended once the age of the data is known.
pub struct Header<'a> {
    /// Path of the metadata file being explored.
    pub source: &'a str,
    /// Papers in the cleaned table, `None` while nothing is loaded.
    pub papers: Option<usize>,
    /// Time since the file was last read.
    pub age: Option<Duration>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, papers: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            source,
            papers,
            age: None,
            theme,
        }
    }

    pub fn with_age(mut self, age: Option<Duration>) -> Self {
        self.age = age;
        self
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let papers = match self.papers {
            Some(n) => format!("{} papers", format_count(n)),
            None => "no data".to_string(),
        };

        let mut info = vec![
            Span::styled("[ ", self.theme.label),
            Span::styled(self.source.to_string(), self.theme.value),
            Span::styled(" | ", self.theme.label),
            Span::styled(papers, self.theme.value),
        ];
        if let Some(age) = self.age {
            info.push(Span::styled(" | ", self.theme.label));
            info.push(Span::styled(
                format!("loaded {} ago", format_age(age)),
                self.theme.dim,
            ));
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" CORD-19 DATA EXPLORER ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(info),
        ]
    }
}

/// `42s`, `3m 05s` or `2h 10m`.
fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!("{}h {:02}m", secs / 3600, secs % 3600 / 60),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
