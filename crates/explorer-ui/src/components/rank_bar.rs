use crate::themes::Theme;
use explorer_core::formatting::format_count;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Configuration controlling the visual appearance of a ranked bar list.
pub struct RankBarConfig {
    /// Width in terminal columns of the label column.
    pub label_width: usize,
    /// Width in terminal columns of the bar at its longest.
    pub bar_width: usize,
    pub filled_char: char,
}

impl Default for RankBarConfig {
    fn default() -> Self {
        Self {
            label_width: 28,
            bar_width: 24,
            filled_char: '\u{2588}', // █  FULL BLOCK
        }
    }
}

/// A ranked `(label, count)` list rendered as one line per entry:
///
/// ```text
///  1. Lancet                       ████████████████████████ 1,204
///  2. BMJ                          ██████████               512
/// ```
///
/// Bar lengths are relative to the first entry's count.
pub struct RankBars<'a> {
    pub entries: &'a [(String, usize)],
    pub bar_style: Style,
    pub theme: &'a Theme,
    pub config: RankBarConfig,
}

impl<'a> RankBars<'a> {
    pub fn new(entries: &'a [(String, usize)], bar_style: Style, theme: &'a Theme) -> Self {
        Self {
            entries,
            bar_style,
            theme,
            config: RankBarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RankBarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let max = self.entries.iter().map(|(_, c)| *c).max().unwrap_or(0);
        let len = self.entries.len();

        self.entries
            .iter()
            .enumerate()
            .map(|(rank, (label, count))| {
                let filled = bar_length(*count, max, self.config.bar_width);
                let bar: String = std::iter::repeat_n(self.config.filled_char, filled).collect();
                let pad = " ".repeat(self.config.bar_width - filled);

                Line::from(vec![
                    Span::styled(format!("{:>2}. ", rank + 1), self.theme.dim),
                    Span::styled(
                        fit_width(label, self.config.label_width),
                        self.theme.rank_style(rank, len),
                    ),
                    Span::raw(" "),
                    Span::styled(bar, self.bar_style),
                    Span::raw(pad),
                    Span::styled(format!(" {}", format_count(*count)), self.theme.value),
                ])
            })
            .collect()
    }
}

/// Bar length proportional to `count / max`, at least one cell for a
/// non-zero count.
fn bar_length(count: usize, max: usize, width: usize) -> usize {
    if max == 0 || count == 0 {
        return 0;
    }
    let scaled = (count as f64 / max as f64 * width as f64).round() as usize;
    scaled.clamp(1, width)
}

/// Truncate or pad `text` to exactly `width` display columns.
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let pad = width - text.width();
        return format!("{text}{}", " ".repeat(pad));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
