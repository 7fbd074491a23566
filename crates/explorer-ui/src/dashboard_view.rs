//! Interactive dashboard screen for the CORD-19 explorer.
//!
//! Renders one [`DashboardSnapshot`]: a metric row, the filter sidebar,
//! publication and abstract-length bar charts, journal and title-word
//! rankings, and the optional sample-data and summary panels.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use explorer_core::formatting::{format_count, format_share, format_stat};
use explorer_core::stats::Describe;
use explorer_runtime::session::DashboardSnapshot;

use crate::components::rank_bar::fit_width;
use crate::components::{MetricTile, RankBarConfig, RankBars};
use crate::themes::Theme;

const SIDEBAR_WIDTH: u16 = 34;
const METRIC_HEIGHT: u16 = 4;
const SUMMARY_HEIGHT: u16 = 12;
const MAX_LIST_HEIGHT: u16 = 22;

// ── FilterFocus ───────────────────────────────────────────────────────────────

/// The sidebar control that `←` / `→` currently adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFocus {
    FromYear,
    ToYear,
    Journal,
    SampleRows,
}

impl FilterFocus {
    pub const ORDER: [FilterFocus; 4] = [
        FilterFocus::FromYear,
        FilterFocus::ToYear,
        FilterFocus::Journal,
        FilterFocus::SampleRows,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterFocus::FromYear => "From year",
            FilterFocus::ToYear => "To year",
            FilterFocus::Journal => "Journal",
            FilterFocus::SampleRows => "Sample rows",
        }
    }
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the whole dashboard for `snapshot` into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    focus: FilterFocus,
    theme: &Theme,
) {
    let [metrics_area, body] =
        Layout::vertical([Constraint::Length(METRIC_HEIGHT), Constraint::Min(0)]).areas(area);
    render_metrics(frame, metrics_area, snapshot, theme);

    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).areas(body);
    frame.render_widget(
        Paragraph::new(Text::from(build_filter_lines(snapshot, focus, theme)))
            .block(panel("Filters", theme)),
        sidebar,
    );

    let list_rows = snapshot
        .top_journals
        .len()
        .max(snapshot.top_words.len())
        .max(1) as u16;
    let mut constraints = vec![
        Constraint::Min(10),
        Constraint::Length((list_rows + 2).min(MAX_LIST_HEIGHT)),
    ];
    if snapshot.show_sample {
        let rows = snapshot.sample.len().max(1) as u16;
        constraints.push(Constraint::Length(rows + 3));
    }
    if snapshot.show_summary {
        constraints.push(Constraint::Length(SUMMARY_HEIGHT));
    }
    let chunks = Layout::vertical(constraints).split(main);

    let [years_area, lengths_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(chunks[0]);
    render_yearly_chart(frame, years_area, snapshot, theme);
    render_length_histogram(frame, lengths_area, snapshot, theme);

    let [journals_area, words_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(chunks[1]);
    render_ranking(
        frame,
        journals_area,
        "Top Journals",
        &snapshot.top_journals,
        theme.bar_journals,
        theme,
    );
    render_ranking(
        frame,
        words_area,
        "Top Title Words",
        &snapshot.top_words,
        theme.bar_histogram,
        theme,
    );

    let mut next = 2;
    if snapshot.show_sample {
        render_sample_table(frame, chunks[next], snapshot, theme);
        next += 1;
    }
    if snapshot.show_summary {
        render_summary(frame, chunks[next], snapshot, theme);
    }
}

/// Render the error screen shown instead of the dashboard.
pub fn render_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Unable to show the dashboard", theme.error)),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.text)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'r' to retry, 'q' or Ctrl+C to exit",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.error)
                    .title(" CORD-19 Data Explorer "),
            ),
        area,
    );
}

// ── Sidebar ───────────────────────────────────────────────────────────────────

/// Filter rows followed by toggle states and key help.
pub fn build_filter_lines<'a>(
    snapshot: &DashboardSnapshot,
    focus: FilterFocus,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let (from, to) = match snapshot.years {
        Some(r) => (r.min.to_string(), r.max.to_string()),
        None => ("n/a".to_string(), "n/a".to_string()),
    };
    let values = [
        (FilterFocus::FromYear, from),
        (FilterFocus::ToYear, to),
        (FilterFocus::Journal, snapshot.journal.to_string()),
        (FilterFocus::SampleRows, snapshot.sample_rows.to_string()),
    ];

    let mut lines: Vec<Line<'a>> = values
        .into_iter()
        .map(|(field, value)| {
            let focused = field == focus;
            let marker = if focused { "▶ " } else { "  " };
            Line::from(vec![
                Span::styled(marker, theme.header_accent),
                Span::styled(format!("{:<12}", field.label()), theme.label),
                Span::styled(
                    format!("◀ {} ▶", fit_width(&value, 12).trim_end()),
                    theme.filter_style(focused),
                ),
            ])
        })
        .collect();

    if let Some((position, count)) = snapshot.journal_choice {
        lines.push(Line::from(Span::styled(
            format!("  {:<12}{} of {}", "", position, format_count(count)),
            theme.dim,
        )));
    }

    lines.push(Line::from(""));
    lines.push(toggle_line("s", "Sample data", snapshot.show_sample, theme));
    lines.push(toggle_line("d", "Summary", snapshot.show_summary, theme));
    lines.push(Line::from(""));
    for help in [
        "Tab/Shift-Tab  move focus",
        "←/→            adjust",
        "r              reload data",
        "q              quit",
    ] {
        lines.push(Line::from(Span::styled(help, theme.dim)));
    }
    lines
}

fn toggle_line<'a>(key: &'a str, label: &'a str, on: bool, theme: &'a Theme) -> Line<'a> {
    let (state, style) = if on {
        ("on", theme.success)
    } else {
        ("off", theme.dim)
    };
    Line::from(vec![
        Span::styled(format!("  [{key}] "), theme.info),
        Span::styled(format!("{label:<12}"), theme.label),
        Span::styled(state, style),
    ])
}

// ── Metrics ───────────────────────────────────────────────────────────────────

fn render_metrics(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let span = snapshot
        .time_span
        .map(|r| r.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    let tiles = [
        MetricTile::new("Total Papers", format_count(snapshot.total_papers), theme),
        MetricTile::new(
            "Filtered Papers",
            format!(
                "{} ({})",
                format_count(snapshot.filtered_papers),
                format_share(snapshot.filtered_papers, snapshot.total_papers)
            ),
            theme,
        ),
        MetricTile::new("Time Span", span, theme),
        MetricTile::new(
            "Unique Journals",
            format_count(snapshot.unique_journals),
            theme,
        ),
    ];

    let areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for (tile, cell) in tiles.iter().zip(areas.iter()) {
        frame.render_widget(
            Paragraph::new(Text::from(tile.to_lines())).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.block_border),
            ),
            *cell,
        );
    }
}

// ── Charts ────────────────────────────────────────────────────────────────────

fn render_yearly_chart(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let block = panel("Publications by Year", theme);
    if snapshot.yearly_counts.is_empty() {
        render_empty(frame, area, block, theme);
        return;
    }

    let labels: Vec<String> = snapshot
        .yearly_counts
        .iter()
        .map(|(year, _)| year.to_string())
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&snapshot.yearly_counts)
        .map(|(label, (_, count))| (label.as_str(), *count as u64))
        .collect();

    let inner = area.width.saturating_sub(2);
    let bar_width = fit_bar_width(inner, data.len(), 1, 6);

    frame.render_widget(
        BarChart::default()
            .block(block)
            .data(data.as_slice())
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(theme.bar_years)
            .value_style(theme.bar_value)
            .label_style(theme.label),
        area,
    );
}

fn render_length_histogram(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
) {
    let hist = &snapshot.abstract_lengths;
    let title = format!(
        "Abstract Length (0-{:.0} words, {:.0}/bar, {} above)",
        hist.upper,
        hist.bin_width(),
        format_count(hist.overflow)
    );
    let block = panel(&title, theme);
    if snapshot.filtered_papers == 0 {
        render_empty(frame, area, block, theme);
        return;
    }

    let data: Vec<(&str, u64)> = hist.counts.iter().map(|c| ("", *c as u64)).collect();
    let inner = area.width.saturating_sub(2);
    let bar_width = fit_bar_width(inner, data.len(), 0, 3);

    frame.render_widget(
        BarChart::default()
            .block(block)
            .data(data.as_slice())
            .bar_width(bar_width)
            .bar_gap(0)
            .bar_style(theme.bar_histogram)
            .value_style(theme.bar_histogram),
        area,
    );
}

/// Widest bar in `[1, max]` that fits `bars` bars with `gap` columns between.
fn fit_bar_width(inner: u16, bars: usize, gap: u16, max: u16) -> u16 {
    let bars = bars.max(1) as u16;
    (inner / bars).saturating_sub(gap).clamp(1, max)
}

fn render_ranking(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[(String, usize)],
    bar_style: ratatui::style::Style,
    theme: &Theme,
) {
    let block = panel(title, theme);
    if entries.is_empty() {
        render_empty(frame, area, block, theme);
        return;
    }

    // Rank prefix (4), separators (2) and the count column (8).
    let inner = area.width.saturating_sub(2) as usize;
    let free = inner.saturating_sub(14);
    let config = RankBarConfig {
        label_width: (free * 3 / 5).max(6),
        bar_width: (free * 2 / 5).max(1),
        ..RankBarConfig::default()
    };
    let lines = RankBars::new(entries, bar_style, theme)
        .with_config(config)
        .to_lines();
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

// ── Panels ────────────────────────────────────────────────────────────────────

fn render_sample_table(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let header = Row::new(
        ["Title", "Journal", "Year", "Abstract Words"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );

    let rows: Vec<Row> = snapshot
        .sample
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(row.title.clone()),
                Cell::from(row.journal.clone().unwrap_or_default()),
                Cell::from(row.year.to_string()),
                Cell::from(format_count(row.abstract_word_count)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(28),
        Constraint::Length(6),
        Constraint::Length(15),
    ];
    let title = format!("Sample Data ({} rows)", snapshot.sample.len());
    frame.render_widget(
        Table::new(rows, widths)
            .header(header)
            .block(panel(&title, theme))
            .style(theme.text),
        area,
    );
}

fn render_summary(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    let [stats_area, missing_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    let header = Row::new(
        ["", "year", "abstract_word_count"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    );
    let rows: Vec<Row> = describe_rows(
        snapshot.year_stats.as_ref(),
        snapshot.abstract_stats.as_ref(),
    )
    .into_iter()
    .enumerate()
    .map(|(i, (name, year, words))| {
        Row::new(vec![
            Cell::from(name).style(theme.label),
            Cell::from(year),
            Cell::from(words),
        ])
        .style(theme.row_style(i))
    })
    .collect();
    frame.render_widget(
        Table::new(
            rows,
            [
                Constraint::Length(7),
                Constraint::Length(12),
                Constraint::Length(20),
            ],
        )
        .header(header)
        .block(panel("Summary Statistics", theme)),
        stats_area,
    );

    let mut missing: Vec<Line> = snapshot
        .missing
        .iter()
        .map(|(column, count)| {
            Line::from(vec![
                Span::styled(format!("{:<10}", column.name()), theme.label),
                Span::styled(format_count(*count), theme.value),
            ])
        })
        .collect();
    if let Some(cleaning) = &snapshot.cleaning {
        missing.push(Line::from(""));
        missing.push(Line::from(Span::styled("Dropped while cleaning", theme.dim)));
        for (label, count) in [
            ("no title", cleaning.missing_title),
            ("bad date", cleaning.unparseable_date),
        ] {
            missing.push(Line::from(vec![
                Span::styled(format!("{label:<10}"), theme.label),
                Span::styled(format_count(count), theme.value),
            ]));
        }
    }
    frame.render_widget(
        Paragraph::new(Text::from(missing)).block(panel("Missing Values", theme)),
        missing_area,
    );
}

/// Rows of the describe table: `(statistic, year, abstract_word_count)`.
pub fn describe_rows(
    year: Option<&Describe>,
    words: Option<&Describe>,
) -> Vec<(&'static str, String, String)> {
    let year = describe_column(year);
    let words = describe_column(words);
    ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .into_iter()
        .zip(year.into_iter().zip(words))
        .map(|(name, (y, w))| (name, y, w))
        .collect()
}

fn describe_column(d: Option<&Describe>) -> [String; 8] {
    match d {
        Some(d) => [
            d.count.to_string(),
            format_stat(Some(d.mean)),
            format_stat(d.std),
            format_stat(Some(d.min)),
            format_stat(Some(d.p25)),
            format_stat(Some(d.p50)),
            format_stat(Some(d.p75)),
            format_stat(Some(d.max)),
        ],
        None => {
            let mut cells: [String; 8] = std::array::from_fn(|_| format_stat(None));
            cells[0] = "0".to_string();
            cells
        }
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn panel<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.block_border)
        .title(Span::styled(format!(" {title} "), theme.block_title))
}

fn render_empty(frame: &mut Frame, area: Rect, block: Block<'_>, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "No papers match the current filters",
            theme.dim,
        )))
        .block(block),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
