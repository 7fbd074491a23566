//! PNG rendering of the batch report charts.

use std::path::{Path, PathBuf};

use explorer_core::error::{ExplorerError, Result};
use explorer_data::analysis::AnalysisResult;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::fonts;

pub const PUBLICATIONS_BY_YEAR: &str = "publications_by_year.png";
pub const TOP_JOURNALS: &str = "top_journals.png";
pub const TITLE_WORDCLOUD: &str = "title_wordcloud.png";
pub const PAPERS_BY_JOURNAL: &str = "papers_by_journal.png";

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

const CLOUD_PALETTE: [RGBColor; 6] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(229, 107, 93),
    RGBColor(253, 174, 97),
];

const FONT: &str = "sans-serif";

// ── Public API ────────────────────────────────────────────────────────────────

/// Write the four report charts into `out_dir`, creating it if needed.
///
/// Returns the written paths in a fixed order: publications by year, top
/// journals, title word cloud, papers by journal.
pub fn export_charts(result: &AnalysisResult, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let text = fonts::text_available();

    let yearly: Vec<(String, usize)> = result
        .yearly_counts
        .iter()
        .map(|(year, count)| (year.to_string(), *count))
        .collect();

    let charts = [
        PUBLICATIONS_BY_YEAR,
        TOP_JOURNALS,
        TITLE_WORDCLOUD,
        PAPERS_BY_JOURNAL,
    ];
    let paths: Vec<PathBuf> = charts.iter().map(|name| out_dir.join(name)).collect();

    draw_column_chart(
        &paths[0],
        &BarChart {
            title: "Number of COVID-19 Publications by Year",
            x_desc: "Year",
            y_desc: "Number of Publications",
            bars: &yearly,
            color: SKY_BLUE,
        },
        text,
    )?;
    draw_horizontal_chart(
        &paths[1],
        &BarChart {
            title: "Top 10 Journals Publishing COVID-19 Research",
            x_desc: "Number of Publications",
            y_desc: "",
            bars: &result.top_journals,
            color: LIGHT_CORAL,
        },
        text,
    )?;
    draw_word_cloud(&paths[2], &result.cloud_words, text)?;
    draw_column_chart(
        &paths[3],
        &BarChart {
            title: "Distribution of Papers by Journal (Top 15)",
            x_desc: "Journal",
            y_desc: "Number of Papers",
            bars: &result.papers_by_journal,
            color: LIGHT_GREEN,
        },
        text,
    )?;

    info!("Visualizations saved to {}", out_dir.display());
    Ok(paths)
}

// ── Chart renderers ───────────────────────────────────────────────────────────

struct BarChart<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    bars: &'a [(String, usize)],
    color: RGBColor,
}

impl BarChart<'_> {
    /// Upper end of the value axis, never zero so empty charts still have a frame.
    fn value_max(&self) -> f64 {
        let max = self.bars.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
        max as f64 * 1.05
    }

    fn slots(&self) -> i32 {
        self.bars.len().max(1) as i32
    }

    fn label(&self, value: &SegmentValue<i32>, max_chars: usize) -> String {
        match value {
            SegmentValue::CenterOf(i) => usize::try_from(*i)
                .ok()
                .and_then(|i| self.bars.get(i))
                .map(|(label, _)| shorten(label, max_chars))
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

fn draw_column_chart(path: &Path, chart: &BarChart<'_>, text: bool) -> Result<()> {
    let root = BitMapBackend::new(path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if text {
        builder
            .caption(chart.title, (FONT, 28.0))
            .x_label_area_size(70)
            .y_label_area_size(70);
    }
    let mut ctx = builder
        .build_cartesian_2d((0..chart.slots()).into_segmented(), 0f64..chart.value_max())
        .map_err(chart_error)?;

    if text {
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(chart.bars.len().max(1))
            .x_label_formatter(&|v| chart.label(v, 14))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .x_desc(chart.x_desc)
            .y_desc(chart.y_desc)
            .label_style((FONT, 13.0))
            .draw()
            .map_err(chart_error)?;
    }

    ctx.draw_series(chart.bars.iter().enumerate().map(|(i, (_, count))| {
        let x = i as i32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(x), 0.0),
                (SegmentValue::Exact(x + 1), *count as f64),
            ],
            chart.color.filled(),
        );
        bar.set_margin(0, 0, 4, 4);
        bar
    }))
    .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Bars run left to right; the first bar is drawn at the top.
fn draw_horizontal_chart(path: &Path, chart: &BarChart<'_>, text: bool) -> Result<()> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let slots = chart.slots();
    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if text {
        builder
            .caption(chart.title, (FONT, 28.0))
            .x_label_area_size(50)
            .y_label_area_size(320);
    }
    let mut ctx = builder
        .build_cartesian_2d(0f64..chart.value_max(), (0..slots).into_segmented())
        .map_err(chart_error)?;

    // Rank 0 sits in the highest slot.
    let flip = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => SegmentValue::CenterOf(slots - 1 - i),
        other => other.clone(),
    };

    if text {
        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(chart.bars.len().max(1))
            .y_label_formatter(&|v| chart.label(&flip(v), 40))
            .x_label_formatter(&|v| format!("{v:.0}"))
            .x_desc(chart.x_desc)
            .label_style((FONT, 13.0))
            .draw()
            .map_err(chart_error)?;
    }

    ctx.draw_series(chart.bars.iter().enumerate().map(|(i, (_, count))| {
        let y = slots - 1 - i as i32;
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(y)),
                (*count as f64, SegmentValue::Exact(y + 1)),
            ],
            chart.color.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))
    .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

const CLOUD_PADDING: i32 = 16;
const CLOUD_GAP: i32 = 10;
const CLOUD_MIN_FONT: f64 = 14.0;
const CLOUD_MAX_FONT: f64 = 64.0;

/// Flow layout: words in descending frequency, font size scaled by the
/// square root of relative frequency, wrapping at the right edge and
/// stopping at the bottom edge.
fn draw_word_cloud(path: &Path, words: &[(String, usize)], text: bool) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;
    let titled;
    let area = if text {
        titled = root
            .titled("Word Cloud of Paper Titles", (FONT, 24.0))
            .map_err(chart_error)?;
        &titled
    } else {
        &root
    };

    let (width, height) = area.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);
    let max_count = words.first().map(|(_, c)| *c).unwrap_or(1).max(1) as f64;

    let (mut x, mut y, mut line_height) = (CLOUD_PADDING, CLOUD_PADDING, 0);
    for (i, (word, count)) in words.iter().enumerate() {
        let size = CLOUD_MIN_FONT
            + (CLOUD_MAX_FONT - CLOUD_MIN_FONT) * (*count as f64 / max_count).sqrt();
        let color = CLOUD_PALETTE[i % CLOUD_PALETTE.len()];
        let style = (FONT, size).into_font().color(&color);

        let (w, h) = if text {
            let (w, h) = area.estimate_text_size(word, &style).map_err(chart_error)?;
            (w as i32, h as i32)
        } else {
            block_size(word, size)
        };

        if x + w > width - CLOUD_PADDING && x > CLOUD_PADDING {
            x = CLOUD_PADDING;
            y += line_height + CLOUD_GAP;
            line_height = 0;
        }
        if y + h > height - CLOUD_PADDING {
            break;
        }

        if text {
            area.draw(&Text::new(word.clone(), (x, y), style))
                .map_err(chart_error)?;
        } else {
            area.draw(&Rectangle::new([(x, y), (x + w, y + h)], color.filled()))
                .map_err(chart_error)?;
        }

        x += w + CLOUD_GAP;
        line_height = line_height.max(h);
    }

    root.present().map_err(chart_error)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn chart_error(e: impl std::fmt::Display) -> ExplorerError {
    ExplorerError::Chart(e.to_string())
}

/// Approximate footprint of `word` at `size` when no font is available.
fn block_size(word: &str, size: f64) -> (i32, i32) {
    let chars = word.chars().count().max(1) as f64;
    ((chars * size * 0.55).round() as i32, size.round() as i32)
}

fn shorten(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::models::{RawRecord, RawTable, KEY_COLUMNS};
    use explorer_data::analysis::{analyze, AnalysisOptions};
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = b"\x89PNG";

    fn record(title: &str, publish_time: &str, journal: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            abstract_text: Some("a short abstract about the virus".to_string()),
            publish_time: Some(publish_time.to_string()),
            journal: Some(journal.to_string()),
            ..Default::default()
        }
    }

    fn result(records: Vec<RawRecord>) -> AnalysisResult {
        let raw = RawTable::new(KEY_COLUMNS.iter().map(|c| c.to_string()).collect(), records);
        analyze(&raw, &AnalysisOptions::default())
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC), "{} is not a PNG", path.display());
    }

    #[test]
    fn test_export_writes_four_pngs_into_new_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("visualizations");
        let result = result(vec![
            record("Covid-19 Study of the Virus", "2020-03-01", "Lancet"),
            record("New Virus Study", "2021", "BMJ"),
            record("Vaccine trial results", "2020-07-12", "Lancet"),
        ]);

        let paths = export_charts(&result, &out).unwrap();

        let names: Vec<&str> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                PUBLICATIONS_BY_YEAR,
                TOP_JOURNALS,
                TITLE_WORDCLOUD,
                PAPERS_BY_JOURNAL
            ]
        );
        for path in &paths {
            assert_png(path);
        }
    }

    #[test]
    fn test_export_empty_result_still_renders() {
        let dir = TempDir::new().unwrap();
        let paths = export_charts(&result(vec![]), dir.path()).unwrap();
        assert_eq!(paths.len(), 4);
        for path in &paths {
            assert_png(path);
        }
    }

    #[test]
    fn test_export_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        assert!(export_charts(&result(vec![]), &blocker).is_err());
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("Lancet", 14), "Lancet");
        assert_eq!(shorten("Journal of Virology Methods", 10), "Journal...");
    }

    #[test]
    fn test_block_size_scales_with_font() {
        let small = block_size("virus", 14.0);
        let large = block_size("virus", 64.0);
        assert!(large.0 > small.0);
        assert!(large.1 > small.1);
    }
}
