use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// A labelled headline number, as shown in the dashboard's metric row.
pub struct MetricTile<'a> {
    pub label: &'a str,
    pub value: String,
    pub theme: &'a Theme,
}

impl<'a> MetricTile<'a> {
    pub fn new(label: &'a str, value: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            label,
            value: value.into(),
            theme,
        }
    }

    /// Two lines: the label, then the value.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(self.label, self.theme.label)),
            Line::from(Span::styled(self.value.clone(), self.theme.value)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_tile_lines() {
        let theme = Theme::dark();
        let lines = MetricTile::new("Total Papers", "1,234", &theme).to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "Total Papers");
        assert_eq!(lines[1].spans[0].content, "1,234");
        assert_eq!(lines[1].spans[0].style, theme.value);
    }
}
