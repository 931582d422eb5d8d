use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::config::Theme;
use crate::statistics::SummaryStatistics;

const ABSENT: &str = "n/a";

/// Label and display value of each headline metric, in display order.
pub fn metric_values(summary: &SummaryStatistics) -> [(&'static str, String); 5] {
    let year = |y: Option<i64>| y.map(|y| y.to_string()).unwrap_or_else(|| ABSENT.to_string());
    [
        ("Min Release Year", year(summary.min_year)),
        ("Max Release Year", year(summary.max_year)),
        (
            "Missing Dir. Names",
            summary.missing_director_count.to_string(),
        ),
        ("Countries", summary.distinct_country_count.to_string()),
        (
            "Avg Title Length",
            summary
                .avg_title_length
                .map(|avg| format!("{:.2}", avg))
                .unwrap_or_else(|| ABSENT.to_string()),
        ),
    ]
}

/// The "Basic Information" row: five labeled scalars side by side.
pub struct MetricsRow<'a> {
    summary: &'a SummaryStatistics,
    theme: &'a Theme,
}

impl<'a> MetricsRow<'a> {
    pub fn new(summary: &'a SummaryStatistics, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for MetricsRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("panel_border")))
            .title(" Basic Information ");
        let inner = block.inner(area);
        block.render(area, buf);

        let metrics = metric_values(self.summary);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, metrics.len() as u32); 5])
            .split(inner);

        let label_style = Style::default().fg(self.theme.get("text_secondary"));
        let value_style = Style::default()
            .fg(self.theme.get("metric_value"))
            .add_modifier(Modifier::BOLD);

        for ((label, value), cell) in metrics.iter().zip(columns.iter()) {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1)])
                .split(*cell);
            Paragraph::new(*label)
                .style(label_style)
                .centered()
                .render(rows[0], buf);
            Paragraph::new(value.as_str())
                .style(value_style)
                .centered()
                .render(rows[1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_values_format() {
        let summary = SummaryStatistics {
            min_year: Some(1925),
            max_year: Some(2021),
            missing_director_count: 2634,
            distinct_country_count: 748,
            avg_title_length: Some(17.73456),
        };
        let values = metric_values(&summary);
        assert_eq!(values[0], ("Min Release Year", "1925".to_string()));
        assert_eq!(values[1].1, "2021");
        assert_eq!(values[2].1, "2634");
        assert_eq!(values[3].1, "748");
        assert_eq!(values[4], ("Avg Title Length", "17.73".to_string()));
    }

    #[test]
    fn test_metric_values_when_absent() {
        let summary = SummaryStatistics {
            min_year: None,
            max_year: None,
            missing_director_count: 0,
            distinct_country_count: 0,
            avg_title_length: None,
        };
        let values = metric_values(&summary);
        assert_eq!(values[0].1, "n/a");
        assert_eq!(values[4].1, "n/a");
        assert_eq!(values[2].1, "0");
    }
}
