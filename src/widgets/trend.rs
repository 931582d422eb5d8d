use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};

use crate::config::Theme;
use crate::error::TrendError;
use crate::statistics::YearDuration;

/// Axis bounds and three labels (low, middle, high) for a span of values.
/// A single value is widened by one unit on each side so the axis is not empty.
pub fn axis_bounds(min: f64, max: f64, precision: usize) -> ([f64; 2], Vec<String>) {
    let (low, high) = if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    };
    let labels = [low, (low + high) / 2.0, high]
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect();
    ([low, high], labels)
}

/// Line chart of mean movie duration per release year.
pub struct TrendChart<'a> {
    trend: &'a Result<Vec<YearDuration>, TrendError>,
    theme: &'a Theme,
}

impl<'a> TrendChart<'a> {
    pub fn new(trend: &'a Result<Vec<YearDuration>, TrendError>, theme: &'a Theme) -> Self {
        Self { trend, theme }
    }

    fn render_error(&self, err: &TrendError, area: Rect, buf: &mut Buffer) {
        let error_style = Style::default().fg(self.theme.get("error"));
        let mut lines = vec![Line::from(Span::styled(
            format!("Cannot compute durations: {}", err),
            error_style.add_modifier(Modifier::BOLD),
        ))];
        lines.extend(err.offending_rows().iter().map(|row| {
            Line::from(Span::styled(
                format!("  {}", row),
                Style::default().fg(self.theme.get("text_secondary")),
            ))
        }));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("panel_border")))
            .title(" Avg Duration of Movies by Year ");

        let trend = match self.trend {
            Ok(trend) => trend,
            Err(err) => {
                let inner = block.inner(area);
                block.render(area, buf);
                self.render_error(err, inner, buf);
                return;
            }
        };

        if trend.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new("no movies")
                .style(Style::default().fg(self.theme.get("dimmed")))
                .centered()
                .render(inner, buf);
            return;
        }

        let points: Vec<(f64, f64)> = trend
            .iter()
            .map(|d| (d.year as f64, d.mean_minutes))
            .collect();
        let (x_min, x_max) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
        let (y_min, y_max) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
        let (x_bounds, x_labels) = axis_bounds(x_min, x_max, 0);
        let (y_bounds, y_labels) = axis_bounds(y_min.floor(), y_max.ceil(), 0);

        let text_style = Style::default().fg(self.theme.get("chart_text"));
        let datasets = vec![
            Dataset::default()
                .name("mean minutes")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.get("chart_accent")))
                .data(&points),
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(self.theme.get("chart_marker")))
                .data(&points),
        ];

        Chart::new(datasets)
            .block(block.title_bottom(
                Line::from(" Average Duration of Movies Across Years ").centered(),
            ))
            .style(Style::default().bg(self.theme.get("chart_background")))
            .x_axis(
                Axis::default()
                    .title("Year")
                    .style(text_style)
                    .bounds(x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Duration (Minutes)")
                    .style(text_style)
                    .bounds(y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}
