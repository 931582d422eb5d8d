use std::f64::consts::TAU;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Painter, Shape},
        Block, Borders, Paragraph, Widget, Wrap,
    },
};

use crate::config::Theme;
use crate::statistics::{share_percentages, CountryShare, Dashboard};

/// Radius of the pie in canvas units; bounds leave a small margin around it.
const RADIUS: f64 = 1.0;
const MARGIN: f64 = 1.1;
const LEGEND_WIDTH: u16 = 38;

/// Index of the slice under `(x, y)`, for slices laid out counterclockwise
/// from three o'clock. `None` outside the circle.
pub fn slice_at(cumulative: &[f64], x: f64, y: f64) -> Option<usize> {
    if x * x + y * y > RADIUS * RADIUS || cumulative.is_empty() {
        return None;
    }
    let fraction = y.atan2(x).rem_euclid(TAU) / TAU;
    cumulative
        .iter()
        .position(|end| fraction < *end)
        .or(Some(cumulative.len() - 1))
}

/// Running totals of the slice fractions, ending at 1.0.
pub fn cumulative_fractions(percentages: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    percentages
        .iter()
        .map(|pct| {
            acc += pct / 100.0;
            acc
        })
        .collect()
}

/// Canvas bounds that keep the pie round on a braille grid of `width` x
/// `height` cells. A braille cell holds 2x4 dots, and dots are square on a
/// typical terminal font.
pub fn canvas_bounds(width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    let dots_x = (width.max(1) as f64) * 2.0;
    let dots_y = (height.max(1) as f64) * 4.0;
    let unit = (2.0 * MARGIN / dots_x).max(2.0 * MARGIN / dots_y);
    let half_x = unit * dots_x / 2.0;
    let half_y = unit * dots_y / 2.0;
    ([-half_x, half_x], [-half_y, half_y])
}

/// Filled pie slices, painted point by point
struct PieSlices {
    cumulative: Vec<f64>,
    colors: Vec<Color>,
    step: f64,
}

impl Shape for PieSlices {
    fn draw(&self, painter: &mut Painter) {
        let steps = (2.0 * RADIUS / self.step).ceil() as i64;
        for i in 0..=steps {
            let x = -RADIUS + i as f64 * self.step;
            for j in 0..=steps {
                let y = -RADIUS + j as f64 * self.step;
                let Some(slice) = slice_at(&self.cumulative, x, y) else {
                    continue;
                };
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.colors[slice]);
                }
            }
        }
    }
}

/// "Top N Countries in YEAR" pie with its legend, or the empty-year notice.
pub struct PieChart<'a> {
    dashboard: &'a Dashboard,
    theme: &'a Theme,
    top_countries: usize,
}

impl<'a> PieChart<'a> {
    pub fn new(dashboard: &'a Dashboard, theme: &'a Theme, top_countries: usize) -> Self {
        Self {
            dashboard,
            theme,
            top_countries,
        }
    }

    fn legend(&self, shares: &[CountryShare]) -> Vec<Line<'static>> {
        share_percentages(shares)
            .into_iter()
            .zip(shares)
            .enumerate()
            .map(|(i, (pct, share))| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(self.theme.pie_color(i))),
                    Span::styled(
                        share.country.clone(),
                        Style::default().fg(self.theme.get("chart_text")),
                    ),
                    Span::styled(
                        format!(" {:.2}% ({})", pct, share.count),
                        Style::default().fg(self.theme.get("text_secondary")),
                    ),
                ])
            })
            .collect()
    }
}

impl Widget for PieChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("panel_border")))
            .title(" Top Year Producer Countries ")
            .title_bottom(
                Line::from(format!(
                    " Top {} Countries in {} ",
                    self.top_countries, self.dashboard.year
                ))
                .centered(),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        let shares = match self.dashboard.ranking_or_warning() {
            Ok(shares) => shares,
            Err(notice) => {
                Paragraph::new(notice.to_string())
                    .style(Style::default().fg(self.theme.get("warning")))
                    .wrap(Wrap { trim: true })
                    .centered()
                    .render(inner, buf);
                return;
            }
        };

        let legend_width = LEGEND_WIDTH.min(inner.width / 2);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(legend_width)])
            .split(inner);

        let (x_bounds, y_bounds) = canvas_bounds(chunks[0].width, chunks[0].height);
        let dots_x = (chunks[0].width.max(1) as f64) * 2.0;
        let slices = PieSlices {
            cumulative: cumulative_fractions(&share_percentages(shares)),
            colors: (0..shares.len()).map(|i| self.theme.pie_color(i)).collect(),
            step: (x_bounds[1] - x_bounds[0]) / dots_x / 2.0,
        };
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| ctx.draw(&slices))
            .render(chunks[0], buf);

        Paragraph::new(self.legend(shares))
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }
}
