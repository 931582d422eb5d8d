use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::config::Theme;
use crate::year_selector::YearSelector;

pub const ABOUT: &str = "Interactive project that loads a dataset with information about \
Netflix movies and series, extracts some insights and displays them as charts.";

pub const DATA_SOURCE: &str = "Data extracted from: https://www.kaggle.com/datasets/shivamb/netflix-shows \
(with some cleaning and modifications)";

/// What the sidebar knows about the loaded file
#[derive(Debug, Clone, Copy)]
pub struct SourceInfo<'a> {
    pub path: &'a Path,
    pub rows: Option<usize>,
}

pub struct Sidebar<'a> {
    selector: &'a YearSelector,
    source: Option<SourceInfo<'a>>,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(selector: &'a YearSelector, theme: &'a Theme) -> Self {
        Self {
            selector,
            source: None,
            theme,
        }
    }

    pub fn with_source(mut self, source: SourceInfo<'a>) -> Self {
        self.source = Some(source);
        self
    }

    fn year_lines(&self) -> Vec<Line<'static>> {
        let value_style = Style::default()
            .fg(self.theme.get("metric_value"))
            .add_modifier(Modifier::BOLD);
        let hint_style = Style::default().fg(self.theme.get("dimmed"));

        let value = match self.selector.input() {
            Some(typed) => Line::from(vec![
                Span::styled(format!("{}_", typed), value_style),
                Span::styled("  Enter to apply", hint_style),
            ]),
            None => Line::from(Span::styled(self.selector.year().to_string(), value_style)),
        };
        let range = match self.selector.bounds() {
            Some((min, max)) => format!("{} - {}", min, max),
            None => "no release years loaded".to_string(),
        };
        vec![value, Line::from(Span::styled(range, hint_style))]
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::default().fg(self.theme.get("panel_border"));
        let text_style = Style::default().fg(self.theme.get("text_primary"));
        let secondary = Style::default().fg(self.theme.get("text_secondary"));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(4),
                Constraint::Length(4),
            ])
            .split(area);

        let about = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" About ");
        Paragraph::new(vec![
            Line::from(Span::styled(ABOUT, text_style)),
            Line::from(""),
            Line::from(Span::styled(DATA_SOURCE, secondary)),
        ])
        .block(about)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

        let year_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("primary")))
            .title(" Select a year ");
        Paragraph::new(self.year_lines())
            .block(year_block)
            .render(chunks[1], buf);

        let source_block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Source ");
        let source_lines = match self.source {
            Some(info) => {
                let rows = info
                    .rows
                    .map(|n| format!("{} rows", n))
                    .unwrap_or_else(|| "loading...".to_string());
                vec![
                    Line::from(Span::styled(info.path.display().to_string(), secondary)),
                    Line::from(Span::styled(rows, secondary)),
                ]
            }
            None => vec![Line::from(Span::styled("no file", secondary))],
        };
        Paragraph::new(source_lines)
            .block(source_block)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
    }
}
