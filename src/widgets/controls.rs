use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

use crate::View;

const DASHBOARD_CONTROLS: [(&str, &str); 7] = [
    ("↑↓", "Year"),
    ("PgUp/PgDn", "±10"),
    ("Home/End", "First/Last"),
    ("0-9", "Type year"),
    ("d", "Dataset"),
    ("r", "Reload"),
    ("q", "Quit"),
];

const DATASET_CONTROLS: [(&str, &str); 6] = [
    ("↑↓", "Scroll"),
    ("←→", "Columns"),
    ("PgUp/PgDn", "Page"),
    ("Home/End", "Top/Bottom"),
    ("d", "Dashboard"),
    ("q", "Quit"),
];

/// Key hints bar at the bottom of the screen
pub struct Controls {
    pub view: View,
    pub row_count: Option<usize>,
    pub bg: Color,
    pub key_fg: Color,
}

impl Controls {
    pub fn new(view: View) -> Self {
        Self {
            view,
            row_count: None,
            bg: Color::DarkGray,
            key_fg: Color::Reset,
        }
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_colors(mut self, bg: Color, key_fg: Color) -> Self {
        self.bg = bg;
        self.key_fg = key_fg;
        self
    }

    fn controls(&self) -> &'static [(&'static str, &'static str)] {
        match self.view {
            View::Dashboard => &DASHBOARD_CONTROLS,
            View::Dataset => &DATASET_CONTROLS,
        }
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controls = self.controls();
        let mut constraints = controls.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        if self.row_count.is_some() {
            constraints.push(Constraint::Length(15)); // "Rows: 12345"
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let base_style = Style::default();

        for (i, (key, action)) in controls.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.fg(self.key_fg).add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(self.bg))
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = controls.len() * 2;
        if let Some(count) = self.row_count {
            Paragraph::new(format!("Rows: {}", count))
                .style(base_style.bg(self.bg).fg(Color::White))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(self.bg))
            .render(layout[fill_start_idx], buf);
    }
}
