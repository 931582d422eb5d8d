use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, StatefulWidget, Table, Widget},
};

use crate::config::Theme;
use crate::dataset::TitleTable;

const CELL_PADDING: u16 = 2;
/// Widest a single column may grow before its values are cut
const MAX_COLUMN_WIDTH: u16 = 48;

/// Scroll position of the full-table view
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DatasetViewState {
    pub start_row: usize,
    pub start_col: usize,
    /// Data rows that fit on screen, updated on every render
    pub visible_rows: usize,
}

impl DatasetViewState {
    pub fn scroll_rows(&mut self, delta: i64, total_rows: usize) {
        let max_start = total_rows.saturating_sub(self.visible_rows.max(1));
        let next = (self.start_row as i64).saturating_add(delta).max(0) as usize;
        self.start_row = next.min(max_start);
    }

    pub fn page_down(&mut self, total_rows: usize) {
        self.scroll_rows(self.visible_rows.max(1) as i64, total_rows);
    }

    pub fn page_up(&mut self, total_rows: usize) {
        self.scroll_rows(-(self.visible_rows.max(1) as i64), total_rows);
    }

    pub fn scroll_right(&mut self, total_cols: usize) {
        if self.start_col + 1 < total_cols {
            self.start_col += 1;
        }
    }

    pub fn scroll_left(&mut self) {
        self.start_col = self.start_col.saturating_sub(1);
    }

    pub fn to_top(&mut self) {
        self.start_row = 0;
    }

    pub fn to_bottom(&mut self, total_rows: usize) {
        self.scroll_rows(total_rows as i64, total_rows);
    }

    pub fn reset(&mut self) {
        *self = Self {
            visible_rows: self.visible_rows,
            ..Self::default()
        };
    }
}

/// Every row and column of the loaded file, scrollable in both directions.
pub struct DatasetView<'a> {
    table: &'a TitleTable,
    theme: &'a Theme,
}

impl<'a> DatasetView<'a> {
    pub fn new(table: &'a TitleTable, theme: &'a Theme) -> Self {
        Self { table, theme }
    }
}

impl StatefulWidget for DatasetView<'_> {
    type State = DatasetViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let total_rows = self.table.height();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("panel_border")))
            .title(" Check the complete dataset ")
            .title_bottom(
                Line::from(format!(
                    " rows {}-{} of {} ",
                    (state.start_row + 1).min(total_rows),
                    (state.start_row + state.visible_rows).min(total_rows),
                    total_rows
                ))
                .right_aligned(),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        // one line for the header
        state.visible_rows = inner.height.saturating_sub(1) as usize;
        state.scroll_rows(0, total_rows);

        let names = self.table.column_names();
        let end_row = (state.start_row + state.visible_rows).min(total_rows);

        let mut used_width = 0u16;
        let mut columns: Vec<(&str, u16)> = Vec::new();
        for name in names.iter().skip(state.start_col) {
            let content = (state.start_row..end_row)
                .map(|row| self.table.cell(row, name).chars().count())
                .max()
                .unwrap_or(0);
            let width = (content.max(name.chars().count()) as u16).min(MAX_COLUMN_WIDTH);
            if used_width + width > inner.width && !columns.is_empty() {
                break;
            }
            columns.push((name.as_str(), width.min(inner.width.saturating_sub(used_width))));
            used_width += width + CELL_PADDING;
        }

        let rows: Vec<Row> = (state.start_row..end_row)
            .map(|row| {
                Row::new(
                    columns
                        .iter()
                        .map(|(name, _)| Cell::from(self.table.cell(row, name).into_owned()))
                        .collect::<Vec<_>>(),
                )
                .style(Style::default().fg(self.theme.get("text_primary")))
            })
            .collect();

        let header = Row::new(
            columns
                .iter()
                .map(|(name, _)| Span::styled(name.to_string(), Style::default()))
                .collect::<Vec<_>>(),
        )
        .style(
            Style::default()
                .fg(self.theme.get("table_header"))
                .add_modifier(Modifier::BOLD),
        );

        Widget::render(
            Table::new(rows, columns.iter().map(|(_, w)| *w))
                .column_spacing(CELL_PADDING)
                .header(header),
            inner,
            buf,
        );
    }
}
