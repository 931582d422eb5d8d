use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

/// Counters behind the `--debug` status line
#[derive(Debug, Default)]
pub struct DebugState {
    pub enabled: bool,
    pub events: usize,
    pub frames: usize,
    pub keys: usize,
    pub last_key: Option<KeyCode>,
    /// Name of the last handled action, e.g. "year_up"
    pub last_action: String,
    pub recomputes: usize,
    /// Wall time of the last load, cache hits included
    pub last_load: Option<Duration>,
    /// Files actually read from disk so far
    pub file_reads: usize,
}

impl DebugState {
    pub fn on_key(&mut self, event: &KeyEvent) {
        self.keys += 1;
        self.last_key = Some(event.code);
    }

    pub fn on_load(&mut self, elapsed: Duration, file_reads: usize) {
        self.last_load = Some(elapsed);
        self.file_reads = file_reads;
    }

    pub fn status_line(&self) -> String {
        let key = self
            .last_key
            .map(|code| format!("{:?}", code))
            .unwrap_or_else(|| "-".to_string());
        let load = self
            .last_load
            .map(|d| format!("{}ms", d.as_millis()))
            .unwrap_or_else(|| "-".to_string());
        let action = if self.last_action.is_empty() {
            "-"
        } else {
            self.last_action.as_str()
        };
        format!(
            "events={} frames={} keys={} last_key={} action={} recomputes={} reads={} load={}",
            self.events,
            self.frames,
            self.keys,
            key,
            action,
            self.recomputes,
            self.file_reads,
            load,
        )
    }
}

impl Widget for &DebugState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.status_line()).render(area, buf);
    }
}
