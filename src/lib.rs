use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, StatefulWidget, Wrap};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod logging;
pub mod statistics;
pub mod widgets;
pub mod year_selector;

pub use cache::CacheManager;
pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme,
};
pub use dataset::{TitleRecord, TitleTable, TitleType};
pub use error::{DurationParseError, EmptySelection, LoadError, TrendError};
pub use flixdash_cli::{Args, DelimitedFormat, LogLevel};
pub use loader::{load_titles, DatasetCache, LoadOptions};
pub use statistics::{CountryShare, Dashboard, SummaryStatistics, YearDuration};
pub use year_selector::YearSelector;

use widgets::controls::Controls;
use widgets::dataset::{DatasetView, DatasetViewState};
use widgets::debug::DebugState;
use widgets::metrics::MetricsRow;
use widgets::pie::PieChart;
use widgets::sidebar::{Sidebar, SourceInfo};
use widgets::trend::TrendChart;

/// Application name used for cache directory and other app-specific paths
pub const APP_NAME: &str = "flixdash";

const PAGE_TITLE: &str = "Netflix Data Analysis";
const SIDEBAR_WIDTH: u16 = 36;

/// Settings of one dashboard session, resolved from the command line and the config file
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub path: PathBuf,
    pub load: LoadOptions,
    pub default_year: i64,
    pub top_countries: usize,
    pub year_step_large: i64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl DashboardOptions {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            path: config.data.path.clone(),
            load: LoadOptions::new().with_infer_schema_length(config.data.infer_schema_length),
            default_year: config.dashboard.default_year,
            top_countries: config.dashboard.top_countries,
            year_step_large: config.dashboard.year_step_large,
        }
    }

    /// Command-line values override the config file.
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Result<Self> {
        let mut opts = Self::from_config(config);
        if let Some(path) = &args.path {
            opts.path = path.clone();
        }
        if let Some(delimiter) = args.delimiter.or(config.data.delimiter) {
            if !delimiter.is_ascii() {
                return Err(eyre!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    delimiter
                ));
            }
            opts.load = opts.load.with_delimiter(delimiter as u8);
        }
        if let Some(year) = args.year {
            opts.default_year = year;
        }
        Ok(opts)
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf, LoadOptions),
    DoLoad(PathBuf, LoadOptions), // Internal event to actually perform loading after UI update
    Reload,
    Exit,
    Resize(u16, u16), // resized (width, height)
}

/// Which main panel is shown
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Dataset,
}

#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        path: PathBuf,
    },
    Loaded {
        path: PathBuf,
        table: Arc<TitleTable>,
    },
    Failed(LoadError),
}

pub struct App {
    options: DashboardOptions,
    datasets: DatasetCache,
    load_state: LoadState,
    dashboard: Option<Dashboard>,
    selector: YearSelector,
    view: View,
    dataset_view: DatasetViewState,
    debug: DebugState,
    theme: Theme, // Color theme for UI rendering
}

impl App {
    pub fn new(options: DashboardOptions) -> App {
        Self::new_with_theme(options, Theme::default())
    }

    pub fn new_with_theme(options: DashboardOptions, theme: Theme) -> App {
        let selector = YearSelector::new(options.default_year, None);
        Self {
            options,
            datasets: DatasetCache::new(),
            load_state: LoadState::Idle,
            dashboard: None,
            selector,
            view: View::Dashboard,
            dataset_view: DatasetViewState::default(),
            debug: DebugState::default(),
            theme,
        }
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    /// The event that loads the configured file
    pub fn open_event(&self) -> AppEvent {
        AppEvent::Open(self.options.path.clone(), self.options.load.clone())
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn table(&self) -> Option<&Arc<TitleTable>> {
        match &self.load_state {
            LoadState::Loaded { table, .. } => Some(table),
            _ => None,
        }
    }

    pub fn datasets(&self) -> &DatasetCache {
        &self.datasets
    }

    /// Current results, present once a table is loaded
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn selector(&self) -> &YearSelector {
        &self.selector
    }

    pub fn selected_year(&self) -> i64 {
        self.selector.year()
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Get a color from the theme by name
    fn color(&self, name: &str) -> ratatui::style::Color {
        self.theme.get(name)
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Open(path, options) => {
                // Set loading state first, then trigger a render before actually loading
                self.load_state = LoadState::Loading { path: path.clone() };
                Some(AppEvent::DoLoad(path.clone(), options.clone()))
            }
            AppEvent::DoLoad(path, options) => {
                self.load(path, options);
                None
            }
            AppEvent::Reload => {
                let path = match &self.load_state {
                    LoadState::Loaded { path, .. } => path.clone(),
                    LoadState::Failed(err) => err.path().to_path_buf(),
                    _ => self.options.path.clone(),
                };
                if self.datasets.invalidate(&path) {
                    info!(path = %path.display(), "reloading dataset");
                }
                self.debug.last_action = "reload".to_string();
                Some(AppEvent::Open(path, self.options.load.clone()))
            }
            AppEvent::Resize(..) => None,
            AppEvent::Exit => None,
        }
    }

    fn load(&mut self, path: &Path, options: &LoadOptions) {
        let started = Instant::now();
        let result = self.datasets.get_or_load(path, options);
        self.debug.on_load(started.elapsed(), self.datasets.reads());
        match result {
            Ok(table) => {
                let bounds = statistics::min_year(&table).zip(statistics::max_year(&table));
                self.selector.set_bounds(bounds);
                self.dataset_view.reset();
                self.load_state = LoadState::Loaded {
                    path: path.to_path_buf(),
                    table,
                };
                self.recompute();
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to load dataset");
                self.dashboard = None;
                self.load_state = LoadState::Failed(err);
            }
        }
    }

    /// Recompute every panel for the selected year
    fn recompute(&mut self) {
        if let Some(table) = self.table() {
            let dashboard =
                Dashboard::compute(table, self.selector.year(), self.options.top_countries);
            debug!(year = dashboard.year, countries = dashboard.ranking.len(), "recomputed dashboard");
            self.dashboard = Some(dashboard);
            self.debug.recomputes += 1;
        }
    }

    fn year_changed(&mut self, changed: bool, action: &str) {
        self.debug.last_action = action.to_string();
        if changed {
            info!(year = self.selector.year(), "selected year");
            self.recompute();
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        // Typed year input takes digits, Backspace, Enter and Esc
        if self.view == View::Dashboard && self.selector.is_editing() {
            match event.code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.selector.push_digit(c);
                    return None;
                }
                KeyCode::Backspace => {
                    self.selector.pop_digit();
                    return None;
                }
                KeyCode::Enter => {
                    let changed = self.selector.commit_input();
                    self.year_changed(changed, "year_input");
                    return None;
                }
                KeyCode::Esc => {
                    self.selector.cancel_input();
                    self.debug.last_action = "cancel_input".to_string();
                    return None;
                }
                _ => self.selector.cancel_input(),
            }
        }

        match event.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('r') => return Some(AppEvent::Reload),
            KeyCode::Char('d') => {
                self.view = match self.view {
                    View::Dashboard => View::Dataset,
                    View::Dataset => View::Dashboard,
                };
                self.debug.last_action = "toggle_view".to_string();
                return None;
            }
            _ => {}
        }

        match self.view {
            View::Dashboard => self.dashboard_key(event),
            View::Dataset => self.dataset_key(event),
        }
        None
    }

    fn dashboard_key(&mut self, event: &KeyEvent) {
        let large = self.options.year_step_large;
        match event.code {
            KeyCode::Up | KeyCode::Right | KeyCode::Char('k') | KeyCode::Char('+') => {
                let changed = self.selector.step(1);
                self.year_changed(changed, "year_up");
            }
            KeyCode::Down | KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('-') => {
                let changed = self.selector.step(-1);
                self.year_changed(changed, "year_down");
            }
            KeyCode::PageUp => {
                let changed = self.selector.step(large);
                self.year_changed(changed, "year_page_up");
            }
            KeyCode::PageDown => {
                let changed = self.selector.step(-large);
                self.year_changed(changed, "year_page_down");
            }
            KeyCode::Home => {
                let changed = self.selector.first();
                self.year_changed(changed, "year_first");
            }
            KeyCode::End => {
                let changed = self.selector.last();
                self.year_changed(changed, "year_last");
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.selector.push_digit(c);
                self.debug.last_action = "year_input".to_string();
            }
            _ => {}
        }
    }

    fn dataset_key(&mut self, event: &KeyEvent) {
        let Some(table) = self.table() else {
            return;
        };
        let rows = table.height();
        let cols = table.column_names().len();
        let state = &mut self.dataset_view;
        match event.code {
            KeyCode::Down | KeyCode::Char('j') => state.scroll_rows(1, rows),
            KeyCode::Up | KeyCode::Char('k') => state.scroll_rows(-1, rows),
            KeyCode::PageDown => state.page_down(rows),
            KeyCode::PageUp => state.page_up(rows),
            KeyCode::Home => state.to_top(),
            KeyCode::End => state.to_bottom(rows),
            KeyCode::Right | KeyCode::Char('l') => state.scroll_right(cols),
            KeyCode::Left | KeyCode::Char('h') => state.scroll_left(),
            KeyCode::Esc => self.view = View::Dashboard,
            _ => {}
        }
    }

    fn render_loading_gauge(path: &Path, area: Rect, buf: &mut Buffer) {
        let gauge_width = (area.width as f64 * 0.5) as u16;
        let center_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(3),
                Constraint::Fill(1),
            ])
            .split(area);
        let gauge_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(gauge_width),
                Constraint::Fill(1),
            ])
            .split(center_layout[1])[1];

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Loading"))
            .percent(50)
            .label(path.display().to_string())
            .render(gauge_area, buf);
    }

    fn render_load_error(&self, err: &LoadError, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.color("error")))
            .title(" Error ");
        Paragraph::new(vec![
            Line::from(Span::styled(
                error::user_message(err),
                Style::default().fg(self.color("error")),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to retry or q to quit.",
                Style::default().fg(self.color("dimmed")),
            )),
        ])
        .block(block)
        .wrap(Wrap { trim: true })
        .render(area, buf);
    }

    fn render_dashboard(&self, dashboard: &Dashboard, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Fill(1)])
            .split(area);
        MetricsRow::new(&dashboard.summary, &self.theme).render(rows[0], buf);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        PieChart::new(dashboard, &self.theme, self.options.top_countries).render(charts[0], buf);
        TrendChart::new(&dashboard.trend, &self.theme).render(charts[1], buf);
    }

    fn render_main(&mut self, area: Rect, buf: &mut Buffer) {
        match &self.load_state {
            LoadState::Idle => {
                Paragraph::new("No file loaded")
                    .style(Style::default().fg(self.color("dimmed")))
                    .centered()
                    .render(area, buf);
            }
            LoadState::Loading { path } => Self::render_loading_gauge(path, area, buf),
            LoadState::Failed(err) => self.render_load_error(err, area, buf),
            LoadState::Loaded { table, .. } => match self.view {
                View::Dashboard => {
                    if let Some(dashboard) = &self.dashboard {
                        self.render_dashboard(dashboard, area, buf);
                    }
                }
                View::Dataset => {
                    let table = Arc::clone(table);
                    DatasetView::new(&table, &self.theme).render(
                        area,
                        buf,
                        &mut self.dataset_view,
                    );
                }
            },
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.frames += 1;

        let mut constraints = vec![
            Constraint::Length(1), // Title
            Constraint::Fill(1),
            Constraint::Length(1), // Controls
        ];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Paragraph::new(PAGE_TITLE)
            .style(
                Style::default()
                    .fg(self.color("title"))
                    .add_modifier(Modifier::BOLD),
            )
            .centered()
            .render(layout[0], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
            .split(layout[1]);

        let (path, rows) = match &self.load_state {
            LoadState::Idle => (None, None),
            LoadState::Loading { path } => (Some(path.as_path()), None),
            LoadState::Loaded { path, table } => (Some(path.as_path()), Some(table.height())),
            LoadState::Failed(err) => (Some(err.path()), None),
        };
        let mut sidebar = Sidebar::new(&self.selector, &self.theme);
        if let Some(path) = path {
            sidebar = sidebar.with_source(SourceInfo { path, rows });
        }
        sidebar.render(body[0], buf);

        self.render_main(body[1], buf);

        let mut controls = Controls::new(self.view)
            .with_colors(self.color("controls_bg"), self.color("primary"));
        if let Some(rows) = self.table().map(|t| t.height()) {
            controls = controls.with_row_count(rows);
        }
        controls.render(layout[2], buf);

        if self.debug.enabled {
            (&self.debug).render(layout[3], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: Option<&str>, delimiter: Option<char>, year: Option<i64>) -> Args {
        Args {
            path: path.map(PathBuf::from),
            delimiter,
            year,
            debug: false,
            log_level: None,
            clear_cache: false,
            generate_config: false,
            force: false,
        }
    }

    #[test]
    fn test_options_from_config() {
        let opts = DashboardOptions::from_args_and_config(&args(None, None, None), &AppConfig::default())
            .unwrap();
        assert_eq!(opts.path, PathBuf::from("data/netflix_titles.csv"));
        assert_eq!(opts.default_year, 2005);
        assert_eq!(opts.top_countries, 10);
        assert_eq!(opts.load.delimiter, None);
    }

    #[test]
    fn test_args_override_config() {
        let mut config = AppConfig::default();
        config.data.delimiter = Some(';');
        let opts = DashboardOptions::from_args_and_config(
            &args(Some("other.tsv"), Some('\t'), Some(2019)),
            &config,
        )
        .unwrap();
        assert_eq!(opts.path, PathBuf::from("other.tsv"));
        assert_eq!(opts.load.delimiter, Some(b'\t'));
        assert_eq!(opts.default_year, 2019);

        let opts =
            DashboardOptions::from_args_and_config(&args(None, None, None), &config).unwrap();
        assert_eq!(opts.load.delimiter, Some(b';'));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let result = DashboardOptions::from_args_and_config(
            &args(None, Some('§'), None),
            &AppConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_open_emits_do_load() {
        let mut app = App::new(DashboardOptions::default());
        let next = app.event(&app.open_event());
        assert!(matches!(next, Some(AppEvent::DoLoad(..))));
        assert!(matches!(app.load_state(), LoadState::Loading { .. }));
    }

    #[test]
    fn test_missing_file_fails_load() {
        let opts = DashboardOptions {
            path: PathBuf::from("/nonexistent/titles.csv"),
            ..DashboardOptions::default()
        };
        let mut app = App::new(opts);
        if let Some(next) = app.event(&app.open_event()) {
            app.event(&next);
        }
        assert!(matches!(app.load_state(), LoadState::Failed(LoadError::Io { .. })));
        assert!(app.dashboard().is_none());
    }
}
