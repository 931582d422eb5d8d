mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flixdash::{App, AppEvent, DashboardOptions, LoadState, View};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use std::path::Path;
use tempfile::TempDir;

fn rows() -> Vec<common::Title<'static>> {
    vec![
        ("s1", "Movie", "Lagaan", None, Some("India"), 2001, Some("224 min")),
        ("s2", "Movie", "Swades", None, Some("India"), 2004, Some("210 min")),
        ("s3", "Movie", "Black", Some("Sanjay Leela Bhansali"), Some("India"), 2005, Some("122 min")),
        ("s4", "TV Show", "Lost", None, Some("United States"), 2005, Some("6 Seasons")),
        ("s5", "Movie", "Roma", Some("Alfonso Cuarón"), Some("Mexico"), 2018, Some("135 min")),
        ("s6", "TV Show", "Dark", None, Some("Germany"), 2020, Some("3 Seasons")),
    ]
}

/// An app that has gone through Open and DoLoad for `path`
fn loaded_app(path: &Path, default_year: i64) -> App {
    let opts = DashboardOptions {
        path: path.to_path_buf(),
        default_year,
        ..DashboardOptions::default()
    };
    let mut app = App::new(opts);
    let mut next = Some(app.open_event());
    while let Some(event) = next {
        next = app.event(&event);
    }
    app
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn render(app: &mut App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    app.render(area, &mut buf);
    buf.content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn test_load_sets_year_bounds() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let app = loaded_app(&path, 2005);

    assert!(matches!(app.load_state(), LoadState::Loaded { .. }));
    assert_eq!(app.selector().bounds(), Some((2001, 2020)));
    assert_eq!(app.selected_year(), 2005);
    let dashboard = app.dashboard().unwrap();
    assert_eq!(dashboard.year, 2005);
    assert_eq!(dashboard.ranking.len(), 2);
}

#[test]
fn test_default_year_is_clamped() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let app = loaded_app(&path, 1990);
    assert_eq!(app.selected_year(), 2001);
    assert_eq!(app.dashboard().unwrap().year, 2001);
}

#[test]
fn test_year_keys_recompute() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2005);

    assert!(app.event(&key(KeyCode::Up)).is_none());
    assert_eq!(app.selected_year(), 2006);
    assert_eq!(app.dashboard().unwrap().year, 2006);
    assert!(app.dashboard().unwrap().ranking.is_empty());

    app.event(&key(KeyCode::Down));
    app.event(&key(KeyCode::Char('-')));
    assert_eq!(app.selected_year(), 2004);

    app.event(&key(KeyCode::PageUp));
    assert_eq!(app.selected_year(), 2014);
    app.event(&key(KeyCode::PageUp));
    assert_eq!(app.selected_year(), 2020);

    app.event(&key(KeyCode::Home));
    assert_eq!(app.selected_year(), 2001);
    app.event(&key(KeyCode::PageDown));
    assert_eq!(app.selected_year(), 2001);
    app.event(&key(KeyCode::End));
    assert_eq!(app.dashboard().unwrap().year, 2020);
}

#[test]
fn test_typed_year() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2005);

    for c in "2018".chars() {
        app.event(&key(KeyCode::Char(c)));
    }
    assert_eq!(app.selector().input(), Some("2018"));
    // not applied until Enter
    assert_eq!(app.dashboard().unwrap().year, 2005);

    app.event(&key(KeyCode::Enter));
    assert_eq!(app.selected_year(), 2018);
    assert_eq!(app.dashboard().unwrap().ranking[0].country, "Mexico");

    for c in "19".chars() {
        app.event(&key(KeyCode::Char(c)));
    }
    app.event(&key(KeyCode::Esc));
    assert_eq!(app.selected_year(), 2018);
    assert!(!app.selector().is_editing());
}

#[test]
fn test_quit_keys() {
    let mut app = App::new(DashboardOptions::default());
    assert!(matches!(app.event(&key(KeyCode::Char('q'))), Some(AppEvent::Exit)));
    let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(matches!(app.event(&ctrl_c), Some(AppEvent::Exit)));
}

#[test]
fn test_reload_reads_the_file_again() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2005);
    assert_eq!(app.datasets().reads(), 1);

    let mut fewer = rows();
    fewer.truncate(2);
    common::write_titles(dir.path(), "titles.csv", &fewer);

    let mut next = app.event(&key(KeyCode::Char('r')));
    assert!(matches!(next, Some(AppEvent::Reload)));
    while let Some(event) = next {
        next = app.event(&event);
    }
    assert_eq!(app.datasets().reads(), 2);
    assert_eq!(app.table().unwrap().height(), 2);
    assert_eq!(app.selector().bounds(), Some((2001, 2004)));
    assert_eq!(app.selected_year(), 2004);
}

#[test]
fn test_dataset_view_toggle() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2005);

    app.event(&key(KeyCode::Char('d')));
    assert_eq!(app.view(), View::Dataset);
    // arrows scroll the table instead of changing the year
    app.event(&key(KeyCode::Up));
    assert_eq!(app.selected_year(), 2005);

    let screen = render(&mut app, 140, 20);
    assert!(screen.contains("Check the complete dataset"));
    assert!(screen.contains("show_id"));
    assert!(screen.contains("Lagaan"));

    app.event(&key(KeyCode::Char('d')));
    assert_eq!(app.view(), View::Dashboard);
}

#[test]
fn test_render_dashboard() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2005);

    let screen = render(&mut app, 160, 40);
    assert!(screen.contains("Netflix Data Analysis"));
    assert!(screen.contains("Basic Information"));
    assert!(screen.contains("Min Release Year"));
    assert!(screen.contains("Top 10 Countries in 2005"));
    assert!(screen.contains("India 50.00% (1)"));
    assert!(screen.contains("Avg Duration of Movies by Year"));
    assert!(screen.contains("2001 - 2020"));
}

#[test]
fn test_render_empty_year_notice() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2010);

    let screen = render(&mut app, 160, 40);
    assert!(screen.contains("No titles were released in 2010"));
}

#[test]
fn test_render_load_error() {
    let dir = TempDir::new().unwrap();
    let mut app = loaded_app(&dir.path().join("missing.csv"), 2005);

    assert!(matches!(app.load_state(), LoadState::Failed(_)));
    let screen = render(&mut app, 120, 30);
    assert!(screen.contains("File or directory not found."));
}

#[test]
fn test_debug_line_reports_reads_and_recomputes() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &rows());
    let mut app = loaded_app(&path, 2005);
    app.enable_debug();
    app.event(&key(KeyCode::Up));

    let screen = render(&mut app, 160, 40);
    assert!(screen.contains("recomputes=2 reads=1 load="));
    assert!(screen.contains("last_key=Up"));
}
