use flixdash::config::{AppConfig, ColorParser, ConfigManager, Theme};
use flixdash::{App, DashboardOptions};
use ratatui::style::Color;
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

// Helper to ensure NO_COLOR is not set for color parsing tests
fn ensure_colors_enabled() {
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");
    assert_eq!(
        config.data.path,
        std::path::PathBuf::from("data/netflix_titles.csv")
    );
    assert_eq!(config.data.delimiter, None);
    assert_eq!(config.dashboard.default_year, 2005);
    assert_eq!(config.dashboard.top_countries, 10);
    assert_eq!(config.dashboard.year_step_large, 10);
    assert_eq!(config.performance.event_poll_interval_ms, 25);
    assert_eq!(config.logging.level, "off");
    assert_eq!(config.theme.colors.chart_background, "#0e1117");
    assert_eq!(config.theme.colors.pie_palette.len(), 10);
    assert!(!config.debug.enabled);
}

#[test]
fn test_missing_config_file_gives_defaults() {
    ensure_colors_enabled();
    let (_dir, manager) = setup_test_config_dir();
    let config = AppConfig::load_from(&manager).unwrap();
    assert_eq!(config.dashboard.default_year, 2005);
}

#[test]
fn test_generated_config_loads() {
    ensure_colors_enabled();
    let (_dir, manager) = setup_test_config_dir();
    let path = manager.write_default_config(false).unwrap();
    assert!(path.exists());

    let config = AppConfig::load_from(&manager).unwrap();
    assert_eq!(config.dashboard.top_countries, 10);
    assert_eq!(config.logging.file_name, "flixdash.log");
}

#[test]
fn test_generate_refuses_overwrite_without_force() {
    let (_dir, manager) = setup_test_config_dir();
    let path = manager.write_default_config(false).unwrap();
    fs::write(&path, "version = \"0.1\"\n").unwrap();

    assert!(manager.write_default_config(false).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"0.1\"\n");

    manager.write_default_config(true).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("[dashboard]"));
}

#[test]
fn test_partial_user_config_merges() {
    ensure_colors_enabled();
    let (_dir, manager) = setup_test_config_dir();
    manager.ensure_config_dir().unwrap();
    fs::write(
        manager.config_path("config.toml"),
        r##"
[data]
path = "/srv/netflix.tsv"
delimiter = "\t"

[dashboard]
default_year = 2019

[theme.colors]
chart_accent = "#00ff00"
"##,
    )
    .unwrap();

    let config = AppConfig::load_from(&manager).unwrap();
    assert_eq!(config.data.path, std::path::PathBuf::from("/srv/netflix.tsv"));
    assert_eq!(config.data.delimiter, Some('\t'));
    assert_eq!(config.dashboard.default_year, 2019);
    // untouched values keep their defaults
    assert_eq!(config.dashboard.top_countries, 10);
    assert_eq!(config.theme.colors.chart_accent, "#00ff00");
    assert_eq!(config.theme.colors.chart_marker, "white");
}

#[test]
fn test_invalid_values_are_rejected() {
    ensure_colors_enabled();
    let (_dir, manager) = setup_test_config_dir();
    manager.ensure_config_dir().unwrap();

    for content in [
        "[dashboard]\ntop_countries = 0\n",
        "[dashboard]\nyear_step_large = -1\n",
        "[data]\ninfer_schema_length = 0\n",
        "[theme]\ncolor_mode = \"sepia\"\n",
        "[theme.colors]\nchart_accent = \"not-a-color\"\n",
        "[theme.colors]\npie_palette = []\n",
        "version = \"9.0\"\n",
    ] {
        fs::write(manager.config_path("config.toml"), content).unwrap();
        assert!(
            AppConfig::load_from(&manager).is_err(),
            "accepted invalid config: {content}"
        );
    }
}

#[test]
fn test_malformed_toml_is_an_error() {
    let (_dir, manager) = setup_test_config_dir();
    manager.ensure_config_dir().unwrap();
    fs::write(manager.config_path("config.toml"), "[dashboard\n").unwrap();
    let err = AppConfig::load_from(&manager).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_theme_uses_custom_colors() {
    ensure_colors_enabled();
    let mut config = AppConfig::default();
    config.theme.colors.chart_accent = "bright_red".to_string();
    config.theme.colors.pie_palette = vec!["red".to_string(), "indexed(33)".to_string()];

    let theme = Theme::from_config_with_parser(
        &config.theme,
        &ColorParser::with_capabilities(true, true),
    )
    .unwrap();
    assert_eq!(theme.get("chart_accent"), Color::Indexed(9));
    assert_eq!(theme.get("chart_background"), Color::Rgb(0x0e, 0x11, 0x17));
    assert_eq!(theme.pie_color(0), Color::Red);
    assert_eq!(theme.pie_color(1), Color::Indexed(33));
    // palette repeats
    assert_eq!(theme.pie_color(2), Color::Red);
    assert_eq!(theme.get("no_such_color"), Color::Reset);
}

#[test]
fn test_app_accepts_theme() {
    let config = AppConfig::default();
    let theme =
        Theme::from_config(&config.theme).expect("Failed to create theme from default config");

    let app = App::new_with_theme(DashboardOptions::default(), theme);

    // No data loaded yet
    assert!(app.dashboard().is_none());
    assert!(app.table().is_none());
}
