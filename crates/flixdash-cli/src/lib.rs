//! Shared CLI definitions for flixdash.
//!
//! Used by the main application and by the build script (manpage).

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Delimited text format of the titles file.
/// When `--delimiter` is not specified, the format is detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimitedFormat {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Pipe-separated values
    Psv,
}

impl DelimitedFormat {
    /// Detect format from path extension. Returns None when extension is missing or unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse format from extension string (e.g. "csv", "tsv").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "psv" => Some(Self::Psv),
            _ => None,
        }
    }

    /// Field separator byte for this format
    pub fn separator(&self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
            Self::Psv => b'|',
        }
    }
}

/// Log verbosity accepted by `--log-level`
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Command-line arguments for flixdash
#[derive(Clone, Parser, Debug)]
#[command(
    name = "flixdash",
    version,
    about = "Netflix titles dashboard in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// Path to the titles file. Defaults to the configured location (data/netflix_titles.csv)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Field delimiter of the titles file (a single ASCII character, e.g. ';').
    /// If not specified, it is detected from the file extension (csv, tsv, psv).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Year selected when the dashboard opens (default: 2005, clamped to the data's year range)
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<i64>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write a log file to the cache directory at this level (overrides config and FLIXDASH_LOG)
    #[arg(long = "log-level", value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Clear all cache data (log files) and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Generate default configuration file at ~/.config/flixdash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}
