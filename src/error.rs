//! Typed errors for loading and aggregating the titles table, plus user-facing
//! message formatting.
//!
//! Messages are built by matching `PolarsError` variants and `io::ErrorKind`
//! rather than by parsing error strings.

use polars::prelude::PolarsError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to produce a titles table from a file. Fatal to the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("column '{column}' in {} is invalid: {reason}", path.display())]
    InvalidColumn {
        path: PathBuf,
        column: String,
        reason: String,
    },

    #[error("show_id '{key}' appears more than once in {}", path.display())]
    DuplicateKey { path: PathBuf, key: String },

    #[error("row {row} of {} has no show_id", path.display())]
    MissingKey { path: PathBuf, row: usize },
}

impl LoadError {
    /// Path of the file that failed to load
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Csv { path, .. }
            | Self::MissingColumn { path, .. }
            | Self::InvalidColumn { path, .. }
            | Self::DuplicateKey { path, .. }
            | Self::MissingKey { path, .. } => path,
        }
    }
}

/// A movie row whose duration does not start with a minute count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{show_id}: duration {} is not '<minutes> min'", display_raw(.raw))]
pub struct DurationParseError {
    pub show_id: String,
    /// The raw field value; `None` when the field was empty.
    pub raw: Option<String>,
}

fn display_raw(raw: &Option<String>) -> String {
    match raw {
        Some(s) => format!("{:?}", s),
        None => "<missing>".to_string(),
    }
}

/// Failure of the duration trend aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrendError {
    #[error("{} movie row(s) have a malformed duration", .0.len())]
    MalformedDurations(Vec<DurationParseError>),
}

impl TrendError {
    /// Every offending row, in table order
    pub fn offending_rows(&self) -> &[DurationParseError] {
        match self {
            Self::MalformedDurations(rows) => rows,
        }
    }
}

/// No titles were released in the selected year; the pie chart is replaced by a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No titles were released in {year}")]
pub struct EmptySelection {
    pub year: i64,
}

/// One-line, actionable message for a load failure.
pub fn user_message(err: &LoadError) -> String {
    let path = err.path().display();
    match err {
        LoadError::Io { source, .. } => {
            format!("Failed to load {}: {}", path, user_message_from_io(source, None))
        }
        LoadError::Csv { source, .. } => {
            format!("Failed to load {}: {}", path, user_message_from_polars(source))
        }
        LoadError::MissingColumn { column, .. } => format!(
            "Failed to load {}: required column '{}' is missing. Check the header row and the delimiter.",
            path, column
        ),
        LoadError::InvalidColumn { column, reason, .. } => {
            format!("Failed to load {}: column '{}' {}", path, column, reason)
        }
        LoadError::DuplicateKey { key, .. } => format!(
            "Failed to load {}: show_id '{}' is not unique",
            path, key
        ),
        LoadError::MissingKey { row, .. } => {
            format!("Failed to load {}: row {} has an empty show_id", path, row)
        }
    }
}

/// Format a PolarsError as a user-facing message by matching on its variant.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!("Column not found: {}", msg),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::ComputeError(msg) => format!("Malformed file: {}", msg),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::IsADirectory => "Path is a directory, not a file.".to_string(),
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}
