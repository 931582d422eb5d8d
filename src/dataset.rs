use polars::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use crate::error::LoadError;

pub const SHOW_ID: &str = "show_id";
pub const TYPE: &str = "type";
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";
pub const COUNTRY: &str = "country";
pub const RELEASE_YEAR: &str = "release_year";
pub const DURATION: &str = "duration";

/// Columns every titles file must provide. `show_id` first: it is the row key.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    SHOW_ID,
    TYPE,
    TITLE,
    DIRECTOR,
    COUNTRY,
    RELEASE_YEAR,
    DURATION,
];

const STRING_COLUMNS: [&str; 6] = [SHOW_ID, TYPE, TITLE, DIRECTOR, COUNTRY, DURATION];

/// Category of a title record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleType {
    Movie,
    TvShow,
}

impl TitleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Movie" => Some(Self::Movie),
            "TV Show" => Some(Self::TvShow),
            _ => None,
        }
    }
}

/// One row of the titles table, borrowed from the underlying columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord<'a> {
    pub show_id: &'a str,
    pub title_type: Option<&'a str>,
    pub title: Option<&'a str>,
    pub director: Option<&'a str>,
    pub country: Option<&'a str>,
    pub release_year: i64,
    pub duration: Option<&'a str>,
}

/// The loaded titles dataset.
///
/// Construction validates the required columns and normalizes their types:
/// `release_year` is Int64 with no nulls, the text columns are String, and
/// `show_id` is non-null and unique. The table is never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TitleTable {
    df: DataFrame,
    show_ids: StringChunked,
    types: StringChunked,
    titles: StringChunked,
    directors: StringChunked,
    countries: StringChunked,
    release_years: Int64Chunked,
    durations: StringChunked,
}

impl TitleTable {
    /// Validate and normalize a frame read from `path` (used only in error messages).
    pub fn from_frame(mut df: DataFrame, path: &Path) -> Result<Self, LoadError> {
        for column in REQUIRED_COLUMNS {
            if df.column(column).is_err() {
                return Err(LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                });
            }
        }

        let invalid = |column: &str, reason: String| LoadError::InvalidColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
            reason,
        };

        // a quoted empty field is a missing value, like an unquoted one
        for column in STRING_COLUMNS {
            let casted = df
                .column(column)
                .and_then(|c| c.cast(&DataType::String))
                .map_err(|e| invalid(column, e.to_string()))?;
            let blanked: StringChunked = casted
                .str()
                .map_err(|e| invalid(column, e.to_string()))?
                .into_iter()
                .map(|value| value.filter(|s| !s.is_empty()))
                .collect();
            df.with_column(blanked.with_name(column.into()).into_column())
                .map_err(|e| invalid(column, e.to_string()))?;
        }

        let years = df
            .column(RELEASE_YEAR)
            .map_err(|e| invalid(RELEASE_YEAR, e.to_string()))?;
        let nulls_before = years.null_count();
        // through Float64 so that 2005.5 is seen instead of truncated
        let as_float = years
            .cast(&DataType::Float64)
            .map_err(|e| invalid(RELEASE_YEAR, e.to_string()))?;
        let fractional = as_float
            .f64()
            .map_err(|e| invalid(RELEASE_YEAR, e.to_string()))?
            .into_iter()
            .flatten()
            .any(|year| year.fract() != 0.0 || !year.is_finite());
        if fractional || as_float.null_count() > nulls_before {
            return Err(invalid(
                RELEASE_YEAR,
                "contains values that are not whole years".to_string(),
            ));
        }
        let casted = as_float
            .cast(&DataType::Int64)
            .map_err(|e| invalid(RELEASE_YEAR, e.to_string()))?;
        if nulls_before > 0 {
            return Err(invalid(
                RELEASE_YEAR,
                format!("is empty in {} row(s)", nulls_before),
            ));
        }
        df.with_column(casted)
            .map_err(|e| invalid(RELEASE_YEAR, e.to_string()))?;

        let text = |column: &str| -> Result<StringChunked, LoadError> {
            df.column(column)
                .and_then(|c| c.str().cloned())
                .map_err(|e| invalid(column, e.to_string()))
        };
        let table = Self {
            show_ids: text(SHOW_ID)?,
            types: text(TYPE)?,
            titles: text(TITLE)?,
            directors: text(DIRECTOR)?,
            countries: text(COUNTRY)?,
            durations: text(DURATION)?,
            release_years: df
                .column(RELEASE_YEAR)
                .and_then(|c| c.i64().cloned())
                .map_err(|e| invalid(RELEASE_YEAR, e.to_string()))?,
            df,
        };
        table.check_keys(path)?;
        Ok(table)
    }

    fn check_keys(&self, path: &Path) -> Result<(), LoadError> {
        let mut seen = HashSet::with_capacity(self.height());
        for (row, key) in self.show_ids().into_iter().enumerate() {
            let key = key.ok_or_else(|| LoadError::MissingKey {
                path: path.to_path_buf(),
                row: row + 1,
            })?;
            if !seen.insert(key) {
                return Err(LoadError::DuplicateKey {
                    path: path.to_path_buf(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// All column names, in file order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn show_ids(&self) -> &StringChunked {
        &self.show_ids
    }

    pub fn types(&self) -> &StringChunked {
        &self.types
    }

    pub fn titles(&self) -> &StringChunked {
        &self.titles
    }

    pub fn directors(&self) -> &StringChunked {
        &self.directors
    }

    pub fn countries(&self) -> &StringChunked {
        &self.countries
    }

    pub fn durations(&self) -> &StringChunked {
        &self.durations
    }

    pub fn release_years(&self) -> &Int64Chunked {
        &self.release_years
    }

    /// Iterate the required fields of every row, in file order.
    pub fn records(&self) -> impl Iterator<Item = TitleRecord<'_>> + '_ {
        self.show_ids()
            .into_iter()
            .zip(self.types())
            .zip(self.titles())
            .zip(self.directors())
            .zip(self.countries())
            .zip(self.release_years())
            .zip(self.durations())
            .map(
                |((((((show_id, title_type), title), director), country), year), duration)| {
                    TitleRecord {
                        show_id: show_id.unwrap_or_default(),
                        title_type,
                        title,
                        director,
                        country,
                        release_year: year.unwrap_or_default(),
                        duration,
                    }
                },
            )
    }

    /// Look up a row by its key
    pub fn get(&self, show_id: &str) -> Option<TitleRecord<'_>> {
        self.records().find(|r| r.show_id == show_id)
    }

    /// Display text of one cell, for any column (including the optional ones
    /// the dashboard does not aggregate). Missing values render as an empty string.
    pub fn cell(&self, row: usize, column: &str) -> Cow<'_, str> {
        match self.df.column(column).and_then(|c| c.get(row)) {
            Ok(AnyValue::Null) | Err(_) => Cow::Borrowed(""),
            Ok(AnyValue::String(s)) => Cow::Borrowed(s),
            Ok(value) => Cow::Owned(value.str_value().into_owned()),
        }
    }
}
