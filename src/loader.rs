//! Reading the titles file and memoizing the result per path.

use flixdash_cli::DelimitedFormat;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::dataset::TitleTable;
use crate::error::LoadError;

/// Options for reading a titles file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field separator. When unset, detected from the extension (comma otherwise).
    pub delimiter: Option<u8>,
    /// Rows used to infer column types
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            infer_schema_length: 1000,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Separator to use for `path`
    pub fn separator_for(&self, path: &Path) -> u8 {
        self.delimiter.unwrap_or_else(|| {
            DelimitedFormat::from_path(path)
                .unwrap_or(DelimitedFormat::Csv)
                .separator()
        })
    }
}

/// Read and validate a titles file. Always touches the disk; see [`DatasetCache`]
/// for the memoized variant.
pub fn load_titles(path: &Path, options: &LoadOptions) -> Result<TitleTable, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.is_dir() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::IsADirectory,
                "expected a delimited file",
            ),
        });
    }

    let separator = options.separator_for(path);
    let csv_err = |source: PolarsError| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .map_parse_options(|opts| opts.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_err)?
        .finish()
        .map_err(csv_err)?;

    let table = TitleTable::from_frame(df, path)?;
    info!(
        path = %path.display(),
        rows = table.height(),
        "loaded titles"
    );
    Ok(table)
}

/// Session-scoped memo of loaded tables, keyed by path.
///
/// The first request for a path reads the file; later requests return the
/// same shared table without touching the disk. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<TitleTable>>,
    reads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    pub fn get_or_load(
        &mut self,
        path: &Path,
        options: &LoadOptions,
    ) -> Result<Arc<TitleTable>, LoadError> {
        let key = Self::key(path);
        if let Some(table) = self.entries.get(&key) {
            debug!(path = %path.display(), "dataset cache hit");
            return Ok(Arc::clone(table));
        }

        debug!(path = %path.display(), "dataset cache miss");
        self.reads += 1;
        let table = Arc::new(load_titles(path, options)?);
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Forget the table for `path`, so the next request reads the file again.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&Self::key(path)).is_some()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&Self::key(path))
    }

    /// Number of times a file was actually read
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
