#![allow(dead_code)]

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// show_id, type, title, director, country, release_year, duration
pub type Title<'a> = (
    &'a str,
    &'a str,
    &'a str,
    Option<&'a str>,
    Option<&'a str>,
    i64,
    Option<&'a str>,
);

pub fn titles_frame(rows: &[Title]) -> DataFrame {
    df!(
        "show_id" => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        "type" => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
        "title" => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        "director" => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        "country" => rows.iter().map(|r| r.4).collect::<Vec<_>>(),
        "release_year" => rows.iter().map(|r| r.5).collect::<Vec<_>>(),
        "duration" => rows.iter().map(|r| r.6).collect::<Vec<_>>(),
        "rating" => rows.iter().map(|_| "TV-MA").collect::<Vec<_>>()
    )
    .unwrap()
}

/// The three-row dataset of the end-to-end example
pub fn example_rows() -> Vec<Title<'static>> {
    vec![
        ("s1", "Movie", "Lagaan", Some("Ashutosh Gowariker"), Some("India"), 2005, Some("90 min")),
        ("s2", "Movie", "Swades", None, Some("India"), 2005, Some("120 min")),
        ("s3", "TV Show", "Lost", None, Some("USA"), 2005, Some("2 Seasons")),
    ]
}

/// Write `df` as a comma separated file named `name` inside `dir`.
pub fn write_csv(dir: &Path, name: &str, df: &mut DataFrame) -> PathBuf {
    write_delimited(dir, name, df, b',')
}

pub fn write_delimited(dir: &Path, name: &str, df: &mut DataFrame, separator: u8) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file)
        .with_separator(separator)
        .finish(df)
        .unwrap();
    path
}

pub fn write_titles(dir: &Path, name: &str, rows: &[Title]) -> PathBuf {
    write_csv(dir, name, &mut titles_frame(rows))
}
