//! Aggregations over the titles table. Every function here is a pure read of
//! the table and can be tested without a terminal.

use polars::prelude::ChunkAgg;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

use crate::dataset::{TitleTable, TitleType};
use crate::error::{DurationParseError, EmptySelection, TrendError};

/// Length of the country ranking shown in the pie chart
pub const TOP_COUNTRIES: usize = 10;

/// The five headline metrics of the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
    pub missing_director_count: usize,
    pub distinct_country_count: usize,
    pub avg_title_length: Option<f64>,
}

pub fn compute_summary(table: &TitleTable) -> SummaryStatistics {
    SummaryStatistics {
        min_year: min_year(table),
        max_year: max_year(table),
        missing_director_count: missing_director_count(table),
        distinct_country_count: distinct_country_count(table),
        avg_title_length: avg_title_length(table),
    }
}

pub fn min_year(table: &TitleTable) -> Option<i64> {
    table.release_years().min()
}

pub fn max_year(table: &TitleTable) -> Option<i64> {
    table.release_years().max()
}

pub fn missing_director_count(table: &TitleTable) -> usize {
    table.directors().null_count()
}

/// Distinct raw `country` values; "United States, India" is one value, not two.
pub fn distinct_country_count(table: &TitleTable) -> usize {
    table
        .countries()
        .into_iter()
        .flatten()
        .collect::<HashSet<&str>>()
        .len()
}

/// Mean title length in characters (not bytes), over rows that have a title.
pub fn avg_title_length(table: &TitleTable) -> Option<f64> {
    let (total, count) = table
        .titles()
        .into_iter()
        .flatten()
        .fold((0usize, 0usize), |(total, count), title| {
            (total + title.chars().count(), count + 1)
        });
    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}

/// One slice of the country pie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryShare {
    pub country: String,
    pub count: usize,
}

impl CountryShare {
    pub fn new(country: impl Into<String>, count: usize) -> Self {
        Self {
            country: country.into(),
            count,
        }
    }
}

/// Most frequent raw `country` values among titles released in `year`.
///
/// Sorted by descending count; equal counts keep the order in which the value
/// was first seen among that year's rows. At most `limit` entries. Rows without
/// a country are not counted.
pub fn country_ranking(table: &TitleTable, year: i64, limit: usize) -> Vec<CountryShare> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    let rows = table
        .release_years()
        .into_iter()
        .zip(table.countries())
        .filter(|(release_year, _)| *release_year == Some(year));
    for (_, country) in rows {
        let Some(country) = country else { continue };
        match index.get(country) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(country, counts.len());
                counts.push((country, 1));
            }
        }
    }

    // stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(country, count)| CountryShare::new(country, count))
        .collect()
}

/// Percentage of each share in the total of `shares`, in the same order.
pub fn share_percentages(shares: &[CountryShare]) -> Vec<f64> {
    let total: usize = shares.iter().map(|s| s.count).sum();
    shares
        .iter()
        .map(|s| {
            if total == 0 {
                0.0
            } else {
                s.count as f64 * 100.0 / total as f64
            }
        })
        .collect()
}

/// Mean movie duration of one release year
#[derive(Debug, Clone, PartialEq)]
pub struct YearDuration {
    pub year: i64,
    pub mean_minutes: f64,
    /// Movies contributing to the mean
    pub movies: usize,
}

/// Minute count of a movie duration such as "90 min": the first
/// whitespace-separated token, which must be a non-negative integer.
pub fn parse_duration_minutes(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse::<u32>().ok()
}

/// Mean movie duration per release year, ascending by year.
///
/// Only `Movie` rows take part. Years without movies do not appear. Any movie
/// whose duration does not parse fails the whole aggregation, and the error
/// lists every such row.
pub fn duration_trend(table: &TitleTable) -> Result<Vec<YearDuration>, TrendError> {
    let mut per_year: BTreeMap<i64, (u64, usize)> = BTreeMap::new();
    let mut malformed = Vec::new();

    for record in table.records() {
        if record.title_type.and_then(TitleType::parse) != Some(TitleType::Movie) {
            continue;
        }
        match record.duration.and_then(parse_duration_minutes) {
            Some(minutes) => {
                let entry = per_year.entry(record.release_year).or_insert((0, 0));
                entry.0 += u64::from(minutes);
                entry.1 += 1;
            }
            None => malformed.push(DurationParseError {
                show_id: record.show_id.to_string(),
                raw: record.duration.map(str::to_string),
            }),
        }
    }

    if !malformed.is_empty() {
        for err in &malformed {
            warn!("{}", err);
        }
        return Err(TrendError::MalformedDurations(malformed));
    }

    Ok(per_year
        .into_iter()
        .map(|(year, (total, movies))| YearDuration {
            year,
            mean_minutes: total as f64 / movies as f64,
            movies,
        })
        .collect())
}

/// Everything the dashboard shows for one year selection, recomputed from
/// the table on every interaction.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub year: i64,
    pub summary: SummaryStatistics,
    pub ranking: Vec<CountryShare>,
    pub trend: Result<Vec<YearDuration>, TrendError>,
}

impl Dashboard {
    pub fn compute(table: &TitleTable, year: i64, top_countries: usize) -> Self {
        Self {
            year,
            summary: compute_summary(table),
            ranking: country_ranking(table, year, top_countries),
            trend: duration_trend(table),
        }
    }

    /// The ranking, or the warning shown in place of the pie chart.
    pub fn ranking_or_warning(&self) -> Result<&[CountryShare], EmptySelection> {
        if self.ranking.is_empty() {
            Err(EmptySelection { year: self.year })
        } else {
            Ok(&self.ranking)
        }
    }
}
