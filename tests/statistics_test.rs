mod common;

use flixdash::dataset::TitleTable;
use flixdash::statistics::{
    compute_summary, country_ranking, duration_trend, share_percentages, TOP_COUNTRIES,
};
use flixdash::{load_titles, CountryShare, Dashboard, LoadOptions, TrendError};
use std::path::Path;
use tempfile::TempDir;

fn table(rows: &[common::Title]) -> TitleTable {
    TitleTable::from_frame(common::titles_frame(rows), Path::new("memory.csv")).unwrap()
}

#[test]
fn test_end_to_end_example() {
    let dir = TempDir::new().unwrap();
    let path = common::write_titles(dir.path(), "titles.csv", &common::example_rows());
    let table = load_titles(&path, &LoadOptions::default()).unwrap();

    let dashboard = Dashboard::compute(&table, 2005, TOP_COUNTRIES);
    assert_eq!(dashboard.summary.min_year, Some(2005));
    assert_eq!(dashboard.summary.max_year, Some(2005));
    assert_eq!(
        dashboard.ranking,
        vec![CountryShare::new("India", 2), CountryShare::new("USA", 1)]
    );
    let trend = dashboard.trend.unwrap();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].year, 2005);
    assert!((trend[0].mean_minutes - 105.0).abs() < 1e-9);
}

#[test]
fn test_quoted_empty_director_and_country_count_as_missing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("titles.csv");
    std::fs::write(
        &path,
        "show_id,type,title,director,country,release_year,duration\n\
         s1,Movie,A,\"\",\"\",2005,90 min\n\
         s2,Movie,B,\"\",\"\",2005,95 min\n\
         s3,Movie,C,Mira Nair,India,2005,100 min\n",
    )
    .unwrap();
    let table = load_titles(&path, &LoadOptions::default()).unwrap();

    let summary = compute_summary(&table);
    assert_eq!(summary.missing_director_count, 2);
    assert_eq!(summary.distinct_country_count, 1);
    assert_eq!(
        country_ranking(&table, 2005, TOP_COUNTRIES),
        vec![CountryShare::new("India", 1)]
    );
}

#[test]
fn test_year_without_titles() {
    let table = table(&common::example_rows());
    let dashboard = Dashboard::compute(&table, 1999, TOP_COUNTRIES);
    assert!(dashboard.ranking.is_empty());
    let notice = dashboard.ranking_or_warning().unwrap_err();
    assert_eq!(notice.to_string(), "No titles were released in 1999");
}

#[test]
fn test_summary_properties() {
    let rows: Vec<common::Title> = vec![
        ("s1", "Movie", "A", Some("X"), Some("India"), 2001, Some("90 min")),
        ("s2", "Movie", "BB", None, Some("United States, India"), 2010, Some("60 min")),
        ("s3", "TV Show", "CCC", None, Some("India"), 2003, Some("1 Season")),
        ("s4", "Movie", "DDDD", Some("Y"), None, 2007, Some("100 min")),
    ];
    let table = table(&rows);
    let summary = compute_summary(&table);

    assert!(summary.min_year <= summary.max_year);
    assert_eq!(summary.min_year, Some(2001));
    assert_eq!(summary.max_year, Some(2010));
    let present = table.directors().into_iter().flatten().count();
    assert_eq!(summary.missing_director_count + present, table.height());
    assert_eq!(summary.distinct_country_count, 2);
    assert_eq!(summary.avg_title_length, Some(2.5));
}

#[test]
fn test_ranking_is_sorted_and_bounded() {
    let countries = [
        "A", "B", "B", "C", "C", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L",
    ];
    let ids: Vec<String> = (0..countries.len()).map(|i| format!("s{i}")).collect();
    let rows: Vec<common::Title> = ids
        .iter()
        .zip(countries)
        .map(|(id, c)| (id.as_str(), "Movie", "T", None, Some(c), 2020, Some("90 min")))
        .collect();
    let table = table(&rows);

    let ranking = country_ranking(&table, 2020, TOP_COUNTRIES);
    assert_eq!(ranking.len(), TOP_COUNTRIES);
    assert!(ranking.windows(2).all(|w| w[0].count >= w[1].count));
    assert_eq!(ranking[0], CountryShare::new("C", 3));
    assert_eq!(ranking[1], CountryShare::new("B", 2));
    // ties in first-seen order
    let tail: Vec<&str> = ranking[2..].iter().map(|s| s.country.as_str()).collect();
    assert_eq!(tail, vec!["A", "D", "E", "F", "G", "H", "I", "J"]);

    let pct = share_percentages(&ranking);
    assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
}

#[test]
fn test_trend_skips_years_without_movies() {
    let rows: Vec<common::Title> = vec![
        ("s1", "Movie", "A", None, None, 2001, Some("90 min")),
        ("s2", "TV Show", "B", None, None, 2002, Some("3 Seasons")),
        ("s3", "Movie", "C", None, None, 2003, Some("100 min")),
        ("s4", "Movie", "D", None, None, 2003, Some("110 min")),
    ];
    let trend = duration_trend(&table(&rows)).unwrap();
    let years: Vec<i64> = trend.iter().map(|d| d.year).collect();
    assert_eq!(years, vec![2001, 2003]);
    assert!((trend[1].mean_minutes - 105.0).abs() < 1e-9);
    assert_eq!(trend[1].movies, 2);
}

#[test]
fn test_trend_reports_malformed_rows() {
    let rows: Vec<common::Title> = vec![
        ("s1", "Movie", "A", None, None, 2001, Some("90 min")),
        ("s2", "Movie", "B", None, None, 2001, Some("unknown")),
        ("s3", "Movie", "C", None, None, 2002, None),
    ];
    let err = duration_trend(&table(&rows)).unwrap_err();
    let TrendError::MalformedDurations(offending) = &err;
    let ids: Vec<&str> = offending.iter().map(|e| e.show_id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s3"]);
    assert_eq!(offending[0].raw.as_deref(), Some("unknown"));
    assert_eq!(offending[1].raw, None);
}

#[test]
fn test_empty_table() {
    let table = table(&[]);
    let dashboard = Dashboard::compute(&table, 2005, TOP_COUNTRIES);
    assert_eq!(dashboard.summary.min_year, None);
    assert_eq!(dashboard.summary.avg_title_length, None);
    assert_eq!(dashboard.summary.missing_director_count, 0);
    assert!(dashboard.ranking.is_empty());
    assert_eq!(dashboard.trend.unwrap(), Vec::new());
}
