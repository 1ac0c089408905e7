use std::path::PathBuf;

use ipl_terminal::match_log::{load_deliveries, load_matches, summarize};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn deliveries_load_with_extra_columns_present() {
    let deliveries = load_deliveries(&fixture_path("deliveries_small.csv"))
        .expect("fixture should load");
    assert_eq!(deliveries.len(), 7);

    let first = &deliveries[0];
    assert_eq!(first.match_id, 1);
    assert_eq!(first.batter, "V Kohli");
    assert_eq!(first.bowler, "JJ Bumrah");
    assert_eq!(first.batsman_runs, 4);
    assert!(!first.is_wicket);

    // Row 6 carries the only wicket and an extras-only total.
    assert!(deliveries[5].is_wicket);
    assert_eq!(deliveries[4].batsman_runs, 0);
    assert_eq!(deliveries[4].total_runs, 1);
}

#[test]
fn missing_required_column_fails_fast_with_column_name() {
    let err = load_deliveries(&fixture_path("deliveries_missing_bowler.csv"))
        .expect_err("missing column should fail");
    let message = format!("{err:#}");
    assert!(message.contains("bowler"), "unexpected error: {message}");
}

#[test]
fn malformed_numeric_field_reports_its_line() {
    let err = load_deliveries(&fixture_path("deliveries_bad_runs.csv"))
        .expect_err("bad value should fail");
    let message = format!("{err:#}");
    assert!(message.contains("line 3"), "unexpected error: {message}");
    assert!(message.contains("batsman_runs"), "unexpected error: {message}");
}

#[test]
fn matches_load_and_summarize() {
    let matches = load_matches(&fixture_path("matches_small.csv")).expect("fixture should load");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].match_id, 1);
    assert_eq!(matches[0].season.as_deref(), Some("2019"));
    assert_eq!(matches[1].winner.as_deref(), Some("Chennai Super Kings"));

    let deliveries =
        load_deliveries(&fixture_path("deliveries_small.csv")).expect("fixture should load");
    let summary = summarize(&matches, &deliveries);
    assert_eq!(summary.matches, 2);
    assert_eq!(summary.deliveries, 7);
    assert_eq!(summary.seasons, vec!["2019".to_string()]);
    assert_eq!(summary.first_date.as_deref(), Some("2019-04-01"));
    assert_eq!(summary.last_date.as_deref(), Some("2019-04-05"));
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_deliveries(&fixture_path("does_not_exist.csv")).is_err());
    assert!(load_matches(&fixture_path("does_not_exist.csv")).is_err());
}
