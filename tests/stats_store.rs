use std::fs;
use std::path::PathBuf;

use ipl_terminal::player_stats::{PlayerStatistics, Role};
use ipl_terminal::stats_store::{STATS_COLUMNS, read_statistics_csv, write_statistics_csv};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ipl_terminal_{}_{name}", std::process::id()))
}

fn sample_rows() -> Vec<PlayerStatistics> {
    vec![
        PlayerStatistics {
            player: "V Kohli".to_string(),
            total_runs: 5878,
            balls_faced: 4496,
            times_out: 166,
            matches_played: 184,
            batting_average: 35.41,
            strike_rate: 130.74,
            fours: 512,
            sixes: 202,
            runs_conceded: 368,
            wickets: 4,
            balls_bowled: 251,
            matches_bowled: 26,
            economy_rate: 8.8,
            bowling_average: 92.0,
            bowling_strike_rate: 62.75,
            role: Role::AllRounder,
            total_matches: 184,
        },
        PlayerStatistics {
            player: "Washington Sundar".to_string(),
            total_runs: 0,
            balls_faced: 0,
            times_out: 0,
            matches_played: 0,
            batting_average: 0.0,
            strike_rate: 0.0,
            fours: 0,
            sixes: 0,
            runs_conceded: 980,
            wickets: 0,
            balls_bowled: 720,
            matches_bowled: 34,
            economy_rate: 8.17,
            bowling_average: f64::NAN,
            bowling_strike_rate: f64::NAN,
            role: Role::Bowler,
            total_matches: 34,
        },
    ]
}

#[test]
fn written_table_reads_back_identically() {
    let path = scratch_path("roundtrip.csv");
    let rows = sample_rows();
    write_statistics_csv(&path, &rows).expect("write should succeed");

    let loaded = read_statistics_csv(&path).expect("read should succeed");
    fs::remove_file(&path).ok();

    assert_eq!(loaded.len(), 2);
    let kohli = &loaded[0];
    assert_eq!(kohli.player, "V Kohli");
    assert_eq!(kohli.total_runs, 5878);
    assert_eq!(kohli.batting_average, 35.41);
    assert_eq!(kohli.role, Role::AllRounder);

    let sundar = &loaded[1];
    assert_eq!(sundar.wickets, 0);
    assert!(sundar.bowling_average.is_nan());
    assert!(sundar.bowling_strike_rate.is_nan());
    assert_eq!(sundar.role, Role::Bowler);
}

#[test]
fn header_follows_the_contract_order() {
    let path = scratch_path("header.csv");
    write_statistics_csv(&path, &sample_rows()).expect("write should succeed");

    let raw = fs::read_to_string(&path).expect("file should exist");
    fs::remove_file(&path).ok();

    let header = raw.lines().next().expect("header line");
    assert_eq!(header, STATS_COLUMNS.join(","));
}

#[test]
fn empty_table_writes_header_only() {
    let path = scratch_path("empty.csv");
    write_statistics_csv(&path, &[]).expect("write should succeed");

    let loaded = read_statistics_csv(&path).expect("read should succeed");
    let raw = fs::read_to_string(&path).expect("file should exist");
    fs::remove_file(&path).ok();

    assert!(loaded.is_empty());
    assert_eq!(raw.lines().count(), 1);
}

#[test]
fn no_tmp_file_left_behind() {
    let path = scratch_path("swap.csv");
    write_statistics_csv(&path, &sample_rows()).expect("write should succeed");
    assert!(!path.with_extension("csv.tmp").exists());
    fs::remove_file(&path).ok();
}
