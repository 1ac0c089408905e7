use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::player_stats::{self, PlayerStatistics};
use crate::stats_store::STATS_COLUMNS;

const LEADERBOARD_LIMIT: usize = 10;

pub struct ExportReport {
    pub players: usize,
    pub roles: usize,
    pub run_scorers: usize,
    pub wicket_takers: usize,
}

/// Workbook rendition of the summary table: the full table plus the role
/// distribution and the two leaderboards the processing report prints.
pub fn export_statistics_workbook(path: &Path, rows: &[PlayerStatistics]) -> Result<ExportReport> {
    let mut stats_rows: Vec<Vec<String>> =
        vec![STATS_COLUMNS.iter().map(|s| s.to_string()).collect()];
    stats_rows.extend(rows.iter().map(statistics_row));

    let mut role_rows = vec![vec!["Role".to_string(), "Players".to_string()]];
    let distribution = player_stats::role_distribution(rows);
    for (role, count) in &distribution {
        role_rows.push(vec![role.label().to_string(), count.to_string()]);
    }

    let mut scorer_rows = vec![vec![
        "Player".to_string(),
        "Total Runs".to_string(),
        "Batting Average".to_string(),
        "Strike Rate".to_string(),
    ]];
    for row in rows.iter().take(LEADERBOARD_LIMIT) {
        scorer_rows.push(vec![
            row.player.clone(),
            row.total_runs.to_string(),
            rate_cell(row.batting_average),
            rate_cell(row.strike_rate),
        ]);
    }

    let mut taker_rows = vec![vec![
        "Player".to_string(),
        "Wickets".to_string(),
        "Economy Rate".to_string(),
        "Bowling Average".to_string(),
    ]];
    let takers = player_stats::top_wicket_takers(rows, LEADERBOARD_LIMIT);
    for row in &takers {
        taker_rows.push(vec![
            row.player.clone(),
            row.wickets.to_string(),
            rate_cell(row.economy_rate),
            rate_cell(row.bowling_average),
        ]);
    }

    let meta_rows = vec![
        vec!["Generated".to_string(), Utc::now().to_rfc3339()],
        vec!["Players".to_string(), rows.len().to_string()],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("PlayerStatistics")?;
        write_rows(sheet, &stats_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Roles")?;
        write_rows(sheet, &role_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TopRunScorers")?;
        write_rows(sheet, &scorer_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TopWicketTakers")?;
        write_rows(sheet, &taker_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Meta")?;
        write_rows(sheet, &meta_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: rows.len(),
        roles: distribution.len(),
        run_scorers: scorer_rows.len().saturating_sub(1),
        wicket_takers: taker_rows.len().saturating_sub(1),
    })
}

fn statistics_row(row: &PlayerStatistics) -> Vec<String> {
    vec![
        row.player.clone(),
        row.total_runs.to_string(),
        row.balls_faced.to_string(),
        row.times_out.to_string(),
        row.matches_played.to_string(),
        rate_cell(row.batting_average),
        rate_cell(row.strike_rate),
        row.fours.to_string(),
        row.sixes.to_string(),
        row.runs_conceded.to_string(),
        row.wickets.to_string(),
        row.balls_bowled.to_string(),
        row.matches_bowled.to_string(),
        rate_cell(row.economy_rate),
        rate_cell(row.bowling_average),
        rate_cell(row.bowling_strike_rate),
        row.role.label().to_string(),
        row.total_matches.to_string(),
    ]
}

fn rate_cell(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        String::new()
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
