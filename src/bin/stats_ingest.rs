use std::path::PathBuf;

use anyhow::{Context, Result};

use ipl_terminal::match_log;
use ipl_terminal::player_stats::{self, SIGNIFICANT_MATCHES};
use ipl_terminal::stats_export;
use ipl_terminal::stats_store;

const TOP_LIMIT: usize = 10;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let deliveries_path =
        parse_path_arg("--deliveries").unwrap_or_else(match_log::default_deliveries_path);
    let matches_path = parse_path_arg("--matches").unwrap_or_else(match_log::default_matches_path);
    let out_path = parse_path_arg("--out").unwrap_or_else(stats_store::default_stats_path);
    let xlsx_path = parse_path_arg("--xlsx");

    let matches = match_log::load_matches(&matches_path)
        .with_context(|| format!("load matches from {}", matches_path.display()))?;
    let deliveries = match_log::load_deliveries(&deliveries_path)
        .with_context(|| format!("load deliveries from {}", deliveries_path.display()))?;

    let summary = match_log::summarize(&matches, &deliveries);
    println!(
        "Loaded {} matches and {} deliveries",
        summary.matches, summary.deliveries
    );
    if !summary.seasons.is_empty() {
        println!("Seasons: {}", summary.seasons.join(", "));
    }
    if let (Some(first), Some(last)) = (&summary.first_date, &summary.last_date) {
        println!("Dates: {first} .. {last}");
    }

    let rows = player_stats::process_player_stats(&deliveries);
    stats_store::write_statistics_csv(&out_path, &rows)
        .with_context(|| format!("write statistics to {}", out_path.display()))?;

    println!();
    println!(
        "Significant players (>= {SIGNIFICANT_MATCHES} matches): {}",
        rows.len()
    );
    println!("Output: {}", out_path.display());

    println!();
    println!("Role distribution:");
    for (role, count) in player_stats::role_distribution(&rows) {
        println!("  {:<12} {count}", role.label());
    }

    println!();
    println!("Top {TOP_LIMIT} run scorers:");
    for row in rows.iter().take(TOP_LIMIT) {
        println!(
            "  {:<24} runs={:<5} avg={:<7} sr={}",
            row.player,
            row.total_runs,
            fmt_rate(row.batting_average),
            fmt_rate(row.strike_rate)
        );
    }

    println!();
    println!("Top {TOP_LIMIT} wicket takers:");
    for row in player_stats::top_wicket_takers(&rows, TOP_LIMIT) {
        println!(
            "  {:<24} wkts={:<4} econ={:<6} avg={}",
            row.player,
            row.wickets,
            fmt_rate(row.economy_rate),
            fmt_rate(row.bowling_average)
        );
    }

    if let Some(xlsx_path) = xlsx_path {
        let report = stats_export::export_statistics_workbook(&xlsx_path, &rows)
            .with_context(|| format!("export workbook to {}", xlsx_path.display()))?;
        println!();
        println!(
            "Workbook: {} ({} players, {} roles, {} scorers, {} takers)",
            xlsx_path.display(),
            report.players,
            report.roles,
            report.run_scorers,
            report.wicket_takers
        );
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn fmt_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "-".to_string()
    }
}
