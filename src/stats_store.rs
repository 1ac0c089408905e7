use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use csv::StringRecord;

use crate::match_log::default_data_dir;
use crate::player_stats::{PlayerStatistics, Role};

/// Output schema, in contract order. The dashboard and the model both key
/// off these names.
pub const STATS_COLUMNS: [&str; 18] = [
    "player",
    "total_runs",
    "balls_faced",
    "times_out",
    "matches_played",
    "batting_average",
    "strike_rate",
    "fours",
    "sixes",
    "runs_conceded",
    "wickets",
    "balls_bowled",
    "matches_bowled",
    "economy_rate",
    "bowling_average",
    "bowling_strike_rate",
    "role",
    "total_matches",
];

pub fn default_stats_path() -> PathBuf {
    match std::env::var("IPL_STATS_CSV") {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => default_data_dir().join("player_statistics.csv"),
    }
}

/// Write the summary table. Goes through a tmp file and a rename so a
/// failed run never leaves a truncated table behind.
pub fn write_statistics_csv(path: &Path, rows: &[PlayerStatistics]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }

    let tmp = path.with_extension("csv.tmp");
    let mut writer = csv::Writer::from_path(&tmp)
        .with_context(|| format!("open output file {}", tmp.display()))?;

    writer
        .write_record(STATS_COLUMNS)
        .context("write statistics header")?;
    for row in rows {
        writer
            .write_record(statistics_record(row))
            .with_context(|| format!("write statistics row for {}", row.player))?;
    }
    writer.flush().context("flush statistics file")?;
    drop(writer);

    std::fs::rename(&tmp, path)
        .with_context(|| format!("swap statistics file into {}", path.display()))?;
    Ok(())
}

pub fn read_statistics_csv(path: &Path) -> Result<Vec<PlayerStatistics>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open statistics file {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("read statistics header {}", path.display()))?
        .clone();
    let mut cols = [0usize; 18];
    for (slot, name) in STATS_COLUMNS.iter().enumerate() {
        let Some(col) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) else {
            return Err(anyhow!(
                "statistics file {} is missing column {name}",
                path.display()
            ));
        };
        cols[slot] = col;
    }

    let mut out = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let line = row + 2;
        let record = record.with_context(|| format!("read statistics line {line}"))?;
        out.push(
            parse_statistics_record(&record, &cols)
                .with_context(|| format!("statistics line {line} in {}", path.display()))?,
        );
    }
    Ok(out)
}

fn statistics_record(row: &PlayerStatistics) -> Vec<String> {
    vec![
        row.player.clone(),
        row.total_runs.to_string(),
        row.balls_faced.to_string(),
        row.times_out.to_string(),
        row.matches_played.to_string(),
        format_rate(row.batting_average),
        format_rate(row.strike_rate),
        row.fours.to_string(),
        row.sixes.to_string(),
        row.runs_conceded.to_string(),
        row.wickets.to_string(),
        row.balls_bowled.to_string(),
        row.matches_bowled.to_string(),
        format_rate(row.economy_rate),
        format_rate(row.bowling_average),
        format_rate(row.bowling_strike_rate),
        row.role.label().to_string(),
        row.total_matches.to_string(),
    ]
}

// Undefined rates serialize as empty fields, mirroring what the summary
// table has always carried for wicketless bowlers.
fn format_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v}")
    } else {
        String::new()
    }
}

fn parse_statistics_record(record: &StringRecord, cols: &[usize; 18]) -> Result<PlayerStatistics> {
    let field = |slot: usize| record.get(cols[slot]).unwrap_or("").trim();

    let player = field(0).to_string();
    if player.is_empty() {
        return Err(anyhow!("empty player name"));
    }
    let role_raw = field(16);
    let role = Role::from_label(role_raw)
        .ok_or_else(|| anyhow!("unknown role label '{role_raw}'"))?;

    Ok(PlayerStatistics {
        player,
        total_runs: parse_count(field(1), "total_runs")?,
        balls_faced: parse_count(field(2), "balls_faced")?,
        times_out: parse_count(field(3), "times_out")?,
        matches_played: parse_count(field(4), "matches_played")?,
        batting_average: parse_rate(field(5), "batting_average")?,
        strike_rate: parse_rate(field(6), "strike_rate")?,
        fours: parse_count(field(7), "fours")?,
        sixes: parse_count(field(8), "sixes")?,
        runs_conceded: parse_count(field(9), "runs_conceded")?,
        wickets: parse_count(field(10), "wickets")?,
        balls_bowled: parse_count(field(11), "balls_bowled")?,
        matches_bowled: parse_count(field(12), "matches_bowled")?,
        economy_rate: parse_rate(field(13), "economy_rate")?,
        bowling_average: parse_rate(field(14), "bowling_average")?,
        bowling_strike_rate: parse_rate(field(15), "bowling_strike_rate")?,
        role,
        total_matches: parse_count(field(17), "total_matches")?,
    })
}

fn parse_count(raw: &str, name: &str) -> Result<u64> {
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(n);
    }
    // Tables written by pandas carry counts as floats ("12.0").
    if let Ok(f) = raw.parse::<f64>()
        && f.fract() == 0.0
        && f >= 0.0
    {
        return Ok(f as u64);
    }
    Err(anyhow!("invalid {name} value '{raw}'"))
}

fn parse_rate(raw: &str, name: &str) -> Result<f64> {
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>()
        .map_err(|_| anyhow!("invalid {name} value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_rates_write_as_empty_fields() {
        assert_eq!(format_rate(f64::NAN), "");
        assert_eq!(format_rate(7.5), "7.5");
    }

    #[test]
    fn counts_accept_float_form() {
        assert_eq!(parse_count("12", "matches_played").unwrap(), 12);
        assert_eq!(parse_count("12.0", "matches_played").unwrap(), 12);
        assert!(parse_count("12.5", "matches_played").is_err());
    }

    #[test]
    fn empty_rate_reads_back_as_nan() {
        assert!(parse_rate("", "bowling_average").unwrap().is_nan());
        assert_eq!(parse_rate("15.0", "bowling_average").unwrap(), 15.0);
    }
}
