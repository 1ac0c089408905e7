use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use csv::StringRecord;

/// One ball bowled. The atomic event unit of the delivery log.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub match_id: u64,
    pub ball: u32,
    pub batter: String,
    pub bowler: String,
    pub batsman_runs: u32,
    pub total_runs: u32,
    pub is_wicket: bool,
}

/// Match metadata row. Summarized for diagnostics only; the stats pipeline
/// never joins against it.
#[derive(Debug, Clone, Default)]
pub struct MatchRecord {
    pub match_id: u64,
    pub season: Option<String>,
    pub city: Option<String>,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub winner: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MatchLogSummary {
    pub matches: usize,
    pub deliveries: usize,
    pub seasons: Vec<String>,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

const DELIVERY_COLUMNS: [&str; 7] = [
    "match_id",
    "ball",
    "batter",
    "bowler",
    "batsman_runs",
    "total_runs",
    "is_wicket",
];

pub fn default_data_dir() -> PathBuf {
    env_path("IPL_DATA_DIR").unwrap_or_else(|| PathBuf::from("data"))
}

pub fn default_deliveries_path() -> PathBuf {
    env_path("IPL_DELIVERIES_CSV").unwrap_or_else(|| default_data_dir().join("deliveries.csv"))
}

pub fn default_matches_path() -> PathBuf {
    env_path("IPL_MATCHES_CSV").unwrap_or_else(|| default_data_dir().join("matches.csv"))
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

pub fn load_deliveries(path: &Path) -> Result<Vec<Delivery>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open deliveries file {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("read deliveries header {}", path.display()))?
        .clone();
    let idx = resolve_columns(&headers, &DELIVERY_COLUMNS)
        .with_context(|| format!("deliveries file {}", path.display()))?;

    let mut out = Vec::new();
    for (row, record) in reader.records().enumerate() {
        // Header is line 1; first data record is line 2.
        let line = row + 2;
        let record = record.with_context(|| format!("read deliveries line {line}"))?;
        out.push(parse_delivery(&record, &idx).with_context(|| {
            format!("deliveries line {line} in {}", path.display())
        })?);
    }
    Ok(out)
}

pub fn load_matches(path: &Path) -> Result<Vec<MatchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open matches file {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("read matches header {}", path.display()))?
        .clone();
    let id_col = find_column(&headers, "match_id")
        .or_else(|| find_column(&headers, "id"))
        .ok_or_else(|| {
            anyhow!(
                "matches file {} is missing required column match_id (or id)",
                path.display()
            )
        })?;

    let season = find_column(&headers, "season");
    let city = find_column(&headers, "city");
    let date = find_column(&headers, "date");
    let venue = find_column(&headers, "venue");
    let team1 = find_column(&headers, "team1");
    let team2 = find_column(&headers, "team2");
    let winner = find_column(&headers, "winner");

    let mut out = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let line = row + 2;
        let record = record.with_context(|| format!("read matches line {line}"))?;
        let match_id = parse_u64(&record, id_col, "match_id")
            .with_context(|| format!("matches line {line} in {}", path.display()))?;
        out.push(MatchRecord {
            match_id,
            season: optional_field(&record, season),
            city: optional_field(&record, city),
            date: optional_field(&record, date),
            venue: optional_field(&record, venue),
            team1: optional_field(&record, team1),
            team2: optional_field(&record, team2),
            winner: optional_field(&record, winner),
        });
    }
    Ok(out)
}

pub fn summarize(matches: &[MatchRecord], deliveries: &[Delivery]) -> MatchLogSummary {
    let seasons: BTreeSet<String> = matches
        .iter()
        .filter_map(|m| m.season.clone())
        .collect();
    let mut dates: Vec<&str> = matches
        .iter()
        .filter_map(|m| m.date.as_deref())
        .collect();
    dates.sort_unstable();
    MatchLogSummary {
        matches: matches.len(),
        deliveries: deliveries.len(),
        seasons: seasons.into_iter().collect(),
        first_date: dates.first().map(|d| d.to_string()),
        last_date: dates.last().map(|d| d.to_string()),
    }
}

struct DeliveryColumns {
    match_id: usize,
    ball: usize,
    batter: usize,
    bowler: usize,
    batsman_runs: usize,
    total_runs: usize,
    is_wicket: usize,
}

fn resolve_columns(headers: &StringRecord, required: &[&str; 7]) -> Result<DeliveryColumns> {
    let mut found = [0usize; 7];
    for (slot, name) in required.iter().enumerate() {
        let Some(col) = find_column(headers, name) else {
            return Err(anyhow!("missing required column {name}"));
        };
        found[slot] = col;
    }
    Ok(DeliveryColumns {
        match_id: found[0],
        ball: found[1],
        batter: found[2],
        bowler: found[3],
        batsman_runs: found[4],
        total_runs: found[5],
        is_wicket: found[6],
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_delivery(record: &StringRecord, idx: &DeliveryColumns) -> Result<Delivery> {
    let batter = required_field(record, idx.batter, "batter")?;
    let bowler = required_field(record, idx.bowler, "bowler")?;
    Ok(Delivery {
        match_id: parse_u64(record, idx.match_id, "match_id")?,
        ball: parse_u32(record, idx.ball, "ball")?,
        batter,
        bowler,
        batsman_runs: parse_u32(record, idx.batsman_runs, "batsman_runs")?,
        total_runs: parse_u32(record, idx.total_runs, "total_runs")?,
        is_wicket: parse_flag(record, idx.is_wicket, "is_wicket")?,
    })
}

fn required_field(record: &StringRecord, col: usize, name: &str) -> Result<String> {
    let raw = record.get(col).unwrap_or("").trim();
    if raw.is_empty() {
        return Err(anyhow!("empty value for column {name}"));
    }
    Ok(raw.to_string())
}

fn optional_field(record: &StringRecord, col: Option<usize>) -> Option<String> {
    let raw = record.get(col?)?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.to_string())
}

fn parse_u64(record: &StringRecord, col: usize, name: &str) -> Result<u64> {
    let raw = record.get(col).unwrap_or("").trim();
    raw.parse::<u64>()
        .map_err(|_| anyhow!("invalid {name} value '{raw}'"))
}

fn parse_u32(record: &StringRecord, col: usize, name: &str) -> Result<u32> {
    let raw = record.get(col).unwrap_or("").trim();
    // Some exports carry whole counts as floats ("2.0"); fractional values
    // stay invalid.
    if let Ok(n) = raw.parse::<u32>() {
        return Ok(n);
    }
    if let Ok(f) = raw.parse::<f64>()
        && f.fract() == 0.0
        && f >= 0.0
        && f <= u32::MAX as f64
    {
        return Ok(f as u32);
    }
    Err(anyhow!("invalid {name} value '{raw}'"))
}

fn parse_flag(record: &StringRecord, col: usize, name: &str) -> Result<bool> {
    let raw = record.get(col).unwrap_or("").trim();
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(anyhow!("invalid {name} value '{raw}'")),
        },
    }
}
