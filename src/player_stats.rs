use std::collections::{HashMap, HashSet};

use crate::match_log::Delivery;

/// Participation needed in a single discipline before a role sticks.
pub const ROLE_MATCH_THRESHOLD: u64 = 10;
/// Combined-matches retention threshold for the output table.
pub const SIGNIFICANT_MATCHES: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Batsman,
    Bowler,
    AllRounder,
    Unknown,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::AllRounder => "All-rounder",
            Role::Unknown => "Unknown",
        }
    }

    pub fn from_label(raw: &str) -> Option<Role> {
        match raw.trim() {
            "Batsman" => Some(Role::Batsman),
            "Bowler" => Some(Role::Bowler),
            "All-rounder" => Some(Role::AllRounder),
            "Unknown" => Some(Role::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BattingSummary {
    pub player: String,
    pub total_runs: u64,
    pub balls_faced: u64,
    pub times_out: u64,
    pub matches_played: u64,
    pub batting_average: f64,
    pub strike_rate: f64,
    pub fours: u64,
    pub sixes: u64,
}

#[derive(Debug, Clone)]
pub struct BowlingSummary {
    pub player: String,
    pub runs_conceded: u64,
    pub wickets: u64,
    pub balls_bowled: u64,
    pub matches_bowled: u64,
    pub economy_rate: f64,
    pub bowling_average: f64,
    pub bowling_strike_rate: f64,
}

/// One output row: outer merge of the two summaries, zero-filled on the
/// side the player never appeared on.
#[derive(Debug, Clone)]
pub struct PlayerStatistics {
    pub player: String,
    pub total_runs: u64,
    pub balls_faced: u64,
    pub times_out: u64,
    pub matches_played: u64,
    pub batting_average: f64,
    pub strike_rate: f64,
    pub fours: u64,
    pub sixes: u64,
    pub runs_conceded: u64,
    pub wickets: u64,
    pub balls_bowled: u64,
    pub matches_bowled: u64,
    pub economy_rate: f64,
    pub bowling_average: f64,
    pub bowling_strike_rate: f64,
    pub role: Role,
    pub total_matches: u64,
}

#[derive(Debug, Clone, Default)]
struct BattingAcc {
    runs: u64,
    balls: u64,
    outs: u64,
    matches: HashSet<u64>,
    fours: u64,
    sixes: u64,
}

#[derive(Debug, Clone, Default)]
struct BowlingAcc {
    runs: u64,
    wickets: u64,
    balls: u64,
    matches: HashSet<u64>,
}

pub fn batting_summaries(deliveries: &[Delivery]) -> Vec<BattingSummary> {
    let mut acc: HashMap<String, BattingAcc> = HashMap::new();
    for d in deliveries {
        let entry = acc.entry(d.batter.clone()).or_default();
        entry.runs += d.batsman_runs as u64;
        entry.balls += 1;
        if d.is_wicket {
            entry.outs += 1;
        }
        entry.matches.insert(d.match_id);
        match d.batsman_runs {
            4 => entry.fours += 1,
            6 => entry.sixes += 1,
            _ => {}
        }
    }

    let mut out: Vec<BattingSummary> = acc
        .into_iter()
        .map(|(player, a)| {
            // An undefined average (never dismissed) is defined as the raw
            // run total, not left NaN.
            let batting_average = if a.outs == 0 {
                a.runs as f64
            } else {
                round2(a.runs as f64 / a.outs as f64)
            };
            BattingSummary {
                player,
                total_runs: a.runs,
                balls_faced: a.balls,
                times_out: a.outs,
                matches_played: a.matches.len() as u64,
                batting_average,
                strike_rate: round2(a.runs as f64 / a.balls as f64 * 100.0),
                fours: a.fours,
                sixes: a.sixes,
            }
        })
        .collect();
    out.sort_by(|a, b| a.player.cmp(&b.player));
    out
}

pub fn bowling_summaries(deliveries: &[Delivery]) -> Vec<BowlingSummary> {
    let mut acc: HashMap<String, BowlingAcc> = HashMap::new();
    for d in deliveries {
        let entry = acc.entry(d.bowler.clone()).or_default();
        entry.runs += d.total_runs as u64;
        entry.balls += 1;
        if d.is_wicket {
            entry.wickets += 1;
        }
        entry.matches.insert(d.match_id);
    }

    let mut out: Vec<BowlingSummary> = acc
        .into_iter()
        .map(|(player, a)| BowlingSummary {
            player,
            runs_conceded: a.runs,
            wickets: a.wickets,
            balls_bowled: a.balls,
            matches_bowled: a.matches.len() as u64,
            economy_rate: round2(a.runs as f64 / a.balls as f64 * 6.0),
            // Zero wickets leaves these undefined; NaN is tolerated
            // downstream, never raised.
            bowling_average: div2(a.runs as f64, a.wickets as f64),
            bowling_strike_rate: div2(a.balls as f64, a.wickets as f64),
        })
        .collect();
    out.sort_by(|a, b| a.player.cmp(&b.player));
    out
}

/// Role from participation counts alone, strict precedence order.
pub fn classify_role(matches_played: u64, matches_bowled: u64) -> Role {
    if matches_played >= ROLE_MATCH_THRESHOLD && matches_bowled >= ROLE_MATCH_THRESHOLD {
        Role::AllRounder
    } else if matches_played >= ROLE_MATCH_THRESHOLD {
        Role::Batsman
    } else if matches_bowled >= ROLE_MATCH_THRESHOLD {
        Role::Bowler
    } else {
        Role::Unknown
    }
}

/// Full pipeline: aggregate both disciplines, outer-merge on player name,
/// classify, keep players with at least [`SIGNIFICANT_MATCHES`] combined
/// matches, sort by total runs (player name breaks ties so output is
/// reproducible).
pub fn process_player_stats(deliveries: &[Delivery]) -> Vec<PlayerStatistics> {
    let batting = batting_summaries(deliveries);
    let bowling = bowling_summaries(deliveries);
    let mut rows = merge_summaries(batting, bowling);
    rows.retain(|row| row.total_matches >= SIGNIFICANT_MATCHES);
    rows.sort_by(|a, b| {
        b.total_runs
            .cmp(&a.total_runs)
            .then_with(|| a.player.cmp(&b.player))
    });
    rows
}

fn merge_summaries(
    batting: Vec<BattingSummary>,
    bowling: Vec<BowlingSummary>,
) -> Vec<PlayerStatistics> {
    let mut by_player: HashMap<String, PlayerStatistics> = HashMap::new();

    for b in batting {
        by_player.insert(
            b.player.clone(),
            PlayerStatistics {
                player: b.player,
                total_runs: b.total_runs,
                balls_faced: b.balls_faced,
                times_out: b.times_out,
                matches_played: b.matches_played,
                batting_average: b.batting_average,
                strike_rate: b.strike_rate,
                fours: b.fours,
                sixes: b.sixes,
                runs_conceded: 0,
                wickets: 0,
                balls_bowled: 0,
                matches_bowled: 0,
                economy_rate: 0.0,
                bowling_average: 0.0,
                bowling_strike_rate: 0.0,
                role: Role::Unknown,
                total_matches: 0,
            },
        );
    }

    for w in bowling {
        let entry = by_player
            .entry(w.player.clone())
            .or_insert_with(|| PlayerStatistics {
                player: w.player.clone(),
                total_runs: 0,
                balls_faced: 0,
                times_out: 0,
                matches_played: 0,
                batting_average: 0.0,
                strike_rate: 0.0,
                fours: 0,
                sixes: 0,
                runs_conceded: 0,
                wickets: 0,
                balls_bowled: 0,
                matches_bowled: 0,
                economy_rate: 0.0,
                bowling_average: 0.0,
                bowling_strike_rate: 0.0,
                role: Role::Unknown,
                total_matches: 0,
            });
        entry.runs_conceded = w.runs_conceded;
        entry.wickets = w.wickets;
        entry.balls_bowled = w.balls_bowled;
        entry.matches_bowled = w.matches_bowled;
        entry.economy_rate = w.economy_rate;
        entry.bowling_average = w.bowling_average;
        entry.bowling_strike_rate = w.bowling_strike_rate;
    }

    // Role is assigned before the participation filter, matching the
    // original pipeline ordering.
    let mut rows: Vec<PlayerStatistics> = by_player.into_values().collect();
    for row in &mut rows {
        row.role = classify_role(row.matches_played, row.matches_bowled);
        row.total_matches = row.matches_played.max(row.matches_bowled);
    }
    rows
}

/// Role counts over the retained table, in a fixed display order.
pub fn role_distribution(rows: &[PlayerStatistics]) -> Vec<(Role, usize)> {
    let mut counts: HashMap<Role, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.role).or_default() += 1;
    }
    [Role::Batsman, Role::Bowler, Role::AllRounder, Role::Unknown]
        .into_iter()
        .filter_map(|role| counts.get(&role).map(|n| (role, *n)))
        .collect()
}

/// Top wicket takers among retained players, wicketless players excluded.
pub fn top_wicket_takers(rows: &[PlayerStatistics], limit: usize) -> Vec<&PlayerStatistics> {
    let mut bowlers: Vec<&PlayerStatistics> = rows.iter().filter(|r| r.wickets > 0).collect();
    bowlers.sort_by(|a, b| {
        b.wickets
            .cmp(&a.wickets)
            .then_with(|| a.player.cmp(&b.player))
    });
    bowlers.truncate(limit);
    bowlers
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn div2(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::NAN
    } else {
        round2(num / den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(match_id: u64, batter: &str, bowler: &str, runs: u32, wicket: bool) -> Delivery {
        Delivery {
            match_id,
            ball: 1,
            batter: batter.to_string(),
            bowler: bowler.to_string(),
            batsman_runs: runs,
            total_runs: runs,
            is_wicket: wicket,
        }
    }

    #[test]
    fn batting_scenario_matches_formulas() {
        let deliveries: Vec<Delivery> = [4, 0, 6, 1, 0]
            .into_iter()
            .map(|runs| ball(1, "Sharma", "Khan", runs, false))
            .collect();
        let rows = batting_summaries(&deliveries);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total_runs, 11);
        assert_eq!(row.balls_faced, 5);
        assert_eq!(row.times_out, 0);
        assert_eq!(row.batting_average, 11.0);
        assert_eq!(row.strike_rate, 220.0);
        assert_eq!(row.fours, 1);
        assert_eq!(row.sixes, 1);
    }

    #[test]
    fn bowling_scenario_matches_formulas() {
        let mut deliveries = Vec::new();
        for i in 0..24u32 {
            let runs = if i < 15 { 2 } else { 0 };
            let wicket = i == 5 || i == 17;
            deliveries.push(ball(1, "batter", "Bumrah", runs, wicket));
        }
        let rows = bowling_summaries(&deliveries);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.runs_conceded, 30);
        assert_eq!(row.balls_bowled, 24);
        assert_eq!(row.wickets, 2);
        assert_eq!(row.economy_rate, 7.5);
        assert_eq!(row.bowling_average, 15.0);
        assert_eq!(row.bowling_strike_rate, 12.0);
    }

    #[test]
    fn zero_wickets_leaves_bowling_rates_undefined() {
        let deliveries = vec![ball(1, "batter", "Ashwin", 1, false)];
        let rows = bowling_summaries(&deliveries);
        assert!(rows[0].bowling_average.is_nan());
        assert!(rows[0].bowling_strike_rate.is_nan());
        assert!(rows[0].economy_rate.is_finite());
    }

    #[test]
    fn role_precedence() {
        assert_eq!(classify_role(12, 0), Role::Batsman);
        assert_eq!(classify_role(11, 11), Role::AllRounder);
        assert_eq!(classify_role(10, 10), Role::AllRounder);
        assert_eq!(classify_role(3, 10), Role::Bowler);
        assert_eq!(classify_role(5, 5), Role::Unknown);
        assert_eq!(classify_role(9, 9), Role::Unknown);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(process_player_stats(&[]).is_empty());
    }

    #[test]
    fn role_labels_round_trip() {
        for role in [Role::Batsman, Role::Bowler, Role::AllRounder, Role::Unknown] {
            assert_eq!(Role::from_label(role.label()), Some(role));
        }
        assert_eq!(Role::from_label("Wicketkeeper"), None);
    }
}
