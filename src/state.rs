use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::perf_model::{self, PerformanceModel};
use crate::player_stats::{PlayerStatistics, Role};
use crate::stats_store;

/// Everything the dashboard reads. Built once at startup and passed by
/// reference into render handlers; never mutated afterwards.
pub struct AppContext {
    pub players: Vec<PlayerStatistics>,
    pub model: Option<PerformanceModel>,
    pub model_error: Option<String>,
    pub stats_path: PathBuf,
}

impl AppContext {
    /// Load the summary table and the model artifact from their configured
    /// paths. A missing model degrades the prediction panel; a missing
    /// table is fatal.
    pub fn load() -> Result<AppContext> {
        let stats_path = stats_store::default_stats_path();
        let players = stats_store::read_statistics_csv(&stats_path)
            .with_context(|| format!("load player statistics {}", stats_path.display()))?;

        let model_path = perf_model::default_model_path();
        let (model, model_error) = match PerformanceModel::load(&model_path) {
            Ok(model) => (Some(model), None),
            Err(err) => (None, Some(format!("{err:#}"))),
        };

        Ok(AppContext {
            players,
            model,
            model_error,
            stats_path,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleFilter {
    All,
    Batting,
    Bowling,
    AllRounders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Runs,
    Wickets,
    Average,
    StrikeRate,
}

#[derive(Debug, Clone, Copy)]
pub struct LeagueAverages {
    pub batting_average: f64,
    pub strike_rate: f64,
    pub runs_per_match: f64,
}

pub struct AppState {
    pub screen: Screen,
    pub role_filter: RoleFilter,
    pub sort: SortMode,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Roster,
            role_filter: RoleFilter::All,
            sort: SortMode::Runs,
            selected: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    /// Roster view: filter by role, then order by the active sort mode.
    /// Name breaks every tie so the list never jumps between redraws.
    pub fn filtered_players<'a>(&self, ctx: &'a AppContext) -> Vec<&'a PlayerStatistics> {
        let mut rows: Vec<&PlayerStatistics> = ctx
            .players
            .iter()
            .filter(|p| role_matches(self.role_filter, p.role))
            .collect();
        match self.sort {
            SortMode::Runs => rows.sort_by(|a, b| {
                b.total_runs
                    .cmp(&a.total_runs)
                    .then_with(|| a.player.cmp(&b.player))
            }),
            SortMode::Wickets => rows.sort_by(|a, b| {
                b.wickets
                    .cmp(&a.wickets)
                    .then_with(|| a.player.cmp(&b.player))
            }),
            SortMode::Average => rows.sort_by(|a, b| {
                sort_key(b.batting_average)
                    .total_cmp(&sort_key(a.batting_average))
                    .then_with(|| a.player.cmp(&b.player))
            }),
            SortMode::StrikeRate => rows.sort_by(|a, b| {
                sort_key(b.strike_rate)
                    .total_cmp(&sort_key(a.strike_rate))
                    .then_with(|| a.player.cmp(&b.player))
            }),
        }
        rows
    }

    pub fn selected_player<'a>(&self, ctx: &'a AppContext) -> Option<&'a PlayerStatistics> {
        self.filtered_players(ctx).into_iter().nth(self.selected)
    }

    pub fn select_next(&mut self, ctx: &AppContext) {
        let total = self.filtered_players(ctx).len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self, ctx: &AppContext) {
        let total = self.filtered_players(ctx).len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn cycle_role_filter(&mut self) {
        self.role_filter = match self.role_filter {
            RoleFilter::All => RoleFilter::Batting,
            RoleFilter::Batting => RoleFilter::Bowling,
            RoleFilter::Bowling => RoleFilter::AllRounders,
            RoleFilter::AllRounders => RoleFilter::All,
        };
        self.selected = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            SortMode::Runs => SortMode::Wickets,
            SortMode::Wickets => SortMode::Average,
            SortMode::Average => SortMode::StrikeRate,
            SortMode::StrikeRate => SortMode::Runs,
        };
        self.selected = 0;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn role_matches(filter: RoleFilter, role: Role) -> bool {
    match filter {
        RoleFilter::All => true,
        RoleFilter::Batting => matches!(role, Role::Batsman | Role::AllRounder),
        RoleFilter::Bowling => matches!(role, Role::Bowler | Role::AllRounder),
        RoleFilter::AllRounders => role == Role::AllRounder,
    }
}

// NaN sorts last regardless of direction.
fn sort_key(v: f64) -> f64 {
    if v.is_finite() { v } else { f64::NEG_INFINITY }
}

pub fn role_filter_label(filter: RoleFilter) -> &'static str {
    match filter {
        RoleFilter::All => "ALL",
        RoleFilter::Batting => "BATTING",
        RoleFilter::Bowling => "BOWLING",
        RoleFilter::AllRounders => "ALL-ROUNDERS",
    }
}

pub fn sort_label(sort: SortMode) -> &'static str {
    match sort {
        SortMode::Runs => "RUNS",
        SortMode::Wickets => "WICKETS",
        SortMode::Average => "AVG",
        SortMode::StrikeRate => "SR",
    }
}

/// League-average comparison values over the currently filtered set.
pub fn league_averages(rows: &[&PlayerStatistics]) -> Option<LeagueAverages> {
    if rows.is_empty() {
        return None;
    }
    let mut avg_sum = 0.0;
    let mut avg_n = 0usize;
    let mut sr_sum = 0.0;
    let mut sr_n = 0usize;
    let mut rpm_sum = 0.0;
    let mut rpm_n = 0usize;
    for row in rows {
        if row.batting_average.is_finite() {
            avg_sum += row.batting_average;
            avg_n += 1;
        }
        if row.strike_rate.is_finite() {
            sr_sum += row.strike_rate;
            sr_n += 1;
        }
        if row.matches_played > 0 {
            rpm_sum += row.total_runs as f64 / row.matches_played as f64;
            rpm_n += 1;
        }
    }
    if avg_n == 0 && sr_n == 0 && rpm_n == 0 {
        return None;
    }
    Some(LeagueAverages {
        batting_average: mean(avg_sum, avg_n),
        strike_rate: mean(sr_sum, sr_n),
        runs_per_match: mean(rpm_sum, rpm_n),
    })
}

fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { sum / n as f64 }
}
