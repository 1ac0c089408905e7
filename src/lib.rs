pub mod match_log;
pub mod perf_model;
pub mod player_stats;
pub mod state;
pub mod stats_export;
pub mod stats_store;
