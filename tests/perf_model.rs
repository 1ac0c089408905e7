use std::path::PathBuf;

use ipl_terminal::perf_model::{
    PERFORMANCE_FEATURE_NAMES, PerformanceClass, PerformanceModel, features_for,
    prediction_eligible,
};
use ipl_terminal::player_stats::{PlayerStatistics, Role};

fn committed_model() -> PerformanceModel {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("models");
    path.push("player_performance_model.json");
    PerformanceModel::load(&path).expect("committed artifact should load")
}

fn player(role: Role, total_runs: u64, strike_rate: f64) -> PlayerStatistics {
    PlayerStatistics {
        player: "Test".to_string(),
        total_runs,
        balls_faced: 1800,
        times_out: 60,
        matches_played: 90,
        batting_average: 38.0,
        strike_rate,
        fours: 220,
        sixes: 95,
        runs_conceded: 0,
        wickets: 0,
        balls_bowled: 0,
        matches_bowled: 0,
        economy_rate: 0.0,
        bowling_average: f64::NAN,
        bowling_strike_rate: f64::NAN,
        role,
        total_matches: 90,
    }
}

#[test]
fn committed_artifact_matches_the_feature_contract() {
    let model = committed_model();
    let artifact = model.artifact();
    assert_eq!(artifact.feature_names, PERFORMANCE_FEATURE_NAMES.to_vec());
    assert_eq!(artifact.feature_means.len(), 6);
    assert_eq!(artifact.feature_stds.len(), 6);
    assert_eq!(artifact.coeffs.len(), 6);
}

#[test]
fn prediction_returns_a_proper_distribution() {
    let model = committed_model();
    let pred = model.predict_player(&player(Role::Batsman, 2400, 135.0));
    assert!((pred.p_high + pred.p_regular - 1.0).abs() < 1e-12);
    assert!(pred.p_high > 0.0 && pred.p_high < 1.0);
    assert!(pred.confidence() >= 50.0);
    assert!(pred.confidence() <= 100.0);
}

#[test]
fn aggressive_profile_outranks_a_passive_one() {
    let model = committed_model();
    let slow = model.predict_player(&player(Role::Batsman, 900, 105.0));
    let fast = model.predict_player(&player(Role::Batsman, 2400, 148.0));
    assert!(fast.p_high > slow.p_high);
}

#[test]
fn predicted_class_tracks_the_high_probability() {
    let model = committed_model();
    let pred = model.predict_player(&player(Role::AllRounder, 2400, 150.0));
    if pred.p_high >= 0.5 {
        assert_eq!(pred.class, PerformanceClass::High);
    } else {
        assert_eq!(pred.class, PerformanceClass::Regular);
    }
}

#[test]
fn eligibility_needs_batting_role_and_runs() {
    assert!(prediction_eligible(&player(Role::Batsman, 201, 130.0)));
    assert!(prediction_eligible(&player(Role::AllRounder, 1000, 130.0)));
    assert!(!prediction_eligible(&player(Role::Batsman, 200, 130.0)));
    assert!(!prediction_eligible(&player(Role::Bowler, 1000, 130.0)));
    assert!(!prediction_eligible(&player(Role::Unknown, 1000, 130.0)));
}

#[test]
fn feature_vector_order_is_fixed() {
    let p = player(Role::Batsman, 2400, 135.0);
    assert_eq!(features_for(&p), [135.0, 220.0, 95.0, 1800.0, 90.0, 60.0]);
}
