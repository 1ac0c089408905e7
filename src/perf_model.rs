use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::player_stats::{PlayerStatistics, Role};

/// Feature vector contract for the performance classifier. The order is
/// fixed; the artifact's scaler and coefficients are indexed against it.
pub const PERFORMANCE_FEATURE_NAMES: [&str; 6] = [
    "strike_rate",
    "fours",
    "sixes",
    "balls_faced",
    "matches_played",
    "times_out",
];

/// Batting output below this never gets scored.
pub const PREDICTION_MIN_RUNS: u64 = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceModelArtifact {
    pub version: u32,
    pub generated_at: String,
    #[serde(default)]
    pub source: Option<String>,
    pub feature_names: Vec<String>,
    pub feature_means: Vec<f64>,
    pub feature_stds: Vec<f64>,
    pub coeffs: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub train_accuracy: f64,
    #[serde(default)]
    pub train_samples: usize,
}

#[derive(Debug, Clone)]
pub struct PerformanceModel {
    artifact: PerformanceModelArtifact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceClass {
    Regular,
    High,
}

impl PerformanceClass {
    pub fn label(self) -> &'static str {
        match self {
            PerformanceClass::Regular => "Regular Performer",
            PerformanceClass::High => "High Performer",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub class: PerformanceClass,
    pub p_high: f64,
    pub p_regular: f64,
}

impl Prediction {
    /// Probability of the predicted class, in percent.
    pub fn confidence(&self) -> f64 {
        match self.class {
            PerformanceClass::High => self.p_high * 100.0,
            PerformanceClass::Regular => self.p_regular * 100.0,
        }
    }
}

impl PerformanceModel {
    pub fn from_artifact(artifact: PerformanceModelArtifact) -> Result<Self> {
        let n = PERFORMANCE_FEATURE_NAMES.len();
        if artifact.feature_names.len() != n {
            return Err(anyhow!(
                "model artifact has {} feature names, expected {n}",
                artifact.feature_names.len()
            ));
        }
        for (got, want) in artifact.feature_names.iter().zip(PERFORMANCE_FEATURE_NAMES) {
            if got.as_str() != want {
                return Err(anyhow!("model feature order mismatch: got {got}, want {want}"));
            }
        }
        if artifact.feature_means.len() != n
            || artifact.feature_stds.len() != n
            || artifact.coeffs.len() != n
        {
            return Err(anyhow!(
                "model artifact scaler/coefficient lengths do not match {n} features"
            ));
        }
        if artifact
            .feature_stds
            .iter()
            .any(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(anyhow!("model artifact has a non-positive feature std"));
        }
        Ok(Self { artifact })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read model artifact {}", path.display()))?;
        parse_model_json(&raw).with_context(|| format!("model artifact {}", path.display()))
    }

    pub fn artifact(&self) -> &PerformanceModelArtifact {
        &self.artifact
    }

    pub fn predict(&self, features: [f64; 6]) -> Prediction {
        let mut z = self.artifact.intercept;
        for (i, x) in features.iter().enumerate() {
            let scaled = (x - self.artifact.feature_means[i]) / self.artifact.feature_stds[i];
            z += self.artifact.coeffs[i] * scaled;
        }
        let p_high = sigmoid(z);
        let class = if p_high >= 0.5 {
            PerformanceClass::High
        } else {
            PerformanceClass::Regular
        };
        Prediction {
            class,
            p_high,
            p_regular: 1.0 - p_high,
        }
    }

    pub fn predict_player(&self, row: &PlayerStatistics) -> Prediction {
        self.predict(features_for(row))
    }
}

pub fn parse_model_json(raw: &str) -> Result<PerformanceModel> {
    let artifact = serde_json::from_str::<PerformanceModelArtifact>(raw.trim())
        .context("invalid model artifact json")?;
    PerformanceModel::from_artifact(artifact)
}

pub fn default_model_path() -> PathBuf {
    match std::env::var("IPL_MODEL_PATH") {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => PathBuf::from("models").join("player_performance_model.json"),
    }
}

/// Only established batting output is scored: batting-side role and a real
/// run tally.
pub fn prediction_eligible(row: &PlayerStatistics) -> bool {
    matches!(row.role, Role::Batsman | Role::AllRounder) && row.total_runs > PREDICTION_MIN_RUNS
}

/// Feature vector in contract order.
pub fn features_for(row: &PlayerStatistics) -> [f64; 6] {
    [
        row.strike_rate,
        row.fours as f64,
        row.sixes as f64,
        row.balls_faced as f64,
        row.matches_played as f64,
        row.times_out as f64,
    ]
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
