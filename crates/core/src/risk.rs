//! Heuristic injury-risk scorer.
//!
//! A deterministic additive formula over workload, environmental, and
//! biomechanical inputs, plus a small uniform jitter, clamped to [0, 1].
//! The function has no hidden state: given the same inputs and the same
//! RNG seed the result reproduces bit for bit, which is what the tests
//! rely on.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Scores strictly above this are "High" risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Scores strictly above this (and not High) are "Medium" risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;
/// Baseline risk before any contributing factor.
pub const BASE_RISK: f64 = 0.15;
/// Half-width of the uniform jitter added to every score.
pub const JITTER_RANGE: f64 = 0.05;

/// Categorical risk level derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Threshold comparisons are strict `>`: a score of exactly 0.7 is
    /// Medium, and exactly 0.4 is Low.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            Self::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Impact label attached to each factor group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Moderate,
    Low,
}

/// Static biomechanical profile for a player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Biomechanics {
    pub flexibility: f64,
    pub muscle_strength: f64,
    pub fatigue_index: f64,
}

/// The small static biomechanics table. Players without an entry score
/// with an empty bundle, not an error.
const PLAYER_BIOMECHANICS: &[(i64, Biomechanics)] = &[
    (
        2544,
        Biomechanics {
            flexibility: 0.8,
            muscle_strength: 0.9,
            fatigue_index: 0.3,
        },
    ),
    (
        201939,
        Biomechanics {
            flexibility: 0.9,
            muscle_strength: 0.85,
            fatigue_index: 0.2,
        },
    ),
    (
        201142,
        Biomechanics {
            flexibility: 0.85,
            muscle_strength: 0.95,
            fatigue_index: 0.25,
        },
    ),
];

pub fn biomechanics_for(player_id: i64) -> Option<Biomechanics> {
    PLAYER_BIOMECHANICS
        .iter()
        .find(|(id, _)| *id == player_id)
        .map(|(_, bio)| *bio)
}

/// Scoring inputs. Serde defaults mirror the API's query-parameter
/// defaults so handlers can deserialize them directly.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RiskInputs {
    pub player_id: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_humidity")]
    pub humidity: f64,
    #[serde(default = "default_minutes_played")]
    pub minutes_played: f64,
    #[serde(default = "default_games_in_last_week")]
    pub games_in_last_week: i64,
    #[serde(default)]
    pub previous_injuries: i64,
}

impl RiskInputs {
    /// Inputs for a player with every other factor at its default.
    pub fn for_player(player_id: i64) -> Self {
        Self {
            player_id,
            temperature: default_temperature(),
            humidity: default_humidity(),
            minutes_played: default_minutes_played(),
            games_in_last_week: default_games_in_last_week(),
            previous_injuries: 0,
        }
    }
}

fn default_temperature() -> f64 {
    72.0
}

fn default_humidity() -> f64 {
    50.0
}

fn default_minutes_played() -> f64 {
    30.0
}

fn default_games_in_last_week() -> i64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalFactors {
    pub temperature: f64,
    pub humidity: f64,
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadFactors {
    pub minutes_played: f64,
    pub games_in_last_week: i64,
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFactors {
    pub previous_injuries: i64,
    pub impact: Impact,
}

/// Per-factor breakdown using the same threshold logic as the score
/// itself, so downstream aggregation never recomputes thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributingFactors {
    pub environmental: EnvironmentalFactors,
    pub workload: WorkloadFactors,
    pub biomechanical: Option<Biomechanics>,
    pub injury_history: HistoryFactors,
}

/// Full scoring result for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub player_id: i64,
    pub injury_risk: f64,
    pub risk_level: RiskLevel,
    pub contributing_factors: ContributingFactors,
    pub potential_injury_types: Vec<String>,
    pub recommendations: Vec<Option<String>>,
    pub timestamp: DateTime<Utc>,
}

/// Score with a thread-local RNG for the jitter term.
pub fn assess(inputs: &RiskInputs, now: DateTime<Utc>) -> RiskAssessment {
    assess_with_rng(inputs, now, &mut rand::rng())
}

/// Score with a caller-supplied RNG. Tests pass a seeded [`rand::rngs::StdRng`]
/// to pin the jitter.
pub fn assess_with_rng<R: Rng>(
    inputs: &RiskInputs,
    now: DateTime<Utc>,
    rng: &mut R,
) -> RiskAssessment {
    let mut risk = BASE_RISK;

    let cold_or_hot = inputs.temperature > 85.0 || inputs.temperature < 50.0;
    if cold_or_hot {
        risk += 0.10;
    }
    if inputs.humidity > 70.0 {
        risk += 0.05;
    }

    if inputs.minutes_played > 35.0 {
        risk += 0.08;
    }
    if inputs.games_in_last_week > 4 {
        risk += 0.12;
    }

    risk += inputs.previous_injuries as f64 * 0.05;

    let biomechanics = biomechanics_for(inputs.player_id);
    if let Some(bio) = biomechanics {
        if bio.fatigue_index > 0.5 {
            risk += 0.10;
        }
        if bio.flexibility < 0.7 {
            risk += 0.08;
        }
    }

    risk += rng.random_range(-JITTER_RANGE..JITTER_RANGE);
    let risk = (risk.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;

    let mut potential_injury_types = Vec::new();
    if inputs.temperature < 50.0 {
        potential_injury_types.push("Muscle Strain (Cold Weather)".to_string());
    }
    if inputs.games_in_last_week > 4 {
        potential_injury_types.push("Fatigue-Related Injury".to_string());
    }
    if inputs.previous_injuries > 2 {
        potential_injury_types.push("Re-injury Risk".to_string());
    }

    let fatigued = biomechanics.is_some_and(|bio| bio.fatigue_index > 0.5);
    let recommendations = vec![
        (inputs.minutes_played > 35.0).then(|| "Monitor playing time".to_string()),
        (inputs.games_in_last_week > 4).then(|| "Consider load management".to_string()),
        (risk > 0.5).then(|| "Focus on recovery protocols".to_string()),
        fatigued.then(|| "Adjust training intensity".to_string()),
    ];

    RiskAssessment {
        player_id: inputs.player_id,
        injury_risk: risk,
        risk_level: RiskLevel::from_score(risk),
        contributing_factors: ContributingFactors {
            environmental: EnvironmentalFactors {
                temperature: inputs.temperature,
                humidity: inputs.humidity,
                impact: if cold_or_hot { Impact::High } else { Impact::Low },
            },
            workload: WorkloadFactors {
                minutes_played: inputs.minutes_played,
                games_in_last_week: inputs.games_in_last_week,
                impact: if inputs.games_in_last_week > 4 {
                    Impact::High
                } else {
                    Impact::Moderate
                },
            },
            biomechanical: biomechanics,
            injury_history: HistoryFactors {
                previous_injuries: inputs.previous_injuries,
                impact: if inputs.previous_injuries > 2 {
                    Impact::High
                } else {
                    Impact::Low
                },
            },
        },
        potential_injury_types,
        recommendations,
        timestamp: now,
    }
}
