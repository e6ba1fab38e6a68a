//! Aggregate factor scores for the analytics surface.
//!
//! Folds the categorical impact labels already computed by the risk
//! scorer into 0-100 averages per factor category. No thresholds are
//! re-evaluated here; labels are only mapped to numbers.

use serde::Serialize;

use crate::risk::{Impact, RiskAssessment};

/// Score returned for every category when no predictions are cached yet,
/// so the dashboard still renders.
pub const NEUTRAL_FACTOR_SCORE: f64 = 50.0;

/// Fixed recovery score. A real model would fold in sleep and recovery
/// metrics; none of the feeds carry them.
pub const RECOVERY_FACTOR_SCORE: f64 = 65.0;

/// Aggregate 0-100 scores per risk factor category.
#[derive(Debug, Clone, Serialize)]
pub struct FactorScores {
    pub environmental: f64,
    pub workload: f64,
    pub biomechanical: f64,
    pub historical: f64,
    pub recovery: f64,
}

impl FactorScores {
    pub fn neutral() -> Self {
        Self {
            environmental: NEUTRAL_FACTOR_SCORE,
            workload: NEUTRAL_FACTOR_SCORE,
            biomechanical: NEUTRAL_FACTOR_SCORE,
            historical: NEUTRAL_FACTOR_SCORE,
            recovery: NEUTRAL_FACTOR_SCORE,
        }
    }
}

/// Map an environmental or workload impact label to a numeric score.
pub fn impact_score(impact: Impact) -> f64 {
    match impact {
        Impact::High => 100.0,
        Impact::Moderate => 60.0,
        Impact::Low => 30.0,
    }
}

/// Injury-history labels are binary: High or not.
pub fn history_score(impact: Impact) -> f64 {
    if impact == Impact::High {
        100.0
    } else {
        30.0
    }
}

/// Aggregate cached predictions into per-category averages.
///
/// Biomechanical scores only average over players that have a
/// biomechanics bundle (fatigue index scaled to 0-100); if none do, the
/// category falls back to the neutral midpoint.
pub fn factor_scores<'a, I>(predictions: I) -> FactorScores
where
    I: IntoIterator<Item = &'a RiskAssessment>,
{
    let mut env = Vec::new();
    let mut work = Vec::new();
    let mut bio = Vec::new();
    let mut hist = Vec::new();

    for pred in predictions {
        let factors = &pred.contributing_factors;
        env.push(impact_score(factors.environmental.impact));
        work.push(impact_score(factors.workload.impact));
        hist.push(history_score(factors.injury_history.impact));
        if let Some(b) = factors.biomechanical {
            bio.push(b.fatigue_index.clamp(0.0, 1.0) * 100.0);
        }
    }

    if env.is_empty() {
        return FactorScores::neutral();
    }

    FactorScores {
        environmental: rounded_avg(&env),
        workload: rounded_avg(&work),
        biomechanical: rounded_avg(&bio),
        historical: rounded_avg(&hist),
        recovery: RECOVERY_FACTOR_SCORE,
    }
}

fn rounded_avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        return NEUTRAL_FACTOR_SCORE;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    (avg * 10.0).round() / 10.0
}
