//! Heuristic mastery projection.
//!
//! Projects where a student's mastery of a concept will land after another
//! round of study, from current mastery and a handful of context signals.
//! This is closed-form arithmetic, not a trained model.

use serde::{Deserialize, Serialize};

use crate::model::Weakness;

/// Context signals feeding a projection. Absent signals use neutral defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionContext {
    /// Average rating (0-5) of the resources available for the concept.
    #[serde(default = "default_avg_rating")]
    pub avg_resource_rating: f64,
    /// Concept difficulty on a 1-5 scale.
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    /// Minutes studied over the last week.
    #[serde(default = "default_minutes_last_week")]
    pub minutes_last_week: f64,
    /// How many courses the concept shows up in.
    #[serde(default = "default_concept_frequency")]
    pub concept_frequency: f64,
}

fn default_avg_rating() -> f64 {
    4.3
}
fn default_difficulty() -> f64 {
    2.5
}
fn default_minutes_last_week() -> f64 {
    40.0
}
fn default_concept_frequency() -> f64 {
    2.0
}

impl Default for PredictionContext {
    fn default() -> Self {
        Self {
            avg_resource_rating: default_avg_rating(),
            difficulty: default_difficulty(),
            minutes_last_week: default_minutes_last_week(),
            concept_frequency: default_concept_frequency(),
        }
    }
}

impl PredictionContext {
    pub fn with_avg_resource_rating(mut self, rating: f64) -> Self {
        self.avg_resource_rating = rating;
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_minutes_last_week(mut self, minutes: f64) -> Self {
        self.minutes_last_week = minutes;
        self
    }

    pub fn with_concept_frequency(mut self, frequency: f64) -> Self {
        self.concept_frequency = frequency;
        self
    }
}

/// Outcome of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Projected mastery, clamped to at most 1.
    pub projected: f64,
    /// Non-negative predicted improvement.
    pub delta: f64,
}

/// Project future mastery from `current` (expected in `[0, 1]`).
///
/// The input is not clamped; only the projection is capped at 1. NaN inputs
/// propagate.
pub fn predict_mastery(current: f64, ctx: &PredictionContext) -> Prediction {
    let headroom = (1.0 - current).max(0.0);
    let rating_factor = (ctx.avg_resource_rating - 3.0) / 2.0;
    let difficulty_penalty = (ctx.difficulty - 2.0) * 0.08;
    // saturates at two hours
    let minute_boost = (ctx.minutes_last_week / 120.0).min(1.0);
    let freq_boost = ctx.concept_frequency.ln_1p() / 3.0;

    let raw = 0.18 * headroom + 0.10 * rating_factor + 0.12 * minute_boost + 0.06 * freq_boost
        - difficulty_penalty;
    let delta = raw.max(0.0) * 0.65;
    let projected = (current + delta).min(1.0);

    Prediction { projected, delta }
}

/// Project every weakness with the default context.
pub fn batch_predict(weaknesses: &[Weakness]) -> Vec<(Weakness, Prediction)> {
    let ctx = PredictionContext::default();
    weaknesses
        .iter()
        .map(|w| (w.clone(), predict_mastery(w.mastery, &ctx)))
        .collect()
}
