//! Resource fit scoring.
//!
//! Combines the student's mastery gap, resource rating, difficulty alignment
//! and tag preferences into a single unit-scale fit score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{round_to, Resource};

/// Rating assumed for resources that have none.
pub const DEFAULT_RATING: f64 = 3.0;
/// Difficulty assumed for resources that have none.
pub const DEFAULT_DIFFICULTY: f64 = 2.0;
/// Flat bonus for matching at least one preferred tag.
pub const TAG_BOOST: f64 = 0.15;

const GAP_WEIGHT: f64 = 0.45;
const RATING_WEIGHT: f64 = 0.30;
const ALIGNMENT_WEIGHT: f64 = 0.20;

/// What the student currently needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingContext {
    /// Current mastery of the resource's concept.
    #[serde(default = "default_mastery")]
    pub mastery: f64,
    /// Preferred difficulty on a 1-5 scale.
    #[serde(default = "default_target_difficulty")]
    pub target_difficulty: f64,
    /// Tags the student prefers.
    #[serde(default)]
    pub preferred_tags: Vec<String>,
}

fn default_mastery() -> f64 {
    0.4
}

fn default_target_difficulty() -> f64 {
    DEFAULT_DIFFICULTY
}

impl Default for RankingContext {
    fn default() -> Self {
        Self {
            mastery: default_mastery(),
            target_difficulty: default_target_difficulty(),
            preferred_tags: Vec::new(),
        }
    }
}

/// Mastery below which the easier target difficulty applies.
pub const ADAPTIVE_MASTERY_SPLIT: f64 = 0.5;

/// Target difficulty for a student at `mastery`: the default below
/// [`ADAPTIVE_MASTERY_SPLIT`], one step harder at or above it.
pub fn adaptive_target_difficulty(mastery: f64) -> f64 {
    if mastery < ADAPTIVE_MASTERY_SPLIT {
        DEFAULT_DIFFICULTY
    } else {
        DEFAULT_DIFFICULTY + 1.0
    }
}

impl RankingContext {
    /// Context for `mastery`, using `target_difficulty` when pinned and the
    /// mastery-adaptive target otherwise.
    pub fn for_mastery(
        mastery: f64,
        target_difficulty: Option<f64>,
        preferred_tags: Vec<String>,
    ) -> Self {
        Self {
            mastery,
            target_difficulty: target_difficulty
                .unwrap_or_else(|| adaptive_target_difficulty(mastery)),
            preferred_tags,
        }
    }
}

/// Score how well `resource` fits the need described by `ctx`.
///
/// The result is rounded to three decimals. It lies in `[0, 0.95]` without a
/// tag match and tops out at 1.1 with one.
pub fn score_resource(resource: &Resource, ctx: &RankingContext) -> f64 {
    let gap = 1.0 - ctx.mastery;
    let rating = resource.rating.unwrap_or(DEFAULT_RATING) / 5.0;
    let difficulty = resource.difficulty.unwrap_or(DEFAULT_DIFFICULTY);
    let alignment = 1.0 - ((difficulty - ctx.target_difficulty).abs() / 4.0).min(1.0);

    let tag_boost = if !ctx.preferred_tags.is_empty()
        && resource
            .tags
            .iter()
            .any(|t| ctx.preferred_tags.contains(t))
    {
        TAG_BOOST
    } else {
        0.0
    };

    let score =
        GAP_WEIGHT * gap + RATING_WEIGHT * rating + ALIGNMENT_WEIGHT * alignment + tag_boost;
    round_to(score, 3)
}

/// A resource paired with its fit score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResource {
    #[serde(flatten)]
    pub resource: Resource,
    pub fit_score: f64,
}

impl RankedResource {
    pub fn grade(&self) -> FitGrade {
        fit_to_letter(self.fit_score)
    }
}

/// Score every resource and sort best fit first. Order among equal scores is
/// left as the input gave it.
pub fn rank_resources(resources: &[Resource], ctx: &RankingContext) -> Vec<RankedResource> {
    let mut ranked: Vec<RankedResource> = resources
        .iter()
        .map(|r| RankedResource {
            resource: r.clone(),
            fit_score: score_resource(r, ctx),
        })
        .collect();
    ranked.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));
    ranked
}

/// Map a unit fit score onto the 1-10 display scale, one decimal.
pub fn fit_to_scale10(score: f64) -> f64 {
    round_to(1.0 + score * 9.0, 1)
}

/// Letter bands for fit scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FitGrade {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for FitGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            FitGrade::A => "A",
            FitGrade::B => "B",
            FitGrade::C => "C",
            FitGrade::D => "D",
            FitGrade::E => "E",
        };
        f.write_str(letter)
    }
}

/// Band a fit score into a letter grade.
pub fn fit_to_letter(score: f64) -> FitGrade {
    if score >= 0.80 {
        FitGrade::A
    } else if score >= 0.70 {
        FitGrade::B
    } else if score >= 0.55 {
        FitGrade::C
    } else if score >= 0.40 {
        FitGrade::D
    } else {
        FitGrade::E
    }
}
