//! Greedy study planner.
//!
//! Splits a time budget into fixed-size slices and hands each slice to the
//! concept with the best projected mastery gain per minute, until the budget
//! runs out or no concept is worth another slice.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::predictor::{predict_mastery, PredictionContext};

/// Gain per minute at or below which the planner stops allocating.
pub const MIN_MARGINAL_GAIN: f64 = 0.0005;
/// Difficulty assumed when a concept carries no guess.
pub const DEFAULT_DIFFICULTY_GUESS: f64 = 2.5;
/// Minutes of study treated as one full point of mastery when simulating
/// progress inside the loop.
const MINUTES_PER_MASTERY: f64 = 300.0;
/// Ceiling for simulated mastery so headroom never vanishes entirely.
const SIMULATED_MASTERY_CAP: f64 = 0.999;

/// A concept the student may spend time on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConcept {
    pub concept_id: String,
    pub name: String,
    /// Current mastery in `[0, 1]`.
    pub mastery: f64,
    /// Estimated difficulty on a 1-5 scale.
    #[serde(default)]
    pub difficulty_guess: Option<f64>,
}

/// Input to [`plan_study`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub concepts: Vec<PlanConcept>,
    /// Total budget in minutes.
    #[serde(default = "default_total_minutes")]
    pub total_minutes: u32,
    /// Allocation granularity in minutes.
    #[serde(default = "default_slice")]
    pub slice: u32,
}

pub(crate) fn default_total_minutes() -> u32 {
    120
}

pub(crate) fn default_slice() -> u32 {
    15
}

impl PlanRequest {
    /// A request with the default budget and slice size.
    pub fn new(concepts: Vec<PlanConcept>) -> Self {
        Self {
            concepts,
            total_minutes: default_total_minutes(),
            slice: default_slice(),
        }
    }
}

/// Minutes assigned to one concept and the mastery it is expected to reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAllocation {
    pub concept_id: String,
    pub name: String,
    /// Always a non-negative multiple of the slice size.
    pub minutes: u32,
    pub current_mastery: f64,
    pub projected_mastery: f64,
    #[serde(default)]
    pub difficulty_guess: Option<f64>,
}

/// Output of [`plan_study`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    /// Concepts that received time, most minutes first.
    pub allocations: Vec<PlanAllocation>,
    /// Sum of projected minus current mastery over every input concept.
    pub projected_gain: f64,
}

impl StudyPlan {
    pub fn total_minutes(&self) -> u32 {
        self.allocations.iter().map(|a| a.minutes).sum()
    }
}

/// Per-concept loop state.
struct Slot<'a> {
    concept: &'a PlanConcept,
    minutes: u32,
}

impl Slot<'_> {
    fn difficulty(&self) -> f64 {
        self.concept
            .difficulty_guess
            .unwrap_or(DEFAULT_DIFFICULTY_GUESS)
    }

    fn simulated_mastery(&self) -> f64 {
        (self.concept.mastery + f64::from(self.minutes) / MINUTES_PER_MASTERY)
            .min(SIMULATED_MASTERY_CAP)
    }

    /// Projected gain per minute of adding one more slice.
    fn marginal_gain(&self, slice: u32) -> f64 {
        let ctx = PredictionContext::default()
            .with_minutes_last_week(f64::from(self.minutes.saturating_add(slice)))
            .with_difficulty(self.difficulty());
        predict_mastery(self.simulated_mastery(), &ctx).delta / f64::from(slice)
    }

    fn projected(&self) -> f64 {
        let ctx = PredictionContext::default()
            .with_minutes_last_week(f64::from(self.minutes))
            .with_difficulty(self.difficulty());
        predict_mastery(self.simulated_mastery(), &ctx).projected
    }
}

/// Heap entry: highest gain first, earlier concept on ties.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    gain: f64,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .total_cmp(&other.gain)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Allocate `request.total_minutes` across concepts, one slice at a time.
///
/// Only the concept that just received a slice changes its marginal gain, so
/// it is the only one re-scored before going back on the heap. A slice of 0
/// allocates nothing.
pub fn plan_study(request: &PlanRequest) -> StudyPlan {
    if request.concepts.is_empty() {
        return StudyPlan::default();
    }

    let slice = request.slice;
    let mut slots: Vec<Slot<'_>> = request
        .concepts
        .iter()
        .map(|concept| Slot {
            concept,
            minutes: 0,
        })
        .collect();

    let mut remaining = request.total_minutes;
    if slice > 0 {
        let mut heap: BinaryHeap<Candidate> = slots
            .iter()
            .enumerate()
            .map(|(index, slot)| Candidate {
                gain: slot.marginal_gain(slice),
                index,
            })
            .collect();

        while remaining >= slice {
            let Some(best) = heap.pop() else {
                break;
            };
            if best.gain <= MIN_MARGINAL_GAIN {
                tracing::debug!(
                    concept = %slots[best.index].concept.concept_id,
                    gain = best.gain,
                    remaining,
                    "stopping early, marginal gain negligible"
                );
                break;
            }

            let slot = &mut slots[best.index];
            slot.minutes += slice;
            remaining -= slice;
            tracing::trace!(
                concept = %slot.concept.concept_id,
                minutes = slot.minutes,
                gain = best.gain,
                "allocated slice"
            );

            heap.push(Candidate {
                gain: slot.marginal_gain(slice),
                index: best.index,
            });
        }
    }

    let mut projected_gain = 0.0;
    let mut allocations = Vec::new();
    for slot in &slots {
        let projected = slot.projected();
        projected_gain += projected - slot.concept.mastery;
        if slot.minutes > 0 {
            allocations.push(PlanAllocation {
                concept_id: slot.concept.concept_id.clone(),
                name: slot.concept.name.clone(),
                minutes: slot.minutes,
                current_mastery: slot.concept.mastery,
                projected_mastery: projected,
                difficulty_guess: slot.concept.difficulty_guess,
            });
        }
    }
    allocations.sort_by(|a, b| b.minutes.cmp(&a.minutes));

    tracing::debug!(
        concepts = request.concepts.len(),
        allocated = request.total_minutes - remaining,
        projected_gain,
        "study plan ready"
    );

    StudyPlan {
        allocations,
        projected_gain,
    }
}
