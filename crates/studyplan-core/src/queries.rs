//! Lookup helpers over a [`Dataset`].

use std::cmp::Ordering;

use chrono::Weekday;
use serde::Serialize;

use crate::model::{Availability, Concept, Course, Dataset, Resource, Student, Weakness};

/// Difficulty used to order resources that carry none.
const UNKNOWN_DIFFICULTY: f64 = 3.0;

/// A weakness with its concept resolved.
#[derive(Debug, Clone, Serialize)]
pub struct WeakConcept<'a> {
    #[serde(flatten)]
    pub weakness: &'a Weakness,
    pub concept: Option<&'a Concept>,
}

/// Another student who struggles with one of the target concepts.
#[derive(Debug, Clone, Serialize)]
pub struct PeerMatch<'a> {
    #[serde(flatten)]
    pub weakness: &'a Weakness,
    pub student: Option<&'a Student>,
    pub concept: Option<&'a Concept>,
}

fn by_mastery(a: &Weakness, b: &Weakness) -> Ordering {
    a.mastery.total_cmp(&b.mastery)
}

/// The `n` lowest-mastery concepts of a student.
pub fn weakest_concepts<'a>(
    dataset: &'a Dataset,
    student_id: &str,
    n: usize,
) -> Vec<WeakConcept<'a>> {
    let mut weak: Vec<&Weakness> = dataset
        .weaknesses
        .iter()
        .filter(|w| w.student_id == student_id)
        .collect();
    weak.sort_by(|a, b| by_mastery(a, b));
    weak.into_iter()
        .take(n)
        .map(|weakness| WeakConcept {
            weakness,
            concept: dataset.concept(&weakness.concept_id).ok(),
        })
        .collect()
}

/// Up to `n` resources for a concept, easiest first, then best rated.
pub fn concept_resources<'a>(
    dataset: &'a Dataset,
    concept_id: &str,
    n: usize,
) -> Vec<&'a Resource> {
    let mut resources: Vec<&Resource> = dataset
        .resources
        .iter()
        .filter(|r| r.concept_id == concept_id)
        .collect();
    resources.sort_by(|a, b| {
        let da = a.difficulty.unwrap_or(UNKNOWN_DIFFICULTY);
        let db = b.difficulty.unwrap_or(UNKNOWN_DIFFICULTY);
        da.total_cmp(&db).then_with(|| {
            b.rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0))
        })
    });
    resources.truncate(n);
    resources
}

/// Up to `n` other students weak in any of `target_concepts`, weakest first.
pub fn peer_matches<'a>(
    dataset: &'a Dataset,
    student_id: &str,
    target_concepts: &[&str],
    n: usize,
) -> Vec<PeerMatch<'a>> {
    let mut matches: Vec<&Weakness> = dataset
        .weaknesses
        .iter()
        .filter(|w| w.student_id != student_id && target_concepts.contains(&w.concept_id.as_str()))
        .collect();
    matches.sort_by(|a, b| by_mastery(a, b));
    matches
        .into_iter()
        .take(n)
        .map(|weakness| PeerMatch {
            weakness,
            student: dataset.student(&weakness.student_id).ok(),
            concept: dataset.concept(&weakness.concept_id).ok(),
        })
        .collect()
}

/// Courses a student is enrolled in, in catalog order.
pub fn enrolled_courses<'a>(dataset: &'a Dataset, student_id: &str) -> Vec<&'a Course> {
    dataset
        .courses
        .iter()
        .filter(|c| {
            dataset
                .enrollments
                .iter()
                .any(|e| e.student_id == student_id && e.course_id == c.id)
        })
        .collect()
}

/// The next availability window at or after `hour_now` on `day`, otherwise
/// the earliest window on the following days, wrapping around the week.
pub fn next_free_slot<'a>(
    dataset: &'a Dataset,
    student_id: &str,
    day: Weekday,
    hour_now: u32,
) -> Option<&'a Availability> {
    let earliest_on = |d: Weekday, from_hour: u32| {
        dataset
            .availability
            .iter()
            .filter(|a| a.student_id == student_id && a.day == d && a.hour_start >= from_hour)
            .min_by_key(|a| a.hour_start)
    };

    if let Some(slot) = earliest_on(day, hour_now) {
        return Some(slot);
    }

    let mut d = day;
    for _ in 1..7 {
        d = d.succ();
        if let Some(slot) = earliest_on(d, 0) {
            return Some(slot);
        }
    }
    None
}
