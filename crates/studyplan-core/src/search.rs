//! Bag-of-words concept search.
//!
//! Each concept is indexed by its name plus the titles of the courses that
//! teach it, and queries are matched by cosine similarity over term counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Concept, Course, CourseConcept, Dataset};

/// Default number of hits returned by [`search_concepts`].
pub const DEFAULT_TOP_K: usize = 5;
/// Mastery below which a concept is flagged as weak.
pub const WEAK_THRESHOLD: f64 = 0.5;

type TermCounts = HashMap<String, u32>;

/// An indexed concept.
#[derive(Debug, Clone)]
pub struct IndexedConcept {
    pub id: String,
    pub name: String,
    terms: TermCounts,
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub score: f64,
}

/// Lowercase, drop anything that is not an ASCII letter, digit or whitespace,
/// split on whitespace.
fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

fn term_counts(text: &str) -> TermCounts {
    let mut counts = TermCounts::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn cosine(a: &TermCounts, b: &TermCounts) -> f64 {
    let norm = |v: &TermCounts| v.values().map(|&n| f64::from(n * n)).sum::<f64>();
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, &n)| b.get(term).map(|&m| f64::from(n * m)))
        .sum();
    dot / (na.sqrt() * nb.sqrt())
}

/// Build a search index over `concepts`, enriching each with the titles of
/// the courses that include it.
pub fn build_concept_index(
    concepts: &[Concept],
    courses: &[Course],
    course_concepts: &[CourseConcept],
) -> Vec<IndexedConcept> {
    let by_course: HashMap<&str, &Course> = courses.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut titles: HashMap<&str, Vec<&str>> = HashMap::new();
    for cc in course_concepts {
        let entry = titles.entry(cc.concept_id.as_str()).or_default();
        if let Some(course) = by_course.get(cc.course_id.as_str()) {
            entry.push(course.title.as_str());
        }
    }

    concepts
        .iter()
        .map(|c| {
            let mut text = c.name.clone();
            for title in titles.get(c.id.as_str()).into_iter().flatten() {
                text.push(' ');
                text.push_str(title);
            }
            IndexedConcept {
                id: c.id.clone(),
                name: c.name.clone(),
                terms: term_counts(&text),
            }
        })
        .collect()
}

/// Rank indexed concepts against `query`. Zero-score concepts are dropped.
pub fn search_concepts(index: &[IndexedConcept], query: &str, top_k: usize) -> Vec<SearchHit> {
    let query_terms = term_counts(query);
    let mut hits: Vec<SearchHit> = index
        .iter()
        .map(|entry| SearchHit {
            id: entry.id.clone(),
            name: entry.name.clone(),
            score: cosine(&entry.terms, &query_terms),
        })
        .filter(|hit| hit.score > 0.0)
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top_k);
    hits
}

/// A search hit seen from one student's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentHit {
    #[serde(flatten)]
    pub hit: SearchHit,
    /// The student's recorded mastery of the concept, if any.
    pub mastery: Option<f64>,
    /// Recorded mastery below [`WEAK_THRESHOLD`].
    pub weak: bool,
}

/// Attach `student_id`'s mastery to each hit. Concepts without a mastery
/// record are not flagged weak.
pub fn annotate_hits(hits: Vec<SearchHit>, dataset: &Dataset, student_id: &str) -> Vec<StudentHit> {
    hits.into_iter()
        .map(|hit| {
            let mastery = dataset
                .weaknesses_of(student_id)
                .filter(|w| w.concept_id == hit.id)
                .map(|w| w.mastery)
                .last();
            StudentHit {
                weak: mastery.is_some_and(|m| m < WEAK_THRESHOLD),
                mastery,
                hit,
            }
        })
        .collect()
}
