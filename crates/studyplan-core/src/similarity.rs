//! Peer similarity.
//!
//! Two independent signals rank peers for a student:
//!
//! - **Learning style**: same style scores 0.8, different 0.2, reduced by
//!   GPA distance.
//! - **Performance**: grade alignment over courses both students took, with
//!   a small bonus per shared course. At least two shared courses are needed.
//!
//! Each signal keeps its own top five, and the two lists are merged into a
//! 60/40 combined score.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{round_to, Enrollment, LearningStyle, Student};

/// How many peers each list keeps.
pub const TOP_PEERS: usize = 5;
/// Shared courses required before performance similarity is computed.
pub const MIN_SHARED_COURSES: usize = 2;
/// Weight of the performance signal in the combined score.
pub const PERFORMANCE_WEIGHT: f64 = 0.6;
/// Weight of the learning-style signal in the combined score.
pub const STYLE_WEIGHT: f64 = 0.4;

const SAME_STYLE_BASE: f64 = 0.8;
const OTHER_STYLE_BASE: f64 = 0.2;
const GPA_PENALTY: f64 = 0.05;
const OVERLAP_BONUS: f64 = 0.05;
const MAX_GRADE_PENALTY: f64 = 0.8;

/// Derive a stand-in learning style from a student id.
///
/// Polynomial hash (`h = h * 31 + unit`, wrapping at 32 bits) over the id's
/// UTF-16 code units, bucketed modulo 4. Same id, same style, on every run.
pub fn style_for(id: &str) -> LearningStyle {
    let h = id
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)));
    LearningStyle::ALL[(h % LearningStyle::ALL.len() as u32) as usize]
}

/// Fill in a learning style for every student that lacks one.
pub fn annotate_learning_styles(students: &[Student]) -> Vec<Student> {
    students
        .iter()
        .map(|s| Student {
            learning_style: Some(s.learning_style.unwrap_or_else(|| style_for(&s.id))),
            ..s.clone()
        })
        .collect()
}

fn style_of(student: &Student) -> LearningStyle {
    student
        .learning_style
        .unwrap_or_else(|| style_for(&student.id))
}

/// A peer ranked by learning style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePeer {
    pub peer_id: String,
    pub score: f64,
}

/// A peer ranked by grade alignment over shared courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePeer {
    pub peer_id: String,
    pub score: f64,
    /// Number of shared courses.
    pub overlap: usize,
}

/// A merged peer recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerScore {
    pub peer_id: String,
    #[serde(default)]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub style_score: Option<f64>,
    #[serde(default)]
    pub overlap_count: Option<usize>,
    pub combined_score: f64,
}

fn style_peers_of(student: &Student, students: &[Student]) -> Vec<StylePeer> {
    let style = style_of(student);
    let mut peers: Vec<StylePeer> = students
        .iter()
        .filter(|t| t.id != student.id)
        .map(|t| {
            let base = if style_of(t) == style {
                SAME_STYLE_BASE
            } else {
                OTHER_STYLE_BASE
            };
            let gpa_diff = (student.gpa.unwrap_or(0.0) - t.gpa.unwrap_or(0.0)).abs();
            StylePeer {
                peer_id: t.id.clone(),
                score: round_to((base - gpa_diff * GPA_PENALTY).max(0.0), 3),
            }
        })
        .collect();
    peers.sort_by(|a, b| b.score.total_cmp(&a.score));
    peers.truncate(TOP_PEERS);
    peers
}

/// Top learning-style peers for every student.
pub fn learning_style_similarity(students: &[Student]) -> HashMap<String, Vec<StylePeer>> {
    students
        .iter()
        .map(|s| (s.id.clone(), style_peers_of(s, students)))
        .collect()
}

/// Letter-grade buckets on a 0-4 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeBucket {
    A,
    B,
    C,
    D,
    F,
}

pub fn grade_bucket(grade_num: f64) -> GradeBucket {
    if grade_num >= 3.5 {
        GradeBucket::A
    } else if grade_num >= 3.0 {
        GradeBucket::B
    } else if grade_num >= 2.5 {
        GradeBucket::C
    } else if grade_num >= 2.0 {
        GradeBucket::D
    } else {
        GradeBucket::F
    }
}

/// Alignment of two grades in the same course: 1 inside one letter bucket,
/// otherwise shrinking with the numeric gap down to 0.2.
fn grade_alignment(mine: f64, theirs: f64) -> f64 {
    if grade_bucket(mine) == grade_bucket(theirs) {
        1.0
    } else {
        1.0 - ((mine - theirs).abs() / 4.0).min(MAX_GRADE_PENALTY)
    }
}

type EnrollmentIndex<'a> = HashMap<&'a str, Vec<&'a Enrollment>>;

fn index_enrollments(enrollments: &[Enrollment]) -> EnrollmentIndex<'_> {
    let mut by_student: EnrollmentIndex<'_> = HashMap::new();
    for e in enrollments {
        by_student.entry(e.student_id.as_str()).or_default().push(e);
    }
    by_student
}

fn performance_peers_of(
    student: &Student,
    students: &[Student],
    by_student: &EnrollmentIndex<'_>,
) -> Vec<PerformancePeer> {
    let mine: HashMap<&str, &Enrollment> = by_student
        .get(student.id.as_str())
        .map(|es| es.iter().map(|e| (e.course_id.as_str(), *e)).collect())
        .unwrap_or_default();

    let mut peers = Vec::new();
    for t in students.iter().filter(|t| t.id != student.id) {
        let Some(theirs) = by_student.get(t.id.as_str()) else {
            continue;
        };

        let mut common = 0usize;
        let mut alignment_sum = 0.0;
        for e in theirs {
            if let Some(m) = mine.get(e.course_id.as_str()) {
                common += 1;
                alignment_sum += grade_alignment(m.grade_num, e.grade_num);
            }
        }

        if common >= MIN_SHARED_COURSES {
            let avg = alignment_sum / common as f64;
            let score = avg * (1.0 + common as f64 * OVERLAP_BONUS);
            peers.push(PerformancePeer {
                peer_id: t.id.clone(),
                score: round_to(score, 3),
                overlap: common,
            });
        }
    }
    peers.sort_by(|a, b| b.score.total_cmp(&a.score));
    peers.truncate(TOP_PEERS);
    peers
}

/// Top performance peers for every student.
pub fn performance_similarity(
    students: &[Student],
    enrollments: &[Enrollment],
) -> HashMap<String, Vec<PerformancePeer>> {
    let by_student = index_enrollments(enrollments);
    students
        .iter()
        .map(|s| (s.id.clone(), performance_peers_of(s, students, &by_student)))
        .collect()
}

/// The five most similar peers of `student_id`, by combined score.
///
/// Each signal is truncated to its own top five before merging, so a peer
/// ranked sixth on one axis contributes nothing from that axis even when its
/// combined score would qualify. An unknown id yields an empty list.
pub fn top_similar(
    students: &[Student],
    enrollments: &[Enrollment],
    student_id: &str,
) -> Vec<PeerScore> {
    let Some(student) = students.iter().find(|s| s.id == student_id) else {
        tracing::debug!(student_id, "no such student, no peers");
        return Vec::new();
    };

    let by_student = index_enrollments(enrollments);
    let performance = performance_peers_of(student, students, &by_student);
    let style = style_peers_of(student, students);

    let mut merged: Vec<PeerScore> = Vec::with_capacity(performance.len() + style.len());
    let mut position: HashMap<String, usize> = HashMap::new();

    for p in performance {
        position.insert(p.peer_id.clone(), merged.len());
        merged.push(PeerScore {
            peer_id: p.peer_id,
            performance_score: Some(p.score),
            style_score: None,
            overlap_count: Some(p.overlap),
            combined_score: 0.0,
        });
    }
    for s in style {
        match position.get(&s.peer_id) {
            Some(&i) => merged[i].style_score = Some(s.score),
            None => {
                position.insert(s.peer_id.clone(), merged.len());
                merged.push(PeerScore {
                    peer_id: s.peer_id,
                    performance_score: None,
                    style_score: Some(s.score),
                    overlap_count: None,
                    combined_score: 0.0,
                });
            }
        }
    }

    for peer in &mut merged {
        let combined = peer.performance_score.unwrap_or(0.0) * PERFORMANCE_WEIGHT
            + peer.style_score.unwrap_or(0.0) * STYLE_WEIGHT;
        peer.combined_score = round_to(combined, 3);
    }
    merged.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    merged.truncate(TOP_PEERS);
    merged
}
