//! Core data model types for studyplan.
//!
//! These are plain value records supplied by the caller. Relationships are
//! expressed through string ids and resolved by the caller (or by the
//! lookup helpers on [`Dataset`]); nothing here owns anything else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;

use crate::error::LookupError;

/// A student profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier for this student.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grade point average on a 0-4 scale.
    #[serde(default)]
    pub gpa: Option<f64>,
    /// Declared major.
    #[serde(default)]
    pub major: Option<String>,
    /// Known learning style. When absent a stand-in is derived from the id.
    #[serde(default)]
    pub learning_style: Option<LearningStyle>,
}

/// A course in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub level: Option<u32>,
}

/// An atomic unit of knowledge, e.g. "Derivatives".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
}

/// Links a concept to a course that teaches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConcept {
    pub course_id: String,
    pub concept_id: String,
}

/// A student's enrollment in a course together with the grade obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub term: Option<String>,
    /// Numeric grade on a 0-4 scale.
    pub grade_num: f64,
}

/// A per-student, per-concept mastery fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub student_id: String,
    pub concept_id: String,
    /// Mastery in `[0, 1]`.
    pub mastery: f64,
}

/// A weekly availability window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub student_id: String,
    pub day: Weekday,
    pub hour_start: u32,
    pub hour_end: u32,
}

/// A learning resource attached to a concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier for this resource.
    pub id: String,
    /// The concept this resource teaches.
    pub concept_id: String,
    /// What kind of material this is.
    #[serde(rename = "type")]
    pub kind: ResourceType,
    /// Where to find it.
    #[serde(default)]
    pub url: Option<String>,
    /// Expected time to work through it, in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Difficulty on a 1-5 scale.
    #[serde(default)]
    pub difficulty: Option<f64>,
    /// Average rating on a 0-5 scale.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Free-form tags used for preference matching.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Supported resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Video,
    Article,
    Exercise,
    Tutorial,
    Quiz,
    Notes,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Video => write!(f, "video"),
            ResourceType::Article => write!(f, "article"),
            ResourceType::Exercise => write!(f, "exercise"),
            ResourceType::Tutorial => write!(f, "tutorial"),
            ResourceType::Quiz => write!(f, "quiz"),
            ResourceType::Notes => write!(f, "notes"),
        }
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(ResourceType::Video),
            "article" => Ok(ResourceType::Article),
            "exercise" => Ok(ResourceType::Exercise),
            "tutorial" => Ok(ResourceType::Tutorial),
            "quiz" => Ok(ResourceType::Quiz),
            "notes" => Ok(ResourceType::Notes),
            other => Err(format!("unknown resource type: {other}")),
        }
    }
}

/// Learning style buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningStyle {
    Visual,
    Auditory,
    #[serde(rename = "Reading/Writing")]
    ReadingWriting,
    Kinesthetic,
}

impl LearningStyle {
    /// All styles, in bucket order.
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::ReadingWriting,
        LearningStyle::Kinesthetic,
    ];
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningStyle::Visual => write!(f, "Visual"),
            LearningStyle::Auditory => write!(f, "Auditory"),
            LearningStyle::ReadingWriting => write!(f, "Reading/Writing"),
            LearningStyle::Kinesthetic => write!(f, "Kinesthetic"),
        }
    }
}

impl FromStr for LearningStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visual" => Ok(LearningStyle::Visual),
            "auditory" => Ok(LearningStyle::Auditory),
            "reading/writing" | "reading" | "readingwriting" => Ok(LearningStyle::ReadingWriting),
            "kinesthetic" => Ok(LearningStyle::Kinesthetic),
            other => Err(format!("unknown learning style: {other}")),
        }
    }
}

/// The full set of records a caller hands to the recommendation functions.
///
/// This is the explicit, caller-owned replacement for a global data store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub course_concepts: Vec<CourseConcept>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
    #[serde(default)]
    pub availability: Vec<Availability>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Dataset {
    /// Look up a student by id.
    pub fn student(&self, id: &str) -> Result<&Student, LookupError> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| LookupError::UnknownStudent(id.to_string()))
    }

    /// Look up a concept by id.
    pub fn concept(&self, id: &str) -> Result<&Concept, LookupError> {
        self.concepts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LookupError::UnknownConcept(id.to_string()))
    }

    /// Display name of a concept, falling back to its id.
    pub fn concept_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.concept(id).map(|c| c.name.as_str()).unwrap_or(id)
    }

    /// Weaknesses recorded for one student, in dataset order.
    pub fn weaknesses_of<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Weakness> {
        self.weaknesses
            .iter()
            .filter(move |w| w.student_id == student_id)
    }

    /// Resources attached to one concept, in dataset order.
    pub fn resources_for<'a>(&'a self, concept_id: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.resources
            .iter()
            .filter(move |r| r.concept_id == concept_id)
    }
}

/// Map a unit-scale mastery onto the 1-10 display scale.
pub fn mastery_to_scale10(mastery: f64) -> f64 {
    1.0 + 9.0 * mastery
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_display_and_parse() {
        assert_eq!(ResourceType::Video.to_string(), "video");
        assert_eq!("Quiz".parse::<ResourceType>().unwrap(), ResourceType::Quiz);
        assert_eq!("notes".parse::<ResourceType>().unwrap(), ResourceType::Notes);
        assert!("podcast".parse::<ResourceType>().is_err());
    }

    #[test]
    fn learning_style_display_and_parse() {
        assert_eq!(LearningStyle::ReadingWriting.to_string(), "Reading/Writing");
        assert_eq!(
            "reading/writing".parse::<LearningStyle>().unwrap(),
            LearningStyle::ReadingWriting
        );
        assert!("tactile".parse::<LearningStyle>().is_err());
    }

    #[test]
    fn resource_serde_uses_type_key() {
        let json = r#"{"id":"R1","concept_id":"K1","type":"video","rating":4.5}"#;
        let r: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(r.kind, ResourceType::Video);
        assert_eq!(r.rating, Some(4.5));
        assert!(r.difficulty.is_none());
        assert!(r.tags.is_empty());
    }

    #[test]
    fn availability_parses_weekday() {
        let json = r#"{"student_id":"S1","day":"Tue","hour_start":9,"hour_end":10}"#;
        let a: Availability = serde_json::from_str(json).unwrap();
        assert_eq!(a.day, Weekday::Tue);
    }

    #[test]
    fn dataset_lookups() {
        let ds = Dataset {
            concepts: vec![Concept {
                id: "K_DER".into(),
                name: "Derivatives".into(),
            }],
            ..Default::default()
        };
        assert_eq!(ds.concept("K_DER").unwrap().name, "Derivatives");
        assert_eq!(ds.concept_name("K_DER"), "Derivatives");
        assert_eq!(ds.concept_name("K_NOPE"), "K_NOPE");
        assert!(matches!(
            ds.student("S404"),
            Err(LookupError::UnknownStudent(id)) if id == "S404"
        ));
    }

    #[test]
    fn mastery_scale() {
        assert!((mastery_to_scale10(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((mastery_to_scale10(1.0) - 10.0).abs() < f64::EPSILON);
    }
}
