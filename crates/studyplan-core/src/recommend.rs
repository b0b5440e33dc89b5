//! One-shot recommendations for a single student.
//!
//! Plans study time over the student's weak concepts, ranks each concept's
//! resources, and lists similar peers.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::model::Dataset;
use crate::planner::{
    default_slice, default_total_minutes, plan_study, PlanConcept, PlanRequest, StudyPlan,
};
use crate::ranker::{rank_resources, RankedResource, RankingContext};
use crate::similarity::{top_similar, PeerScore};

/// Tunables for [`recommend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Study budget in minutes.
    #[serde(default = "default_total_minutes")]
    pub total_minutes: u32,
    /// Planning granularity in minutes.
    #[serde(default = "default_slice")]
    pub slice: u32,
    /// Preferred resource difficulty on a 1-5 scale. When unset, each
    /// concept is ranked against a target adapted to its mastery.
    #[serde(default)]
    pub target_difficulty: Option<f64>,
    /// Resource tags the student prefers.
    #[serde(default)]
    pub preferred_tags: Vec<String>,
    /// How many ranked resources to keep per concept.
    #[serde(default = "default_resources_per_concept")]
    pub resources_per_concept: usize,
}

fn default_resources_per_concept() -> usize {
    3
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            total_minutes: default_total_minutes(),
            slice: default_slice(),
            target_difficulty: None,
            preferred_tags: Vec::new(),
            resources_per_concept: default_resources_per_concept(),
        }
    }
}

/// Ranked resources for one weak concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptResources {
    pub concept_id: String,
    pub name: String,
    pub mastery: f64,
    pub resources: Vec<RankedResource>,
}

/// Everything recommended to one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub student_id: String,
    pub student_name: String,
    pub plan: StudyPlan,
    pub resources: Vec<ConceptResources>,
    pub peers: Vec<PeerScore>,
}

/// Mean difficulty of a concept's resources, if any carry one.
pub fn difficulty_guess(dataset: &Dataset, concept_id: &str) -> Option<f64> {
    let difficulties: Vec<f64> = dataset
        .resources_for(concept_id)
        .filter_map(|r| r.difficulty)
        .collect();
    if difficulties.is_empty() {
        None
    } else {
        Some(difficulties.iter().sum::<f64>() / difficulties.len() as f64)
    }
}

/// Planner input built from a student's recorded weaknesses.
pub fn plan_concepts(dataset: &Dataset, student_id: &str) -> Vec<PlanConcept> {
    dataset
        .weaknesses_of(student_id)
        .map(|w| PlanConcept {
            concept_id: w.concept_id.clone(),
            name: dataset.concept_name(&w.concept_id).to_string(),
            mastery: w.mastery,
            difficulty_guess: difficulty_guess(dataset, &w.concept_id),
        })
        .collect()
}

/// Build the full recommendation for `student_id`.
pub fn recommend(
    dataset: &Dataset,
    student_id: &str,
    config: &RecommendConfig,
) -> Result<Recommendation, LookupError> {
    let student = dataset.student(student_id)?;

    let concepts = plan_concepts(dataset, student_id);
    let plan = plan_study(&PlanRequest {
        concepts: concepts.clone(),
        total_minutes: config.total_minutes,
        slice: config.slice,
    });

    let resources = concepts
        .iter()
        .map(|c| {
            let ctx = RankingContext::for_mastery(
                c.mastery,
                config.target_difficulty,
                config.preferred_tags.clone(),
            );
            let candidates: Vec<_> = dataset.resources_for(&c.concept_id).cloned().collect();
            let mut ranked = rank_resources(&candidates, &ctx);
            ranked.truncate(config.resources_per_concept);
            ConceptResources {
                concept_id: c.concept_id.clone(),
                name: c.name.clone(),
                mastery: c.mastery,
                resources: ranked,
            }
        })
        .collect();

    let peers = top_similar(&dataset.students, &dataset.enrollments, student_id);

    tracing::debug!(
        student_id,
        concepts = concepts.len(),
        allocations = plan.allocations.len(),
        peers = peers.len(),
        "recommendation built"
    );

    Ok(Recommendation {
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        plan,
        resources,
        peers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Concept, Resource, ResourceType, Student, Weakness};

    fn student(id: &str, name: &str, gpa: f64) -> Student {
        Student {
            id: id.into(),
            name: name.into(),
            gpa: Some(gpa),
            major: None,
            learning_style: None,
        }
    }

    fn weakness(concept_id: &str, mastery: f64) -> Weakness {
        Weakness {
            student_id: "S001".into(),
            concept_id: concept_id.into(),
            mastery,
        }
    }

    fn dataset() -> Dataset {
        let resource = |id: &str, concept: &str, difficulty: Option<f64>, rating: f64| Resource {
            id: id.into(),
            concept_id: concept.into(),
            kind: ResourceType::Video,
            url: None,
            duration: None,
            difficulty,
            rating: Some(rating),
            tags: vec!["visual".into()],
        };
        Dataset {
            students: vec![
                student("S001", "Avery", 3.2),
                student("S005", "Noah", 2.9),
            ],
            concepts: vec![Concept {
                id: "K_DER".into(),
                name: "Derivatives".into(),
            }],
            weaknesses: vec![
                weakness("K_DER", 0.42),
                weakness("K_NEW", 0.2),
            ],
            resources: vec![
                resource("R1", "K_DER", Some(1.0), 3.0),
                resource("R2", "K_DER", Some(3.0), 5.0),
                resource("R3", "K_DER", None, 4.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn difficulty_guess_averages_known_values() {
        let ds = dataset();
        assert_eq!(difficulty_guess(&ds, "K_DER"), Some(2.0));
        assert_eq!(difficulty_guess(&ds, "K_NEW"), None);
    }

    #[test]
    fn plan_concepts_fall_back_to_id_for_name() {
        let ds = dataset();
        let concepts = plan_concepts(&ds, "S001");
        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts[0].name, "Derivatives");
        assert_eq!(concepts[1].name, "K_NEW");
    }

    #[test]
    fn full_recommendation() {
        let ds = dataset();
        let config = RecommendConfig {
            resources_per_concept: 2,
            ..Default::default()
        };
        let rec = recommend(&ds, "S001", &config).unwrap();
        assert_eq!(rec.student_name, "Avery");
        assert!(rec.plan.total_minutes() <= config.total_minutes);
        assert_eq!(rec.plan.total_minutes() % config.slice, 0);
        assert_eq!(rec.resources.len(), 2);
        assert_eq!(rec.resources[0].resources.len(), 2);
        assert!(rec.resources[1].resources.is_empty());
        assert_eq!(rec.peers.len(), 1);
        assert_eq!(rec.peers[0].peer_id, "S005");
    }

    #[test]
    fn half_mastery_ranks_against_harder_target() {
        let mut ds = dataset();
        ds.weaknesses = vec![weakness("K_DER", 0.5)];
        ds.resources = vec![ranked_resource("two", 2.0), ranked_resource("three", 3.0)];

        let rec = recommend(&ds, "S001", &RecommendConfig::default()).unwrap();
        let ids: Vec<&str> = rec.resources[0]
            .resources
            .iter()
            .map(|r| r.resource.id.as_str())
            .collect();
        assert_eq!(ids, vec!["three", "two"]);

        let pinned = RecommendConfig {
            target_difficulty: Some(2.0),
            ..Default::default()
        };
        let rec = recommend(&ds, "S001", &pinned).unwrap();
        assert_eq!(rec.resources[0].resources[0].resource.id, "two");
    }

    fn ranked_resource(id: &str, difficulty: f64) -> Resource {
        Resource {
            id: id.into(),
            concept_id: "K_DER".into(),
            kind: ResourceType::Notes,
            url: None,
            duration: None,
            difficulty: Some(difficulty),
            rating: Some(4.0),
            tags: vec![],
        }
    }

    #[test]
    fn unknown_student_is_an_error() {
        let err = recommend(&dataset(), "S999", &RecommendConfig::default()).unwrap_err();
        assert_eq!(err, LookupError::UnknownStudent("S999".into()));
    }

    #[test]
    fn config_defaults_from_empty_toml() {
        let config: RecommendConfig = toml::from_str("").unwrap();
        assert_eq!(config, RecommendConfig::default());
        assert_eq!(config.total_minutes, 120);
        assert_eq!(config.slice, 15);
        assert!(config.target_difficulty.is_none());
    }
}
