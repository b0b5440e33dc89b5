//! The `studyplan profile` command.

use anyhow::Result;
use chrono::{Datelike, Local, Timelike, Weekday};
use comfy_table::{Cell, Table};
use serde::Serialize;

use studyplan_core::model::{mastery_to_scale10, Availability, Course, Resource, Student, Weakness};
use studyplan_core::predictor::batch_predict;
use studyplan_core::queries::{
    concept_resources, enrolled_courses, next_free_slot, peer_matches, weakest_concepts,
    PeerMatch, WeakConcept,
};
use studyplan_core::ranker::{
    fit_to_letter, fit_to_scale10, score_resource, FitGrade, RankingContext,
};

use super::{print_json, Output, Session};
use crate::DataArgs;

const WEAKEST: usize = 3;
const RESOURCES_PER_CONCEPT: usize = 3;
const PEER_MATCHES: usize = 3;

#[derive(Serialize)]
struct StarterResource<'a> {
    #[serde(flatten)]
    resource: &'a Resource,
    fit_score: f64,
    fit_scale10: f64,
    grade: FitGrade,
}

#[derive(Serialize)]
struct WeakSpot<'a> {
    #[serde(flatten)]
    weak: WeakConcept<'a>,
    projected: f64,
    resources: Vec<StarterResource<'a>>,
}

#[derive(Serialize)]
struct Profile<'a> {
    student: &'a Student,
    courses: Vec<&'a Course>,
    weakest: Vec<WeakSpot<'a>>,
    peer_matches: Vec<PeerMatch<'a>>,
    next_slot: Option<&'a Availability>,
}

pub fn execute(
    data: DataArgs,
    student_id: String,
    day: Option<String>,
    hour: Option<u32>,
) -> Result<()> {
    let session = Session::open(&data)?;
    let ds = &session.dataset;
    let config = &session.config.recommend;
    let student = ds.student(&student_id)?;

    let now = Local::now();
    let day: Weekday = match day {
        Some(d) => d
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid day '{d}', expected Mon..Sun"))?,
        None => now.weekday(),
    };
    let hour = hour.unwrap_or_else(|| now.hour());

    let weakest = weakest_concepts(ds, &student.id, WEAKEST);
    let records: Vec<Weakness> = weakest.iter().map(|w| w.weakness.clone()).collect();
    let targets: Vec<&str> = records.iter().map(|w| w.concept_id.as_str()).collect();
    let peers = peer_matches(ds, &student.id, &targets, PEER_MATCHES);

    let weakest = weakest
        .into_iter()
        .zip(batch_predict(&records))
        .map(|(weak, (_, prediction))| {
            let ctx = RankingContext::for_mastery(
                weak.weakness.mastery,
                config.target_difficulty,
                config.preferred_tags.clone(),
            );
            let resources = concept_resources(ds, &weak.weakness.concept_id, RESOURCES_PER_CONCEPT)
                .into_iter()
                .map(|resource| {
                    let fit_score = score_resource(resource, &ctx);
                    StarterResource {
                        resource,
                        fit_score,
                        fit_scale10: fit_to_scale10(fit_score),
                        grade: fit_to_letter(fit_score),
                    }
                })
                .collect();
            WeakSpot {
                weak,
                projected: prediction.projected,
                resources,
            }
        })
        .collect();

    let profile = Profile {
        student,
        courses: enrolled_courses(ds, &student.id),
        weakest,
        peer_matches: peers,
        next_slot: next_free_slot(ds, &student.id, day, hour),
    };

    match session.output {
        Output::Json => print_json(&profile)?,
        Output::Text => print_profile(&profile),
    }

    Ok(())
}

fn print_profile(p: &Profile<'_>) {
    println!("{} ({})", p.student.name, p.student.id);
    let courses: Vec<&str> = p.courses.iter().map(|c| c.title.as_str()).collect();
    println!(
        "Courses: {}",
        if courses.is_empty() {
            "-".to_string()
        } else {
            courses.join(", ")
        }
    );
    match p.next_slot {
        Some(slot) => println!(
            "Next free slot: {} {:02}:00-{:02}:00",
            slot.day, slot.hour_start, slot.hour_end
        ),
        None => println!("Next free slot: none recorded"),
    }

    if p.weakest.is_empty() {
        println!("\nNo weaknesses recorded.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Now", "Projected", "Resources"]);
    for w in &p.weakest {
        let weakness = w.weak.weakness;
        let resources: Vec<String> = w
            .resources
            .iter()
            .map(|r| {
                format!(
                    "{} {} {:.1}/10 ({})",
                    r.resource.id, r.resource.kind, r.fit_scale10, r.grade
                )
            })
            .collect();
        let name = w
            .weak
            .concept
            .map(|c| c.name.as_str())
            .unwrap_or(&weakness.concept_id);
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.1}/10", mastery_to_scale10(weakness.mastery))),
            Cell::new(format!("{:.1}/10", mastery_to_scale10(w.projected))),
            Cell::new(if resources.is_empty() {
                "-".to_string()
            } else {
                resources.join("\n")
            }),
        ]);
    }
    println!("\n{table}");

    if !p.peer_matches.is_empty() {
        println!("\nAlso working on these concepts:");
        for m in &p.peer_matches {
            println!(
                "  {}: {} ({:.1}/10)",
                m.student.map(|s| s.name.as_str()).unwrap_or(&m.weakness.student_id),
                m.concept.map(|c| c.name.as_str()).unwrap_or(&m.weakness.concept_id),
                mastery_to_scale10(m.weakness.mastery)
            );
        }
    }
}
