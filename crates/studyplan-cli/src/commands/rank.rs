//! The `studyplan rank` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyplan_core::ranker::{fit_to_scale10, rank_resources, RankedResource, RankingContext};

use super::{print_json, split_list, Output, Session};
use crate::DataArgs;

pub fn execute(
    data: DataArgs,
    concept_id: String,
    student: Option<String>,
    mastery: Option<f64>,
    target_difficulty: Option<f64>,
    tags: Option<String>,
) -> Result<()> {
    let session = Session::open(&data)?;
    let ds = &session.dataset;
    let concept = ds.concept(&concept_id)?;

    let mastery = match (&student, mastery) {
        (Some(student_id), _) => {
            ds.student(student_id)?;
            ds.weaknesses_of(student_id)
                .find(|w| w.concept_id == concept.id)
                .map(|w| w.mastery)
                .unwrap_or_else(|| {
                    tracing::info!(
                        "{student_id} has no mastery record for {}, using default",
                        concept.id
                    );
                    RankingContext::default().mastery
                })
        }
        (None, Some(m)) => m,
        (None, None) => RankingContext::default().mastery,
    };

    let ctx = RankingContext::for_mastery(
        mastery,
        target_difficulty.or(session.config.recommend.target_difficulty),
        tags.as_deref()
            .map(split_list)
            .unwrap_or_else(|| session.config.recommend.preferred_tags.clone()),
    );

    let candidates: Vec<_> = ds.resources_for(&concept.id).cloned().collect();
    let ranked = rank_resources(&candidates, &ctx);

    match session.output {
        Output::Json => print_json(&ranked)?,
        Output::Text => {
            println!(
                "Resources for {} ({}) at mastery {:.2}, target difficulty {:.1}",
                concept.name, concept.id, ctx.mastery, ctx.target_difficulty
            );
            print_ranked(&ranked);
        }
    }

    Ok(())
}

pub fn print_ranked(ranked: &[RankedResource]) {
    if ranked.is_empty() {
        println!("No resources for this concept.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Resource", "Type", "Fit", "Score", "Grade", "URL"]);
    for r in ranked {
        table.add_row(vec![
            Cell::new(&r.resource.id),
            Cell::new(r.resource.kind),
            Cell::new(format!("{:.3}", r.fit_score)),
            Cell::new(format!("{:.1}/10", fit_to_scale10(r.fit_score))),
            Cell::new(r.grade()),
            Cell::new(r.resource.url.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}
