//! The `studyplan search` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyplan_core::model::mastery_to_scale10;
use studyplan_core::search::{annotate_hits, build_concept_index, search_concepts, SearchHit};

use super::{print_json, Output, Session};
use crate::DataArgs;

pub fn execute(data: DataArgs, query: String, top_k: usize, student: Option<String>) -> Result<()> {
    let session = Session::open(&data)?;
    let ds = &session.dataset;

    let index = build_concept_index(&ds.concepts, &ds.courses, &ds.course_concepts);
    let hits = search_concepts(&index, &query, top_k);

    let Some(student_id) = student else {
        match session.output {
            Output::Json => print_json(&hits)?,
            Output::Text => print_hits(&query, &hits),
        }
        return Ok(());
    };

    let student = ds.student(&student_id)?;
    let annotated = annotate_hits(hits, ds, &student.id);

    match session.output {
        Output::Json => print_json(&annotated)?,
        Output::Text => {
            if annotated.is_empty() {
                println!("No concepts match '{query}'.");
                return Ok(());
            }
            println!("Matches for {} ({})", student.name, student.id);
            let mut table = Table::new();
            table.set_header(vec!["Concept", "Name", "Score", "Mastery", "Status"]);
            for a in &annotated {
                let mastery = a
                    .mastery
                    .map(|m| format!("{:.1}/10", mastery_to_scale10(m)))
                    .unwrap_or_else(|| "-".to_string());
                table.add_row(vec![
                    Cell::new(&a.hit.id),
                    Cell::new(&a.hit.name),
                    Cell::new(format!("{:.3}", a.hit.score)),
                    Cell::new(mastery),
                    Cell::new(if a.weak { "Weak" } else { "OK" }),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}

fn print_hits(query: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No concepts match '{query}'.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Concept", "Name", "Score"]);
    for hit in hits {
        table.add_row(vec![
            Cell::new(&hit.id),
            Cell::new(&hit.name),
            Cell::new(format!("{:.3}", hit.score)),
        ]);
    }
    println!("{table}");
}
