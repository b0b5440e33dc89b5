//! The `studyplan plan` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyplan_core::model::mastery_to_scale10;
use studyplan_core::planner::{plan_study, PlanRequest, StudyPlan};
use studyplan_core::recommend::plan_concepts;

use super::{print_json, Output, Session};
use crate::DataArgs;

pub fn execute(
    data: DataArgs,
    student_id: String,
    minutes: Option<u32>,
    slice: Option<u32>,
) -> Result<()> {
    let session = Session::open(&data)?;
    let student = session.dataset.student(&student_id)?;

    let total_minutes = minutes.unwrap_or(session.config.recommend.total_minutes);
    let slice = slice.unwrap_or(session.config.recommend.slice);
    anyhow::ensure!(slice >= 1, "slice must be at least 1 minute");

    let plan = plan_study(&PlanRequest {
        concepts: plan_concepts(&session.dataset, &student.id),
        total_minutes,
        slice,
    });

    match session.output {
        Output::Json => print_json(&plan)?,
        Output::Text => {
            println!(
                "Study plan for {} ({}): {} of {} minutes in {}-minute slices",
                student.name,
                student.id,
                plan.total_minutes(),
                total_minutes,
                slice
            );
            print_plan(&plan, total_minutes);
        }
    }

    Ok(())
}

pub fn print_plan(plan: &StudyPlan, total_minutes: u32) {
    if plan.allocations.is_empty() {
        println!("Not enough time or no weak concepts to allocate.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Concept", "Minutes", "Share", "Current", "Projected"]);
    for a in &plan.allocations {
        let share = if total_minutes == 0 {
            0.0
        } else {
            f64::from(a.minutes) / f64::from(total_minutes) * 100.0
        };
        table.add_row(vec![
            Cell::new(&a.name),
            Cell::new(format!("{}m", a.minutes)),
            Cell::new(format!("{share:.0}%")),
            Cell::new(format!("{:.1}/10", mastery_to_scale10(a.current_mastery))),
            Cell::new(format!("{:.1}/10", mastery_to_scale10(a.projected_mastery))),
        ]);
    }
    println!("{table}");
    println!(
        "Projected gain: {:.1} mastery points total",
        plan.projected_gain * 9.0
    );
}
