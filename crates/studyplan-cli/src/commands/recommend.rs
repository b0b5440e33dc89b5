//! The `studyplan recommend` command.

use anyhow::Result;

use studyplan_core::recommend::recommend;

use super::{peers::print_peers, plan::print_plan, print_json, rank::print_ranked, Output, Session};
use crate::DataArgs;

pub fn execute(data: DataArgs, student_id: String) -> Result<()> {
    let session = Session::open(&data)?;
    let config = &session.config.recommend;
    anyhow::ensure!(config.slice >= 1, "slice must be at least 1 minute");

    let rec = recommend(&session.dataset, &student_id, config)?;

    match session.output {
        Output::Json => print_json(&rec)?,
        Output::Text => {
            println!("Recommendations for {} ({})", rec.student_name, rec.student_id);

            println!("\n== Study plan ({} minutes) ==", config.total_minutes);
            print_plan(&rec.plan, config.total_minutes);

            for concept in &rec.resources {
                println!(
                    "\n== {} (mastery {:.2}) ==",
                    concept.name, concept.mastery
                );
                print_ranked(&concept.resources);
            }

            println!("\n== Peers ==");
            print_peers(&session.dataset, &rec.peers);
        }
    }

    Ok(())
}
