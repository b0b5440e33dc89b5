//! The `studyplan peers` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyplan_core::model::Dataset;
use studyplan_core::similarity::{style_for, top_similar, PeerScore};

use super::{print_json, Output, Session};
use crate::DataArgs;

pub fn execute(data: DataArgs, student_id: String) -> Result<()> {
    let session = Session::open(&data)?;
    let ds = &session.dataset;
    let student = ds.student(&student_id)?;

    let peers = top_similar(&ds.students, &ds.enrollments, &student.id);

    match session.output {
        Output::Json => print_json(&peers)?,
        Output::Text => {
            println!("Peers of {} ({})", student.name, student.id);
            print_peers(ds, &peers);
        }
    }

    Ok(())
}

fn on_ten(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.1}/10", (s * 10.0).min(10.0)))
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_peers(ds: &Dataset, peers: &[PeerScore]) {
    if peers.is_empty() {
        println!("Not enough overlap yet to compute similarities.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Peer",
        "Name",
        "Style",
        "Combined",
        "Performance",
        "Style sim",
        "Shared courses",
    ]);
    for p in peers {
        let peer = ds.student(&p.peer_id).ok();
        let style = peer
            .and_then(|s| s.learning_style)
            .unwrap_or_else(|| style_for(&p.peer_id));
        let shared = p
            .overlap_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".into());
        table.add_row(vec![
            Cell::new(&p.peer_id),
            Cell::new(peer.map(|s| s.name.as_str()).unwrap_or("-")),
            Cell::new(style),
            Cell::new(on_ten(Some(p.combined_score))),
            Cell::new(on_ten(p.performance_score)),
            Cell::new(on_ten(p.style_score)),
            Cell::new(shared),
        ]);
    }
    println!("{table}");
    println!("Combined score = 60% performance + 40% learning style.");
}
