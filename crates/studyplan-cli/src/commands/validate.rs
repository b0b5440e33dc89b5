//! The `studyplan validate` command.

use std::path::PathBuf;

use anyhow::Result;

use studyplan_core::dataset::{load_dataset, validate_dataset};

pub fn execute(dataset_path: PathBuf) -> Result<()> {
    let ds = load_dataset(&dataset_path)?;

    println!(
        "Dataset: {} ({} students, {} concepts, {} resources)",
        dataset_path.display(),
        ds.students.len(),
        ds.concepts.len(),
        ds.resources.len()
    );

    let warnings = validate_dataset(&ds);
    for w in &warnings {
        let prefix = w
            .record
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Dataset valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
