//! The `studyplan init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::load_config_from;

const CONFIG_FILE: &str = "studyplan.toml";
const EXAMPLE_DATASET_PATH: &str = "data/example.toml";

/// Write a starter config, then the example dataset unless the config
/// already names a dataset that exists.
pub fn execute() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);
    let dataset = if config_path.exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
        load_config_from(Some(config_path))?.dataset
    } else {
        std::fs::write(config_path, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
        println!("Created {CONFIG_FILE}");
        Some(PathBuf::from(EXAMPLE_DATASET_PATH))
    };

    match dataset {
        Some(path) if path.exists() => println!("Using dataset {}", path.display()),
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&path, EXAMPLE_DATASET)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Created {}", path.display());
        }
        None => {
            println!("{CONFIG_FILE} names no dataset; pass --dataset to each command.");
            return Ok(());
        }
    }

    println!("\nTry: studyplan recommend --student S001");
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyplan configuration

dataset = "data/example.toml"

[recommend]
total_minutes = 120
slice = 15
# target_difficulty = 2.0   # unset: adapts to each concept's mastery
preferred_tags = []
resources_per_concept = 3
"#;

const EXAMPLE_DATASET: &str = r#"[[students]]
id = "S001"
name = "Avery Kim"
gpa = 3.2

[[students]]
id = "S002"
name = "Jordan Lee"
gpa = 2.8

[[courses]]
id = "MTH101"
title = "Calculus I"

[[courses]]
id = "PHY101"
title = "Physics I"

[[concepts]]
id = "K_DER"
name = "Derivatives"

[[concepts]]
id = "K_VEC"
name = "Vectors"

[[course_concepts]]
course_id = "MTH101"
concept_id = "K_DER"

[[course_concepts]]
course_id = "PHY101"
concept_id = "K_VEC"

[[enrollments]]
student_id = "S001"
course_id = "MTH101"
grade_num = 2.3

[[enrollments]]
student_id = "S001"
course_id = "PHY101"
grade_num = 2.7

[[enrollments]]
student_id = "S002"
course_id = "MTH101"
grade_num = 2.6

[[enrollments]]
student_id = "S002"
course_id = "PHY101"
grade_num = 3.0

[[weaknesses]]
student_id = "S001"
concept_id = "K_DER"
mastery = 0.42

[[weaknesses]]
student_id = "S001"
concept_id = "K_VEC"
mastery = 0.35

[[availability]]
student_id = "S001"
day = "Mon"
hour_start = 15
hour_end = 17

[[resources]]
id = "R001"
concept_id = "K_DER"
type = "video"
url = "https://www.khanacademy.org/math/calculus-1/derivative-intro"
difficulty = 2
rating = 4.7
tags = ["visual"]

[[resources]]
id = "R002"
concept_id = "K_VEC"
type = "notes"
difficulty = 1
rating = 4.0
tags = ["reading"]
"#;
