//! Dataset loading and validation.
//!
//! Datasets are TOML (or JSON) files with one array per record kind. A
//! directory of such files is merged into a single [`Dataset`].

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Dataset;

/// Parse a single dataset file. `.json` files are read as JSON, anything else
/// as TOML.
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse dataset text, picking the format from `source_path`'s extension.
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Dataset> {
    if source_path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))
    } else {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
    }
}

/// Load a dataset from a file, or merge every `.toml`/`.json` file found
/// recursively under a directory. Unparseable files in a directory are
/// skipped with a warning.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if path.is_dir() {
        let mut merged = Dataset::default();
        merge_directory(path, &mut merged)?;
        Ok(merged)
    } else {
        parse_dataset(path)
    }
}

fn merge_directory(dir: &Path, into: &mut Dataset) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            merge_directory(&path, into)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_dataset(&path) {
                Ok(part) => merge(into, part),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}

fn merge(into: &mut Dataset, part: Dataset) {
    into.students.extend(part.students);
    into.courses.extend(part.courses);
    into.concepts.extend(part.concepts);
    into.course_concepts.extend(part.course_concepts);
    into.enrollments.extend(part.enrollments);
    into.weaknesses.extend(part.weaknesses);
    into.availability.extend(part.availability);
    into.resources.extend(part.resources);
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The offending record id (if applicable).
    pub record: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            message: message.into(),
        }
    }
}

fn duplicates<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Vec<ValidationWarning> {
    let mut seen = HashSet::new();
    ids.filter(|id| !seen.insert(*id))
        .map(|id| ValidationWarning::new(id, format!("duplicate {kind} ID: {id}")))
        .collect()
}

/// Validate a dataset for dangling references and out-of-range values.
///
/// Scoring functions accept anything; this is where bad data gets reported.
pub fn validate_dataset(ds: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    warnings.extend(duplicates("student", ds.students.iter().map(|s| s.id.as_str())));
    warnings.extend(duplicates("course", ds.courses.iter().map(|c| c.id.as_str())));
    warnings.extend(duplicates("concept", ds.concepts.iter().map(|c| c.id.as_str())));
    warnings.extend(duplicates("resource", ds.resources.iter().map(|r| r.id.as_str())));

    let students: HashSet<&str> = ds.students.iter().map(|s| s.id.as_str()).collect();
    let courses: HashSet<&str> = ds.courses.iter().map(|c| c.id.as_str()).collect();
    let concepts: HashSet<&str> = ds.concepts.iter().map(|c| c.id.as_str()).collect();

    for s in &ds.students {
        if let Some(gpa) = s.gpa {
            if !(0.0..=4.0).contains(&gpa) {
                warnings.push(ValidationWarning::new(
                    &s.id,
                    format!("gpa {gpa} outside [0, 4]"),
                ));
            }
        }
    }

    for cc in &ds.course_concepts {
        if !courses.contains(cc.course_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &cc.course_id,
                "course_concepts references unknown course",
            ));
        }
        if !concepts.contains(cc.concept_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &cc.concept_id,
                "course_concepts references unknown concept",
            ));
        }
    }

    for e in &ds.enrollments {
        if !students.contains(e.student_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &e.student_id,
                "enrollment references unknown student",
            ));
        }
        if !courses.contains(e.course_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &e.course_id,
                "enrollment references unknown course",
            ));
        }
        if !(0.0..=4.0).contains(&e.grade_num) {
            warnings.push(ValidationWarning::new(
                &e.student_id,
                format!("grade {} in {} outside [0, 4]", e.grade_num, e.course_id),
            ));
        }
    }

    for w in &ds.weaknesses {
        if !students.contains(w.student_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &w.student_id,
                "weakness references unknown student",
            ));
        }
        if !concepts.contains(w.concept_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &w.concept_id,
                "weakness references unknown concept",
            ));
        }
        if !(0.0..=1.0).contains(&w.mastery) {
            warnings.push(ValidationWarning::new(
                &w.student_id,
                format!("mastery {} for {} outside [0, 1]", w.mastery, w.concept_id),
            ));
        }
    }

    for a in &ds.availability {
        if !students.contains(a.student_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &a.student_id,
                "availability references unknown student",
            ));
        }
        if a.hour_end <= a.hour_start {
            warnings.push(ValidationWarning::new(
                &a.student_id,
                format!("availability on {} ends before it starts", a.day),
            ));
        }
    }

    for r in &ds.resources {
        if !concepts.contains(r.concept_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &r.id,
                "resource references unknown concept",
            ));
        }
        if let Some(rating) = r.rating {
            if !(0.0..=5.0).contains(&rating) {
                warnings.push(ValidationWarning::new(
                    &r.id,
                    format!("rating {rating} outside [0, 5]"),
                ));
            }
        }
        if let Some(difficulty) = r.difficulty {
            if !(1.0..=5.0).contains(&difficulty) {
                warnings.push(ValidationWarning::new(
                    &r.id,
                    format!("difficulty {difficulty} outside [1, 5]"),
                ));
            }
        }
    }

    warnings
}
