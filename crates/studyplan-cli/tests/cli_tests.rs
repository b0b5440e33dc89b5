//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DEMO: &str = "../../data/demo.toml";

fn studyplan() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("studyplan").unwrap()
}

#[test]
fn validate_demo_dataset() {
    studyplan()
        .arg("validate")
        .arg("--dataset")
        .arg(DEMO)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 students, 8 concepts, 11 resources"))
        .stdout(predicate::str::contains("Dataset valid."));
}

#[test]
fn validate_directory() {
    studyplan()
        .arg("validate")
        .arg("--dataset")
        .arg("../../data")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 students"));
}

#[test]
fn validate_nonexistent_file() {
    studyplan()
        .arg("validate")
        .arg("--dataset")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read dataset file"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "[[weaknesses]]\nstudent_id = \"S404\"\nconcept_id = \"K_X\"\nmastery = 0.3\n",
    )
    .unwrap();

    studyplan()
        .arg("validate")
        .arg("--dataset")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("weakness references unknown student"))
        .stdout(predicate::str::contains("2 warning(s) found."));
}

#[test]
fn plan_for_demo_student() {
    studyplan()
        .args(["plan", "--dataset", DEMO, "--student", "S001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Study plan for Avery Kim (S001)"))
        .stdout(predicate::str::contains("Vectors"))
        .stdout(predicate::str::contains("Projected gain"));
}

#[test]
fn plan_with_no_time() {
    studyplan()
        .args(["plan", "--dataset", DEMO, "--student", "S001", "--minutes", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough time or no weak concepts"));
}

#[test]
fn plan_rejects_zero_slice() {
    studyplan()
        .args(["plan", "--dataset", DEMO, "--student", "S001", "--slice", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slice must be at least 1 minute"));
}

#[test]
fn plan_json_respects_budget() {
    let output = studyplan()
        .args([
            "plan", "--dataset", DEMO, "--student", "S001", "--minutes", "90", "--slice", "15",
            "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let allocations = plan["allocations"].as_array().unwrap();
    assert!(!allocations.is_empty());
    let total: u64 = allocations
        .iter()
        .map(|a| a["minutes"].as_u64().unwrap())
        .sum();
    assert!(total <= 90);
    assert_eq!(total % 15, 0);
    assert!(plan["projected_gain"].as_f64().unwrap() > 0.0);
}

#[test]
fn rank_concept_resources() {
    studyplan()
        .args(["rank", "--dataset", DEMO, "--concept", "K_DER", "--mastery", "0.4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R003"))
        .stdout(predicate::str::contains("R004"))
        .stdout(predicate::str::contains("Grade"));
}

#[test]
fn rank_with_student_mastery() {
    studyplan()
        .args([
            "rank", "--dataset", DEMO, "--concept", "K_VEC", "--student", "S001", "--tags",
            "visual",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("R001"));
}

#[test]
fn rank_student_and_mastery_conflict() {
    studyplan()
        .args([
            "rank", "--dataset", DEMO, "--concept", "K_VEC", "--student", "S001", "--mastery",
            "0.3",
        ])
        .assert()
        .failure();
}

#[test]
fn rank_target_adapts_to_student_mastery() {
    studyplan()
        .args(["rank", "--dataset", DEMO, "--concept", "K_KIN", "--student", "S001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at mastery 0.55, target difficulty 3.0"));

    studyplan()
        .args(["rank", "--dataset", DEMO, "--concept", "K_VEC", "--student", "S001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at mastery 0.35, target difficulty 2.0"));
}

#[test]
fn rank_pinned_target_wins() {
    studyplan()
        .args([
            "rank", "--dataset", DEMO, "--concept", "K_KIN", "--student", "S001",
            "--target-difficulty", "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("target difficulty 1.0"));
}

#[test]
fn peers_of_demo_student() {
    studyplan()
        .args(["peers", "--dataset", DEMO, "--student", "S001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Peers of Avery Kim (S001)"))
        .stdout(predicate::str::contains("S004"))
        .stdout(predicate::str::contains("60% performance"));
}

#[test]
fn peers_json_is_sorted() {
    let output = studyplan()
        .args(["peers", "--dataset", DEMO, "--student", "S001", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let peers: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!peers.is_empty() && peers.len() <= 5);
    assert_eq!(peers[0]["peer_id"], "S004");
    let scores: Vec<f64> = peers
        .iter()
        .map(|p| p["combined_score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn search_concepts_by_course_title() {
    studyplan()
        .args(["search", "--dataset", DEMO, "--query", "calculus derivatives"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Derivatives"));
}

#[test]
fn search_without_match() {
    studyplan()
        .args(["search", "--dataset", DEMO, "--query", "zzzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No concepts match 'zzzz'."));
}

#[test]
fn search_marks_student_weak_spots() {
    studyplan()
        .args(["search", "--dataset", DEMO, "--query", "vectors", "--student", "S004"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matches for Diego Rivera (S004)"))
        .stdout(predicate::str::contains("Mastery"))
        .stdout(predicate::str::contains("5.4/10"))
        .stdout(predicate::str::contains("Weak"));

    studyplan()
        .args(["search", "--dataset", DEMO, "--query", "loops", "--student", "S004"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loops"))
        .stdout(predicate::str::contains("OK"))
        .stdout(predicate::str::contains("Weak").not());
}

#[test]
fn search_json_with_student() {
    let output = studyplan()
        .args([
            "search", "--dataset", DEMO, "--query", "vectors", "--student", "S004", "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hits[0]["id"], "K_VEC");
    assert_eq!(hits[0]["mastery"], 0.49);
    assert_eq!(hits[0]["weak"], true);
}

#[test]
fn search_unknown_student_fails() {
    studyplan()
        .args(["search", "--dataset", DEMO, "--query", "vectors", "--student", "S999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown student: S999"));
}

#[test]
fn profile_with_fixed_clock() {
    studyplan()
        .args([
            "profile", "--dataset", DEMO, "--student", "S001", "--day", "Mon", "--hour", "16",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Avery Kim (S001)"))
        .stdout(predicate::str::contains("Next free slot: Tue 19:00-20:00"))
        .stdout(predicate::str::contains("Vectors"));
}

#[test]
fn profile_projects_mastery_and_grades_resources() {
    studyplan()
        .args([
            "profile", "--dataset", DEMO, "--student", "S001", "--day", "Mon", "--hour", "16",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Projected"))
        .stdout(predicate::str::contains("5.3/10"))
        .stdout(predicate::str::contains("R001 video 7.9/10 (B)"));
}

#[test]
fn profile_json_lists_graded_resources() {
    let output = studyplan()
        .args(["profile", "--dataset", DEMO, "--student", "S001", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let profile: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &profile["weakest"][0];
    assert_eq!(first["concept_id"], "K_VEC");
    assert!(first["projected"].as_f64().unwrap() > first["mastery"].as_f64().unwrap());

    let resources = first["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["id"], "R001");
    assert_eq!(resources[0]["fit_scale10"], 7.9);
    assert_eq!(resources[0]["grade"], "B");
}

#[test]
fn profile_rejects_bad_day() {
    studyplan()
        .args(["profile", "--dataset", DEMO, "--student", "S001", "--day", "Someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid day 'Someday'"));
}

#[test]
fn recommend_text_report() {
    studyplan()
        .args(["recommend", "--dataset", DEMO, "--student", "S001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommendations for Avery Kim (S001)"))
        .stdout(predicate::str::contains("== Study plan (120 minutes) =="))
        .stdout(predicate::str::contains("== Peers =="));
}

#[test]
fn recommend_json_report() {
    let output = studyplan()
        .args(["recommend", "--dataset", DEMO, "--student", "S002", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rec["student_id"], "S002");
    assert_eq!(rec["resources"].as_array().unwrap().len(), 2);
}

#[test]
fn recommend_env_override() {
    studyplan()
        .args(["recommend", "--dataset", DEMO, "--student", "S001"])
        .env("STUDYPLAN_TOTAL_MINUTES", "45")
        .assert()
        .success()
        .stdout(predicate::str::contains("== Study plan (45 minutes) =="));
}

#[test]
fn unknown_student_fails() {
    studyplan()
        .args(["plan", "--dataset", DEMO, "--student", "S999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("unknown student: S999"));
}

#[test]
fn unknown_format_fails() {
    studyplan()
        .args(["peers", "--dataset", DEMO, "--student", "S001", "--format", "xml"])
        .assert()
        .failure();
}

#[test]
fn missing_dataset_fails() {
    let dir = TempDir::new().unwrap();
    studyplan()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .args(["peers", "--student", "S001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dataset given"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();
    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created studyplan.toml"))
        .stdout(predicate::str::contains("Created data/example.toml"));

    assert!(dir.path().join("studyplan.toml").exists());
    assert!(dir.path().join("data/example.toml").exists());

    // The generated config points at the generated dataset.
    studyplan()
        .current_dir(dir.path())
        .args(["plan", "--student", "S001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Study plan for Avery Kim (S001)"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("studyplan.toml"), "# existing").unwrap();
    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"))
        .stdout(predicate::str::contains("names no dataset"));
}

#[test]
fn init_keeps_configured_dataset() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("studyplan.toml"), "dataset = \"mine.toml\"\n").unwrap();
    std::fs::copy(DEMO, dir.path().join("mine.toml")).unwrap();

    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"))
        .stdout(predicate::str::contains("Using dataset mine.toml"));

    assert!(!dir.path().join("data").exists());
}

#[test]
fn init_writes_missing_configured_dataset() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("studyplan.toml"),
        "dataset = \"sets/course.toml\"\n",
    )
    .unwrap();

    studyplan()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sets/course.toml"));

    assert!(dir.path().join("sets/course.toml").exists());
    assert!(!dir.path().join("data").exists());
}

#[test]
fn help_output() {
    studyplan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Study plans, resource rankings"));
}

#[test]
fn version_output() {
    studyplan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("studyplan"));
}
