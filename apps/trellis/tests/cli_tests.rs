//! Integration tests for the Trellis CLI.
//!
//! Runs the compiled binary against temp intake files and checks output.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::io::Write;
use std::process::{Command, Output};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// A healthy growth-stage intake that passes boundary validation.
const GROWTH_INTAKE: &str = r#"{
    "monthly_revenue": 50000,
    "revenue_trend": "declining",
    "team_size": 8,
    "industry": "software",
    "business_model": "b2b_saas",
    "primary_channel": "outbound",
    "customer_count": 120,
    "churn_rate_pct": 12,
    "runway_months": 4,
    "challenges": ["weak lead flow"],
    "ninety_day_goals": ["stop the churn bleed"]
}"#;

fn write_intake(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run_trellis(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trellis"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// =============================================================================
// ASSESS
// =============================================================================

#[test]
fn assess_reports_growth_stage() {
    let file = write_intake(GROWTH_INTAKE);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--quiet", "assess", "-f", path]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Stage:"));
    assert!(stdout.contains("growth"));
    assert!(stdout.contains("Confidence:"));
}

#[test]
fn assess_json_mode_emits_parseable_classification() {
    let file = write_intake(GROWTH_INTAKE);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--json-mode", "assess", "-f", path]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(parsed["stage"], "growth");
    assert!(parsed["confidence_pct"].as_u64().unwrap() <= 100);
}

// =============================================================================
// DIAGNOSE
// =============================================================================

#[test]
fn diagnose_surfaces_churn_and_cash() {
    let file = write_intake(GROWTH_INTAKE);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--json-mode", "diagnose", "-f", path]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"high_churn"));
    assert!(ids.contains(&"cash_crisis"));
}

#[test]
fn diagnose_text_output_lists_rule_ids_and_evidence() {
    let file = write_intake(GROWTH_INTAKE);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--quiet", "diagnose", "-f", path]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("high_churn"));
    assert!(stdout.contains("cash_crisis"));
    assert!(stdout.contains("12% monthly churn"));
    assert!(stdout.contains("4 months of runway"));
}

// =============================================================================
// ROADMAP
// =============================================================================

#[test]
fn roadmap_writes_report_file() {
    let intake = write_intake(GROWTH_INTAKE);
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("roadmap.json");

    let output = run_trellis(&[
        "--quiet",
        "roadmap",
        "-f",
        intake.path().to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let contents = std::fs::read_to_string(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["milestones"].as_array().unwrap().len(), 4);
    assert!(parsed["id"].as_str().unwrap().starts_with("plan-"));
}

// =============================================================================
// PRIORITIES
// =============================================================================

#[test]
fn priorities_focus_pulls_matches_to_front() {
    let file = write_intake(GROWTH_INTAKE);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--json-mode", "priorities", "-f", path, "--focus", "churn"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let entries = parsed.as_array().unwrap();
    assert!(!entries.is_empty());
    assert_eq!(entries[0]["rank"], 1);

    let first = format!(
        "{} {}",
        entries[0]["action"].as_str().unwrap(),
        entries[0]["rationale"].as_str().unwrap()
    );
    assert!(first.to_lowercase().contains("churn"));
}

// =============================================================================
// KPIS
// =============================================================================

#[test]
fn kpis_trajectory_emits_three_periods() {
    let file = write_intake(GROWTH_INTAKE);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--json-mode", "kpis", "-f", path, "--trajectory"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    for trajectory in parsed["trajectories"].as_array().unwrap() {
        assert_eq!(trajectory["points"].as_array().unwrap().len(), 3);
    }
}

// =============================================================================
// TEMPLATE AND ERROR PATHS
// =============================================================================

#[test]
fn template_output_feeds_back_into_assess() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("intake.json");

    let output = run_trellis(&["--quiet", "template", "-o", template.to_str().unwrap()]);
    assert!(output.status.success());

    let output = run_trellis(&["--quiet", "assess", "-f", template.to_str().unwrap()]);
    assert!(output.status.success());
}

#[test]
fn invalid_intake_exits_nonzero() {
    let file = write_intake(r#"{"monthly_revenue": 1000, "team_size": 2, "customer_count": 5}"#);
    let path = file.path().to_str().unwrap();

    let output = run_trellis(&["--quiet", "assess", "-f", path]);
    assert!(!output.status.success());
}

#[test]
fn missing_file_exits_nonzero() {
    let output = run_trellis(&["--quiet", "assess", "-f", "/nonexistent/intake.json"]);
    assert!(!output.status.success());
}
