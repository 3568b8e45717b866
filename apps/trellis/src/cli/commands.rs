//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::runtime::{SystemClock, UuidIds, format_day};
use std::path::{Path, PathBuf};
use trellis_core::{
    BusinessIntake, PriorityEngine, PrioritySource, ReprioritizeOptions, RoadmapGenerator,
    TrellisError, bottleneck, kpi, stage,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum intake file size (1 MB).
///
/// An intake is a handful of metrics and short text lists; anything larger
/// is malformed or malicious.
const MAX_INTAKE_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrellisError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrellisError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TrellisError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path to resolve symlinks and "..", ensures it exists
/// and is a regular file. Prevents path traversal via intake paths.
fn validate_file_path(path: &Path) -> Result<PathBuf, TrellisError> {
    let canonical = path.canonicalize().map_err(|e| {
        TrellisError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TrellisError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: parent directory must exist and be a directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, TrellisError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TrellisError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(TrellisError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TrellisError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// INTAKE LOADING
// =============================================================================

/// Load and validate an intake snapshot from a JSON file.
fn load_intake(file: &Path) -> Result<BusinessIntake, TrellisError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_INTAKE_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| TrellisError::IoError(format!("Read file: {}", e)))?;

    let intake: BusinessIntake = serde_json::from_slice(&contents)
        .map_err(|e| TrellisError::SerializationError(format!("Parse intake: {}", e)))?;

    intake.validate()?;

    tracing::debug!(
        revenue = intake.monthly_revenue,
        customers = intake.customer_count,
        team = intake.team_size,
        "loaded intake from {:?}",
        validated_path
    );

    Ok(intake)
}

/// Serialize a value to pretty JSON, for stdout or report files.
fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, TrellisError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| TrellisError::SerializationError(e.to_string()))
}

// =============================================================================
// ASSESS COMMAND
// =============================================================================

/// Classify the lifecycle stage of an intake.
pub fn cmd_assess(file: &Path, json_mode: bool) -> Result<(), TrellisError> {
    let intake = load_intake(file)?;
    let classification = stage::classify(&intake);

    if json_mode {
        println!("{}", to_pretty_json(&classification)?);
        return Ok(());
    }

    println!("Trellis Stage Assessment");
    println!("========================");
    println!();
    println!("Stage:       {}", classification.stage);
    println!("Confidence:  {}%", classification.confidence_pct);
    println!("North Star:  {}", classification.north_star);
    println!();
    println!("{}", classification.summary);
    println!();

    if !classification.matched_indicators.is_empty() {
        println!("Matched indicators:");
        for indicator in &classification.matched_indicators {
            println!("  - {}", indicator);
        }
        println!();
    }

    println!("Typical challenges at this stage:");
    for challenge in &classification.typical_challenges {
        println!("  - {}", challenge);
    }
    println!();
    println!("To reach the next stage:");
    for requirement in &classification.next_stage_requirements {
        println!("  - {}", requirement);
    }

    Ok(())
}

// =============================================================================
// DIAGNOSE COMMAND
// =============================================================================

/// Detect and rank growth bottlenecks.
pub fn cmd_diagnose(file: &Path, json_mode: bool) -> Result<(), TrellisError> {
    let intake = load_intake(file)?;
    let classified = stage::classify(&intake).stage;
    let found = bottleneck::detect(&intake, classified);

    if json_mode {
        println!("{}", to_pretty_json(&found)?);
        return Ok(());
    }

    println!("Trellis Bottleneck Diagnosis");
    println!("============================");
    println!("Stage: {}", classified);
    println!();

    if found.is_empty() {
        println!("No structural bottlenecks detected.");
        return Ok(());
    }

    for (index, b) in found.iter().enumerate() {
        println!(
            "{}. [{}] {} ({}, impact {})",
            index + 1,
            b.severity,
            b.category.label(),
            b.id.as_str(),
            b.impact
        );
        println!("   {}", b.evidence.join("; "));
        for action in &b.recommended_actions {
            println!("   -> {}", action);
        }
        println!();
    }

    Ok(())
}

// =============================================================================
// ROADMAP COMMAND
// =============================================================================

/// Generate the full 90-day roadmap.
pub fn cmd_roadmap(
    file: &Path,
    output: Option<&Path>,
    json_mode: bool,
) -> Result<(), TrellisError> {
    let intake = load_intake(file)?;

    let clock = SystemClock;
    let ids = UuidIds::new("plan");
    let roadmap = RoadmapGenerator::new(&clock, &ids).generate(&intake);

    if let Some(output) = output {
        let validated_output = validate_output_path(output)?;
        let data = to_pretty_json(&roadmap)?;
        std::fs::write(&validated_output, data.as_bytes())
            .map_err(|e| TrellisError::IoError(format!("Write file: {}", e)))?;
        println!("Wrote roadmap {} to {:?}", roadmap.id, validated_output);
        return Ok(());
    }

    if json_mode {
        println!("{}", to_pretty_json(&roadmap)?);
        return Ok(());
    }

    println!("Trellis 90-Day Roadmap");
    println!("======================");
    println!("Id:        {}", roadmap.id);
    println!("Generated: {}", format_day(roadmap.generated_on));
    println!(
        "Stage:     {} ({}% confidence)",
        roadmap.classification.stage, roadmap.classification.confidence_pct
    );
    println!(
        "Primary:   {} ({})",
        roadmap.primary_bottleneck.category.label(),
        roadmap.primary_bottleneck.severity
    );
    println!("Success probability: {}%", roadmap.success_probability);
    println!();

    for milestone in &roadmap.milestones {
        println!("Week {}: {}", milestone.week, milestone.title);
        for objective in &milestone.objectives {
            println!("  Objective: {}", objective);
        }
        for action in &milestone.actions {
            println!("  - {}", action);
        }
        for metric in &milestone.success_metrics {
            println!("  Metric: {}", metric);
        }
        println!();
    }

    if !roadmap.things_to_ignore.is_empty() {
        println!("Ignore for now:");
        for item in &roadmap.things_to_ignore {
            println!("  - {}", item);
        }
        println!();
    }

    if !roadmap.risk_factors.is_empty() {
        println!("Risk factors:");
        for risk in &roadmap.risk_factors {
            println!("  - {}", risk);
        }
    }

    Ok(())
}

// =============================================================================
// PRIORITIES COMMAND
// =============================================================================

/// Produce the ranked execution list.
pub fn cmd_priorities(
    file: &Path,
    focus: Option<String>,
    exclude_blocked: bool,
    json_mode: bool,
) -> Result<(), TrellisError> {
    let intake = load_intake(file)?;

    let clock = SystemClock;
    let plan_ids = UuidIds::new("plan");
    let roadmap = RoadmapGenerator::new(&clock, &plan_ids).generate(&intake);

    let prio_ids = UuidIds::new("prio");
    let engine = PriorityEngine::new(&clock, &prio_ids);
    let mut priorities = engine.prioritize(&roadmap);

    if focus.is_some() || exclude_blocked {
        let options = ReprioritizeOptions {
            exclude_blocked,
            focus_area: focus,
        };
        priorities = engine.reprioritize(priorities, &options);
    }

    if json_mode {
        println!("{}", to_pretty_json(&priorities)?);
        return Ok(());
    }

    println!("Trellis Execution Priorities");
    println!("============================");
    println!();

    for p in &priorities {
        println!(
            "{:>3}. {} (due {}, {})",
            p.rank,
            p.action,
            format_day(p.due),
            source_label(p.source)
        );
        println!("     {}", p.rationale);
        if !p.blocking_factors.is_empty() {
            println!("     Blocked by: {}", p.blocking_factors.join("; "));
        }
    }

    Ok(())
}

fn source_label(source: PrioritySource) -> &'static str {
    match source {
        PrioritySource::BottleneckAction => "bottleneck",
        PrioritySource::QuickWin => "quick win",
        PrioritySource::MilestoneAction => "milestone",
        PrioritySource::StrategicInitiative => "strategic",
    }
}

// =============================================================================
// KPIS COMMAND
// =============================================================================

/// Set 90-day KPI targets, optionally with trajectories.
pub fn cmd_kpis(file: &Path, trajectory: bool, json_mode: bool) -> Result<(), TrellisError> {
    let intake = load_intake(file)?;
    let classified = stage::classify(&intake).stage;
    let targets = kpi::generate_targets(&intake, classified);

    if json_mode {
        if trajectory {
            let trajectories: Vec<_> = targets
                .iter()
                .map(|t| kpi::project_trajectory(t, intake.revenue_trend))
                .collect();
            let output = serde_json::json!({
                "targets": targets,
                "trajectories": trajectories,
            });
            println!("{}", to_pretty_json(&output)?);
        } else {
            println!("{}", to_pretty_json(&targets)?);
        }
        return Ok(());
    }

    println!("Trellis KPI Targets");
    println!("===================");
    println!("Stage: {}", classified);
    println!();

    for target in &targets {
        println!(
            "{}: {} -> {} ({:?} review)",
            target.metric, target.current, target.target, target.cadence
        );
        for indicator in &target.leading_indicators {
            println!("  Watch: {}", indicator);
        }

        if trajectory {
            let projection = kpi::project_trajectory(target, intake.revenue_trend);
            let path: Vec<String> = projection
                .points
                .iter()
                .map(|p| format!("P{}={}", p.period, p.projected))
                .collect();
            let status = if projection.on_track {
                "on track"
            } else {
                "off track"
            };
            println!("  Trajectory: {} ({})", path.join(", "), status);
        }
        println!();
    }

    Ok(())
}

// =============================================================================
// TEMPLATE COMMAND
// =============================================================================

/// A filled-in example intake that passes validation as-is.
fn template_intake() -> BusinessIntake {
    BusinessIntake::new(25_000, 120, 5)
        .with_profile("software", "b2b_saas", "content_marketing")
        .with_churn(4)
        .with_runway(14)
        .with_challenges(vec!["lead flow is inconsistent".to_string()])
        .with_goals(vec!["grow MRR 30%".to_string()])
}

/// Emit a blank intake template.
pub fn cmd_template(output: Option<&Path>) -> Result<(), TrellisError> {
    let data = to_pretty_json(&template_intake())?;

    match output {
        Some(output) => {
            let validated_output = validate_output_path(output)?;
            std::fs::write(&validated_output, data.as_bytes())
                .map_err(|e| TrellisError::IoError(format!("Write file: {}", e)))?;
            println!("Wrote intake template to {:?}", validated_output);
        }
        None => println!("{}", data),
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn template_round_trips_and_validates() {
        let json = to_pretty_json(&template_intake()).expect("serialize template");
        let parsed: BusinessIntake = serde_json::from_str(&json).expect("parse template");
        parsed.validate().expect("template passes validation");
        assert_eq!(parsed, template_intake());
    }

    #[test]
    fn load_intake_rejects_missing_file() {
        let result = load_intake(Path::new("/nonexistent/intake.json"));
        assert!(matches!(result, Err(TrellisError::IoError(_))));
    }

    #[test]
    fn load_intake_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(b"not json").expect("write");
        let result = load_intake(file.path());
        assert!(matches!(result, Err(TrellisError::SerializationError(_))));
    }

    #[test]
    fn load_intake_enforces_boundary_validation() {
        // Structurally valid JSON, but empty profile fields fail validation.
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(br#"{"monthly_revenue": 1000, "team_size": 2, "customer_count": 10}"#)
            .expect("write");
        let result = load_intake(file.path());
        assert!(matches!(result, Err(TrellisError::InvalidIntake(_))));
    }

    #[test]
    fn load_intake_accepts_template_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        let json = to_pretty_json(&template_intake()).expect("serialize");
        file.write_all(json.as_bytes()).expect("write");
        let intake = load_intake(file.path()).expect("load template");
        assert_eq!(intake.monthly_revenue, 25_000);
    }
}
