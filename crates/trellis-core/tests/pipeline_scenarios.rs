//! # Pipeline Scenarios
//!
//! End-to-end assessments of named business situations through the public
//! API, from intake to roadmap, priorities, and KPI targets.

use trellis_core::{
    BusinessIntake, EpochDay, FixedClock, GrowthRoadmap, PriorityEngine, RevenueTrend,
    RoadmapGenerator, RuleId, SequentialIds, Severity, Stage, kpi, stage,
};

const TODAY: EpochDay = EpochDay(20_000);

fn generate(intake: &BusinessIntake) -> GrowthRoadmap {
    let clock = FixedClock(TODAY);
    let ids = SequentialIds::new("plan");
    RoadmapGenerator::new(&clock, &ids).generate(intake)
}

// =============================================================================
// SCENARIO: PRE-LAUNCH FOUNDER
// =============================================================================

#[test]
fn pre_launch_founder_is_idea_stage_with_customer_north_star() {
    let intake = BusinessIntake::new(0, 0, 1);
    let classification = stage::classify(&intake);

    assert_eq!(classification.stage, Stage::Idea);
    assert_eq!(classification.north_star, "First 10 Paying Customers");

    let targets = kpi::generate_targets(&intake, classification.stage);
    let north_star = targets
        .iter()
        .find(|t| t.metric == "First 10 Paying Customers")
        .expect("idea-stage north star target");
    assert_eq!(north_star.current, 0);
    assert_eq!(north_star.target, 10);
}

// =============================================================================
// SCENARIO: DISTRESSED GROWTH BUSINESS
// =============================================================================

#[test]
fn distressed_growth_business_flags_churn_and_cash_as_critical() {
    let intake = BusinessIntake::new(50_000, 120, 8)
        .with_trend(RevenueTrend::Declining)
        .with_churn(12)
        .with_runway(4);
    let roadmap = generate(&intake);

    let churn = roadmap
        .bottlenecks
        .iter()
        .find(|b| b.id == RuleId::HighChurn)
        .expect("high churn detected");
    let cash = roadmap
        .bottlenecks
        .iter()
        .find(|b| b.id == RuleId::CashCrisis)
        .expect("cash crisis detected");

    assert_eq!(churn.severity, Severity::Critical);
    assert_eq!(cash.severity, Severity::Critical);

    // Declining trend (−20), critical severity (−15) and short runway (−15)
    // outweigh the base of 50.
    assert!(roadmap.success_probability <= 30);
}

// =============================================================================
// SCENARIO: SCALING SAAS COMPANY
// =============================================================================

#[test]
fn scaling_company_gets_scaling_kpi_set() {
    let intake = BusinessIntake::new(150_000, 300, 20)
        .with_trend(RevenueTrend::Stable)
        .with_churn(2);
    let classification = stage::classify(&intake);
    assert_eq!(classification.stage, Stage::Scaling);

    let targets = kpi::generate_targets(&intake, classification.stage);
    let names: Vec<&str> = targets.iter().map(|t| t.metric.as_str()).collect();
    assert!(!names.contains(&"Customer Count"));
    assert!(names.contains(&"Revenue Per Employee"));
}

// =============================================================================
// SCENARIO: HEALTHY BUSINESS, NOTHING DETECTED
// =============================================================================

#[test]
fn healthy_business_degrades_to_general_growth_default() {
    let intake = BusinessIntake::new(30_000, 150, 8).with_trend(RevenueTrend::Growing);
    let roadmap = generate(&intake);

    assert!(roadmap.bottlenecks.is_empty());
    assert_eq!(roadmap.primary_bottleneck.id, RuleId::GeneralGrowth);
    // The synthetic default has no entry in the risk table, so a default
    // roadmap carries no risk factors.
    assert!(roadmap.risk_factors.is_empty());

    // Milestone text still has a subject.
    assert!(!roadmap.milestones[0].actions.is_empty());
}

// =============================================================================
// SCENARIO: FULL PIPELINE COHERENCE
// =============================================================================

#[test]
fn full_pipeline_outputs_are_internally_consistent() {
    let intake = BusinessIntake::new(50_000, 120, 8)
        .with_churn(12)
        .with_challenges(vec!["weak lead flow".to_string()]);
    let roadmap = generate(&intake);

    let clock = FixedClock(TODAY);
    let ids = SequentialIds::new("prio");
    let priorities = PriorityEngine::new(&clock, &ids).prioritize(&roadmap);

    // The top priority is the primary bottleneck's first action.
    assert_eq!(
        priorities.first().map(|p| p.action.as_str()),
        roadmap
            .primary_bottleneck
            .recommended_actions
            .first()
            .map(|a| a.as_str())
    );

    // Every priority id is unique.
    let mut ids: Vec<&str> = priorities.iter().map(|p| p.id.as_str()).collect();
    let before = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), before);

    // KPI targets for the same intake reference the classified stage's
    // applicable metrics only.
    let targets = kpi::generate_targets(&intake, roadmap.classification.stage);
    assert!(targets.iter().any(|t| t.metric == "Monthly Churn Rate"));
}
