//! # Roadmap Generation
//!
//! The orchestrator: composes stage classification, bottleneck detection,
//! and leverage mapping into a 4-milestone, 90-day growth roadmap with risk
//! factors, a things-to-ignore list, and a success-probability estimate.
//!
//! Generation never fails. When detection returns nothing, a synthetic
//! default bottleneck (`general_growth`, lead_generation, medium) stands in
//! so downstream milestone text always has a subject.
//!
//! The success probability is an additive heuristic clamped to [10,90] — a
//! confidence signal, NOT a statistical estimate. Callers must not treat it
//! as calibrated.

use crate::bottleneck::{self, Bottleneck, BottleneckCategory, RuleId, Severity};
use crate::intake::{BusinessIntake, RevenueTrend};
use crate::leverage::{self, LeverageKind, LeveragePoint};
use crate::ports::{Clock, EpochDay, IdSource};
use crate::stage::{self, Stage, StageClassification};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Week anchors for the four milestones.
pub const MILESTONE_WEEKS: [u8; 4] = [1, 3, 5, 9];

/// Leverage points carried on the roadmap.
pub const TOP_LEVERAGE_COUNT: usize = 5;

/// Risk factors are drawn from this many top bottlenecks.
const RISK_SOURCE_BOTTLENECKS: usize = 3;

/// Maximum deduplicated risk factors on a roadmap.
const MAX_RISK_FACTORS: usize = 6;

/// Success probability bounds.
const MIN_SUCCESS_PROBABILITY: i32 = 10;
const MAX_SUCCESS_PROBABILITY: i32 = 90;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// A week-anchored checkpoint on the 90-day plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapMilestone {
    /// Week number (1, 3, 5, or 9).
    pub week: u8,
    /// Short milestone title.
    pub title: String,
    /// What this checkpoint is for.
    pub objectives: Vec<String>,
    /// Concrete actions to take.
    pub actions: Vec<String>,
    /// How success at this checkpoint is measured.
    pub success_metrics: Vec<String>,
    /// Titles of milestones this one depends on (the prior milestone).
    pub dependencies: Vec<String>,
}

/// The aggregate 90-day plan. Immutable; callers regenerate rather than
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthRoadmap {
    /// Unique identifier from the injected [`IdSource`].
    pub id: String,
    /// Generation day from the injected [`Clock`].
    pub generated_on: EpochDay,
    /// Full stage classification, confidence included.
    pub classification: StageClassification,
    /// The single highest-impact bottleneck (synthetic default when
    /// detection found nothing).
    pub primary_bottleneck: Bottleneck,
    /// All detected bottlenecks, sorted by impact descending.
    pub bottlenecks: Vec<Bottleneck>,
    /// Top leverage points, ranked.
    pub leverage_points: Vec<LeveragePoint>,
    /// The four week-anchored milestones.
    pub milestones: Vec<RoadmapMilestone>,
    /// Stage-specific distractions to deliberately ignore.
    pub things_to_ignore: Vec<String>,
    /// Deduplicated risk phrases from the top bottlenecks (≤6).
    pub risk_factors: Vec<String>,
    /// Heuristic success probability in [10,90]. Not calibrated.
    pub success_probability: u8,
}

// =============================================================================
// ROADMAP GENERATOR
// =============================================================================

/// Composes the three leaf engines into a [`GrowthRoadmap`].
pub struct RoadmapGenerator<'a> {
    clock: &'a dyn Clock,
    ids: &'a dyn IdSource,
}

impl<'a> RoadmapGenerator<'a> {
    /// Create a generator over the given ports.
    #[must_use]
    pub fn new(clock: &'a dyn Clock, ids: &'a dyn IdSource) -> Self {
        Self { clock, ids }
    }

    /// Generate the full 90-day roadmap for an intake. Never fails.
    #[must_use]
    pub fn generate(&self, intake: &BusinessIntake) -> GrowthRoadmap {
        let classification = stage::classify(intake);
        let stage = classification.stage;
        let bottlenecks = bottleneck::detect(intake, stage);
        let identified = leverage::identify(intake, stage, &bottlenecks);

        let primary = bottleneck::primary(&bottlenecks)
            .cloned()
            .unwrap_or_else(default_bottleneck);

        let success_probability =
            success_probability(intake, &classification, &bottlenecks, &identified);
        let risk_factors = risk_factors(&bottlenecks);

        let leverage_points: Vec<LeveragePoint> =
            identified.into_iter().take(TOP_LEVERAGE_COUNT).collect();

        let milestones = build_milestones(intake, stage, &primary, &leverage_points);

        let profile = stage.profile();
        GrowthRoadmap {
            id: self.ids.next_id(),
            generated_on: self.clock.today(),
            classification,
            primary_bottleneck: primary,
            bottlenecks,
            leverage_points,
            milestones,
            things_to_ignore: profile
                .things_to_ignore
                .iter()
                .map(|s| s.to_string())
                .collect(),
            risk_factors,
            success_probability,
        }
    }
}

// =============================================================================
// DEFAULT BOTTLENECK (degrade-gracefully, not an error path)
// =============================================================================

fn default_bottleneck() -> Bottleneck {
    Bottleneck {
        id: RuleId::GeneralGrowth,
        category: BottleneckCategory::LeadGeneration,
        severity: Severity::Medium,
        impact: 50,
        evidence: vec!["No acute structural constraint detected".to_string()],
        recommended_actions: vec![
            "Set one 90-day revenue target and review it weekly".to_string(),
            "Double down on the best-performing acquisition channel".to_string(),
            "Tighten the weekly growth review to leading indicators".to_string(),
        ],
    }
}

// =============================================================================
// SUCCESS PROBABILITY (additive heuristic, clamped)
// =============================================================================

fn success_probability(
    intake: &BusinessIntake,
    classification: &StageClassification,
    bottlenecks: &[Bottleneck],
    identified: &[LeveragePoint],
) -> u8 {
    let mut score: i32 = 50;

    match intake.revenue_trend {
        RevenueTrend::Growing => score += 15,
        RevenueTrend::Stable => {}
        RevenueTrend::Declining => score -= 20,
    }

    if classification.confidence_pct > 70 {
        score += 5;
    }

    if identified.iter().any(|p| p.kind == LeverageKind::QuickWin) {
        score += 10;
    }

    if let Some(runway) = intake.runway_months {
        if runway > 12 {
            score += 10;
        }
        if runway < 6 {
            score -= 15;
        }
    }

    if bottlenecks.iter().any(|b| b.severity == Severity::Critical) {
        score -= 15;
    }

    if bottlenecks.len() < 3 {
        score += 5;
    }
    if bottlenecks.len() > 4 {
        score -= 10;
    }

    score.clamp(MIN_SUCCESS_PROBABILITY, MAX_SUCCESS_PROBABILITY) as u8
}

// =============================================================================
// RISK FACTORS (static table, top-3 bottlenecks, deduplicated, ≤6)
// =============================================================================

const fn risk_phrases(id: RuleId) -> &'static [&'static str] {
    match id {
        RuleId::NoProductMarketFit => &[
            "Building on unvalidated demand",
            "Revenue concentrated in early adopters",
        ],
        RuleId::WeakLeadGeneration => &["Pipeline dries up within one quarter"],
        RuleId::PoorSalesConversion => &["Discounting erodes pricing power"],
        RuleId::HighChurn => &[
            "Growth masks a leaky bucket",
            "Negative word of mouth compounds",
        ],
        RuleId::CashCrisis => &[
            "Forced fundraising from a weak position",
            "Payroll risk inside two quarters",
        ],
        RuleId::FounderDependency => &["Key-person risk on every deal"],
        RuleId::OperationalDrag => &["Quality slips as volume grows"],
        RuleId::UndifferentiatedPosition => &["Price competition squeezes margin"],
        RuleId::ChannelConcentration => {
            &["Platform or algorithm change cuts acquisition overnight"]
        }
        // The synthetic default has no entry: a default roadmap carries no
        // risk factors.
        RuleId::GeneralGrowth => &[],
    }
}

fn risk_factors(bottlenecks: &[Bottleneck]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for b in bottlenecks.iter().take(RISK_SOURCE_BOTTLENECKS) {
        for phrase in risk_phrases(b.id) {
            if out.len() >= MAX_RISK_FACTORS {
                return out;
            }
            if !out.iter().any(|p| p == phrase) {
                out.push(phrase.to_string());
            }
        }
    }
    out
}

// =============================================================================
// MILESTONE SYNTHESIS
// =============================================================================

fn points_of_kind<'p>(
    points: &'p [LeveragePoint],
    kind: LeverageKind,
    limit: usize,
) -> Vec<&'p LeveragePoint> {
    points.iter().filter(|p| p.kind == kind).take(limit).collect()
}

fn build_milestones(
    intake: &BusinessIntake,
    stage: Stage,
    primary: &Bottleneck,
    points: &[LeveragePoint],
) -> Vec<RoadmapMilestone> {
    let quick_wins = points_of_kind(points, LeverageKind::QuickWin, 2);
    let strategic = points_of_kind(points, LeverageKind::Strategic, 2);
    let foundational = points_of_kind(points, LeverageKind::Foundational, 1);

    let m1 = milestone_stabilize(primary);
    let m2 = milestone_quick_wins(&quick_wins, &m1.title);
    let m3 = milestone_strategic(&strategic, points, &m2.title);
    let m4 = milestone_compound(intake, stage, &foundational, &m3.title);

    vec![m1, m2, m3, m4]
}

/// Week 1: confront the primary constraint.
fn milestone_stabilize(primary: &Bottleneck) -> RoadmapMilestone {
    RoadmapMilestone {
        week: MILESTONE_WEEKS[0],
        title: "Stabilize the primary constraint".to_string(),
        objectives: vec![
            format!("Confront the {} constraint head-on", primary.category.label()),
            "Establish the baseline metrics the 90-day plan is judged by".to_string(),
        ],
        actions: primary.recommended_actions.iter().take(2).cloned().collect(),
        success_metrics: vec![
            format!("First corrective action on {} shipped", primary.category.label()),
            "Baseline dashboard reviewed in the weekly cadence".to_string(),
        ],
        dependencies: Vec::new(),
    }
}

/// Week 3: ship the quick wins.
fn milestone_quick_wins(quick_wins: &[&LeveragePoint], prior: &str) -> RoadmapMilestone {
    let (objectives, actions, success_metrics) = if quick_wins.is_empty() {
        (
            vec!["Ship one visible improvement inside three weeks".to_string()],
            vec!["Pick the cheapest credible lever from the leverage list and run it".to_string()],
            vec!["One measurable lift attributable to the change".to_string()],
        )
    } else {
        let objectives = quick_wins
            .iter()
            .map(|p| format!("Ship: {}", p.title))
            .collect();
        // Quick-win actions come from the plays' resource lists.
        let actions = quick_wins
            .iter()
            .flat_map(|p| p.resources.iter().map(|r| format!("Prepare {}", lowercase_first(r))))
            .take(4)
            .collect();
        let success_metrics = quick_wins
            .iter()
            .map(|p| format!("First measurable lift from {} within {} days", p.title, p.time_to_impact_days))
            .collect();
        (objectives, actions, success_metrics)
    };

    RoadmapMilestone {
        week: MILESTONE_WEEKS[1],
        title: "Land the quick wins".to_string(),
        objectives,
        actions,
        success_metrics,
        dependencies: vec![prior.to_string()],
    }
}

/// Week 5: stand up the strategic plays.
fn milestone_strategic(
    strategic: &[&LeveragePoint],
    all_points: &[LeveragePoint],
    prior: &str,
) -> RoadmapMilestone {
    let (objectives, actions) = if strategic.is_empty() {
        let fallback = all_points
            .first()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| "the highest-ranked leverage point".to_string());
        (
            vec![format!("Advance {}", fallback)],
            vec![format!("Initiate: {}", fallback)],
        )
    } else {
        (
            strategic
                .iter()
                .map(|p| format!("Stand up: {}", p.title))
                .collect(),
            strategic
                .iter()
                .map(|p| format!("Initiate: {}", p.title))
                .collect(),
        )
    };

    RoadmapMilestone {
        week: MILESTONE_WEEKS[2],
        title: "Build the strategic engine".to_string(),
        objectives,
        actions,
        success_metrics: vec!["Each strategic initiative has an owner and a weekly number".to_string()],
        dependencies: vec![prior.to_string()],
    }
}

/// Week 9: compound, systematize, and measure against stage targets.
fn milestone_compound(
    intake: &BusinessIntake,
    stage: Stage,
    foundational: &[&LeveragePoint],
    prior: &str,
) -> RoadmapMilestone {
    let objectives = match foundational.first() {
        Some(p) => vec![
            format!("Lock in: {}", p.title),
            "Review 90-day outcomes against targets".to_string(),
        ],
        None => vec![
            "Systematize what worked in weeks 1-8".to_string(),
            "Review 90-day outcomes against targets".to_string(),
        ],
    };
    let actions = match foundational.first() {
        Some(p) => {
            let mut acts: Vec<String> = p
                .dependencies
                .iter()
                .map(|d| format!("Resolve prerequisite: {}", lowercase_first(d)))
                .collect();
            acts.push(format!("Initiate: {}", p.title));
            acts
        }
        None => vec!["Write down the operating cadence that produced the wins".to_string()],
    };

    RoadmapMilestone {
        week: MILESTONE_WEEKS[3],
        title: "Compound and systematize".to_string(),
        objectives,
        actions,
        success_metrics: week9_metrics(intake, stage),
        dependencies: vec![prior.to_string()],
    }
}

/// Stage-specific week-9 success metrics, parameterized by the stage's
/// revenue-growth projection.
fn week9_metrics(intake: &BusinessIntake, stage: Stage) -> Vec<String> {
    let pct = stage.profile().revenue_growth_pct;
    let projected = intake
        .monthly_revenue
        .saturating_mul(100u64.saturating_add(pct))
        / 100;

    match stage {
        Stage::Idea => vec![
            "First 10 paying customers secured".to_string(),
            "A repeatable pitch converting cold outreach".to_string(),
        ],
        Stage::Early => vec![
            format!("Monthly revenue at or above ${projected}"),
            "A documented sales process run by someone besides the founder".to_string(),
        ],
        Stage::Growth => vec![
            format!("Monthly revenue at or above ${projected}"),
            "Churn measured monthly and trending down".to_string(),
        ],
        Stage::Scaling => vec![
            format!("Monthly revenue at or above ${projected}"),
            "Operating cadence running without founder presence".to_string(),
        ],
        Stage::Mature => vec![
            format!("Monthly revenue at or above ${projected}"),
            "One new growth bet resourced and measured".to_string(),
        ],
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SequentialIds};

    fn generate(intake: &BusinessIntake) -> GrowthRoadmap {
        let clock = FixedClock(EpochDay::new(20_000));
        let ids = SequentialIds::new("plan");
        RoadmapGenerator::new(&clock, &ids).generate(intake)
    }

    #[test]
    fn roadmap_has_four_week_anchored_milestones() {
        let roadmap = generate(&BusinessIntake::new(50_000, 120, 8));
        let weeks: Vec<u8> = roadmap.milestones.iter().map(|m| m.week).collect();
        assert_eq!(weeks, vec![1, 3, 5, 9]);
    }

    #[test]
    fn milestones_chain_dependencies() {
        let roadmap = generate(&BusinessIntake::new(50_000, 120, 8));
        assert!(roadmap.milestones[0].dependencies.is_empty());
        for pair in roadmap.milestones.windows(2) {
            assert_eq!(pair[1].dependencies, vec![pair[0].title.clone()]);
        }
    }

    #[test]
    fn empty_detection_yields_general_growth_default() {
        let intake = BusinessIntake::new(30_000, 150, 8).with_trend(RevenueTrend::Growing);
        let roadmap = generate(&intake);
        assert!(roadmap.bottlenecks.is_empty());
        assert_eq!(roadmap.primary_bottleneck.id, RuleId::GeneralGrowth);
        assert_eq!(
            roadmap.primary_bottleneck.category,
            BottleneckCategory::LeadGeneration
        );
        assert_eq!(roadmap.primary_bottleneck.severity, Severity::Medium);
        // general_growth has no entry in the risk table.
        assert!(roadmap.risk_factors.is_empty());
    }

    #[test]
    fn distressed_intake_probability_at_most_30() {
        let intake = BusinessIntake::new(50_000, 120, 8)
            .with_trend(RevenueTrend::Declining)
            .with_churn(12)
            .with_runway(4);
        let roadmap = generate(&intake);
        assert!(roadmap.success_probability >= 10);
        assert!(roadmap.success_probability <= 30);
    }

    #[test]
    fn probability_always_within_bounds() {
        let healthy = BusinessIntake::new(60_000, 300, 10)
            .with_trend(RevenueTrend::Growing)
            .with_runway(24)
            .with_churn(2);
        let roadmap = generate(&healthy);
        assert!(roadmap.success_probability >= 10);
        assert!(roadmap.success_probability <= 90);
    }

    #[test]
    fn risk_factors_capped_and_deduplicated() {
        let intake = BusinessIntake::new(50_000, 80, 2)
            .with_trend(RevenueTrend::Declining)
            .with_churn(12)
            .with_runway(4)
            .with_challenges(vec!["weak lead flow and sales conversion".to_string()]);
        let roadmap = generate(&intake);
        assert!(roadmap.risk_factors.len() <= 6);
        let mut seen = roadmap.risk_factors.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), roadmap.risk_factors.len());
    }

    #[test]
    fn top_leverage_capped_at_five() {
        let intake = BusinessIntake::new(50_000, 120, 8)
            .with_churn(12)
            .with_challenges(vec!["weak lead flow".to_string(), "sales".to_string()]);
        let roadmap = generate(&intake);
        assert!(roadmap.leverage_points.len() <= TOP_LEVERAGE_COUNT);
        assert!(!roadmap.leverage_points.is_empty());
    }

    #[test]
    fn things_to_ignore_follow_stage() {
        let roadmap = generate(&BusinessIntake::new(0, 0, 1));
        assert_eq!(roadmap.classification.stage, Stage::Idea);
        assert!(roadmap
            .things_to_ignore
            .iter()
            .any(|t| t == "Scaling infrastructure"));
    }

    #[test]
    fn week1_actions_come_from_primary_bottleneck() {
        let intake = BusinessIntake::new(50_000, 120, 8).with_churn(12);
        let roadmap = generate(&intake);
        let expected: Vec<String> = roadmap
            .primary_bottleneck
            .recommended_actions
            .iter()
            .take(2)
            .cloned()
            .collect();
        assert_eq!(roadmap.milestones[0].actions, expected);
    }

    #[test]
    fn week9_metric_carries_revenue_projection() {
        let intake = BusinessIntake::new(50_000, 120, 8).with_trend(RevenueTrend::Growing);
        let roadmap = generate(&intake);
        // Growth stage projects +30%.
        assert!(roadmap.milestones[3]
            .success_metrics
            .iter()
            .any(|m| m.contains("$65000")));
    }

    #[test]
    fn generated_ids_and_day_come_from_ports() {
        let clock = FixedClock(EpochDay::new(19_500));
        let ids = SequentialIds::new("bp");
        let generator = RoadmapGenerator::new(&clock, &ids);
        let roadmap = generator.generate(&BusinessIntake::new(0, 0, 1));
        assert_eq!(roadmap.id, "bp-1");
        assert_eq!(roadmap.generated_on, EpochDay::new(19_500));
    }
}
