//! # Leverage Mapping
//!
//! Filters a static catalog of leverage opportunities by stage applicability
//! and bottleneck relevance, then ranks the survivors by impact versus
//! effort.
//!
//! ## Relevance discount
//!
//! Each catalog entry declares the bottlenecks it addresses. Relevance is
//! 100% when any declared bottleneck was actually detected, 50% when the
//! entry declares no affinity at all (a stage-only play that is always worth
//! considering), and 30% otherwise. Entries below 30% would be discarded;
//! the discount deprioritizes off-diagnosis plays without hard-excluding
//! stage-appropriate ones.
//!
//! Final impact = raw impact × relevance / 100. Ranking score = final impact
//! × effort multiplier (low 3, medium 2, high 1), descending. Impact values
//! are heuristics, not calibrated estimates.

use crate::bottleneck::{Bottleneck, RuleId};
use crate::intake::BusinessIntake;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

// =============================================================================
// RELEVANCE CONSTANTS
// =============================================================================

/// Relevance when a declared bottleneck was detected.
pub const RELEVANCE_MATCHED_PCT: u8 = 100;

/// Relevance for entries with no bottleneck affinity (stage-only plays).
pub const RELEVANCE_STAGE_ONLY_PCT: u8 = 50;

/// Relevance when declared bottlenecks were all absent.
pub const RELEVANCE_WEAK_PCT: u8 = 30;

/// Entries below this relevance are discarded.
pub const MIN_RELEVANCE_PCT: u8 = 30;

// =============================================================================
// KINDS & EFFORT
// =============================================================================

/// The four opportunity archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageKind {
    QuickWin,
    Strategic,
    Foundational,
    Moonshot,
}

/// Required effort, with its ranking multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// Ranking multiplier: cheaper wins rank higher at equal impact.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Effort::Low => 3,
            Effort::Medium => 2,
            Effort::High => 1,
        }
    }
}

// =============================================================================
// OPPORTUNITY IDS
// =============================================================================

/// Identifier for each catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityId {
    PricingExperiment,
    ReferralProgram,
    ChurnRescueSequence,
    FounderSalesSprint,
    OutboundEngine,
    ContentFlywheel,
    SalesPlaybook,
    SecondChannel,
    OnboardingOverhaul,
    OpsAutomation,
    HiringPipeline,
    CategoryRepositioning,
    CommunityMoat,
}

// =============================================================================
// LEVERAGE POINT VALUE OBJECT
// =============================================================================

/// A ranked opportunity surviving stage and relevance filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveragePoint {
    /// Catalog identifier.
    pub id: OpportunityId,
    /// Human-readable title.
    pub title: String,
    /// Opportunity archetype.
    pub kind: LeverageKind,
    /// Relevance-discounted impact potential in [0,100] (heuristic).
    pub impact_potential: u8,
    /// Required effort.
    pub effort: Effort,
    /// Expected days until first measurable impact.
    pub time_to_impact_days: u16,
    /// Relevance applied, in percent.
    pub relevance_pct: u8,
    /// Prerequisites before starting.
    pub dependencies: Vec<String>,
    /// Resources needed to execute.
    pub resources: Vec<String>,
}

impl LeveragePoint {
    /// Impact-versus-effort ranking score.
    #[must_use]
    pub const fn ranking_score(&self) -> u32 {
        (self.impact_potential as u32).saturating_mul(self.effort.multiplier())
    }
}

// =============================================================================
// STATIC CATALOG
// =============================================================================

/// One catalog entry: stage gates, bottleneck affinities, an intake gate,
/// and an intake-dependent raw impact.
struct OpportunitySpec {
    id: OpportunityId,
    title: &'static str,
    kind: LeverageKind,
    stages: &'static [Stage],
    bottlenecks: &'static [RuleId],
    gate: fn(&BusinessIntake) -> bool,
    raw_impact: fn(&BusinessIntake) -> u8,
    effort: Effort,
    time_to_impact_days: u16,
    dependencies: &'static [&'static str],
    resources: &'static [&'static str],
}

static CATALOG: &[OpportunitySpec] = &[
    OpportunitySpec {
        id: OpportunityId::PricingExperiment,
        title: "Pricing experiment",
        kind: LeverageKind::QuickWin,
        stages: &[Stage::Early, Stage::Growth, Stage::Scaling],
        bottlenecks: &[RuleId::PoorSalesConversion],
        gate: |i| i.monthly_revenue > 0,
        raw_impact: |_| 70,
        effort: Effort::Low,
        time_to_impact_days: 14,
        dependencies: &[],
        resources: &["Win/loss notes from the last quarter", "A/B offer page"],
    },
    OpportunitySpec {
        id: OpportunityId::ReferralProgram,
        title: "Customer referral program",
        kind: LeverageKind::QuickWin,
        stages: &[Stage::Growth, Stage::Scaling],
        bottlenecks: &[],
        gate: |i| i.customer_count >= 50,
        // More customers, more referral surface; capped at 85.
        raw_impact: |i| (40u64.saturating_add(i.customer_count / 10)).min(85) as u8,
        effort: Effort::Low,
        time_to_impact_days: 21,
        dependencies: &[],
        resources: &["Incentive budget", "Referral tracking links"],
    },
    OpportunitySpec {
        id: OpportunityId::ChurnRescueSequence,
        title: "Churn rescue sequence",
        kind: LeverageKind::QuickWin,
        stages: &[Stage::Growth, Stage::Scaling, Stage::Mature],
        bottlenecks: &[RuleId::HighChurn],
        gate: |i| i.churn_rate_pct.is_some_and(|c| c > 3),
        raw_impact: |_| 80,
        effort: Effort::Low,
        time_to_impact_days: 14,
        dependencies: &["Usage or engagement signal per account"],
        resources: &["Lifecycle email tooling", "Save-offer script"],
    },
    OpportunitySpec {
        id: OpportunityId::FounderSalesSprint,
        title: "Founder sales sprint",
        kind: LeverageKind::QuickWin,
        stages: &[Stage::Idea, Stage::Early],
        bottlenecks: &[RuleId::NoProductMarketFit, RuleId::WeakLeadGeneration],
        gate: |i| i.customer_count < 50,
        raw_impact: |_| 75,
        effort: Effort::Low,
        time_to_impact_days: 7,
        dependencies: &[],
        resources: &["List of 100 target accounts", "Daily outreach block"],
    },
    OpportunitySpec {
        id: OpportunityId::OutboundEngine,
        title: "Outbound engine",
        kind: LeverageKind::Strategic,
        stages: &[Stage::Early, Stage::Growth],
        bottlenecks: &[RuleId::WeakLeadGeneration],
        gate: |i| i.team_size >= 2,
        raw_impact: |_| 78,
        effort: Effort::Medium,
        time_to_impact_days: 45,
        dependencies: &["Defined ideal customer profile"],
        resources: &["Sequencing tool", "Dedicated SDR hours"],
    },
    OpportunitySpec {
        id: OpportunityId::ContentFlywheel,
        title: "Content flywheel",
        kind: LeverageKind::Strategic,
        stages: &[Stage::Growth, Stage::Scaling],
        bottlenecks: &[RuleId::WeakLeadGeneration, RuleId::ChannelConcentration],
        gate: |_| true,
        raw_impact: |_| 72,
        effort: Effort::High,
        time_to_impact_days: 90,
        dependencies: &["Editorial owner"],
        resources: &["Weekly publishing cadence", "Distribution checklist"],
    },
    OpportunitySpec {
        id: OpportunityId::SalesPlaybook,
        title: "Documented sales playbook",
        kind: LeverageKind::Strategic,
        stages: &[Stage::Growth, Stage::Scaling],
        bottlenecks: &[RuleId::PoorSalesConversion, RuleId::FounderDependency],
        gate: |i| i.team_size >= 3,
        raw_impact: |_| 76,
        effort: Effort::Medium,
        time_to_impact_days: 30,
        dependencies: &["Call recordings from closed-won deals"],
        resources: &["Playbook template", "Weekly deal review"],
    },
    OpportunitySpec {
        id: OpportunityId::SecondChannel,
        title: "Second acquisition channel",
        kind: LeverageKind::Strategic,
        stages: &[Stage::Growth, Stage::Scaling, Stage::Mature],
        bottlenecks: &[RuleId::ChannelConcentration],
        gate: |i| i.customer_count >= 100,
        raw_impact: |_| 74,
        effort: Effort::Medium,
        time_to_impact_days: 60,
        dependencies: &["Per-channel cost tracking"],
        resources: &["Pilot budget (10% of acquisition spend)"],
    },
    OpportunitySpec {
        id: OpportunityId::OnboardingOverhaul,
        title: "Onboarding overhaul",
        kind: LeverageKind::Foundational,
        stages: &[Stage::Early, Stage::Growth, Stage::Scaling],
        bottlenecks: &[RuleId::HighChurn, RuleId::NoProductMarketFit],
        gate: |i| i.customer_count >= 10,
        raw_impact: |_| 68,
        effort: Effort::Medium,
        time_to_impact_days: 30,
        dependencies: &["Defined activation milestone"],
        resources: &["Onboarding checklist", "First-week success call"],
    },
    OpportunitySpec {
        id: OpportunityId::OpsAutomation,
        title: "Operations automation pass",
        kind: LeverageKind::Foundational,
        stages: &[Stage::Scaling, Stage::Mature],
        bottlenecks: &[RuleId::OperationalDrag, RuleId::FounderDependency],
        gate: |i| i.team_size >= 5,
        raw_impact: |_| 66,
        effort: Effort::Medium,
        time_to_impact_days: 45,
        dependencies: &["Process map of the delivery pipeline"],
        resources: &["Automation tooling budget", "One owner per process"],
    },
    OpportunitySpec {
        id: OpportunityId::HiringPipeline,
        title: "Always-on hiring pipeline",
        kind: LeverageKind::Foundational,
        stages: &[Stage::Growth, Stage::Scaling],
        bottlenecks: &[RuleId::FounderDependency],
        gate: |i| i.monthly_revenue >= 50_000,
        raw_impact: |_| 64,
        effort: Effort::High,
        time_to_impact_days: 60,
        dependencies: &["Scorecards for the next two roles"],
        resources: &["Structured interview loop", "Sourcing hours"],
    },
    OpportunitySpec {
        id: OpportunityId::CategoryRepositioning,
        title: "Category repositioning",
        kind: LeverageKind::Moonshot,
        stages: &[Stage::Scaling, Stage::Mature],
        bottlenecks: &[RuleId::UndifferentiatedPosition],
        gate: |i| i.monthly_revenue >= 100_000,
        raw_impact: |_| 88,
        effort: Effort::High,
        time_to_impact_days: 120,
        dependencies: &["Win/loss research across segments"],
        resources: &["Positioning sprint", "Site and deck rewrite"],
    },
    OpportunitySpec {
        id: OpportunityId::CommunityMoat,
        title: "Customer community moat",
        kind: LeverageKind::Moonshot,
        stages: &[Stage::Growth, Stage::Scaling],
        bottlenecks: &[],
        gate: |i| i.customer_count >= 200,
        raw_impact: |_| 70,
        effort: Effort::High,
        time_to_impact_days: 120,
        dependencies: &["Community owner"],
        resources: &["Platform choice", "Founding-member cohort"],
    },
];

/// The applicable-stage set for a catalog entry.
///
/// Every point returned by [`identify`] satisfies
/// `applicable_stages(point.id).contains(&stage)`.
#[must_use]
pub fn applicable_stages(id: OpportunityId) -> &'static [Stage] {
    CATALOG
        .iter()
        .find(|spec| spec.id == id)
        .map_or(&[], |spec| spec.stages)
}

// =============================================================================
// IDENTIFICATION
// =============================================================================

/// Filter the catalog by stage, gate, and bottleneck relevance, then rank
/// by impact × effort multiplier descending. Equal scores keep catalog
/// order.
///
/// Invariant: every returned point's applicable-stage set contains `stage`.
#[must_use]
pub fn identify(
    intake: &BusinessIntake,
    stage: Stage,
    bottlenecks: &[Bottleneck],
) -> Vec<LeveragePoint> {
    let detected: Vec<RuleId> = bottlenecks.iter().map(|b| b.id).collect();

    let mut points: Vec<LeveragePoint> = CATALOG
        .iter()
        .filter(|spec| spec.stages.contains(&stage))
        .filter(|spec| (spec.gate)(intake))
        .filter_map(|spec| {
            let relevance_pct = if spec.bottlenecks.iter().any(|id| detected.contains(id)) {
                RELEVANCE_MATCHED_PCT
            } else if spec.bottlenecks.is_empty() {
                RELEVANCE_STAGE_ONLY_PCT
            } else {
                RELEVANCE_WEAK_PCT
            };
            if relevance_pct < MIN_RELEVANCE_PCT {
                return None;
            }
            let raw = (spec.raw_impact)(intake) as u32;
            let impact_potential = (raw.saturating_mul(relevance_pct as u32) / 100).min(100) as u8;
            Some(LeveragePoint {
                id: spec.id,
                title: spec.title.to_string(),
                kind: spec.kind,
                impact_potential,
                effort: spec.effort,
                time_to_impact_days: spec.time_to_impact_days,
                relevance_pct,
                dependencies: spec.dependencies.iter().map(|s| s.to_string()).collect(),
                resources: spec.resources.iter().map(|s| s.to_string()).collect(),
            })
        })
        .collect();

    points.sort_by_key(|p| std::cmp::Reverse(p.ranking_score()));
    points
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bottleneck::detect;
    use crate::intake::RevenueTrend;
    use crate::stage::classify;

    fn pipeline(intake: &BusinessIntake) -> (Stage, Vec<LeveragePoint>) {
        let stage = classify(intake).stage;
        let bottlenecks = detect(intake, stage);
        (stage, identify(intake, stage, &bottlenecks))
    }

    #[test]
    fn stage_gate_is_hard() {
        let intake = BusinessIntake::new(0, 0, 1);
        let (stage, points) = pipeline(&intake);
        assert_eq!(stage, Stage::Idea);
        for point in &points {
            let spec = CATALOG
                .iter()
                .find(|s| s.id == point.id)
                .expect("catalog entry");
            assert!(spec.stages.contains(&stage));
        }
        // Scaling-only plays must never surface at idea stage.
        assert!(points.iter().all(|p| p.id != OpportunityId::OpsAutomation));
    }

    #[test]
    fn matched_bottleneck_gets_full_relevance() {
        let intake = BusinessIntake::new(50_000, 120, 8).with_churn(12);
        let (_, points) = pipeline(&intake);
        let rescue = points
            .iter()
            .find(|p| p.id == OpportunityId::ChurnRescueSequence)
            .expect("churn play should surface");
        assert_eq!(rescue.relevance_pct, RELEVANCE_MATCHED_PCT);
        assert_eq!(rescue.impact_potential, 80);
    }

    #[test]
    fn no_affinity_play_half_relevance() {
        let intake = BusinessIntake::new(50_000, 120, 8).with_trend(RevenueTrend::Growing);
        let (_, points) = pipeline(&intake);
        let referral = points
            .iter()
            .find(|p| p.id == OpportunityId::ReferralProgram)
            .expect("referral play should surface");
        assert_eq!(referral.relevance_pct, RELEVANCE_STAGE_ONLY_PCT);
        // raw = min(85, 40 + 120/10) = 52; 52 × 50% = 26.
        assert_eq!(referral.impact_potential, 26);
    }

    #[test]
    fn unmatched_affinity_survives_at_weak_relevance() {
        // No sales-conversion bottleneck detected, but the pricing play
        // still surfaces at 30% relevance.
        let intake = BusinessIntake::new(50_000, 120, 8).with_trend(RevenueTrend::Growing);
        let (_, points) = pipeline(&intake);
        let pricing = points
            .iter()
            .find(|p| p.id == OpportunityId::PricingExperiment)
            .expect("pricing play should surface");
        assert_eq!(pricing.relevance_pct, RELEVANCE_WEAK_PCT);
        assert_eq!(pricing.impact_potential, 21);
    }

    #[test]
    fn ranking_descends_by_score() {
        let intake = BusinessIntake::new(50_000, 120, 8)
            .with_churn(12)
            .with_challenges(vec!["weak lead flow".to_string()]);
        let (_, points) = pipeline(&intake);
        assert!(points.len() >= 3);
        for pair in points.windows(2) {
            assert!(pair[0].ranking_score() >= pair[1].ranking_score());
        }
    }

    #[test]
    fn referral_impact_scales_with_customer_count() {
        let small = BusinessIntake::new(60_000, 60, 10).with_trend(RevenueTrend::Growing);
        let large = BusinessIntake::new(60_000, 460, 10).with_trend(RevenueTrend::Growing);
        let impact_of = |intake: &BusinessIntake| {
            let (_, points) = pipeline(intake);
            points
                .iter()
                .find(|p| p.id == OpportunityId::ReferralProgram)
                .map(|p| p.impact_potential)
        };
        let s = impact_of(&small).expect("surfaces for 60 customers");
        let l = impact_of(&large).expect("surfaces for 460 customers");
        assert!(l > s);
    }

    #[test]
    fn intake_gate_excludes_entries() {
        // Zero revenue fails the pricing experiment gate even at early stage.
        let intake = BusinessIntake::new(0, 5, 2).with_goals(vec!["validate mvp".to_string()]);
        let (stage, points) = pipeline(&intake);
        assert_eq!(stage, Stage::Idea);
        assert!(points.iter().all(|p| p.id != OpportunityId::PricingExperiment));
    }
}
