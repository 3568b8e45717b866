//! # Bottleneck Detection
//!
//! Evaluates a fixed, ordered rule set against an intake plus its classified
//! stage and returns ranked structural bottlenecks.
//!
//! Each rule is a tagged variant evaluated through a uniform
//! `evaluate(intake, stage) -> Option<Bottleneck>` interface, so the rule
//! set is data-driven and testable rule by rule. Rules are independent;
//! several may fire for the same intake. Missing optional intake fields use
//! per-rule fallback constants instead of raising errors.
//!
//! Impact score = severity base (25/50/75/100) × the rule's static
//! multiplier percent / 100, so impact always lands in [0,100]. Output is
//! sorted non-increasing by impact and may be empty.

use crate::intake::{BusinessIntake, RevenueTrend};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

// =============================================================================
// CATEGORIES & SEVERITY
// =============================================================================

/// The 8 fixed structural-constraint categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckCategory {
    ProductMarketFit,
    LeadGeneration,
    SalesConversion,
    Operations,
    Team,
    Capital,
    MarketPosition,
    Retention,
}

impl BottleneckCategory {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BottleneckCategory::ProductMarketFit => "product-market fit",
            BottleneckCategory::LeadGeneration => "lead generation",
            BottleneckCategory::SalesConversion => "sales conversion",
            BottleneckCategory::Operations => "operations",
            BottleneckCategory::Team => "team",
            BottleneckCategory::Capital => "capital",
            BottleneckCategory::MarketPosition => "market position",
            BottleneckCategory::Retention => "retention",
        }
    }
}

/// Constraint severity with its base impact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Base impact score before the per-rule multiplier.
    #[must_use]
    pub const fn base_score(self) -> u32 {
        match self {
            Severity::Low => 25,
            Severity::Medium => 50,
            Severity::High => 75,
            Severity::Critical => 100,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

// =============================================================================
// RULE IDS
// =============================================================================

/// Identifier for each detection rule (plus the synthetic roadmap default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    NoProductMarketFit,
    WeakLeadGeneration,
    PoorSalesConversion,
    HighChurn,
    CashCrisis,
    FounderDependency,
    OperationalDrag,
    UndifferentiatedPosition,
    ChannelConcentration,
    /// Synthetic default emitted by the roadmap generator when detection
    /// returns nothing. Never produced by `detect`.
    GeneralGrowth,
}

impl RuleId {
    /// Snake-case identifier matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleId::NoProductMarketFit => "no_product_market_fit",
            RuleId::WeakLeadGeneration => "weak_lead_generation",
            RuleId::PoorSalesConversion => "poor_sales_conversion",
            RuleId::HighChurn => "high_churn",
            RuleId::CashCrisis => "cash_crisis",
            RuleId::FounderDependency => "founder_dependency",
            RuleId::OperationalDrag => "operational_drag",
            RuleId::UndifferentiatedPosition => "undifferentiated_position",
            RuleId::ChannelConcentration => "channel_concentration",
            RuleId::GeneralGrowth => "general_growth",
        }
    }
}

// =============================================================================
// BOTTLENECK VALUE OBJECT
// =============================================================================

/// A detected structural constraint limiting growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottleneck {
    /// The rule that fired.
    pub id: RuleId,
    /// Constraint category.
    pub category: BottleneckCategory,
    /// Severity classification.
    pub severity: Severity,
    /// Impact score in [0,100]; higher = more limiting.
    pub impact: u8,
    /// Evidence from the intake supporting the finding.
    pub evidence: Vec<String>,
    /// Recommended corrective actions, most important first.
    pub recommended_actions: Vec<String>,
}

// =============================================================================
// FALLBACK CONSTANTS (nullish handling per rule)
// =============================================================================

/// Churn assumed when the intake does not track it: rules that key off high
/// churn stay silent rather than guessing.
const CHURN_FALLBACK_PCT: u8 = 0;

/// Runway assumed when unknown: comfortable enough that cash rules stay
/// silent.
const RUNWAY_FALLBACK_MONTHS: u32 = 24;

// =============================================================================
// DETECTION RULES (Tagged Registry)
// =============================================================================

/// The fixed, ordered detection rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionRule {
    NoProductMarketFit,
    WeakLeadGeneration,
    PoorSalesConversion,
    HighChurn,
    CashCrisis,
    FounderDependency,
    OperationalDrag,
    UndifferentiatedPosition,
    ChannelConcentration,
}

/// All rules in evaluation order.
pub const ALL_RULES: [DetectionRule; 9] = [
    DetectionRule::NoProductMarketFit,
    DetectionRule::WeakLeadGeneration,
    DetectionRule::PoorSalesConversion,
    DetectionRule::HighChurn,
    DetectionRule::CashCrisis,
    DetectionRule::FounderDependency,
    DetectionRule::OperationalDrag,
    DetectionRule::UndifferentiatedPosition,
    DetectionRule::ChannelConcentration,
];

impl DetectionRule {
    /// The identifier this rule emits.
    #[must_use]
    pub const fn id(self) -> RuleId {
        match self {
            DetectionRule::NoProductMarketFit => RuleId::NoProductMarketFit,
            DetectionRule::WeakLeadGeneration => RuleId::WeakLeadGeneration,
            DetectionRule::PoorSalesConversion => RuleId::PoorSalesConversion,
            DetectionRule::HighChurn => RuleId::HighChurn,
            DetectionRule::CashCrisis => RuleId::CashCrisis,
            DetectionRule::FounderDependency => RuleId::FounderDependency,
            DetectionRule::OperationalDrag => RuleId::OperationalDrag,
            DetectionRule::UndifferentiatedPosition => RuleId::UndifferentiatedPosition,
            DetectionRule::ChannelConcentration => RuleId::ChannelConcentration,
        }
    }

    /// Static impact multiplier in percent.
    #[must_use]
    pub const fn multiplier_pct(self) -> u32 {
        match self {
            DetectionRule::NoProductMarketFit => 100,
            DetectionRule::WeakLeadGeneration => 90,
            DetectionRule::PoorSalesConversion => 85,
            DetectionRule::HighChurn => 95,
            DetectionRule::CashCrisis => 100,
            DetectionRule::FounderDependency => 80,
            DetectionRule::OperationalDrag => 75,
            DetectionRule::UndifferentiatedPosition => 70,
            DetectionRule::ChannelConcentration => 65,
        }
    }

    /// Evaluate this rule against an intake and stage.
    ///
    /// Returns `None` when the rule's condition does not hold.
    #[must_use]
    pub fn evaluate(self, intake: &BusinessIntake, stage: Stage) -> Option<Bottleneck> {
        let churn = intake.churn_rate_pct.unwrap_or(CHURN_FALLBACK_PCT);
        let runway = intake.runway_months.unwrap_or(RUNWAY_FALLBACK_MONTHS);

        let finding = match self {
            DetectionRule::NoProductMarketFit => {
                let applies = matches!(stage, Stage::Idea | Stage::Early)
                    && intake.customer_count < 10
                    && intake.monthly_revenue < 5_000;
                if !applies {
                    return None;
                }
                let severity = if intake.monthly_revenue == 0 {
                    Severity::Critical
                } else {
                    Severity::High
                };
                Finding {
                    category: BottleneckCategory::ProductMarketFit,
                    severity,
                    evidence: vec![
                        format!("{} paying customers", intake.customer_count),
                        format!("${} monthly revenue", intake.monthly_revenue),
                    ],
                    actions: &[
                        "Run 15 structured problem interviews with target buyers",
                        "Pre-sell before building: collect deposits or signed LOIs",
                        "Narrow the offer to one painful, urgent, paid problem",
                    ],
                }
            }

            DetectionRule::WeakLeadGeneration => {
                let tagged = BusinessIntake::mentions(
                    &intake.challenges,
                    &["leads", "lead flow", "marketing", "pipeline"],
                );
                let thin_for_stage = stage == Stage::Growth && intake.customer_count < 100;
                if !tagged && !thin_for_stage {
                    return None;
                }
                let severity = if tagged && thin_for_stage {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let mut evidence = Vec::new();
                if tagged {
                    evidence.push("Lead flow named as a challenge".to_string());
                }
                if thin_for_stage {
                    evidence.push(format!(
                        "Only {} customers at growth stage",
                        intake.customer_count
                    ));
                }
                Finding {
                    category: BottleneckCategory::LeadGeneration,
                    severity,
                    evidence,
                    actions: &[
                        "Commit to one outbound motion for 30 days and measure reply rate",
                        "Publish one proof-heavy case study and syndicate it",
                        "Set a weekly qualified-leads target and review it every Monday",
                    ],
                }
            }

            DetectionRule::PoorSalesConversion => {
                let tagged = BusinessIntake::mentions(
                    &intake.challenges,
                    &["sales", "closing", "conversion", "win rate"],
                );
                if !tagged {
                    return None;
                }
                let severity = if intake.revenue_trend == RevenueTrend::Declining {
                    Severity::High
                } else {
                    Severity::Medium
                };
                Finding {
                    category: BottleneckCategory::SalesConversion,
                    severity,
                    evidence: vec!["Sales conversion named as a challenge".to_string()],
                    actions: &[
                        "Record and review the last 10 sales conversations",
                        "Script discovery around the buyer's cost of inaction",
                        "Introduce a single time-bound incentive to close stalled deals",
                    ],
                }
            }

            DetectionRule::HighChurn => {
                if churn <= 5 {
                    return None;
                }
                let severity = if churn >= 10 {
                    Severity::Critical
                } else if churn >= 8 {
                    Severity::High
                } else {
                    Severity::Medium
                };
                Finding {
                    category: BottleneckCategory::Retention,
                    severity,
                    evidence: vec![format!("{churn}% monthly churn")],
                    actions: &[
                        "Interview the last 10 churned customers this week",
                        "Instrument activation: find the action retained customers take early",
                        "Stand up a save sequence triggered by usage drop-off",
                    ],
                }
            }

            DetectionRule::CashCrisis => {
                if runway >= 9 {
                    return None;
                }
                let severity = if runway < 6 {
                    Severity::Critical
                } else {
                    Severity::High
                };
                Finding {
                    category: BottleneckCategory::Capital,
                    severity,
                    evidence: vec![format!("{runway} months of runway")],
                    actions: &[
                        "Cut to a default-alive budget within two weeks",
                        "Collect: shift to upfront annual billing with a discount",
                        "Open fundraising or credit conversations before you must",
                    ],
                }
            }

            DetectionRule::FounderDependency => {
                let applies = intake.team_size <= 3 && intake.monthly_revenue > 20_000;
                if !applies {
                    return None;
                }
                Finding {
                    category: BottleneckCategory::Team,
                    severity: Severity::High,
                    evidence: vec![format!(
                        "${} monthly revenue carried by a team of {}",
                        intake.monthly_revenue, intake.team_size
                    )],
                    actions: &[
                        "Document the three processes only the founder can run",
                        "Hire or contract the first non-founder revenue role",
                        "Time-box founder hours on delivery and protect sales time",
                    ],
                }
            }

            DetectionRule::OperationalDrag => {
                let tagged = BusinessIntake::mentions(
                    &intake.challenges,
                    &["process", "operations", "manual", "fulfillment"],
                );
                let scale_strain = stage == Stage::Scaling && intake.team_size >= 15;
                if !tagged && !scale_strain {
                    return None;
                }
                let severity = if scale_strain {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let mut evidence = Vec::new();
                if tagged {
                    evidence.push("Operational friction named as a challenge".to_string());
                }
                if scale_strain {
                    evidence.push(format!(
                        "Team of {} at scaling stage without documented process",
                        intake.team_size
                    ));
                }
                Finding {
                    category: BottleneckCategory::Operations,
                    severity,
                    evidence,
                    actions: &[
                        "Map the delivery pipeline and measure cycle time per step",
                        "Automate the single most repeated manual task",
                        "Assign one owner per recurring process",
                    ],
                }
            }

            DetectionRule::UndifferentiatedPosition => {
                let tagged = BusinessIntake::mentions(
                    &intake.challenges,
                    &["competition", "competitors", "pricing pressure", "differentiation"],
                );
                if !tagged {
                    return None;
                }
                Finding {
                    category: BottleneckCategory::MarketPosition,
                    severity: Severity::Medium,
                    evidence: vec!["Competitive pressure named as a challenge".to_string()],
                    actions: &[
                        "Interview recent wins: why you, in their words",
                        "Pick one segment to own outright and say no to the rest",
                        "Reprice against value delivered, not competitor list prices",
                    ],
                }
            }

            DetectionRule::ChannelConcentration => {
                let applies = matches!(stage, Stage::Growth | Stage::Scaling | Stage::Mature)
                    && intake.revenue_trend != RevenueTrend::Growing;
                if !applies {
                    return None;
                }
                Finding {
                    category: BottleneckCategory::LeadGeneration,
                    severity: Severity::Medium,
                    evidence: vec![format!(
                        "Single primary channel ({}) with {} revenue",
                        if intake.primary_channel.is_empty() {
                            "unspecified"
                        } else {
                            intake.primary_channel.as_str()
                        },
                        intake.revenue_trend
                    )],
                    actions: &[
                        "Pilot a second acquisition channel with 10% of spend",
                        "Measure blended vs per-channel acquisition cost monthly",
                        "Build an owned audience the platform cannot take away",
                    ],
                }
            }
        };

        Some(self.into_bottleneck(finding))
    }

    fn into_bottleneck(self, finding: Finding) -> Bottleneck {
        let impact =
            (finding.severity.base_score().saturating_mul(self.multiplier_pct()) / 100).min(100);
        Bottleneck {
            id: self.id(),
            category: finding.category,
            severity: finding.severity,
            impact: impact as u8,
            evidence: finding.evidence,
            recommended_actions: finding.actions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Intermediate rule output before impact scoring.
struct Finding {
    category: BottleneckCategory,
    severity: Severity,
    evidence: Vec<String>,
    actions: &'static [&'static str],
}

// =============================================================================
// DETECTION
// =============================================================================

/// Evaluate every rule and return the findings sorted non-increasing by
/// impact score. May be empty. Equal-impact findings keep rule order.
#[must_use]
pub fn detect(intake: &BusinessIntake, stage: Stage) -> Vec<Bottleneck> {
    let mut found: Vec<Bottleneck> = ALL_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(intake, stage))
        .collect();
    found.sort_by_key(|b| std::cmp::Reverse(b.impact));
    found
}

/// The single highest-impact bottleneck: the head of the sorted list.
#[must_use]
pub fn primary(bottlenecks: &[Bottleneck]) -> Option<&Bottleneck> {
    bottlenecks.first()
}

// =============================================================================
// TESTS
// =============================================================================
