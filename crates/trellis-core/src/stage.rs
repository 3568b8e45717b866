//! # Stage Classification
//!
//! Scores a business intake against per-stage indicator sets and returns the
//! best-fitting lifecycle stage with confidence and contextual narrative.
//!
//! ## Algorithm
//!
//! Each of the 5 stages owns a fixed set of weighted boolean indicators over
//! the intake. A stage's score is the sum of the weights of indicators that
//! evaluate true. The highest-scoring stage wins; exact ties break toward
//! the earlier-declared stage (Idea → Mature).
//!
//! Confidence is an integer percent:
//! `min(100, winning_score * 100 / (total_weight_across_all_stages / 5))`.
//! This is a heuristic normalization, NOT a calibrated probability — callers
//! must not treat it as one.
//!
//! Classification is total: every intake produces a stage, even with zero
//! matching signal (the tie-break then selects `Idea`).

use crate::intake::{BusinessIntake, RevenueTrend};
use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE ENUM
// =============================================================================

/// Business lifecycle stage.
///
/// Declaration order is the tie-break order for classification and drives
/// which detection rules, leverage plays, and KPI targets apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Pre-revenue, pre-customer validation.
    Idea,
    /// First revenue, first customers, founder does everything.
    Early,
    /// Repeatable acquisition, $10k–$100k monthly revenue.
    Growth,
    /// Building the machine that runs without the founders.
    Scaling,
    /// Established position, defending and expanding.
    Mature,
}

/// All stages in declaration (tie-break) order.
pub const ALL_STAGES: [Stage; 5] = [
    Stage::Idea,
    Stage::Early,
    Stage::Growth,
    Stage::Scaling,
    Stage::Mature,
];

impl Stage {
    /// Short lowercase name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Idea => "idea",
            Stage::Early => "early",
            Stage::Growth => "growth",
            Stage::Scaling => "scaling",
            Stage::Mature => "mature",
        }
    }

    /// The next stage, if any.
    #[must_use]
    pub const fn next(self) -> Option<Stage> {
        match self {
            Stage::Idea => Some(Stage::Early),
            Stage::Early => Some(Stage::Growth),
            Stage::Growth => Some(Stage::Scaling),
            Stage::Scaling => Some(Stage::Mature),
            Stage::Mature => None,
        }
    }

    /// Static narrative profile for this stage.
    #[must_use]
    pub const fn profile(self) -> &'static StageProfile {
        match self {
            Stage::Idea => &IDEA_PROFILE,
            Stage::Early => &EARLY_PROFILE,
            Stage::Growth => &GROWTH_PROFILE,
            Stage::Scaling => &SCALING_PROFILE,
            Stage::Mature => &MATURE_PROFILE,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// STAGE PROFILES (Static Narrative Tables)
// =============================================================================

/// Static narrative and parameter table for one stage.
#[derive(Debug)]
pub struct StageProfile {
    /// One-sentence description of the stage.
    pub summary: &'static str,
    /// The single metric this stage should orient around.
    pub north_star: &'static str,
    /// Challenges typical for businesses at this stage.
    pub typical_challenges: &'static [&'static str],
    /// What it takes to reach the next stage.
    pub next_stage_requirements: &'static [&'static str],
    /// Distractions to deliberately ignore at this stage.
    pub things_to_ignore: &'static [&'static str],
    /// Expected 90-day revenue growth in percent, used by week-9 milestone
    /// metrics (20 = +20%).
    pub revenue_growth_pct: u64,
}

static IDEA_PROFILE: StageProfile = StageProfile {
    summary: "Pre-revenue: the only job is proving somebody will pay.",
    north_star: "First 10 Paying Customers",
    typical_challenges: &[
        "No proof anyone will pay",
        "Building features instead of talking to buyers",
        "Founder time spread across everything",
    ],
    next_stage_requirements: &[
        "First paying customers acquired outside the founder's network",
        "A repeatable pitch that converts cold prospects",
        "One acquisition channel showing signs of life",
    ],
    things_to_ignore: &[
        "Scaling infrastructure",
        "Brand redesigns",
        "Hiring ahead of revenue",
        "Multi-channel marketing",
    ],
    revenue_growth_pct: 0,
};

static EARLY_PROFILE: StageProfile = StageProfile {
    summary: "First revenue: turning founder hustle into a repeatable sale.",
    north_star: "Monthly Recurring Revenue",
    typical_challenges: &[
        "Revenue depends entirely on the founder selling",
        "No consistent lead flow",
        "Pricing set by guesswork",
    ],
    next_stage_requirements: &[
        "Monthly revenue consistently above $10k",
        "A documented sales process someone besides the founder can run",
        "Churn understood and measured",
    ],
    things_to_ignore: &[
        "Enterprise process and tooling",
        "Premature automation",
        "Conference sponsorships",
    ],
    revenue_growth_pct: 40,
};

static GROWTH_PROFILE: StageProfile = StageProfile {
    summary: "Repeatable growth: pouring fuel on the channel that works.",
    north_star: "Net Revenue Growth Rate",
    typical_challenges: &[
        "One acquisition channel carrying the whole business",
        "Churn eroding hard-won growth",
        "Hiring behind the demand curve",
    ],
    next_stage_requirements: &[
        "Monthly revenue consistently above $100k",
        "Second acquisition channel producing predictably",
        "Management layer owning outcomes, not tasks",
    ],
    things_to_ignore: &[
        "Moonshot pivots",
        "Vanity metrics",
        "Unproven new markets",
    ],
    revenue_growth_pct: 30,
};

static SCALING_PROFILE: StageProfile = StageProfile {
    summary: "Scaling: building the machine that runs without the founders.",
    north_star: "Revenue Per Employee",
    typical_challenges: &[
        "Process debt surfacing as quality slips",
        "Key-person risk concentrated in early hires",
        "Unit economics drifting as the team grows",
    ],
    next_stage_requirements: &[
        "Operating cadence that survives founder absence",
        "Durable differentiation competitors cannot copy quickly",
        "Retention economics that fund acquisition",
    ],
    things_to_ignore: &[
        "Founder-led one-off sales",
        "Unscoped custom work",
        "New product lines before operations stabilize",
    ],
    revenue_growth_pct: 20,
};

static MATURE_PROFILE: StageProfile = StageProfile {
    summary: "Mature: defending position while buying options on the future.",
    north_star: "Free Cash Flow",
    typical_challenges: &[
        "Growth rate compressing toward market rate",
        "Organizational drag on decision speed",
        "Innovation crowded out by maintenance",
    ],
    next_stage_requirements: &[
        "A second act: new segment, product line, or geography",
        "Capital allocation discipline",
        "Succession depth in every critical role",
    ],
    things_to_ignore: &[
        "Across-the-board cost cuts",
        "Chasing every competitor feature",
    ],
    revenue_growth_pct: 10,
};

// =============================================================================
// INDICATOR SETS (Weighted Boolean Signals)
// =============================================================================

/// One weighted boolean signal for a stage.
struct Indicator {
    weight: u32,
    desc: &'static str,
    test: fn(&BusinessIntake) -> bool,
}

static IDEA_INDICATORS: &[Indicator] = &[
    Indicator {
        weight: 3,
        desc: "No revenue yet",
        test: |i| i.monthly_revenue == 0,
    },
    Indicator {
        weight: 3,
        desc: "No paying customers yet",
        test: |i| i.customer_count == 0,
    },
    Indicator {
        weight: 1,
        desc: "Founding team of one or two",
        test: |i| i.team_size <= 2,
    },
    Indicator {
        weight: 1,
        desc: "Goals centered on launch or validation",
        test: |i| BusinessIntake::mentions(&i.ninety_day_goals, &["launch", "validate", "mvp"]),
    },
];

static EARLY_INDICATORS: &[Indicator] = &[
    Indicator {
        weight: 3,
        desc: "Revenue under $10k per month",
        test: |i| i.monthly_revenue >= 1 && i.monthly_revenue < 10_000,
    },
    Indicator {
        weight: 2,
        desc: "Between 1 and 50 customers",
        test: |i| i.customer_count >= 1 && i.customer_count <= 50,
    },
    Indicator {
        weight: 1,
        desc: "Team of five or fewer",
        test: |i| i.team_size <= 5,
    },
    Indicator {
        weight: 1,
        desc: "Runway under 12 months",
        test: |i| i.runway_months.is_some_and(|m| m < 12),
    },
];

static GROWTH_INDICATORS: &[Indicator] = &[
    Indicator {
        weight: 3,
        desc: "Revenue in the $10k-$100k monthly band",
        test: |i| i.monthly_revenue >= 10_000 && i.monthly_revenue < 100_000,
    },
    Indicator {
        weight: 2,
        desc: "Between 50 and 500 customers",
        test: |i| i.customer_count >= 50 && i.customer_count < 500,
    },
    Indicator {
        weight: 1,
        desc: "Team of 3 to 15",
        test: |i| i.team_size >= 3 && i.team_size <= 15,
    },
    Indicator {
        weight: 1,
        desc: "Revenue trend growing",
        test: |i| i.revenue_trend == RevenueTrend::Growing,
    },
];

static SCALING_INDICATORS: &[Indicator] = &[
    Indicator {
        weight: 3,
        desc: "Revenue in the $100k-$1M monthly band",
        test: |i| i.monthly_revenue >= 100_000 && i.monthly_revenue < 1_000_000,
    },
    Indicator {
        weight: 2,
        desc: "200 or more customers",
        test: |i| i.customer_count >= 200,
    },
    Indicator {
        weight: 2,
        desc: "Team of 10 to 75",
        test: |i| i.team_size >= 10 && i.team_size <= 75,
    },
    Indicator {
        weight: 1,
        desc: "Churn at or under 5%",
        test: |i| i.churn_rate_pct.is_some_and(|c| c <= 5),
    },
];

static MATURE_INDICATORS: &[Indicator] = &[
    Indicator {
        weight: 3,
        desc: "Revenue at or above $1M per month",
        test: |i| i.monthly_revenue >= 1_000_000,
    },
    Indicator {
        weight: 2,
        desc: "Team of 50 or more",
        test: |i| i.team_size >= 50,
    },
    Indicator {
        weight: 1,
        desc: "1,000 or more customers",
        test: |i| i.customer_count >= 1_000,
    },
    Indicator {
        weight: 1,
        desc: "Revenue trend stable or declining",
        test: |i| i.revenue_trend != RevenueTrend::Growing,
    },
];

const fn indicators_for(stage: Stage) -> &'static [Indicator] {
    match stage {
        Stage::Idea => IDEA_INDICATORS,
        Stage::Early => EARLY_INDICATORS,
        Stage::Growth => GROWTH_INDICATORS,
        Stage::Scaling => SCALING_INDICATORS,
        Stage::Mature => MATURE_INDICATORS,
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Result of classifying an intake against the stage indicator sets.
///
/// Computed fresh on every call; never cached inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageClassification {
    /// The best-fitting lifecycle stage.
    pub stage: Stage,
    /// Heuristic fit in integer percent [0,100]. Not a calibrated
    /// probability.
    pub confidence_pct: u8,
    /// Descriptions of the indicators that matched for the winning stage.
    pub matched_indicators: Vec<String>,
    /// Challenges typical for the winning stage.
    pub typical_challenges: Vec<String>,
    /// Requirements to reach the next stage.
    pub next_stage_requirements: Vec<String>,
    /// The single metric this stage should orient around.
    pub north_star: String,
    /// One-sentence stage narrative.
    pub summary: String,
}

/// Classify an intake into its lifecycle stage.
///
/// Total: every intake yields a classification. With zero matching signal
/// the tie-break selects the earliest-declared stage (`Idea`) at zero
/// confidence.
#[must_use]
pub fn classify(intake: &BusinessIntake) -> StageClassification {
    let mut best_stage = Stage::Idea;
    let mut best_score: u32 = 0;
    let mut total_weight: u32 = 0;

    for stage in ALL_STAGES {
        let indicators = indicators_for(stage);
        let mut score: u32 = 0;
        for ind in indicators {
            total_weight = total_weight.saturating_add(ind.weight);
            if (ind.test)(intake) {
                score = score.saturating_add(ind.weight);
            }
        }
        // Strict greater-than keeps the earlier-declared stage on ties.
        if score > best_score {
            best_score = score;
            best_stage = stage;
        }
    }

    let matched_indicators: Vec<String> = indicators_for(best_stage)
        .iter()
        .filter(|ind| (ind.test)(intake))
        .map(|ind| ind.desc.to_string())
        .collect();

    // Normalize against the mean per-stage weight budget (total / 5).
    let per_stage_budget = (total_weight / ALL_STAGES.len() as u32).max(1);
    let confidence_pct = (best_score.saturating_mul(100) / per_stage_budget).min(100) as u8;

    let profile = best_stage.profile();
    StageClassification {
        stage: best_stage,
        confidence_pct,
        matched_indicators,
        typical_challenges: profile
            .typical_challenges
            .iter()
            .map(|s| s.to_string())
            .collect(),
        next_stage_requirements: profile
            .next_stage_requirements
            .iter()
            .map(|s| s.to_string())
            .collect(),
        north_star: profile.north_star.to_string(),
        summary: profile.summary.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_signal_intake_classifies_idea() {
        let intake = BusinessIntake::new(0, 0, 1);
        let result = classify(&intake);
        assert_eq!(result.stage, Stage::Idea);
        assert!(!result.matched_indicators.is_empty());
    }

    #[test]
    fn idea_stage_north_star() {
        let intake = BusinessIntake::new(0, 0, 1);
        let result = classify(&intake);
        assert_eq!(result.north_star, "First 10 Paying Customers");
    }

    #[test]
    fn early_stage_small_revenue() {
        let intake = BusinessIntake::new(3_000, 12, 2).with_runway(8);
        let result = classify(&intake);
        assert_eq!(result.stage, Stage::Early);
    }

    #[test]
    fn growth_stage_mid_band() {
        let intake = BusinessIntake::new(50_000, 120, 8).with_trend(RevenueTrend::Growing);
        let result = classify(&intake);
        assert_eq!(result.stage, Stage::Growth);
    }

    #[test]
    fn scaling_stage_large_team_and_revenue() {
        let intake = BusinessIntake::new(150_000, 300, 20).with_churn(2);
        let result = classify(&intake);
        assert_eq!(result.stage, Stage::Scaling);
    }

    #[test]
    fn mature_stage_million_monthly() {
        let intake = BusinessIntake::new(2_000_000, 5_000, 120);
        let result = classify(&intake);
        assert_eq!(result.stage, Stage::Mature);
    }

    #[test]
    fn confidence_within_bounds() {
        for intake in [
            BusinessIntake::new(0, 0, 1),
            BusinessIntake::new(50_000, 120, 8),
            BusinessIntake::new(2_000_000, 5_000, 120),
        ] {
            let result = classify(&intake);
            assert!(result.confidence_pct <= 100);
        }
    }

    #[test]
    fn tie_breaks_toward_earlier_stage() {
        // Growth scores 5 (revenue band 3, customer band 2) and Scaling
        // scores 5 (customers 2, team 2, churn 1). The earlier-declared
        // stage must win the exact tie.
        let intake = BusinessIntake::new(30_000, 250, 30).with_churn(4);
        let result = classify(&intake);
        assert_eq!(result.stage, Stage::Growth);
    }

    #[test]
    fn stage_next_chain_terminates() {
        assert_eq!(Stage::Idea.next(), Some(Stage::Early));
        assert_eq!(Stage::Mature.next(), None);
    }

    #[test]
    fn profiles_have_nonempty_ignore_lists() {
        for stage in ALL_STAGES {
            assert!(!stage.profile().things_to_ignore.is_empty());
        }
    }
}
