//! # KPI Targets
//!
//! Derives numeric 90-day targets and trajectory projections from an intake
//! and its classified stage.
//!
//! A static catalog of 8 KPI definitions, each gated by applicable stages,
//! with a current-value extractor and a stage-keyed target multiplier in
//! percent. A target is included only if target > current, OR the metric is
//! lower-is-better (churn, CAC) — those are always included regardless of
//! direction.
//!
//! Targets are heuristic goal-posts derived from stage norms, not forecasts.

use crate::intake::{BusinessIntake, RevenueTrend};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

// =============================================================================
// CADENCE & DIRECTION
// =============================================================================

/// How often the metric should be reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

/// Which direction counts as progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

// =============================================================================
// KPI TARGET VALUE OBJECT
// =============================================================================

/// A metric with its current value and 90-day target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiTarget {
    /// Metric name.
    pub metric: String,
    /// Current value extracted from the intake.
    pub current: u64,
    /// 90-day target value.
    pub target: u64,
    /// Review cadence.
    pub cadence: Cadence,
    /// Which direction counts as progress.
    pub direction: Direction,
    /// Upstream signals that move this metric.
    pub leading_indicators: Vec<String>,
}

/// One projected period of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// 1-based period number (month).
    pub period: u8,
    /// Projected value at the end of the period.
    pub projected: u64,
}

/// A 3-period extrapolation of a KPI under the intake's qualitative trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Metric name, matching the source target.
    pub metric: String,
    /// The three projected periods.
    pub points: Vec<TrajectoryPoint>,
    /// Whether the final projection reaches the target, direction-aware.
    pub on_track: bool,
}

// =============================================================================
// STATIC KPI CATALOG
// =============================================================================

/// Churn assumed when the intake does not track it.
const CHURN_FALLBACK_PCT: u64 = 5;

/// Runway assumed when unknown.
const RUNWAY_FALLBACK_MONTHS: u64 = 6;

/// Months of revenue a healthy runway should cover.
const RUNWAY_TARGET_MONTHS: u64 = 12;

/// One catalog entry: stage gates, extractor, and target function.
struct KpiSpec {
    metric: &'static str,
    stages: &'static [Stage],
    cadence: Cadence,
    direction: Direction,
    current: fn(&BusinessIntake) -> u64,
    target: fn(u64, Stage) -> u64,
    leading_indicators: &'static [&'static str],
}

/// Stage-keyed multiplier application: `current × pct / 100`.
const fn scaled(current: u64, pct: u64) -> u64 {
    current.saturating_mul(pct) / 100
}

static KPI_CATALOG: &[KpiSpec] = &[
    KpiSpec {
        metric: "Monthly Recurring Revenue",
        stages: &[Stage::Early, Stage::Growth, Stage::Scaling, Stage::Mature],
        cadence: Cadence::Weekly,
        direction: Direction::HigherIsBetter,
        current: |i| i.monthly_revenue,
        target: |current, stage| {
            let pct = match stage {
                Stage::Idea | Stage::Early => 200,
                Stage::Growth => 150,
                Stage::Scaling => 130,
                Stage::Mature => 115,
            };
            scaled(current, pct)
        },
        leading_indicators: &["Qualified pipeline value", "Win rate", "Average deal size"],
    },
    KpiSpec {
        metric: "First 10 Paying Customers",
        stages: &[Stage::Idea],
        cadence: Cadence::Weekly,
        direction: Direction::HigherIsBetter,
        current: |i| i.customer_count,
        target: |_, _| 10,
        leading_indicators: &["Problem interviews held", "Proposals sent"],
    },
    KpiSpec {
        metric: "Customer Count",
        stages: &[Stage::Early, Stage::Growth],
        cadence: Cadence::Weekly,
        direction: Direction::HigherIsBetter,
        current: |i| i.customer_count,
        target: |current, stage| {
            let pct = match stage {
                Stage::Idea | Stage::Early => 200,
                _ => 150,
            };
            scaled(current.max(1), pct)
        },
        leading_indicators: &["New qualified leads per week", "Demo-to-close rate"],
    },
    KpiSpec {
        metric: "Monthly Churn Rate",
        stages: &[Stage::Growth, Stage::Scaling, Stage::Mature],
        cadence: Cadence::Monthly,
        direction: Direction::LowerIsBetter,
        current: |i| i.churn_rate_pct.map_or(CHURN_FALLBACK_PCT, |c| c as u64),
        // Cut churn by 30%, floor at 1%.
        target: |current, _| scaled(current, 70).max(1),
        leading_indicators: &["Activation rate", "Support ticket sentiment", "Usage drop-off alerts"],
    },
    KpiSpec {
        metric: "Customer Acquisition Cost",
        stages: &[Stage::Growth, Stage::Scaling, Stage::Mature],
        cadence: Cadence::Monthly,
        direction: Direction::LowerIsBetter,
        // The intake carries no CAC field; use a blended estimate of one
        // third of average revenue per customer as the working baseline.
        current: |i| (i.monthly_revenue / i.customer_count.max(1)) / 3,
        target: |current, _| scaled(current, 80),
        leading_indicators: &["Per-channel spend", "Organic vs paid mix"],
    },
    KpiSpec {
        metric: "Average Revenue Per Customer",
        stages: &[Stage::Growth, Stage::Scaling],
        cadence: Cadence::Monthly,
        direction: Direction::HigherIsBetter,
        current: |i| i.monthly_revenue / i.customer_count.max(1),
        target: |current, _| scaled(current, 120),
        leading_indicators: &["Expansion revenue", "Plan mix"],
    },
    KpiSpec {
        metric: "Revenue Per Employee",
        stages: &[Stage::Scaling, Stage::Mature],
        cadence: Cadence::Monthly,
        direction: Direction::HigherIsBetter,
        current: |i| i.monthly_revenue / (i.team_size.max(1) as u64),
        target: |current, _| scaled(current, 120),
        leading_indicators: &["Automation coverage", "Revenue per team"],
    },
    KpiSpec {
        metric: "Cash Runway Months",
        stages: &[Stage::Early, Stage::Growth, Stage::Scaling],
        cadence: Cadence::Monthly,
        direction: Direction::HigherIsBetter,
        current: |i| i.runway_months.map_or(RUNWAY_FALLBACK_MONTHS, |m| m as u64),
        target: |current, _| current.max(RUNWAY_TARGET_MONTHS),
        leading_indicators: &["Monthly burn", "Collections aging"],
    },
];

// =============================================================================
// TARGET GENERATION
// =============================================================================

/// Generate the applicable KPI targets for an intake at a stage.
///
/// Inclusion rule: target > current, OR the metric is lower-is-better
/// (always included so regressions stay visible).
#[must_use]
pub fn generate_targets(intake: &BusinessIntake, stage: Stage) -> Vec<KpiTarget> {
    KPI_CATALOG
        .iter()
        .filter(|spec| spec.stages.contains(&stage))
        .filter_map(|spec| {
            let current = (spec.current)(intake);
            let target = (spec.target)(current, stage);
            let include = target > current || spec.direction == Direction::LowerIsBetter;
            if !include {
                return None;
            }
            Some(KpiTarget {
                metric: spec.metric.to_string(),
                current,
                target,
                cadence: spec.cadence,
                direction: spec.direction,
                leading_indicators: spec
                    .leading_indicators
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            })
        })
        .collect()
}

// =============================================================================
// TRAJECTORY PROJECTION
// =============================================================================

/// Periods projected forward.
const TRAJECTORY_PERIODS: u8 = 3;

/// Extrapolate a target 3 periods forward under the intake's qualitative
/// trend (×1.1 growing, ×1.0 stable, ×0.9 declining per period, in percent
/// arithmetic) and flag whether the final projection reaches the target.
#[must_use]
pub fn project_trajectory(target: &KpiTarget, trend: RevenueTrend) -> Trajectory {
    let growth_pct = trend.growth_pct();
    let mut value = target.current;
    let mut points = Vec::with_capacity(TRAJECTORY_PERIODS as usize);

    for period in 1..=TRAJECTORY_PERIODS {
        value = value.saturating_mul(growth_pct) / 100;
        points.push(TrajectoryPoint {
            period,
            projected: value,
        });
    }

    let on_track = match target.direction {
        Direction::HigherIsBetter => value >= target.target,
        Direction::LowerIsBetter => value <= target.target,
    };

    Trajectory {
        metric: target.metric.clone(),
        points,
        on_track,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn metric_names(targets: &[KpiTarget]) -> Vec<String> {
        targets.iter().map(|t| t.metric.clone()).collect()
    }

    #[test]
    fn idea_stage_gets_north_star_target() {
        let intake = BusinessIntake::new(0, 0, 1);
        let targets = generate_targets(&intake, Stage::Idea);
        let names = metric_names(&targets);
        assert!(names.contains(&"First 10 Paying Customers".to_string()));
        assert!(!names.contains(&"Monthly Recurring Revenue".to_string()));
    }

    #[test]
    fn scaling_excludes_customer_count_includes_revenue_per_employee() {
        let intake = BusinessIntake::new(150_000, 300, 20).with_churn(2);
        let targets = generate_targets(&intake, Stage::Scaling);
        let names = metric_names(&targets);
        assert!(!names.contains(&"Customer Count".to_string()));
        assert!(names.contains(&"Revenue Per Employee".to_string()));
    }

    #[test]
    fn lower_is_better_metrics_always_included() {
        // Churn of 1% already beats the floor target of 1%, so the
        // target-exceeds-current test fails; it must be included anyway.
        let intake = BusinessIntake::new(150_000, 300, 20).with_churn(1);
        let targets = generate_targets(&intake, Stage::Scaling);
        let churn = targets
            .iter()
            .find(|t| t.metric == "Monthly Churn Rate")
            .expect("churn always included");
        assert_eq!(churn.direction, Direction::LowerIsBetter);
        assert_eq!(churn.current, 1);
    }

    #[test]
    fn growth_mrr_target_is_150_percent() {
        let intake = BusinessIntake::new(50_000, 120, 8);
        let targets = generate_targets(&intake, Stage::Growth);
        let mrr = targets
            .iter()
            .find(|t| t.metric == "Monthly Recurring Revenue")
            .expect("mrr applies at growth");
        assert_eq!(mrr.target, 75_000);
    }

    #[test]
    fn missing_churn_uses_fallback_constant() {
        let intake = BusinessIntake::new(50_000, 120, 8);
        let targets = generate_targets(&intake, Stage::Growth);
        let churn = targets
            .iter()
            .find(|t| t.metric == "Monthly Churn Rate")
            .expect("churn always included");
        assert_eq!(churn.current, CHURN_FALLBACK_PCT);
    }

    #[test]
    fn trajectory_growing_compounds_upward() {
        let target = KpiTarget {
            metric: "Monthly Recurring Revenue".to_string(),
            current: 10_000,
            target: 13_000,
            cadence: Cadence::Weekly,
            direction: Direction::HigherIsBetter,
            leading_indicators: Vec::new(),
        };
        let trajectory = project_trajectory(&target, RevenueTrend::Growing);
        let projected: Vec<u64> = trajectory.points.iter().map(|p| p.projected).collect();
        assert_eq!(projected, vec![11_000, 12_100, 13_310]);
        assert!(trajectory.on_track);
    }

    #[test]
    fn trajectory_stable_misses_growth_target() {
        let target = KpiTarget {
            metric: "Monthly Recurring Revenue".to_string(),
            current: 10_000,
            target: 15_000,
            cadence: Cadence::Weekly,
            direction: Direction::HigherIsBetter,
            leading_indicators: Vec::new(),
        };
        let trajectory = project_trajectory(&target, RevenueTrend::Stable);
        assert!(!trajectory.on_track);
        assert!(trajectory.points.iter().all(|p| p.projected == 10_000));
    }

    #[test]
    fn trajectory_declining_tracks_lower_is_better() {
        let target = KpiTarget {
            metric: "Monthly Churn Rate".to_string(),
            current: 10,
            target: 7,
            cadence: Cadence::Monthly,
            direction: Direction::LowerIsBetter,
            leading_indicators: Vec::new(),
        };
        let trajectory = project_trajectory(&target, RevenueTrend::Declining);
        // 10 → 9 → 8 → 7 (integer percent math).
        assert_eq!(
            trajectory.points.last().map(|p| p.projected),
            Some(7)
        );
        assert!(trajectory.on_track);
    }

    #[test]
    fn every_target_has_leading_indicators() {
        let intake = BusinessIntake::new(150_000, 300, 20).with_churn(2);
        for target in generate_targets(&intake, Stage::Scaling) {
            assert!(!target.leading_indicators.is_empty());
        }
    }
}
