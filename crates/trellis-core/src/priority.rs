//! # Execution Priorities
//!
//! Flattens a roadmap into a ranked, dated action list.
//!
//! ## Ordering rule (fixed)
//!
//! 1. Up to 3 actions from the primary bottleneck
//! 2. All quick-win leverage points on the roadmap
//! 3. Up to 2 first-milestone actions not already present (dedup by exact
//!    action string)
//! 4. Up to 2 strategic leverage points, rendered as "Initiate: <title>"
//!
//! ## Due dates
//!
//! Each entry's due date is derived from its source: today + rank × 7 days
//! for bottleneck actions, today + the play's time-to-impact for leverage
//! points, today + week × 7 for milestone actions. Due dates are therefore
//! NOT globally monotonic with rank; this mirrors the per-source formulas
//! of the original design and is deliberate.

use crate::leverage::LeverageKind;
use crate::ports::{Clock, EpochDay, IdSource};
use crate::roadmap::GrowthRoadmap;
use serde::{Deserialize, Serialize};

// =============================================================================
// LIMITS
// =============================================================================

/// Actions taken from the primary bottleneck.
const MAX_BOTTLENECK_ACTIONS: usize = 3;

/// First-milestone actions appended after quick wins.
const MAX_MILESTONE_ACTIONS: usize = 2;

/// Strategic initiatives appended last.
const MAX_STRATEGIC_INITIATIVES: usize = 2;

/// Days per week, for rank- and week-derived due dates.
const WEEK_DAYS: u32 = 7;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Where a priority entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrioritySource {
    BottleneckAction,
    QuickWin,
    MilestoneAction,
    StrategicInitiative,
}

/// A ranked, dated action derived from the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPriority {
    /// Unique identifier from the injected [`IdSource`].
    pub id: String,
    /// 1-based contiguous rank, re-assigned on every reprioritization.
    pub rank: u32,
    /// The action to take.
    pub action: String,
    /// Which part of the roadmap produced this entry.
    pub source: PrioritySource,
    /// Why this entry ranks where it does.
    pub rationale: String,
    /// What completing it should produce.
    pub expected_outcome: String,
    /// Known blockers; empty when unblocked.
    pub blocking_factors: Vec<String>,
    /// Due date derived per source (see module docs).
    pub due: EpochDay,
}

/// Post-hoc filtering options for [`PriorityEngine::reprioritize`].
#[derive(Debug, Clone, Default)]
pub struct ReprioritizeOptions {
    /// Drop entries that have blocking factors.
    pub exclude_blocked: bool,
    /// Stable-sort entries matching this case-insensitive substring to the
    /// front.
    pub focus_area: Option<String>,
}

// =============================================================================
// PRIORITY ENGINE
// =============================================================================

/// Derives and re-ranks execution priorities from a roadmap.
pub struct PriorityEngine<'a> {
    clock: &'a dyn Clock,
    ids: &'a dyn IdSource,
}

impl<'a> PriorityEngine<'a> {
    /// Create an engine over the given ports.
    #[must_use]
    pub fn new(clock: &'a dyn Clock, ids: &'a dyn IdSource) -> Self {
        Self { clock, ids }
    }

    /// Flatten the roadmap into a strictly ranked, dated action list.
    #[must_use]
    pub fn prioritize(&self, roadmap: &GrowthRoadmap) -> Vec<ExecutionPriority> {
        let today = self.clock.today();
        let mut entries: Vec<ExecutionPriority> = Vec::new();

        // 1. Primary bottleneck actions.
        let primary = &roadmap.primary_bottleneck;
        for action in primary.recommended_actions.iter().take(MAX_BOTTLENECK_ACTIONS) {
            entries.push(ExecutionPriority {
                id: self.ids.next_id(),
                rank: 0, // assigned below
                action: action.clone(),
                source: PrioritySource::BottleneckAction,
                rationale: format!(
                    "Releases the primary constraint: {}",
                    primary.category.label()
                ),
                expected_outcome: format!(
                    "Pressure relieved on a {}-severity, impact-{} constraint",
                    primary.severity, primary.impact
                ),
                blocking_factors: Vec::new(),
                due: today, // rank-derived, set after ranking
            });
        }

        // 2. All quick wins on the roadmap.
        for point in roadmap
            .leverage_points
            .iter()
            .filter(|p| p.kind == LeverageKind::QuickWin)
        {
            if entries.iter().any(|e| e.action == point.title) {
                continue;
            }
            entries.push(ExecutionPriority {
                id: self.ids.next_id(),
                rank: 0,
                action: point.title.clone(),
                source: PrioritySource::QuickWin,
                rationale: "Fast payback at low effort".to_string(),
                expected_outcome: format!(
                    "Visible lift within {} days",
                    point.time_to_impact_days
                ),
                blocking_factors: point.dependencies.clone(),
                due: today.plus_days(point.time_to_impact_days as u32),
            });
        }

        // 3. First-milestone actions not already present.
        if let Some(first) = roadmap.milestones.first() {
            let mut taken = 0usize;
            for action in &first.actions {
                if taken >= MAX_MILESTONE_ACTIONS {
                    break;
                }
                if entries.iter().any(|e| &e.action == action) {
                    continue;
                }
                entries.push(ExecutionPriority {
                    id: self.ids.next_id(),
                    rank: 0,
                    action: action.clone(),
                    source: PrioritySource::MilestoneAction,
                    rationale: format!("Keeps the week-{} milestone on schedule", first.week),
                    expected_outcome: first
                        .success_metrics
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "Milestone on track".to_string()),
                    blocking_factors: Vec::new(),
                    due: today.plus_days(first.week as u32 * WEEK_DAYS),
                });
                taken += 1;
            }
        }

        // 4. Strategic initiatives.
        for point in roadmap
            .leverage_points
            .iter()
            .filter(|p| p.kind == LeverageKind::Strategic)
            .take(MAX_STRATEGIC_INITIATIVES)
        {
            let action = format!("Initiate: {}", point.title);
            if entries.iter().any(|e| e.action == action) {
                continue;
            }
            entries.push(ExecutionPriority {
                id: self.ids.next_id(),
                rank: 0,
                action,
                source: PrioritySource::StrategicInitiative,
                rationale: "Compounds over the quarter".to_string(),
                expected_outcome: format!(
                    "Durable capability in place within {} days",
                    point.time_to_impact_days
                ),
                blocking_factors: point.dependencies.clone(),
                due: today.plus_days(point.time_to_impact_days as u32),
            });
        }

        assign_ranks(&mut entries, today);
        entries
    }

    /// Filter and re-rank an existing priority list.
    ///
    /// Ranks are always contiguous from 1 afterward. Focus matching is a
    /// case-insensitive substring test over action and rationale; matching
    /// entries move to the front, preserving relative order.
    #[must_use]
    pub fn reprioritize(
        &self,
        priorities: Vec<ExecutionPriority>,
        options: &ReprioritizeOptions,
    ) -> Vec<ExecutionPriority> {
        let mut entries: Vec<ExecutionPriority> = priorities
            .into_iter()
            .filter(|p| !(options.exclude_blocked && !p.blocking_factors.is_empty()))
            .collect();

        if let Some(focus) = &options.focus_area {
            let needle = focus.to_lowercase();
            // Stable: non-matching entries keep their relative order behind
            // the matches.
            entries.sort_by_key(|p| {
                let hit = p.action.to_lowercase().contains(&needle)
                    || p.rationale.to_lowercase().contains(&needle);
                !hit
            });
        }

        assign_ranks(&mut entries, self.clock.today());
        entries
    }
}

/// Assign contiguous 1-based ranks and rank-derived due dates.
fn assign_ranks(entries: &mut [ExecutionPriority], today: EpochDay) {
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
        // Bottleneck actions are the only rank-derived due dates.
        if entry.source == PrioritySource::BottleneckAction {
            entry.due = today.plus_days(entry.rank * WEEK_DAYS);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
