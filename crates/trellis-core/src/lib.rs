//! # trellis-core
//!
//! The deterministic Growth Blueprint Engine for Trellis - THE LOGIC.
//!
//! This crate turns an immutable snapshot of a company's metrics
//! ([`BusinessIntake`]) into a staged diagnosis and a 90-day plan:
//!
//! 1. [`stage::classify`] — best-fitting lifecycle stage with confidence
//! 2. [`bottleneck::detect`] — ranked structural bottlenecks
//! 3. [`leverage::identify`] — impact/effort-ranked leverage points
//! 4. [`roadmap::RoadmapGenerator`] — the composed 4-milestone roadmap
//! 5. [`priority::PriorityEngine`] — ranked, dated execution list
//! 6. [`kpi::generate_targets`] — numeric 90-day targets and trajectories
//!
//! Data flows one way: snapshot → stage → bottlenecks → leverage points →
//! roadmap → {priorities, KPIs}. All outputs are immutable value objects.
//!
//! ## Architectural Constraints
//!
//! - Pure: no async, no network, no persistence, no I/O of any kind
//! - Deterministic: integer arithmetic only; time and identifiers enter
//!   through the [`Clock`] and [`IdSource`] ports
//! - Total: every operation produces a value for every intake; missing
//!   optional fields use per-rule fallback constants, never errors
//!
//! ## A note on scores
//!
//! Classification confidence, impact potentials, and the roadmap's success
//! probability are additive/multiplicative heuristics expressed as integer
//! percents. None of them is a calibrated probability; downstream consumers
//! must not treat them as one.

// =============================================================================
// MODULES
// =============================================================================

pub mod bottleneck;
pub mod intake;
pub mod kpi;
pub mod leverage;
pub mod ports;
pub mod priority;
pub mod roadmap;
pub mod stage;

// =============================================================================
// RE-EXPORTS: Intake & Errors
// =============================================================================

pub use intake::{BusinessIntake, RevenueTrend, TrellisError};

// =============================================================================
// RE-EXPORTS: Ports
// =============================================================================

pub use ports::{Clock, EpochDay, FixedClock, IdSource, SequentialIds};

// =============================================================================
// RE-EXPORTS: Pipeline
// =============================================================================

pub use bottleneck::{Bottleneck, BottleneckCategory, RuleId, Severity};
pub use kpi::{Cadence, Direction, KpiTarget, Trajectory, TrajectoryPoint};
pub use leverage::{Effort, LeverageKind, LeveragePoint, OpportunityId};
pub use priority::{ExecutionPriority, PriorityEngine, PrioritySource, ReprioritizeOptions};
pub use roadmap::{GrowthRoadmap, RoadmapGenerator, RoadmapMilestone};
pub use stage::{Stage, StageClassification, StageProfile};
