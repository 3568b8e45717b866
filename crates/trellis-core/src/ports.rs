//! # Ports
//!
//! Injectable capabilities the engine depends on: a clock for due-date math
//! and an identifier source for roadmap/priority ids.
//!
//! The engine never touches the ambient wall clock or RNG. Given a fixed
//! [`Clock`] and [`IdSource`], the whole pipeline is deterministic, which is
//! what makes the scenario and property tests exact. Production
//! implementations (system clock, UUID v4) live in the app layer.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// EPOCH DAY
// =============================================================================

/// A calendar day counted as whole days since 1970-01-01.
///
/// Integer-only stand-in for a date: due-date arithmetic is plain saturating
/// addition, and rendering to a calendar date is left to the presentation
/// layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EpochDay(pub u32);

impl EpochDay {
    /// Create an epoch day from a raw day count.
    #[must_use]
    pub const fn new(days: u32) -> Self {
        Self(days)
    }

    /// This day plus `days`, saturating at the representable maximum.
    #[must_use]
    pub const fn plus_days(self, days: u32) -> Self {
        Self(self.0.saturating_add(days))
    }

    /// Raw day count since 1970-01-01.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

// =============================================================================
// CLOCK PORT
// =============================================================================

/// Source of "today" for due-date math.
pub trait Clock: Send + Sync {
    /// The current calendar day.
    fn today(&self) -> EpochDay;
}

/// A clock frozen at a fixed day. The test implementation.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub EpochDay);

impl Clock for FixedClock {
    fn today(&self) -> EpochDay {
        self.0
    }
}

// =============================================================================
// IDENTIFIER PORT
// =============================================================================

/// Source of unique identifiers for roadmaps and priorities.
///
/// Implementations must produce collision-resistant strings in production.
/// Takes `&self` so sources can be shared; stateful implementations use
/// interior mutability.
pub trait IdSource: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> String;
}

/// Prefixed sequential identifiers ("plan-1", "plan-2", ...).
///
/// Deterministic; intended for tests and reproducible fixtures, not for
/// production use where collision resistance matters.
#[derive(Debug, Default)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    /// Create a sequential source with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        format!("{}-{}", self.prefix, n)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_saturating_addition() {
        let day = EpochDay::new(u32::MAX);
        assert_eq!(day.plus_days(7), EpochDay::new(u32::MAX));

        let day = EpochDay::new(20_000);
        assert_eq!(day.plus_days(7).value(), 20_007);
    }

    #[test]
    fn fixed_clock_is_constant() {
        let clock = FixedClock(EpochDay::new(19_000));
        assert_eq!(clock.today(), clock.today());
        assert_eq!(clock.today().value(), 19_000);
    }

    #[test]
    fn sequential_ids_are_unique_and_ordered() {
        let ids = SequentialIds::new("plan");
        assert_eq!(ids.next_id(), "plan-1");
        assert_eq!(ids.next_id(), "plan-2");
        assert_eq!(ids.next_id(), "plan-3");
    }
}
