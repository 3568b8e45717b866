//! # Runtime Ports
//!
//! Wall-clock and identifier implementations of the core's port traits.
//!
//! The engine itself never reads the system clock or generates randomness;
//! this module is where both enter the process, once, at the binary boundary.

use trellis_core::{Clock, EpochDay, IdSource};

// =============================================================================
// SYSTEM CLOCK
// =============================================================================

/// [`Clock`] backed by the system's UTC date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> EpochDay {
        // NaiveDate::default() is 1970-01-01, the EpochDay origin.
        let days = chrono::Utc::now()
            .date_naive()
            .signed_duration_since(chrono::NaiveDate::default())
            .num_days();
        EpochDay::new(u32::try_from(days).unwrap_or(0))
    }
}

/// Render an [`EpochDay`] as a calendar date for human-facing output.
pub fn format_day(day: EpochDay) -> String {
    chrono::NaiveDate::default()
        .checked_add_days(chrono::Days::new(u64::from(day.value())))
        .map_or_else(
            || format!("day {}", day.value()),
            |date| date.format("%Y-%m-%d").to_string(),
        )
}

// =============================================================================
// UUID IDENTIFIERS
// =============================================================================

/// [`IdSource`] producing prefixed UUID v4 identifiers.
#[derive(Debug)]
pub struct UuidIds {
    prefix: &'static str,
}

impl UuidIds {
    #[must_use]
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }
}

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        format!("{}-{}", self.prefix, uuid::Uuid::new_v4())
    }
}

// =============================================================================
// TESTS
// =============================================================================
