//! # Business Intake
//!
//! The input snapshot of a business's metrics and qualitative state.
//!
//! An intake is created once per assessment request, never mutated, and
//! owned by the caller. The engine treats every intake as valid input:
//! missing optional fields are handled by per-rule fallback constants, not
//! errors. Structural validation (`validate`) is a boundary concern for the
//! layer that constructs intakes from external data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// REVENUE TREND
// =============================================================================

/// Qualitative revenue direction over the recent trailing period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RevenueTrend {
    Growing,
    #[default]
    Stable,
    Declining,
}

impl RevenueTrend {
    /// Per-period growth multiplier in percent, used by trajectory
    /// projections (110 = ×1.1 per period).
    #[must_use]
    pub const fn growth_pct(self) -> u64 {
        match self {
            RevenueTrend::Growing => 110,
            RevenueTrend::Stable => 100,
            RevenueTrend::Declining => 90,
        }
    }
}

impl std::fmt::Display for RevenueTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevenueTrend::Growing => write!(f, "growing"),
            RevenueTrend::Stable => write!(f, "stable"),
            RevenueTrend::Declining => write!(f, "declining"),
        }
    }
}

// =============================================================================
// BUSINESS INTAKE
// =============================================================================

/// Immutable snapshot of a business at assessment time.
///
/// Monetary amounts are whole dollars per month. `churn_rate_pct` is monthly
/// logo churn in whole percent. Free-text fields (`challenges`,
/// `ninety_day_goals`) are matched case-insensitively by the detection rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessIntake {
    /// Monthly revenue in whole dollars.
    pub monthly_revenue: u64,
    /// Qualitative revenue direction.
    #[serde(default)]
    pub revenue_trend: RevenueTrend,
    /// Current headcount, founders included.
    pub team_size: u32,
    /// Industry label (free text).
    #[serde(default)]
    pub industry: String,
    /// Business model label (free text, e.g. "b2b_saas").
    #[serde(default)]
    pub business_model: String,
    /// Primary customer acquisition channel (free text).
    #[serde(default)]
    pub primary_channel: String,
    /// Count of active paying customers.
    pub customer_count: u64,
    /// Monthly churn rate in whole percent, if tracked.
    #[serde(default)]
    pub churn_rate_pct: Option<u8>,
    /// Months of cash runway remaining, if known.
    #[serde(default)]
    pub runway_months: Option<u32>,
    /// Self-reported challenge tags (free text).
    #[serde(default)]
    pub challenges: Vec<String>,
    /// Self-reported goals for the next 90 days (free text).
    #[serde(default)]
    pub ninety_day_goals: Vec<String>,
}

impl BusinessIntake {
    /// Create a minimal intake from the three hard metrics.
    ///
    /// Everything else defaults to empty/unknown and can be layered on with
    /// the `with_*` builders.
    #[must_use]
    pub fn new(monthly_revenue: u64, customer_count: u64, team_size: u32) -> Self {
        Self {
            monthly_revenue,
            revenue_trend: RevenueTrend::Stable,
            team_size,
            industry: String::new(),
            business_model: String::new(),
            primary_channel: String::new(),
            customer_count,
            churn_rate_pct: None,
            runway_months: None,
            challenges: Vec::new(),
            ninety_day_goals: Vec::new(),
        }
    }

    /// Set the revenue trend.
    #[must_use]
    pub fn with_trend(mut self, trend: RevenueTrend) -> Self {
        self.revenue_trend = trend;
        self
    }

    /// Set industry, business model, and primary channel labels.
    #[must_use]
    pub fn with_profile(
        mut self,
        industry: impl Into<String>,
        business_model: impl Into<String>,
        primary_channel: impl Into<String>,
    ) -> Self {
        self.industry = industry.into();
        self.business_model = business_model.into();
        self.primary_channel = primary_channel.into();
        self
    }

    /// Set the monthly churn rate in whole percent.
    #[must_use]
    pub fn with_churn(mut self, pct: u8) -> Self {
        self.churn_rate_pct = Some(pct);
        self
    }

    /// Set the remaining cash runway in months.
    #[must_use]
    pub fn with_runway(mut self, months: u32) -> Self {
        self.runway_months = Some(months);
        self
    }

    /// Set the self-reported challenge tags.
    #[must_use]
    pub fn with_challenges(mut self, challenges: Vec<String>) -> Self {
        self.challenges = challenges;
        self
    }

    /// Set the self-reported 90-day goals.
    #[must_use]
    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.ninety_day_goals = goals;
        self
    }

    /// Boundary validation for intakes built from external data.
    ///
    /// The engine itself is total and never calls this; the intake
    /// construction layer (CLI, API handler) should.
    pub fn validate(&self) -> Result<(), TrellisError> {
        if self.industry.trim().is_empty() {
            return Err(TrellisError::InvalidIntake(
                "industry must not be empty".to_string(),
            ));
        }
        if self.business_model.trim().is_empty() {
            return Err(TrellisError::InvalidIntake(
                "business_model must not be empty".to_string(),
            ));
        }
        if self.primary_channel.trim().is_empty() {
            return Err(TrellisError::InvalidIntake(
                "primary_channel must not be empty".to_string(),
            ));
        }
        if let Some(churn) = self.churn_rate_pct {
            if churn > 100 {
                return Err(TrellisError::InvalidIntake(format!(
                    "churn_rate_pct {churn} exceeds 100"
                )));
            }
        }
        Ok(())
    }

    /// Case-insensitive check whether any free-text entry mentions any of
    /// the given keywords. Shared by detection rules and focus filtering.
    #[must_use]
    pub fn mentions(entries: &[String], keywords: &[&str]) -> bool {
        entries.iter().any(|entry| {
            let lower = entry.to_lowercase();
            keywords.iter().any(|kw| lower.contains(kw))
        })
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors for the intake boundary and the app layer.
///
/// The engine proper never returns these: every pipeline operation is total
/// over its declared input type.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// The intake fails structural validation.
    #[error("Invalid intake: {0}")]
    InvalidIntake(String),

    /// An I/O error occurred while loading or writing a report.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// TESTS
// =============================================================================
