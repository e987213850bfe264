//! # Penalty Module
//!
//! Late-payment penalty assessment for an issued bill.
//!
//! ## Decision Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  assess_penalty(policy, bill, today)                                    │
//! │                                                                         │
//! │  bill paid?              → ₱0.00                                        │
//! │  penalties disabled?     → ₱0.00                                        │
//! │  penalty waived?         → ₱0.00 (reason recorded)                      │
//! │  today <= due date?      → ₱0.00                                        │
//! │  days overdue <= grace?  → ₱0.00 (days recorded)                        │
//! │  otherwise               → percentage of bill OR fixed amount           │
//! │                            capped at max_penalty when it is positive    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `today` is a parameter; this module never reads the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;

// =============================================================================
// Penalty Rate
// =============================================================================

/// Penalty rate in basis points (2500 bps = 25%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PenaltyRate(u32);

impl PenaltyRate {
    /// Upper bound: a penalty can be at most the bill itself.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, saturating at [`Self::MAX_BPS`].
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            PenaltyRate(Self::MAX_BPS)
        } else {
            PenaltyRate(bps)
        }
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        PenaltyRate::from_bps((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        PenaltyRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for PenaltyRate {
    fn default() -> Self {
        PenaltyRate(2500)
    }
}

/// Validates a penalty rate in basis points (0% to 100%).
pub fn validate_penalty_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > PenaltyRate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "penalty_rate".to_string(),
            min: 0,
            max: PenaltyRate::MAX_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Policy
// =============================================================================

/// How the penalty amount is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PenaltyKind {
    /// A share of the bill amount.
    Percentage { rate: PenaltyRate },
    /// The same amount regardless of the bill.
    Fixed { amount: Money },
}

impl Default for PenaltyKind {
    fn default() -> Self {
        PenaltyKind::Percentage {
            rate: PenaltyRate::default(),
        }
    }
}

/// Late-payment rules configured for the utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PenaltyPolicy {
    pub enabled: bool,
    pub kind: PenaltyKind,
    /// Days after the due date before a penalty applies. 0 = the day after.
    pub grace_period_days: i64,
    /// Upper bound on the penalty. Zero means no cap.
    pub max_penalty: Money,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        PenaltyPolicy {
            enabled: true,
            kind: PenaltyKind::default(),
            grace_period_days: 0,
            max_penalty: Money::zero(),
        }
    }
}

// =============================================================================
// Bill Standing
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BillStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

/// The parts of an issued bill that matter for penalties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillStanding {
    pub amount: Money,
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub waived: bool,
    pub waiver_reason: Option<String>,
}

impl BillStanding {
    /// Bill amount plus the assessed penalty.
    #[inline]
    pub fn total_due(&self, assessment: &PenaltyAssessment) -> Money {
        self.amount + assessment.amount
    }
}

/// Outcome of a penalty assessment, with an audit line explaining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PenaltyAssessment {
    pub amount: Money,
    pub days_overdue: i64,
    pub details: String,
}

impl PenaltyAssessment {
    fn none(days_overdue: i64, details: impl Into<String>) -> Self {
        PenaltyAssessment {
            amount: Money::zero(),
            days_overdue,
            details: details.into(),
        }
    }
}

// =============================================================================
// Assessment
// =============================================================================

/// Computes the late-payment penalty for `bill` as of `today`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use waterworks_core::penalty::{assess_penalty, BillStanding, BillStatus, PenaltyPolicy};
/// use waterworks_core::Money;
///
/// let bill = BillStanding {
///     amount: Money::from_pesos(200),
///     due_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
///     status: BillStatus::Pending,
///     waived: false,
///     waiver_reason: None,
/// };
/// let today = NaiveDate::from_ymd_opt(2025, 3, 25).unwrap();
///
/// let assessment = assess_penalty(&PenaltyPolicy::default(), &bill, today);
/// assert_eq!(assessment.amount, Money::from_pesos(50)); // 25%
/// assert_eq!(assessment.days_overdue, 5);
/// ```
pub fn assess_penalty(
    policy: &PenaltyPolicy,
    bill: &BillStanding,
    today: NaiveDate,
) -> PenaltyAssessment {
    if bill.status == BillStatus::Paid {
        return PenaltyAssessment::none(0, "Bill is already paid");
    }

    if !policy.enabled {
        return PenaltyAssessment::none(0, "Penalties are disabled");
    }

    if bill.waived {
        let reason = bill
            .waiver_reason
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("no reason provided");
        return PenaltyAssessment::none(0, format!("Penalty waived: {}", reason));
    }

    if today <= bill.due_date {
        return PenaltyAssessment::none(0, format!("Not yet due (due {})", bill.due_date));
    }

    let days_overdue = (today - bill.due_date).num_days();
    let grace = policy.grace_period_days;
    if days_overdue <= grace {
        return PenaltyAssessment::none(
            days_overdue,
            format!("Within grace period ({} of {} days)", days_overdue, grace),
        );
    }

    let (mut amount, mut details) = match policy.kind {
        PenaltyKind::Percentage { rate } => {
            let amount = bill.amount.apply_rate(rate);
            (
                amount,
                format!(
                    "{}% of {} = {} ({} days overdue, grace {} days)",
                    rate.percentage(),
                    bill.amount,
                    amount,
                    days_overdue,
                    grace
                ),
            )
        }
        PenaltyKind::Fixed { amount } => (
            amount,
            format!(
                "Fixed penalty {} ({} days overdue, grace {} days)",
                amount, days_overdue, grace
            ),
        ),
    };

    if policy.max_penalty.is_positive() && amount > policy.max_penalty {
        details.push_str(&format!(" | capped from {} to {}", amount, policy.max_penalty));
        amount = policy.max_penalty;
    }

    PenaltyAssessment {
        amount,
        days_overdue,
        details,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
