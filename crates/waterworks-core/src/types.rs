//! # Domain Types
//!
//! Core domain types used by the billing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  RateSchedule   │   │    RateTier     │   │ Classification  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  residential ───┼──►│  minimum_charge │   │  Residential    │       │
//! │  │  commercial  ───┼──►│  tier2..5_rate  │   │  Commercial     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BillingResult  │   │  TierLineItem   │   │ ReadingValid-   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │ ationResult     │       │
//! │  │  items ─────────┼──►│  band, units    │   │  is_valid       │       │
//! │  │  total          │   │  rate, subtotal │   │  is_warning     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value here is built fresh per call and owned by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Classification
// =============================================================================

/// Customer category selecting which rate tier applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Classification {
    Residential,
    Commercial,
}

impl Classification {
    pub const ALL: [Classification; 2] = [Classification::Residential, Classification::Commercial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Residential => "Residential",
            Classification::Commercial => "Commercial",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a consumer record's `usage_type`.
///
/// ## Example
/// ```rust
/// use waterworks_core::Classification;
///
/// assert_eq!("Commercial".parse::<Classification>().unwrap(), Classification::Commercial);
/// assert_eq!(" residential ".parse::<Classification>().unwrap(), Classification::Residential);
/// assert!("Industrial".parse::<Classification>().is_err());
/// ```
impl FromStr for Classification {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidClassification(s.to_string()))
    }
}

// =============================================================================
// Rate Tier & Schedule
// =============================================================================

/// Prices for one classification.
///
/// `minimum_charge` is a flat amount for the first band; the other rates are
/// per cubic meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateTier {
    /// Flat charge covering 1-5 m³.
    pub minimum_charge: Money,
    /// Per m³ for 6-10 m³.
    pub tier2_rate: Money,
    /// Per m³ for 11-20 m³.
    pub tier3_rate: Money,
    /// Per m³ for 21-50 m³.
    pub tier4_rate: Money,
    /// Per m³ above 50 m³.
    pub tier5_rate: Money,
}

/// The current rates snapshot, one tier per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateSchedule {
    pub residential: RateTier,
    pub commercial: RateTier,
}

impl RateSchedule {
    /// Returns the tier that applies to `classification`.
    #[inline]
    pub fn tier(&self, classification: Classification) -> &RateTier {
        match classification {
            Classification::Residential => &self.residential,
            Classification::Commercial => &self.commercial,
        }
    }
}

/// Factory-default rates used when the rates service has never been configured.
impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule {
            residential: RateTier {
                minimum_charge: Money::from_pesos(75),
                tier2_rate: Money::from_pesos(15),
                tier3_rate: Money::from_pesos(16),
                tier4_rate: Money::from_pesos(17),
                tier5_rate: Money::from_pesos(18),
            },
            commercial: RateTier {
                minimum_charge: Money::from_pesos(100),
                tier2_rate: Money::from_pesos(18),
                tier3_rate: Money::from_pesos(20),
                tier4_rate: Money::from_pesos(22),
                tier5_rate: Money::from_pesos(24),
            },
        }
    }
}

// =============================================================================
// Band
// =============================================================================

/// One of the five fixed consumption bands.
///
/// ```text
/// Band   Range (m³)   Width   Pricing
/// ─────  ──────────   ─────   ──────────────────────────
/// Tier1  1-5          5       flat minimum_charge
/// Tier2  6-10         5       tier2_rate × units
/// Tier3  11-20        10      tier3_rate × units
/// Tier4  21-50        30      tier4_rate × units
/// Tier5  51+          ∞       tier5_rate × units
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
    Tier5,
}

impl Band {
    /// Bands in billing order.
    pub const ALL: [Band; 5] = [Band::Tier1, Band::Tier2, Band::Tier3, Band::Tier4, Band::Tier5];

    /// 1-based band number.
    pub const fn number(&self) -> u8 {
        match self {
            Band::Tier1 => 1,
            Band::Tier2 => 2,
            Band::Tier3 => 3,
            Band::Tier4 => 4,
            Band::Tier5 => 5,
        }
    }

    /// Units the band can absorb; `None` for the open-ended last band.
    pub const fn width(&self) -> Option<i64> {
        match self {
            Band::Tier1 => Some(5),
            Band::Tier2 => Some(5),
            Band::Tier3 => Some(10),
            Band::Tier4 => Some(30),
            Band::Tier5 => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Band::Tier1 => "Tier 1 (1-5 m³)",
            Band::Tier2 => "Tier 2 (6-10 m³)",
            Band::Tier3 => "Tier 3 (11-20 m³)",
            Band::Tier4 => "Tier 4 (21-50 m³)",
            Band::Tier5 => "Tier 5 (51+ m³)",
        }
    }

    /// The tier field that prices this band. For `Tier1` this is the flat
    /// minimum charge, not a per-unit rate.
    pub fn rate(&self, tier: &RateTier) -> Money {
        match self {
            Band::Tier1 => tier.minimum_charge,
            Band::Tier2 => tier.tier2_rate,
            Band::Tier3 => tier.tier3_rate,
            Band::Tier4 => tier.tier4_rate,
            Band::Tier5 => tier.tier5_rate,
        }
    }

    #[inline]
    pub const fn is_minimum_charge(&self) -> bool {
        matches!(self, Band::Tier1)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Billing Results
// =============================================================================

/// One row of an itemized bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierLineItem {
    pub band: Band,
    /// Human-readable band name, e.g. "Tier 3 (11-20 m³)".
    pub label: String,
    /// Cubic meters attributed to this band.
    pub units: i64,
    /// Per-unit rate shown to the customer. For the minimum-charge band this
    /// is `minimum_charge / 5` and is display-only.
    pub rate: Money,
    pub subtotal: Money,
    pub is_minimum_charge: bool,
}

/// An itemized bill: the line items plus their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillingResult {
    pub consumption: i64,
    pub classification: Classification,
    pub items: Vec<TierLineItem>,
    pub total: Money,
}

impl BillingResult {
    /// Effective price per cubic meter, rounded to the centavo.
    ///
    /// Zero when nothing was consumed.
    pub fn average_rate(&self) -> Money {
        if self.consumption <= 0 {
            return Money::zero();
        }
        self.total.divide_rounded(self.consumption)
    }

    /// Returns the line item for `band`, if that band was reached.
    pub fn item(&self, band: Band) -> Option<&TierLineItem> {
        self.items.iter().find(|item| item.band == band)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Reading Validation
// =============================================================================

/// Verdict on a newly submitted meter reading.
///
/// `is_warning` marks a reading that is acceptable but worth a second look
/// (zero or unusually high consumption).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReadingValidationResult {
    pub is_valid: bool,
    pub message: String,
    pub is_warning: bool,
    /// `new - previous` when the reading is valid. Read via [`Self::consumption`].
    consumption: Option<i64>,
}

impl ReadingValidationResult {
    pub fn valid(consumption: i64, message: impl Into<String>) -> Self {
        ReadingValidationResult {
            is_valid: true,
            message: message.into(),
            is_warning: false,
            consumption: Some(consumption),
        }
    }

    pub fn warning(consumption: i64, message: impl Into<String>) -> Self {
        ReadingValidationResult {
            is_warning: true,
            ..ReadingValidationResult::valid(consumption, message)
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ReadingValidationResult {
            is_valid: false,
            message: message.into(),
            is_warning: false,
            consumption: None,
        }
    }

    /// Billable consumption, or `None` if the reading must not be billed.
    #[inline]
    pub fn consumption(&self) -> Option<i64> {
        self.consumption
    }
}

/// A validated reading together with its itemized bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillEstimate {
    pub validation: ReadingValidationResult,
    pub breakdown: BillingResult,
}

// =============================================================================
// Unit Tests
// =============================================================================
