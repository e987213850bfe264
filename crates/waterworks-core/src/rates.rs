//! # Rates Payload
//!
//! Parsing of the rates endpoint response into a [`RateSchedule`].
//!
//! The caller fetches and caches the JSON; this module only turns an
//! already-received body into typed, validated rates.
//!
//! ## Payload Shape
//! ```text
//! {
//!   "status": "success",
//!   "residential": { "minimum_charge": 75.0, "tier2_rate": 15.0, ... },
//!   "commercial":  { "minimum_charge": 100.0, "tier2_rate": 18.0, ... },
//!   "tier_brackets": { "tier1": "1-5 m³ (minimum charge)", ... },
//!   "residential_rate_per_cubic": 22.5,     ← legacy, ignored
//!   "commercial_rate_per_cubic": 25.0,      ← legacy, ignored
//!   "updated_at": "2025-01-15T08:30:00+08:00"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{RateSchedule, RateTier};
use crate::validation::validate_peso_amount;

/// One classification's rates as the endpoint sends them, in pesos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTierPayload {
    pub minimum_charge: f64,
    pub tier2_rate: f64,
    pub tier3_rate: f64,
    pub tier4_rate: f64,
    pub tier5_rate: f64,
}

/// The rates endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterRatesPayload {
    #[serde(default)]
    pub status: Option<String>,
    pub residential: RateTierPayload,
    pub commercial: RateTierPayload,
    #[serde(default)]
    pub tier_brackets: BTreeMap<String, String>,
    /// Flat per-m³ rate from before tiered billing. Not used for billing.
    #[serde(default)]
    pub residential_rate_per_cubic: Option<f64>,
    /// Flat per-m³ rate from before tiered billing. Not used for billing.
    #[serde(default)]
    pub commercial_rate_per_cubic: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Converts a peso float to centavos, rounding to the nearest centavo.
fn pesos_to_money(field: &str, pesos: f64) -> Result<Money, ValidationError> {
    validate_peso_amount(field, pesos)?;
    let centavos = (pesos * 100.0).round();
    if centavos > i64::MAX as f64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX / 100,
        });
    }
    Ok(Money::from_centavos(centavos as i64))
}

impl RateTierPayload {
    fn to_tier(&self, prefix: &str) -> Result<RateTier, ValidationError> {
        let field = |name: &str| format!("{}.{}", prefix, name);
        Ok(RateTier {
            minimum_charge: pesos_to_money(&field("minimum_charge"), self.minimum_charge)?,
            tier2_rate: pesos_to_money(&field("tier2_rate"), self.tier2_rate)?,
            tier3_rate: pesos_to_money(&field("tier3_rate"), self.tier3_rate)?,
            tier4_rate: pesos_to_money(&field("tier4_rate"), self.tier4_rate)?,
            tier5_rate: pesos_to_money(&field("tier5_rate"), self.tier5_rate)?,
        })
    }
}

impl TryFrom<&WaterRatesPayload> for RateSchedule {
    type Error = ValidationError;

    fn try_from(payload: &WaterRatesPayload) -> Result<Self, Self::Error> {
        Ok(RateSchedule {
            residential: payload.residential.to_tier("residential")?,
            commercial: payload.commercial.to_tier("commercial")?,
        })
    }
}

impl TryFrom<WaterRatesPayload> for RateSchedule {
    type Error = ValidationError;

    fn try_from(payload: WaterRatesPayload) -> Result<Self, Self::Error> {
        RateSchedule::try_from(&payload)
    }
}

impl RateSchedule {
    /// Parses and validates a rates endpoint body.
    ///
    /// ## Example
    /// ```rust
    /// use waterworks_core::{Money, RateSchedule};
    ///
    /// let body = r#"{
    ///     "residential": {"minimum_charge": 75, "tier2_rate": 15, "tier3_rate": 16,
    ///                     "tier4_rate": 17, "tier5_rate": 18},
    ///     "commercial":  {"minimum_charge": 100, "tier2_rate": 18, "tier3_rate": 20,
    ///                     "tier4_rate": 22, "tier5_rate": 24}
    /// }"#;
    /// let schedule = RateSchedule::from_json(body).unwrap();
    /// assert_eq!(schedule.commercial.tier5_rate, Money::from_pesos(24));
    /// ```
    pub fn from_json(body: &str) -> CoreResult<Self> {
        let payload: WaterRatesPayload =
            serde_json::from_str(body).map_err(|e| CoreError::MalformedSchedule(e.to_string()))?;
        Ok(RateSchedule::try_from(&payload)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
