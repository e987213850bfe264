//! # Validation Module
//!
//! Meter reading checks and rate field validators.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: App input                                                    │
//! │  ├── Text → integer parsing (outside this crate)                       │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_reading: verdict, never an error                         │
//! │  └── rate validators: reject negative / non-finite rates               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: billing::calculate_* (only sees safe consumption)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use waterworks_core::validation::validate_reading;
//!
//! let verdict = validate_reading(150, 100);
//! assert!(verdict.is_valid);
//! assert_eq!(verdict.consumption(), Some(50));
//! ```

use tracing::debug;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{RateSchedule, RateTier, ReadingValidationResult};
use crate::HIGH_CONSUMPTION_THRESHOLD;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Reading Validators
// =============================================================================

/// Checks a new meter reading against the previous one.
///
/// ## Decision Table (first match wins)
/// ```text
/// new < 0                  → invalid  "Reading cannot be negative"
/// new < previous           → invalid  "...previous reading (P m³)"
/// new == previous          → valid ⚠  "Zero consumption detected"
/// new - previous > 1000    → valid ⚠  "High consumption detected (C m³). Please verify."
/// otherwise                → valid    "Reading is valid"
/// ```
///
/// Never computes a bill.
///
/// ## Example
/// ```rust
/// use waterworks_core::validation::validate_reading;
///
/// let verdict = validate_reading(100, 120);
/// assert!(!verdict.is_valid);
/// assert!(verdict.message.contains("120"));
/// ```
pub fn validate_reading(new_reading: i64, previous_reading: i64) -> ReadingValidationResult {
    validate_reading_with_threshold(new_reading, previous_reading, HIGH_CONSUMPTION_THRESHOLD)
}

/// [`validate_reading`] with a caller-supplied high-consumption threshold.
///
/// Consumption strictly above `threshold` is flagged.
pub fn validate_reading_with_threshold(
    new_reading: i64,
    previous_reading: i64,
    threshold: i64,
) -> ReadingValidationResult {
    let verdict = if new_reading < 0 {
        ReadingValidationResult::invalid("Reading cannot be negative")
    } else if previous_reading < 0 {
        ReadingValidationResult::invalid("Previous reading cannot be negative")
    } else if new_reading < previous_reading {
        ReadingValidationResult::invalid(format!(
            "New reading must be greater than or equal to previous reading ({} m³)",
            previous_reading
        ))
    } else {
        // Both readings are non-negative and ordered here, so this cannot overflow.
        let consumption = new_reading - previous_reading;
        if consumption == 0 {
            ReadingValidationResult::warning(0, "Zero consumption detected")
        } else if consumption > threshold {
            ReadingValidationResult::warning(
                consumption,
                format!(
                    "High consumption detected ({} m³). Please verify.",
                    consumption
                ),
            )
        } else {
            ReadingValidationResult::valid(consumption, "Reading is valid")
        }
    };

    debug!(
        new_reading = %new_reading,
        previous_reading = %previous_reading,
        valid = verdict.is_valid,
        warning = verdict.is_warning,
        "Validated meter reading"
    );

    verdict
}

// =============================================================================
// Rate Validators
// =============================================================================

/// Validates that a rate amount is not negative.
///
/// ## Example
/// ```rust
/// use waterworks_core::validation::validate_rate;
/// use waterworks_core::Money;
///
/// assert!(validate_rate("tier2_rate", Money::from_pesos(15)).is_ok());
/// assert!(validate_rate("tier2_rate", Money::zero()).is_ok());
/// assert!(validate_rate("tier2_rate", Money::from_centavos(-1)).is_err());
/// ```
pub fn validate_rate(field: &str, rate: Money) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates every amount in a tier. `prefix` names the tier in errors,
/// e.g. `"commercial"` → `"commercial.tier4_rate must not be negative"`.
pub fn validate_rate_tier(prefix: &str, tier: &RateTier) -> ValidationResult<()> {
    let fields = [
        ("minimum_charge", tier.minimum_charge),
        ("tier2_rate", tier.tier2_rate),
        ("tier3_rate", tier.tier3_rate),
        ("tier4_rate", tier.tier4_rate),
        ("tier5_rate", tier.tier5_rate),
    ];

    for (name, rate) in fields {
        validate_rate(&format!("{}.{}", prefix, name), rate)?;
    }

    Ok(())
}

/// Validates both tiers of a schedule.
pub fn validate_schedule(schedule: &RateSchedule) -> ValidationResult<()> {
    validate_rate_tier("residential", &schedule.residential)?;
    validate_rate_tier("commercial", &schedule.commercial)?;
    Ok(())
}

/// Validates a peso amount coming off the wire as a float.
pub fn validate_peso_amount(field: &str, pesos: f64) -> ValidationResult<()> {
    if !pesos.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if pesos < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
