//! # Billing Module
//!
//! Tiered water bill calculation.
//!
//! ## The Band Walk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  consumption = 12 m³, Residential {50, 15, 20, 25, 30}                  │
//! │                                                                         │
//! │  remaining = 12                                                         │
//! │    Tier 1: flat ₱50.00                    remaining = 12 - 5 = 7        │
//! │    Tier 2: min(7, 5)  = 5 × ₱15 = ₱75.00  remaining = 2                 │
//! │    Tier 3: min(2, 10) = 2 × ₱20 = ₱40.00  remaining = 0   → stop        │
//! │                                                                         │
//! │  total = ₱165.00                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Minimum-Bill Policy
//! Tier 1 always takes a full 5 m³ slot off the remainder and charges the
//! flat minimum, even for 1 m³ of usage. This is intentional. With 3 m³ the
//! remainder becomes -2, and every later band sees `remaining <= 0`.
//!
//! [`calculate_total`] and [`calculate_breakdown`] are two views of the same
//! walk (`walk_bands`), so the breakdown always sums to the total.

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    Band, BillEstimate, BillingResult, Classification, RateSchedule, RateTier, TierLineItem,
};
use crate::validation::validate_reading;

/// Units the minimum charge covers and always consumes from the remainder.
pub const MINIMUM_CHARGE_UNITS: i64 = 5;

// =============================================================================
// Band Walk
// =============================================================================

/// The amount one band contributes to a bill.
#[derive(Debug, Clone, Copy)]
struct BandCharge {
    band: Band,
    units: i64,
    subtotal: Money,
}

/// Walks bands 1→5 and reports each band that consumes anything.
fn walk_bands(consumption: i64, tier: &RateTier, mut on_charge: impl FnMut(BandCharge)) {
    if consumption <= 0 {
        return;
    }

    on_charge(BandCharge {
        band: Band::Tier1,
        units: consumption.min(MINIMUM_CHARGE_UNITS),
        subtotal: tier.minimum_charge,
    });
    let mut remaining = consumption - MINIMUM_CHARGE_UNITS;

    for band in &Band::ALL[1..] {
        if remaining <= 0 {
            break;
        }
        let units = match band.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        on_charge(BandCharge {
            band: *band,
            units,
            subtotal: band.rate(tier).multiply_quantity(units),
        });
        remaining -= units;
    }
}

// =============================================================================
// Public Operations
// =============================================================================

/// Calculates the bill amount for `consumption` cubic meters.
///
/// Returns zero for zero or negative consumption. No rounding is applied.
///
/// ## Example
/// ```rust
/// use waterworks_core::billing::calculate_total;
/// use waterworks_core::{Classification, Money, RateSchedule, RateTier};
///
/// let tier = RateTier {
///     minimum_charge: Money::from_pesos(50),
///     tier2_rate: Money::from_pesos(15),
///     tier3_rate: Money::from_pesos(20),
///     tier4_rate: Money::from_pesos(25),
///     tier5_rate: Money::from_pesos(30),
/// };
/// let schedule = RateSchedule { residential: tier, commercial: tier };
///
/// let total = calculate_total(12, Classification::Residential, &schedule);
/// assert_eq!(total, Money::from_pesos(165));
/// ```
pub fn calculate_total(
    consumption: i64,
    classification: Classification,
    schedule: &RateSchedule,
) -> Money {
    let mut total = Money::zero();
    walk_bands(consumption, schedule.tier(classification), |charge| {
        total += charge.subtotal;
    });
    total
}

/// Calculates an itemized bill, one [`TierLineItem`] per band reached.
///
/// The minimum-charge band reports `minimum_charge / 5` as its rate for
/// display; its subtotal is the full minimum charge.
pub fn calculate_breakdown(
    consumption: i64,
    classification: Classification,
    schedule: &RateSchedule,
) -> BillingResult {
    let tier = schedule.tier(classification);
    let mut items = Vec::with_capacity(Band::ALL.len());
    let mut total = Money::zero();

    walk_bands(consumption, tier, |charge| {
        let rate = if charge.band.is_minimum_charge() {
            tier.minimum_charge.divide_rounded(MINIMUM_CHARGE_UNITS)
        } else {
            charge.band.rate(tier)
        };
        total += charge.subtotal;
        items.push(TierLineItem {
            band: charge.band,
            label: charge.band.label().to_string(),
            units: charge.units,
            rate,
            subtotal: charge.subtotal,
            is_minimum_charge: charge.band.is_minimum_charge(),
        });
    });

    debug!(
        consumption = %consumption,
        classification = %classification,
        bands = items.len(),
        total = %total,
        "Calculated bill breakdown"
    );

    BillingResult {
        consumption: consumption.max(0),
        classification,
        items,
        total,
    }
}

/// Validates a new reading and, if billable, itemizes the bill for it.
///
/// ## User Workflow
/// ```text
/// Field staff enters reading
///      │
///      ▼
/// estimate_bill(new, previous, ...) ← THIS FUNCTION
///      │
///      ├── reading invalid? → Err(InvalidReading)
///      │
///      └── OK → BillEstimate { validation (may carry a warning), breakdown }
/// ```
pub fn estimate_bill(
    new_reading: i64,
    previous_reading: i64,
    classification: Classification,
    schedule: &RateSchedule,
) -> CoreResult<BillEstimate> {
    let validation = validate_reading(new_reading, previous_reading);
    let consumption = validation
        .consumption()
        .ok_or_else(|| CoreError::InvalidReading {
            message: validation.message.clone(),
        })?;

    let breakdown = calculate_breakdown(consumption, classification, schedule);
    debug!(
        new_reading = %new_reading,
        previous_reading = %previous_reading,
        warning = validation.is_warning,
        total = %breakdown.total,
        "Estimated bill"
    );

    Ok(BillEstimate {
        validation,
        breakdown,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_schedule() -> RateSchedule {
        RateSchedule {
            residential: RateTier {
                minimum_charge: Money::from_pesos(50),
                tier2_rate: Money::from_pesos(15),
                tier3_rate: Money::from_pesos(20),
                tier4_rate: Money::from_pesos(25),
                tier5_rate: Money::from_pesos(30),
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

    #[test]
    fn test_twelve_units_residential() {
        let schedule = sample_schedule();
        let result = calculate_breakdown(12, Classification::Residential, &schedule);

        assert_eq!(result.items.len(), 3);

        let tier1 = &result.items[0];
        assert_eq!(tier1.band, Band::Tier1);
        assert_eq!(tier1.units, 5);
        assert_eq!(tier1.subtotal, Money::from_pesos(50));
        assert_eq!(tier1.rate, Money::from_pesos(10));
        assert!(tier1.is_minimum_charge);

        let tier2 = &result.items[1];
        assert_eq!((tier2.units, tier2.subtotal), (5, Money::from_pesos(75)));
        assert!(!tier2.is_minimum_charge);

        let tier3 = &result.items[2];
        assert_eq!((tier3.units, tier3.subtotal), (2, Money::from_pesos(40)));
        assert_eq!(tier3.rate, Money::from_pesos(20));

        assert_eq!(result.total, Money::from_pesos(165));
        assert_eq!(
            calculate_total(12, Classification::Residential, &schedule),
            Money::from_pesos(165)
        );
    }

    #[test]
    fn test_zero_consumption_has_no_items() {
        let schedule = sample_schedule();
        let result = calculate_breakdown(0, Classification::Residential, &schedule);
        assert!(result.is_empty());
        assert!(result.total.is_zero());
        assert!(calculate_total(0, Classification::Commercial, &schedule).is_zero());
    }

    #[test]
    fn test_negative_consumption_is_zero() {
        let schedule = sample_schedule();
        assert!(calculate_total(-7, Classification::Residential, &schedule).is_zero());

        let result = calculate_breakdown(-7, Classification::Residential, &schedule);
        assert!(result.is_empty());
        assert_eq!(result.consumption, 0);
    }

    #[test]
    fn test_sixty_units_reaches_every_band() {
        let schedule = sample_schedule();
        let result = calculate_breakdown(60, Classification::Residential, &schedule);

        let units: Vec<i64> = result.items.iter().map(|i| i.units).collect();
        assert_eq!(units, vec![5, 5, 10, 30, 10]);

        let tier5 = result.item(Band::Tier5).unwrap();
        assert_eq!(tier5.subtotal, Money::from_pesos(300));

        // 50 + 75 + 200 + 750 + 300
        assert_eq!(result.total, Money::from_pesos(1375));
    }

    #[test]
    fn test_small_consumption_charges_full_minimum() {
        let schedule = sample_schedule();
        let result = calculate_breakdown(1, Classification::Commercial, &schedule);

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].units, 1);
        assert_eq!(result.items[0].subtotal, Money::from_pesos(100));
        assert_eq!(result.average_rate(), Money::from_pesos(100));
    }

    #[test]
    fn test_band_boundaries() {
        let schedule = sample_schedule();
        let c = Classification::Residential;

        // exactly fills tier 1
        assert_eq!(calculate_breakdown(5, c, &schedule).items.len(), 1);
        // first unit of tier 2
        assert_eq!(calculate_breakdown(6, c, &schedule).items.len(), 2);
        assert_eq!(calculate_breakdown(10, c, &schedule).items.len(), 2);
        assert_eq!(calculate_breakdown(11, c, &schedule).items.len(), 3);
        assert_eq!(calculate_breakdown(50, c, &schedule).items.len(), 4);
        assert_eq!(calculate_breakdown(51, c, &schedule).items.len(), 5);
    }

    #[test]
    fn test_default_schedule_twenty_five_units() {
        // Residential 75 + 5×15 + 10×16 + 5×17 = 395
        let total = calculate_total(25, Classification::Residential, &RateSchedule::default());
        assert_eq!(total, Money::from_pesos(395));
    }

    #[test]
    fn test_classification_selects_tier() {
        let schedule = sample_schedule();
        let residential = calculate_total(12, Classification::Residential, &schedule);
        let commercial = calculate_total(12, Classification::Commercial, &schedule);
        // 100 + 5×18 + 2×20 = 230
        assert_eq!(commercial, Money::from_pesos(230));
        assert_ne!(residential, commercial);
    }

    #[test]
    fn test_minimum_charge_display_rate_rounds() {
        let mut schedule = sample_schedule();
        schedule.residential.minimum_charge = Money::from_centavos(7503);
        let result = calculate_breakdown(3, Classification::Residential, &schedule);

        assert_eq!(result.items[0].rate.centavos(), 1501);
        assert_eq!(result.total.centavos(), 7503);
    }

    #[test]
    fn test_estimate_bill_valid_reading() {
        let schedule = sample_schedule();
        let estimate = estimate_bill(112, 100, Classification::Residential, &schedule).unwrap();

        assert!(estimate.validation.is_valid);
        assert!(!estimate.validation.is_warning);
        assert_eq!(estimate.breakdown.consumption, 12);
        assert_eq!(estimate.breakdown.total, Money::from_pesos(165));
    }

    #[test]
    fn test_estimate_bill_keeps_warning() {
        let schedule = sample_schedule();
        let estimate = estimate_bill(120, 120, Classification::Residential, &schedule).unwrap();

        assert!(estimate.validation.is_warning);
        assert!(estimate.breakdown.is_empty());
    }

    #[test]
    fn test_estimate_bill_rejects_regressive_reading() {
        let schedule = sample_schedule();
        let err = estimate_bill(100, 120, Classification::Residential, &schedule).unwrap_err();
        match err {
            CoreError::InvalidReading { message } => assert!(message.contains("120")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_huge_consumption_saturates() {
        let schedule = RateSchedule::default();
        let consumption = i64::MAX / 100;

        let total = calculate_total(consumption, Classification::Residential, &schedule);
        assert_eq!(total, Money::from_centavos(i64::MAX));

        let result = calculate_breakdown(consumption, Classification::Residential, &schedule);
        assert_eq!(result.total, total);
        assert_eq!(result.items.iter().map(|i| i.units).sum::<i64>(), consumption);

        let total = calculate_total(i64::MAX, Classification::Commercial, &schedule);
        assert_eq!(total, Money::from_centavos(i64::MAX));
    }

    #[test]
    fn test_estimate_bill_rejects_negative_previous_reading() {
        let schedule = sample_schedule();
        let err = estimate_bill(i64::MAX, -1, Classification::Residential, &schedule).unwrap_err();
        assert!(matches!(err, CoreError::InvalidReading { .. }));
    }

    fn arb_tier() -> impl Strategy<Value = RateTier> {
        (0i64..100_000, 0i64..10_000, 0i64..10_000, 0i64..10_000, 0i64..10_000).prop_map(
            |(min, t2, t3, t4, t5)| RateTier {
                minimum_charge: Money::from_centavos(min),
                tier2_rate: Money::from_centavos(t2),
                tier3_rate: Money::from_centavos(t3),
                tier4_rate: Money::from_centavos(t4),
                tier5_rate: Money::from_centavos(t5),
            },
        )
    }

    fn arb_schedule() -> impl Strategy<Value = RateSchedule> {
        (arb_tier(), arb_tier()).prop_map(|(residential, commercial)| RateSchedule {
            residential,
            commercial,
        })
    }

    fn arb_classification() -> impl Strategy<Value = Classification> {
        prop_oneof![
            Just(Classification::Residential),
            Just(Classification::Commercial)
        ]
    }

    proptest! {
        #[test]
        fn breakdown_sums_to_total(
            consumption in -100i64..5_000,
            classification in arb_classification(),
            schedule in arb_schedule(),
        ) {
            let result = calculate_breakdown(consumption, classification, &schedule);
            let summed: Money = result.items.iter().map(|i| i.subtotal).sum();
            let total = calculate_total(consumption, classification, &schedule);
            prop_assert_eq!(summed, total);
            prop_assert_eq!(result.total, total);
        }

        #[test]
        fn total_is_monotonic(
            consumption in 0i64..5_000,
            classification in arb_classification(),
            schedule in arb_schedule(),
        ) {
            let here = calculate_total(consumption, classification, &schedule);
            let next = calculate_total(consumption + 1, classification, &schedule);
            prop_assert!(next >= here);
        }

        #[test]
        fn first_five_units_cost_the_minimum(
            consumption in 1i64..=5,
            classification in arb_classification(),
            schedule in arb_schedule(),
        ) {
            let total = calculate_total(consumption, classification, &schedule);
            prop_assert_eq!(total, schedule.tier(classification).minimum_charge);
        }

        #[test]
        fn non_positive_consumption_is_free(
            consumption in -10_000i64..=0,
            classification in arb_classification(),
            schedule in arb_schedule(),
        ) {
            prop_assert!(calculate_total(consumption, classification, &schedule).is_zero());
        }

        #[test]
        fn units_add_up_to_consumption_above_minimum(
            consumption in 5i64..5_000,
            schedule in arb_schedule(),
        ) {
            let result = calculate_breakdown(consumption, Classification::Residential, &schedule);
            let units: i64 = result.items.iter().map(|i| i.units).sum();
            prop_assert_eq!(units, consumption);
        }
    }
}
