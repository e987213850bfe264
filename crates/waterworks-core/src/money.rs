//! # Money Module
//!
//! Provides the `Money` type for bill amounts and rates.
//!
//! ## Why Integer Centavos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Tiered bills are sums of many `units × rate` products:                 │
//! │    5 × 15.10 + 10 × 16.20 + 30 × 17.30  in f64 drifts by 1e-13         │
//! │                                                                         │
//! │  The breakdown total must EQUAL the single-pass total.                 │
//! │  With floats that only holds "within tolerance".                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    1510 centavos × 5 = 7550 centavos, exactly, every time              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use waterworks_core::money::Money;
//!
//! let rate = Money::from_centavos(1500); // ₱15.00 per m³
//! let band = rate.multiply_quantity(5);  // ₱75.00
//! assert_eq!(band.centavos(), 7500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::penalty::PenaltyRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a peso).
///
/// ## Where Money is Used
/// ```text
/// RateTier.minimum_charge ──┐
/// RateTier.tierN_rate ──────┼──► TierLineItem.subtotal ──► BillingResult.total
///                           │                                     │
///                           │                                     ▼
///                           └─────────────────────────► PenaltyAssessment.amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use waterworks_core::money::Money;
    ///
    /// let charge = Money::from_centavos(7500); // ₱75.00
    /// assert_eq!(charge.centavos(), 7500);
    /// ```
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from pesos and centavos.
    ///
    /// ## Example
    /// ```rust
    /// use waterworks_core::money::Money;
    ///
    /// let rate = Money::from_major_minor(15, 50); // ₱15.50
    /// assert_eq!(rate.centavos(), 1550);
    ///
    /// let credit = Money::from_major_minor(-5, 50); // -₱5.50
    /// assert_eq!(credit.centavos(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(100).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(100).saturating_add(minor))
        }
    }

    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos.saturating_mul(100))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity (units of volume, number of items).
    ///
    /// Saturates at the `i64` bounds instead of overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use waterworks_core::money::Money;
    ///
    /// let tier3 = Money::from_centavos(2000); // ₱20.00 per m³
    /// assert_eq!(tier3.multiply_quantity(2).centavos(), 4000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Divides by a positive integer, rounding half away from zero.
    ///
    /// Used for display-only figures such as the effective per-unit rate of
    /// the minimum-charge band and the average rate of a bill. Never feed the
    /// result back into a total.
    ///
    /// ## Example
    /// ```rust
    /// use waterworks_core::money::Money;
    ///
    /// // ₱75.01 / 5 = ₱15.002 → ₱15.00
    /// assert_eq!(Money::from_centavos(7501).divide_rounded(5).centavos(), 1500);
    /// // ₱1.65 / 12 = ₱0.1375 → ₱0.14
    /// assert_eq!(Money::from_centavos(165).divide_rounded(12).centavos(), 14);
    /// ```
    pub fn divide_rounded(&self, divisor: i64) -> Money {
        if divisor <= 0 {
            return Money::zero();
        }
        let numerator = self.0 as i128 * 2;
        let denominator = divisor as i128 * 2;
        let half = divisor as i128;
        let quotient = if numerator >= 0 {
            (numerator + half) / denominator
        } else {
            (numerator - half) / denominator
        };
        Money(quotient as i64)
    }

    /// Applies a basis-point rate, rounding half away from zero to the centavo.
    ///
    /// Rates above [`PenaltyRate::MAX_BPS`] are treated as 100%.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, the same shape as a
    /// sales tax calculation.
    ///
    /// ## Example
    /// ```rust
    /// use waterworks_core::money::Money;
    /// use waterworks_core::penalty::PenaltyRate;
    ///
    /// let bill = Money::from_centavos(16500); // ₱165.00
    /// let penalty = bill.apply_rate(PenaltyRate::from_bps(2500)); // 25%
    /// assert_eq!(penalty.centavos(), 4125);
    /// ```
    pub fn apply_rate(&self, rate: PenaltyRate) -> Money {
        let bps = rate.bps().min(PenaltyRate::MAX_BPS);
        let product = self.0 as i128 * bps as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_centavos(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly peso rendering. Presentation formatting belongs to the app.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₱{}.{:02}",
            sign,
            self.pesos().abs(),
            self.centavos_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a unit count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
