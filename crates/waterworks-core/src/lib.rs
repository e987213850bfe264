//! # waterworks-core: Pure Billing Logic for the Waterworks System
//!
//! This crate is the billing engine behind meter reading and bill estimation.
//! It contains the business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Waterworks Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Field App / Admin Portal                        │   │
//! │  │    Consumer lookup ──► Reading entry ──► Bill preview ──► Submit│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ rates JSON, previous reading           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ waterworks-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  billing  │  │ validation│  │  penalty  │  │   │
//! │  │   │ RateTier  │  │  total    │  │  reading  │  │  overdue  │  │   │
//! │  │   │   Band    │  │ breakdown │  │  checks   │  │   bills   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ bill amount, breakdown, verdict        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Remote service (readings, bills, rates)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (RateSchedule, Band, BillingResult, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`billing`] - Tiered bill total and itemized breakdown
//! - [`validation`] - Meter reading verdicts and rate checks
//! - [`rates`] - Rates endpoint payload parsing
//! - [`penalty`] - Late-payment penalty assessment
//! - [`config`] - Environment-driven settings
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use waterworks_core::billing::calculate_breakdown;
//! use waterworks_core::validation::validate_reading;
//! use waterworks_core::{Classification, Money, RateSchedule};
//!
//! let schedule = RateSchedule::default();
//!
//! let verdict = validate_reading(1_025, 1_000);
//! assert!(verdict.is_valid);
//!
//! let consumption = verdict.consumption().unwrap();
//! let bill = calculate_breakdown(consumption, Classification::Residential, &schedule);
//!
//! // ₱75 + 5×₱15 + 10×₱16 + 5×₱17
//! assert_eq!(bill.total, Money::from_pesos(395));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod config;
pub mod error;
pub mod money;
pub mod penalty;
pub mod rates;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{calculate_breakdown, calculate_total, estimate_bill};
pub use config::{BillingConfig, ConfigError};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::validate_reading;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Consumption (m³) above which a reading is flagged for verification.
///
/// ## Business Reason
/// A jump of more than 1000 m³ in one period usually means a misread digit
/// or a mistyped reading rather than real usage.
pub const HIGH_CONSUMPTION_THRESHOLD: i64 = 1000;
