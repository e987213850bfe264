//! # Error Types
//!
//! Domain-specific error types for waterworks-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  waterworks-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  config errors (config.rs)                                             │
//! │  └── ConfigError      - Bad environment values                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller (app / service)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A regressive or negative meter reading is NOT an error: the reading
//! validator returns a verdict the caller branches on. `CoreError` only
//! appears when the caller asks the engine to do something it cannot.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A usage type string did not name a known classification.
    ///
    /// ## When This Occurs
    /// - A consumer record from the remote store carries an unexpected
    ///   `usage_type` such as `"Industrial"` or an empty string
    ///
    /// The engine never defaults to one of the tiers in this case.
    #[error("Invalid classification: '{0}' (expected Residential or Commercial)")]
    InvalidClassification(String),

    /// A bill was requested for a reading that failed validation.
    ///
    /// ## User Workflow
    /// ```text
    /// New reading: 100, previous: 120
    ///      │
    ///      ▼
    /// validate_reading → invalid
    ///      │
    ///      ▼
    /// estimate_bill → InvalidReading { message: "...(120 m³)" }
    /// ```
    #[error("Invalid reading: {message}")]
    InvalidReading { message: String },

    /// A rate schedule payload could not be parsed.
    #[error("Malformed rate schedule: {0}")]
    MalformedSchedule(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Floating-point input was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
