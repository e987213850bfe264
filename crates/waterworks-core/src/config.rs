//! Billing configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Key                                      | Default      |
//! |------------------------------------------|--------------|
//! | `WATERWORKS_HIGH_CONSUMPTION_THRESHOLD`  | `1000`       |
//! | `WATERWORKS_PENALTY_ENABLED`             | `true`       |
//! | `WATERWORKS_PENALTY_TYPE`                | `percentage` |
//! | `WATERWORKS_PENALTY_RATE_BPS`            | `2500`       |
//! | `WATERWORKS_FIXED_PENALTY_CENTAVOS`      | `5000`       |
//! | `WATERWORKS_PENALTY_GRACE_DAYS`          | `0`          |
//! | `WATERWORKS_MAX_PENALTY_CENTAVOS`        | `0` (no cap) |

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::debug;

use crate::money::Money;
use crate::penalty::{validate_penalty_rate_bps, PenaltyKind, PenaltyPolicy, PenaltyRate};
use crate::types::ReadingValidationResult;
use crate::validation::validate_reading_with_threshold;
use crate::HIGH_CONSUMPTION_THRESHOLD;

const DEFAULT_FIXED_PENALTY: Money = Money::from_pesos(50);

/// Tunable billing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Consumption above this many m³ is flagged for verification.
    pub high_consumption_threshold: i64,

    /// Late-payment rules.
    pub penalty: PenaltyPolicy,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            high_consumption_threshold: HIGH_CONSUMPTION_THRESHOLD,
            penalty: PenaltyPolicy::default(),
        }
    }
}

impl BillingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let high_consumption_threshold: i64 = parse_or(
            &lookup,
            "WATERWORKS_HIGH_CONSUMPTION_THRESHOLD",
            HIGH_CONSUMPTION_THRESHOLD,
        )?;
        if high_consumption_threshold <= 0 {
            return Err(ConfigError::InvalidValue(
                "WATERWORKS_HIGH_CONSUMPTION_THRESHOLD".to_string(),
            ));
        }

        let enabled = parse_or(&lookup, "WATERWORKS_PENALTY_ENABLED", true)?;

        let penalty_type = lookup("WATERWORKS_PENALTY_TYPE");
        let penalty_type = penalty_type.as_deref().map(str::trim).unwrap_or("percentage");

        let kind = if penalty_type.eq_ignore_ascii_case("percentage") {
            let bps: u32 = parse_or(
                &lookup,
                "WATERWORKS_PENALTY_RATE_BPS",
                PenaltyRate::default().bps(),
            )?;
            validate_penalty_rate_bps(bps).map_err(|_| {
                ConfigError::InvalidValue("WATERWORKS_PENALTY_RATE_BPS".to_string())
            })?;
            PenaltyKind::Percentage {
                rate: PenaltyRate::from_bps(bps),
            }
        } else if penalty_type.eq_ignore_ascii_case("fixed") {
            let centavos: i64 = parse_or(
                &lookup,
                "WATERWORKS_FIXED_PENALTY_CENTAVOS",
                DEFAULT_FIXED_PENALTY.centavos(),
            )?;
            if centavos < 0 {
                return Err(ConfigError::InvalidValue(
                    "WATERWORKS_FIXED_PENALTY_CENTAVOS".to_string(),
                ));
            }
            PenaltyKind::Fixed {
                amount: Money::from_centavos(centavos),
            }
        } else {
            return Err(ConfigError::InvalidValue(
                "WATERWORKS_PENALTY_TYPE".to_string(),
            ));
        };

        let grace_period_days: i64 = parse_or(&lookup, "WATERWORKS_PENALTY_GRACE_DAYS", 0)?;
        if grace_period_days < 0 {
            return Err(ConfigError::InvalidValue(
                "WATERWORKS_PENALTY_GRACE_DAYS".to_string(),
            ));
        }

        let max_penalty: i64 = parse_or(&lookup, "WATERWORKS_MAX_PENALTY_CENTAVOS", 0)?;
        if max_penalty < 0 {
            return Err(ConfigError::InvalidValue(
                "WATERWORKS_MAX_PENALTY_CENTAVOS".to_string(),
            ));
        }

        let config = BillingConfig {
            high_consumption_threshold,
            penalty: PenaltyPolicy {
                enabled,
                kind,
                grace_period_days,
                max_penalty: Money::from_centavos(max_penalty),
            },
        };

        debug!(
            threshold = config.high_consumption_threshold,
            penalty_enabled = config.penalty.enabled,
            "Loaded billing configuration"
        );

        Ok(config)
    }

    /// Validates a reading using the configured high-consumption threshold.
    pub fn validate_reading(
        &self,
        new_reading: i64,
        previous_reading: i64,
    ) -> ReadingValidationResult {
        validate_reading_with_threshold(
            new_reading,
            previous_reading,
            self.high_consumption_threshold,
        )
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BillingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, BillingConfig::default());
        assert_eq!(config.high_consumption_threshold, 1000);
        assert_eq!(
            config.penalty.kind,
            PenaltyKind::Percentage {
                rate: PenaltyRate::from_bps(2500)
            }
        );
    }

    #[test]
    fn test_fixed_penalty_from_env() {
        let config = BillingConfig::from_lookup(lookup_from(&[
            ("WATERWORKS_PENALTY_TYPE", "fixed"),
            ("WATERWORKS_FIXED_PENALTY_CENTAVOS", "7500"),
            ("WATERWORKS_PENALTY_GRACE_DAYS", "5"),
            ("WATERWORKS_MAX_PENALTY_CENTAVOS", "20000"),
        ]))
        .unwrap();

        assert_eq!(
            config.penalty.kind,
            PenaltyKind::Fixed {
                amount: Money::from_pesos(75)
            }
        );
        assert_eq!(config.penalty.grace_period_days, 5);
        assert_eq!(config.penalty.max_penalty, Money::from_pesos(200));
    }

    #[test]
    fn test_penalty_type_ignores_case() {
        let config =
            BillingConfig::from_lookup(lookup_from(&[("WATERWORKS_PENALTY_TYPE", " FIXED ")]))
                .unwrap();
        assert_eq!(
            config.penalty.kind,
            PenaltyKind::Fixed {
                amount: DEFAULT_FIXED_PENALTY
            }
        );

        let config =
            BillingConfig::from_lookup(lookup_from(&[("WATERWORKS_PENALTY_TYPE", "Percentage")]))
                .unwrap();
        assert_eq!(config.penalty.kind, PenaltyKind::default());
    }

    #[test]
    fn test_custom_threshold_drives_validation() {
        let config = BillingConfig::from_lookup(lookup_from(&[(
            "WATERWORKS_HIGH_CONSUMPTION_THRESHOLD",
            "200",
        )]))
        .unwrap();

        assert!(config.validate_reading(350, 100).is_warning);
        assert!(!config.validate_reading(300, 100).is_warning);
    }

    #[test]
    fn test_invalid_values() {
        let cases: &[(&str, &str)] = &[
            ("WATERWORKS_HIGH_CONSUMPTION_THRESHOLD", "lots"),
            ("WATERWORKS_HIGH_CONSUMPTION_THRESHOLD", "0"),
            ("WATERWORKS_PENALTY_ENABLED", "maybe"),
            ("WATERWORKS_PENALTY_TYPE", "daily"),
            ("WATERWORKS_PENALTY_RATE_BPS", "10001"),
            ("WATERWORKS_PENALTY_GRACE_DAYS", "-1"),
            ("WATERWORKS_MAX_PENALTY_CENTAVOS", "-5"),
        ];

        for (key, value) in cases {
            let err = BillingConfig::from_lookup(lookup_from(&[(*key, *value)])).unwrap_err();
            match err {
                ConfigError::InvalidValue(k) => assert_eq!(k, *key),
            }
        }
    }

    #[test]
    fn test_negative_fixed_penalty_rejected() {
        let err = BillingConfig::from_lookup(lookup_from(&[
            ("WATERWORKS_PENALTY_TYPE", "fixed"),
            ("WATERWORKS_FIXED_PENALTY_CENTAVOS", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
