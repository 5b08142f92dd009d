//! Core runtime configuration.
//!
//! Engine settings are resolved once at process startup and then passed into the engine. The
//! parsing functions here take optional string values rather than reading the environment
//! themselves, so request handling and tests never depend on process-wide state.

use crate::scoring::{RiskThresholds, ScoringEngine};
use crate::{ValidationError, ValidationResult};

/// Engine configuration resolved at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineConfig {
    thresholds: RiskThresholds,
}

impl EngineConfig {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    /// Builds the scoring engine this configuration describes.
    pub fn scoring_engine(&self) -> ScoringEngine {
        ScoringEngine::with_thresholds(self.thresholds)
    }
}

/// Parse risk thresholds from optional string values.
///
/// A value that is `None` or empty/whitespace falls back to its default. The pair is then
/// validated together, so overriding only the high threshold below the default medium threshold
/// is rejected.
pub fn risk_thresholds_from_env_values(
    high: Option<String>,
    medium: Option<String>,
) -> ValidationResult<RiskThresholds> {
    let defaults = RiskThresholds::default();
    let high = parse_threshold(high, "highRiskThreshold")?.unwrap_or(defaults.high());
    let medium = parse_threshold(medium, "mediumRiskThreshold")?.unwrap_or(defaults.medium());

    RiskThresholds::new(high, medium)
}

fn parse_threshold(value: Option<String>, field: &str) -> ValidationResult<Option<f64>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| ValidationError::invalid_type(field, "decimal number"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_use_defaults() {
        let thresholds = risk_thresholds_from_env_values(None, Some("  ".into()))
            .expect("defaults are valid");
        assert_eq!(thresholds, RiskThresholds::default());
        assert_eq!(EngineConfig::default().thresholds(), thresholds);
    }

    #[test]
    fn test_overrides_are_parsed_and_validated() {
        let thresholds = risk_thresholds_from_env_values(Some("0.65".into()), Some("0.35".into()))
            .expect("valid overrides");
        assert_eq!(thresholds.high(), 0.65);
        assert_eq!(thresholds.medium(), 0.35);
        assert_eq!(
            EngineConfig::new(thresholds).scoring_engine().thresholds(),
            thresholds
        );
    }

    #[test]
    fn test_unparseable_value_names_field() {
        let err = risk_thresholds_from_env_values(Some("high".into()), None)
            .expect_err("not a number");
        assert_eq!(err.field(), Some("highRiskThreshold"));
    }

    #[test]
    fn test_medium_must_stay_below_high() {
        // 0.5 is a permitted high threshold, but the default medium of 0.4 must stay below it.
        assert!(risk_thresholds_from_env_values(Some("0.5".into()), None).is_ok());
        assert!(risk_thresholds_from_env_values(Some("0.5".into()), Some("0.6".into())).is_err());
    }
}
