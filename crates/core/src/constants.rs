//! Constants used throughout the readmission core crate.
//!
//! Every threshold and increment of the scoring rule set and the fairness band lives here so the
//! rules can be audited in one place. Score increments are expressed in thousandths of a point
//! (`*_MILLIS`); the engine sums integers and converts once at the end.

/// Identifier of the rule set reported with every assessment.
pub const MODEL_VERSION: &str = "v2.1.3";

/// Placeholder confidence reported with every assessment. Not derived from inputs.
pub const MODEL_CONFIDENCE: f64 = 0.85;

/// Starting score before any rule applies.
pub const BASE_SCORE_MILLIS: u32 = 300;

/// Upper clamp applied to the summed score.
pub const MAX_SCORE_MILLIS: u32 = 950;

pub const AGE_OVER_65_MILLIS: u32 = 150;
pub const AGE_OVER_80_MILLIS: u32 = 100;
pub const STAY_OVER_7_DAYS_MILLIS: u32 = 200;
pub const STAY_OVER_14_DAYS_MILLIS: u32 = 150;
pub const ADMISSIONS_OVER_2_MILLIS: u32 = 250;
pub const ADMISSIONS_OVER_5_MILLIS: u32 = 200;
pub const HIGH_RISK_DIAGNOSIS_MILLIS: u32 = 200;
pub const EMERGENCY_ADMISSION_MILLIS: u32 = 100;

pub const SENIOR_AGE_YEARS: u32 = 65;
pub const ELDERLY_AGE_YEARS: u32 = 80;
pub const LONG_STAY_DAYS: u32 = 7;
pub const EXTENDED_STAY_DAYS: u32 = 14;
pub const FREQUENT_ADMISSIONS: u32 = 2;
pub const VERY_FREQUENT_ADMISSIONS: u32 = 5;

/// Diagnoses that add risk when found (case-insensitively) anywhere in the primary diagnosis.
pub const HIGH_RISK_DIAGNOSES: [&str; 4] = ["Heart Failure", "COPD", "Diabetes", "Kidney Disease"];

/// Scores at or above this value are High risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Scores at or above this value (and below the high threshold) are Medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// Lowest high-risk threshold an engine may be configured with.
pub const MIN_CONFIGURABLE_HIGH_THRESHOLD: f64 = 0.50;

/// Highest high-risk threshold an engine may be configured with.
pub const MAX_CONFIGURABLE_HIGH_THRESHOLD: f64 = 0.90;

/// Inclusive lower bound of the fairness ratio band considered Fair.
pub const FAIRNESS_RATIO_MIN: f64 = 0.95;

/// Inclusive upper bound of the fairness ratio band considered Fair.
pub const FAIRNESS_RATIO_MAX: f64 = 1.05;

/// Precision and recall are percentages.
pub const MAX_PERCENTAGE: f64 = 100.0;
