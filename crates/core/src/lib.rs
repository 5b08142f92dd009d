//! # Readmission Core
//!
//! Decision logic for the readmission dashboard:
//! - Risk scoring of discharged patients (score, category, interventions, explanation)
//! - Fairness classification of subgroup performance metrics
//! - Validation of caller-supplied payloads
//!
//! Everything here is pure and synchronous. The only ambient input is the clock read when an
//! assessment is stamped.
//!
//! **No API concerns**: authentication, HTTP servers and storage belong in `api-shared` or
//! `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod fairness;
pub mod features;
pub mod scoring;
pub mod validation;

pub use config::EngineConfig;
pub use error::{ValidationError, ValidationResult};
pub use fairness::{
    FairnessAggregator, FairnessStatus, FairnessSummary, FairnessVerdict, SubgroupMetric,
};
pub use features::PatientFeatures;
pub use scoring::{
    Contribution, FeatureImportance, RiskAssessment, RiskCategory, RiskFactor, RiskThresholds,
    ScoreBreakdown, ScoringEngine,
};
