//! Reference data served alongside predictions.
//!
//! Subgroup performance figures and system metrics come from the model-monitoring pipeline,
//! which is outside this service; until it is wired in, these catalogues hold the figures of the
//! current monitoring report.

use readmit_core::SubgroupMetric;
use serde::Serialize;
use utoipa::ToSchema;

/// Subgroup metrics of the current monitoring report, in dashboard order.
pub fn bias_catalogue() -> Vec<SubgroupMetric> {
    [
        ("Age 65+", 74.2, 71.8, 0.96),
        ("Age <65", 78.1, 66.2, 1.04),
        ("Female", 76.8, 69.4, 1.01),
        ("Male", 75.6, 68.3, 0.99),
        ("White", 77.2, 70.1, 1.02),
        ("Black/African American", 74.1, 66.8, 0.96),
        ("Hispanic/Latino", 75.9, 68.9, 0.99),
        ("Medicaid", 73.5, 65.2, 0.94),
        ("Medicare", 76.8, 70.4, 1.01),
        ("Commercial", 78.9, 69.7, 1.05),
    ]
    .into_iter()
    .map(|(group, precision, recall, ratio)| SubgroupMetric::new(group, precision, recall, ratio))
    .collect()
}

/// Headline model performance figures.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub total_predictions: u64,
    pub high_risk_patients: u64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Time the figures were served, ISO-8601.
    pub last_updated: String,
}

impl SystemMetrics {
    pub fn reference(last_updated: impl Into<String>) -> Self {
        Self {
            total_predictions: 1247,
            high_risk_patients: 186,
            accuracy: 89.3,
            precision: 76.2,
            recall: 68.9,
            f1_score: 72.3,
            last_updated: last_updated.into(),
        }
    }
}

/// A model feature as described to clinicians on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelFeature {
    pub name: String,
    pub importance: f64,
    pub clinical_rationale: String,
}

/// Display catalogue of model features, most important first.
pub fn model_feature_catalogue() -> Vec<ModelFeature> {
    [
        (
            "Previous Admissions (12 months)",
            0.24,
            "Strong predictor of future healthcare utilization",
        ),
        (
            "Length of Stay",
            0.18,
            "Indicates illness severity and complexity",
        ),
        (
            "Charlson Comorbidity Index",
            0.16,
            "Measures disease burden and mortality risk",
        ),
        (
            "Age",
            0.12,
            "Advanced age correlates with frailty and complications",
        ),
        (
            "Emergency Admission Type",
            0.10,
            "Unplanned admissions indicate unstable conditions",
        ),
        (
            "Medication Count",
            0.08,
            "Polypharmacy increases adverse events and adherence issues",
        ),
        (
            "Primary Diagnosis Category",
            0.07,
            "Certain conditions have higher readmission rates",
        ),
        (
            "Social Risk Factors",
            0.05,
            "Social determinants affect care access and adherence",
        ),
    ]
    .into_iter()
    .map(|(name, importance, rationale)| ModelFeature {
        name: name.into(),
        importance,
        clinical_rationale: rationale.into(),
    })
    .collect()
}
