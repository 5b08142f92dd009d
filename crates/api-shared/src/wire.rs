//! Request and response bodies of the REST API.
//!
//! These are the JSON shapes the dashboard consumes, kept separate from the core's domain types
//! so the wire format can be documented (OpenAPI) and evolved without touching decision logic.
//! Field names are camelCase unless the dashboard already expects otherwise.

use crate::auth::SessionUser;
use chrono::SecondsFormat;
use readmit_core::{
    FairnessSummary, FairnessVerdict, FeatureImportance, RiskAssessment, ScoreBreakdown,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

/// Error body returned for every non-2xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    /// Offending field, present for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }

    pub fn for_field(error: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: Some(field.into()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRes {
    pub id: String,
    pub username: String,
    pub role: String,
    pub name: String,
    pub department: String,
}

impl From<SessionUser> for UserRes {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.to_string(),
            name: user.name,
            department: user.department,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
    pub token: String,
    pub expires_at: String,
    pub user: UserRes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LogoutRes {
    pub success: bool,
}

/// Documented shape of the prediction request body.
///
/// The handler reads the raw JSON field by field so that a failure can name the offending
/// field; this type only feeds the OpenAPI document.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReq {
    /// Echoed into the audit log only.
    pub patient_id: Option<String>,
    pub age: u32,
    pub gender: String,
    pub primary_diagnosis: String,
    pub length_of_stay: u32,
    pub previous_admissions: u32,
    #[serde(default)]
    pub emergency_admission: bool,
    pub medication_count: Option<u32>,
    #[serde(default)]
    pub comorbidities: Vec<String>,
    #[serde(default)]
    pub social_risk_factors: Vec<String>,
}

/// A risk assessment as returned by the prediction endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRes {
    pub risk_score: f64,
    pub risk_category: String,
    pub interventions: Vec<String>,
    pub confidence: f64,
    pub model_version: String,
    /// ISO-8601, millisecond precision, UTC.
    pub prediction_timestamp: String,
    /// Global factor weights, identical for every patient.
    #[schema(value_type = Object)]
    pub feature_importance: FeatureImportance,
    /// Rules that fired for this patient; only present when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub score_breakdown: Option<ScoreBreakdown>,
}

impl PredictionRes {
    pub fn with_breakdown(mut self, breakdown: ScoreBreakdown) -> Self {
        self.score_breakdown = Some(breakdown);
        self
    }
}

impl From<RiskAssessment> for PredictionRes {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            risk_score: assessment.risk_score,
            risk_category: assessment.risk_category.to_string(),
            interventions: assessment.interventions,
            confidence: assessment.confidence,
            model_version: assessment.model_version.to_string(),
            prediction_timestamp: assessment
                .prediction_timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            feature_importance: assessment.feature_importance,
            score_breakdown: None,
        }
    }
}

/// One subgroup row of the bias monitoring table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FairnessVerdictRes {
    pub group: String,
    pub precision: f64,
    pub recall: f64,
    pub fairness_ratio: f64,
    /// `Fair` or `Review`.
    pub status: String,
}

impl From<FairnessVerdict> for FairnessVerdictRes {
    fn from(verdict: FairnessVerdict) -> Self {
        Self {
            group: verdict.metric.group,
            precision: verdict.metric.precision,
            recall: verdict.metric.recall,
            fairness_ratio: verdict.metric.fairness_ratio,
            status: verdict.status.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FairnessSummaryRes {
    pub total: usize,
    pub fair: usize,
    pub review: usize,
    pub groups_for_review: Vec<String>,
}

impl From<FairnessSummary> for FairnessSummaryRes {
    fn from(summary: FairnessSummary) -> Self {
        Self {
            total: summary.total,
            fair: summary.fair,
            review: summary.review,
            groups_for_review: summary.groups_for_review,
        }
    }
}
