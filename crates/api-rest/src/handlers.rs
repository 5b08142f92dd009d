//! Route handlers of the REST API.

use crate::extract::{AuthenticatedUser, ClinicalUser};
use crate::{ApiError, AppState};
use api_shared::catalogue::{bias_catalogue, model_feature_catalogue, ModelFeature, SystemMetrics};
use api_shared::repository::PatientSummary;
use api_shared::wire::{
    ErrorRes, FairnessSummaryRes, FairnessVerdictRes, HealthRes, LoginReq, LoginRes, LogoutRes,
    PredictionReq, PredictionRes, UserRes,
};
use api_shared::auth::User;
use api_shared::{HealthService, PatientRecord};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{SecondsFormat, Utc};
use readmit_core::{FairnessVerdict, PatientFeatures};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const PATIENT_NOT_FOUND: &str = "Patient not found";

#[derive(Debug, Default, Deserialize)]
pub struct ExplainParams {
    #[serde(default)]
    pub explain: bool,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by monitoring and load balancer health checks. Needs no authentication.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Session opened", body = LoginRes),
        (status = 400, description = "Malformed body", body = ErrorRes),
        (status = 401, description = "Invalid credentials", body = ErrorRes)
    )
)]
/// Exchanges a username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginReq>, JsonRejection>,
) -> Result<Json<LoginRes>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    let users = Arc::clone(&state.users);
    let user = tokio::task::spawn_blocking(move || {
        users
            .authenticate(&req.username, &req.password)
            .map(User::clone)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("login task: {e}")))??;
    let now = Utc::now();
    state.sessions.purge_expired(now)?;
    let session = state.sessions.issue(&user, now)?;

    tracing::info!(user = %session.user.username, role = %session.user.role, "user logged in");

    Ok(Json(LoginRes {
        token: session.token,
        expires_at: session
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        user: UserRes::from(session.user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session closed", body = LogoutRes),
        (status = 401, description = "Access token required", body = ErrorRes),
        (status = 403, description = "Invalid token", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Revokes the presented token.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LogoutRes>, ApiError> {
    let success = state.sessions.revoke(&auth.token)?;
    tracing::info!(user = %auth.user.username, "user logged out");
    Ok(Json(LogoutRes { success }))
}

#[utoipa::path(
    post,
    path = "/api/predict/readmission",
    request_body = PredictionReq,
    params(
        ("explain" = Option<bool>, Query, description = "Include the per-rule score breakdown")
    ),
    responses(
        (status = 200, description = "Risk assessment", body = PredictionRes),
        (status = 400, description = "Validation failure naming the field", body = ErrorRes),
        (status = 401, description = "Access token required", body = ErrorRes),
        (status = 403, description = "Invalid token or insufficient permissions", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Scores a patient's features.
///
/// The body is validated field by field; `patientId` is only logged.
pub async fn predict_readmission(
    State(state): State<AppState>,
    ClinicalUser(user): ClinicalUser,
    Query(params): Query<ExplainParams>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionRes>, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let patient_id = payload
        .get("patientId")
        .map(patient_id_label)
        .unwrap_or_else(|| "-".into());

    tracing::info!(user = %user.username, patient_id = %patient_id, "prediction requested");

    let features = PatientFeatures::from_json(&payload)?;
    let res = assess(&state, &features, params.explain);

    tracing::info!(
        user = %user.username,
        patient_id = %patient_id,
        risk_score = res.risk_score,
        risk_category = %res.risk_category,
        "prediction completed"
    );

    Ok(Json(res))
}

fn patient_id_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn assess(state: &AppState, features: &PatientFeatures, explain: bool) -> PredictionRes {
    let res = PredictionRes::from(state.engine.score(features));
    if explain {
        res.with_breakdown(state.engine.breakdown(features))
    } else {
        res
    }
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Patient list", body = [PatientSummary]),
        (status = 401, description = "Access token required", body = ErrorRes),
        (status = 403, description = "Invalid token or insufficient permissions", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Lists stored patients in store order.
pub async fn list_patients(
    State(state): State<AppState>,
    ClinicalUser(user): ClinicalUser,
) -> Json<Vec<PatientSummary>> {
    tracing::info!(user = %user.username, "patient list accessed");
    Json(
        state
            .patients
            .list()
            .iter()
            .map(PatientRecord::summary)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Stored patient record", body = PatientRecord),
        (status = 404, description = "Patient not found", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
pub async fn get_patient(
    State(state): State<AppState>,
    ClinicalUser(user): ClinicalUser,
    Path(id): Path<String>,
) -> Result<Json<PatientRecord>, ApiError> {
    let record = state
        .patients
        .find(&id)
        .ok_or(ApiError::NotFound(PATIENT_NOT_FOUND))?;
    tracing::info!(user = %user.username, patient_id = %id, "patient details accessed");
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/prediction",
    params(
        ("id" = String, Path, description = "Patient id"),
        ("explain" = Option<bool>, Query, description = "Include the per-rule score breakdown")
    ),
    responses(
        (status = 200, description = "Fresh assessment of the stored features", body = PredictionRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Rescores a stored patient with the live engine.
pub async fn patient_prediction(
    State(state): State<AppState>,
    ClinicalUser(user): ClinicalUser,
    Path(id): Path<String>,
    Query(params): Query<ExplainParams>,
) -> Result<Json<PredictionRes>, ApiError> {
    let record = state
        .patients
        .find(&id)
        .ok_or(ApiError::NotFound(PATIENT_NOT_FOUND))?;
    // A stored record the engine rejects is a store fault, not a client error.
    let features = record
        .features()
        .map_err(|e| ApiError::Internal(format!("stored record {id}: {e}")))?;
    let res = assess(&state, &features, params.explain);

    tracing::info!(
        user = %user.username,
        patient_id = %id,
        risk_score = res.risk_score,
        risk_category = %res.risk_category,
        "stored patient rescored"
    );

    Ok(Json(res))
}

#[utoipa::path(
    get,
    path = "/api/metrics",
    responses(
        (status = 200, description = "Model performance figures", body = SystemMetrics)
    ),
    security(("bearer" = []))
)]
pub async fn metrics(ClinicalUser(user): ClinicalUser) -> Json<SystemMetrics> {
    tracing::info!(user = %user.username, "metrics accessed");
    Json(SystemMetrics::reference(
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

fn catalogue_verdicts(state: &AppState) -> Result<Vec<FairnessVerdict>, ApiError> {
    state
        .fairness
        .evaluate(&bias_catalogue())
        .map_err(|e| ApiError::Internal(format!("bias catalogue: {e}")))
}

#[utoipa::path(
    get,
    path = "/api/bias-monitoring",
    responses(
        (status = 200, description = "Fairness verdicts in catalogue order", body = [FairnessVerdictRes])
    ),
    security(("bearer" = []))
)]
pub async fn bias_monitoring(
    State(state): State<AppState>,
    ClinicalUser(user): ClinicalUser,
) -> Result<Json<Vec<FairnessVerdictRes>>, ApiError> {
    let verdicts = catalogue_verdicts(&state)?;
    tracing::info!(user = %user.username, "bias monitoring data accessed");
    Ok(Json(verdicts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/bias-monitoring/summary",
    responses(
        (status = 200, description = "Fair/review counts", body = FairnessSummaryRes)
    ),
    security(("bearer" = []))
)]
pub async fn bias_monitoring_summary(
    State(state): State<AppState>,
    ClinicalUser(user): ClinicalUser,
) -> Result<Json<FairnessSummaryRes>, ApiError> {
    let verdicts = catalogue_verdicts(&state)?;
    tracing::info!(user = %user.username, "bias monitoring summary accessed");
    Ok(Json(state.fairness.summarise(&verdicts).into()))
}

#[utoipa::path(
    get,
    path = "/api/model/features",
    responses(
        (status = 200, description = "Model features with clinical rationale", body = [ModelFeature])
    ),
    security(("bearer" = []))
)]
pub async fn model_features(ClinicalUser(user): ClinicalUser) -> Json<Vec<ModelFeature>> {
    tracing::info!(user = %user.username, "model features accessed");
    Json(model_feature_catalogue())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, Json<ErrorRes>) {
    (StatusCode::NOT_FOUND, Json(ErrorRes::new("Endpoint not found")))
}
