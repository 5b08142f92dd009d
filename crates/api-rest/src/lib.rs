//! # API REST
//!
//! HTTP surface of the readmission dashboard.
//!
//! ## Purpose
//! Builds the axum [`Router`] that exposes scoring, patient lookup, fairness monitoring and
//! reference metrics as JSON, with OpenAPI/Swagger documentation.
//!
//! ## Intended use
//! The `readmit-run` binary resolves an [`ApiConfig`] and calls [`serve`]. Tests build the
//! router with [`app`] and drive it in-process.

mod error;
mod extract;
mod handlers;
mod rate_limit;


pub use error::ApiError;
pub use extract::{AuthenticatedUser, ClinicalUser};
pub use rate_limit::ApiRateLimiter;

use api_shared::repository::{PatientSummary, StoredFeatures};
use api_shared::wire::{
    ErrorRes, FairnessSummaryRes, FairnessVerdictRes, HealthRes, LoginReq, LoginRes, LogoutRes,
    PredictionReq, PredictionRes, UserRes,
};
use api_shared::auth::{AuthResult, PASSWORD_HASH_COST};
use api_shared::catalogue::{ModelFeature, SystemMetrics};
use api_shared::{
    ApiConfig, InMemoryPatientRepository, PatientRecord, PatientRepository, SessionStore,
    UserDirectory,
};
use axum::http::header::{
    AUTHORIZATION, CONTENT_TYPE, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
    X_CONTENT_TYPE_OPTIONS, X_DNS_PREFETCH_CONTROL, X_FRAME_OPTIONS,
};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use readmit_core::{FairnessAggregator, ScoringEngine};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Shared by every request handler. The engines are stateless values; the repository, user
/// directory and session store are shared behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub engine: ScoringEngine,
    pub fairness: FairnessAggregator,
    pub patients: Arc<dyn PatientRepository>,
    pub users: Arc<UserDirectory>,
    pub sessions: SessionStore,
    pub rate_limiter: Arc<ApiRateLimiter>,
}

impl AppState {
    pub fn new(
        engine: ScoringEngine,
        patients: Arc<dyn PatientRepository>,
        users: UserDirectory,
        sessions: SessionStore,
    ) -> Self {
        Self {
            engine,
            fairness: FairnessAggregator::new(),
            patients,
            users: Arc::new(users),
            sessions,
            rate_limiter: Arc::new(ApiRateLimiter::default()),
        }
    }

    /// State for a deployment described by `config`, with the seeded patients and demo users.
    ///
    /// # Errors
    /// Returns an error if the demo password cannot be hashed.
    pub fn from_config(config: &ApiConfig) -> AuthResult<Self> {
        Ok(Self::new(
            config.engine().scoring_engine(),
            Arc::new(InMemoryPatientRepository::seeded()),
            UserDirectory::with_demo_users(config.demo_password(), PASSWORD_HASH_COST)?,
            SessionStore::new(config.session_ttl()),
        ))
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::login,
        handlers::logout,
        handlers::predict_readmission,
        handlers::list_patients,
        handlers::get_patient,
        handlers::patient_prediction,
        handlers::metrics,
        handlers::bias_monitoring,
        handlers::bias_monitoring_summary,
        handlers::model_features,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        LoginReq,
        LoginRes,
        LogoutRes,
        UserRes,
        PredictionReq,
        PredictionRes,
        PatientSummary,
        PatientRecord,
        StoredFeatures,
        SystemMetrics,
        FairnessVerdictRes,
        FairnessSummaryRes,
        ModelFeature,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// CORS for the dashboard: permissive when no origin is configured, otherwise that origin only.
fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };

    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

/// Hardening headers set on every response unless a handler already set them.
fn security_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ),
        (X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
    ]
}

/// Builds the REST router.
///
/// # Errors
/// Returns an error if the configured CORS origin is not a valid header value.
pub fn app(state: AppState, config: &ApiConfig) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/predict/readmission", post(handlers::predict_readmission))
        .route("/api/patients", get(handlers::list_patients))
        .route("/api/patients/:id", get(handlers::get_patient))
        .route(
            "/api/patients/:id/prediction",
            get(handlers::patient_prediction),
        )
        .route("/api/metrics", get(handlers::metrics))
        .route("/api/bias-monitoring", get(handlers::bias_monitoring))
        .route(
            "/api/bias-monitoring/summary",
            get(handlers::bias_monitoring_summary),
        )
        .route("/api/model/features", get(handlers::model_features))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_api_requests,
        ));

    let router = security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config.cors_origin())?),
        )
        .with_state(state);

    Ok(router)
}

/// Runs the REST API until the listener fails.
///
/// # Errors
/// Returns an error if the router cannot be built, the address cannot be bound, or the server
/// fails while running.
pub async fn serve(config: ApiConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let router = app(state, &config)?;

    tracing::info!("++ Starting readmission REST API on {}", config.rest_addr());
    tracing::info!(
        high = config.engine().thresholds().high(),
        medium = config.engine().thresholds().medium(),
        session_ttl_hours = config.session_ttl().num_hours(),
        "risk thresholds and session lifetime"
    );

    let listener = tokio::net::TcpListener::bind(config.rest_addr()).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
