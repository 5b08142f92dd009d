use api_shared::{ApiConfig, ApiEnv};
use readmit_core::constants::MODEL_VERSION;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the readmission service
///
/// Loads `.env`, installs logging, resolves the startup configuration once and serves the REST
/// API until it fails.
///
/// # Environment Variables
/// - `READMIT_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `READMIT_SESSION_TTL_HOURS`: bearer session lifetime in hours (default: 8)
/// - `READMIT_CORS_ORIGIN`: dashboard origin; permissive CORS when unset
/// - `READMIT_HIGH_RISK_THRESHOLD` / `READMIT_MEDIUM_RISK_THRESHOLD`: category cut-offs
///   (default: 0.70 / 0.40)
/// - `READMIT_DEMO_PASSWORD`: password of the seeded demo users
/// - `RUST_LOG`: extra tracing directives
///
/// # Errors
/// Returns an error if a configuration value is invalid, the address cannot be bound, or the
/// server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("readmit_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_shared=info".parse()?)
                .add_directive("readmit_core=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::resolve(ApiEnv::from_process())?;

    tracing::info!("++ Readmission risk model {}", MODEL_VERSION);

    api_rest::serve(config).await
}
