//! API runtime configuration.
//!
//! Resolved once at process startup from environment values and then passed into the router.
//! Handlers never read the environment. [`ApiEnv::from_process`] is the only place that does; it
//! is called from the binaries' `main`, while [`ApiConfig::resolve`] works on plain values and
//! is what tests exercise.

use chrono::Duration;
use readmit_core::config::{risk_thresholds_from_env_values, EngineConfig};

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 8;
pub const DEFAULT_DEMO_PASSWORD: &str = "password";

pub const ENV_REST_ADDR: &str = "READMIT_REST_ADDR";
pub const ENV_SESSION_TTL_HOURS: &str = "READMIT_SESSION_TTL_HOURS";
pub const ENV_CORS_ORIGIN: &str = "READMIT_CORS_ORIGIN";
pub const ENV_HIGH_RISK_THRESHOLD: &str = "READMIT_HIGH_RISK_THRESHOLD";
pub const ENV_MEDIUM_RISK_THRESHOLD: &str = "READMIT_MEDIUM_RISK_THRESHOLD";
pub const ENV_DEMO_PASSWORD: &str = "READMIT_DEMO_PASSWORD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Raw environment values, unparsed.
#[derive(Clone, Debug, Default)]
pub struct ApiEnv {
    pub rest_addr: Option<String>,
    pub session_ttl_hours: Option<String>,
    pub cors_origin: Option<String>,
    pub high_risk_threshold: Option<String>,
    pub medium_risk_threshold: Option<String>,
    pub demo_password: Option<String>,
}

impl ApiEnv {
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            rest_addr: var(ENV_REST_ADDR),
            session_ttl_hours: var(ENV_SESSION_TTL_HOURS),
            cors_origin: var(ENV_CORS_ORIGIN),
            high_risk_threshold: var(ENV_HIGH_RISK_THRESHOLD),
            medium_risk_threshold: var(ENV_MEDIUM_RISK_THRESHOLD),
            demo_password: var(ENV_DEMO_PASSWORD),
        }
    }
}

/// API configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    rest_addr: String,
    session_ttl: Duration,
    cors_origin: Option<String>,
    demo_password: String,
    engine: EngineConfig,
}

impl ApiConfig {
    /// Parses and validates raw environment values, applying defaults for anything unset.
    pub fn resolve(env: ApiEnv) -> ConfigResult<Self> {
        let thresholds =
            risk_thresholds_from_env_values(env.high_risk_threshold, env.medium_risk_threshold)
                .map_err(|e| ConfigError::InvalidValue {
                    var: match e.field() {
                        Some("mediumRiskThreshold") => ENV_MEDIUM_RISK_THRESHOLD,
                        _ => ENV_HIGH_RISK_THRESHOLD,
                    },
                    reason: e.to_string(),
                })?;

        Ok(Self {
            rest_addr: non_empty(env.rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into()),
            session_ttl: session_ttl_from_env_value(env.session_ttl_hours)?,
            cors_origin: non_empty(env.cors_origin),
            demo_password: non_empty(env.demo_password)
                .unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.into()),
            engine: EngineConfig::new(thresholds),
        })
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// `None` means any origin is allowed (development).
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_origin.as_deref()
    }

    pub fn demo_password(&self) -> &str {
        &self.demo_password
    }

    pub fn engine(&self) -> EngineConfig {
        self.engine
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rest_addr: DEFAULT_REST_ADDR.into(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            cors_origin: None,
            demo_password: DEFAULT_DEMO_PASSWORD.into(),
            engine: EngineConfig::default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the session lifetime in whole hours; `None` or blank yields the default.
pub fn session_ttl_from_env_value(value: Option<String>) -> ConfigResult<Duration> {
    let Some(raw) = non_empty(value) else {
        return Ok(Duration::hours(DEFAULT_SESSION_TTL_HOURS));
    };

    match raw.parse::<i64>() {
        Ok(hours) if hours > 0 => Ok(Duration::hours(hours)),
        _ => Err(ConfigError::InvalidValue {
            var: ENV_SESSION_TTL_HOURS,
            reason: format!("{raw:?} is not a positive whole number of hours"),
        }),
    }
}
