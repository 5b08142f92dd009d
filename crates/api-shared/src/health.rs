use crate::wire::HealthRes;
use chrono::{SecondsFormat, Utc};
use readmit_core::constants::MODEL_VERSION;

/// Simple health service used by the REST API
///
/// This service provides a standardised way to check the health status of the readmission
/// service. It reports the rule-set version alongside the status so monitoring can tell which
/// model is live.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy, stamped with the current time.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "healthy".into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: MODEL_VERSION.trim_start_matches('v').into(),
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
