//! # API Shared
//!
//! Shared utilities and definitions for the readmission APIs.
//!
//! Contains:
//! - Wire types for request and response bodies (`wire` module)
//! - Shared services like `HealthService`
//! - Authentication, sessions and role checks
//! - The patient repository collaborator and reference catalogues
//! - Startup configuration
//!
//! Used by `api-rest`, the CLI and the runner binary.

pub mod auth;
pub mod catalogue;
pub mod config;
pub mod health;
pub mod repository;
pub mod wire;

pub use auth::{AuthError, Role, SessionStore, SessionUser, UserDirectory};
pub use config::{ApiConfig, ApiEnv, ConfigError};
pub use health::HealthService;
pub use repository::{InMemoryPatientRepository, PatientRecord, PatientRepository};
