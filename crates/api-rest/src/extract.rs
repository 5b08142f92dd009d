//! Request extractors for bearer-token authentication.

use crate::{ApiError, AppState};
use api_shared::auth::{self, CLINICAL_ROLES};
use api_shared::SessionUser;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;

/// Any logged-in user, with the token they presented.
pub struct AuthenticatedUser {
    pub user: SessionUser,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = auth::bearer_token(header)?;

        let user = state.sessions.resolve(token, Utc::now()).map_err(|e| {
            if e == auth::AuthError::InvalidToken {
                tracing::warn!("token verification failed");
            }
            e
        })?;

        Ok(Self {
            user,
            token: token.to_owned(),
        })
    }
}

/// A logged-in physician or nurse.
pub struct ClinicalUser(pub SessionUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for ClinicalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let AuthenticatedUser { user, .. } =
            AuthenticatedUser::from_request_parts(parts, state).await?;
        auth::require_role(&user, CLINICAL_ROLES)?;
        Ok(Self(user))
    }
}
