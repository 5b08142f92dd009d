use api_shared::wire::ErrorRes;
use api_shared::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use readmit_core::ValidationError;

/// Every failure a handler can report, mapped to a status code and an [`ErrorRes`] body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Too many requests from this IP, please try again later.")]
    TooManyRequests,
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                match e.field() {
                    Some(field) => ErrorRes::for_field(e.to_string(), field),
                    None => ErrorRes::new(e.to_string()),
                },
            ),
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, ErrorRes::new(self.to_string()))
            }
            ApiError::Auth(AuthError::InvalidToken | AuthError::InsufficientPermissions) => {
                (StatusCode::FORBIDDEN, ErrorRes::new(self.to_string()))
            }
            ApiError::MalformedBody(_) => (StatusCode::BAD_REQUEST, ErrorRes::new(self.to_string())),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorRes::new(*message)),
            ApiError::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, ErrorRes::new(self.to_string()))
            }
            ApiError::Auth(AuthError::SessionStore(_) | AuthError::PasswordHash(_))
            | ApiError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
