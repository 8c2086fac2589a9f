//! Mapping of core errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use bookbridge_core::{AuthError, BackendError, ValidationErrors};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field messages for rejected forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

#[derive(Debug)]
pub enum ApiError {
    Invalid(ValidationErrors),
    NotAuthenticated,
    BadRequest(String),
    NotFound(String),
    Backend(BackendError),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Invalid(errors)
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotAuthenticated => ApiError::NotAuthenticated,
            other => ApiError::Backend(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Invalid(errors) => ApiError::Invalid(errors),
            AuthError::NotAuthenticated => ApiError::NotAuthenticated,
            AuthError::Backend(err) => ApiError::from(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, errors) = match self {
            ApiError::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "Not authenticated".to_string(),
                None,
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            // Backend replies pass through with their own status and text.
            ApiError::Backend(BackendError::Api { status, message }) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
                None,
            ),
            ApiError::Backend(err) => {
                warn!(error = %err, "Backend request failed");
                (StatusCode::BAD_GATEWAY, err.to_string(), None)
            }
        };

        (status, Json(ErrorResponse { error, errors })).into_response()
    }
}
