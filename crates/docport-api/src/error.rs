//! Maps domain errors and gate denials to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use docport_auth::gate::DenialCode;
use docport_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub code: String,
}

/// Response-side wrapper for [`AppError`].
///
/// Handlers return this so `?` keeps working on `AppResult` values.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = match &err.kind {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            // Fail closed: a store or internal failure never grants.
            ErrorKind::Store
            | ErrorKind::Internal
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::ExternalService => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiErrorResponse {
            error: err.message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// The single place where denial codes meet HTTP statuses.
pub fn denial_status(code: DenialCode) -> StatusCode {
    match code {
        DenialCode::EmailRequired
        | DenialCode::PasswordRequired
        | DenialCode::NdaRequired
        | DenialCode::CaptchaRequired => StatusCode::BAD_REQUEST,
        DenialCode::InvalidPassword => StatusCode::UNAUTHORIZED,
        DenialCode::LinkDisabled
        | DenialCode::LinkExpired
        | DenialCode::MaxAccessReached
        | DenialCode::EmailNotAllowed => StatusCode::FORBIDDEN,
    }
}

/// Renders a gate denial as its wire response.
pub fn denial_response(code: DenialCode) -> Response {
    let body = ApiErrorResponse {
        error: code.message().to_string(),
        code: code.as_str().to_string(),
    };
    (denial_status(code), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_client_errors() {
        assert_eq!(denial_status(DenialCode::EmailRequired), StatusCode::BAD_REQUEST);
        assert_eq!(denial_status(DenialCode::PasswordRequired), StatusCode::BAD_REQUEST);
        assert_eq!(denial_status(DenialCode::NdaRequired), StatusCode::BAD_REQUEST);
        assert_eq!(denial_status(DenialCode::CaptchaRequired), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        assert_eq!(denial_status(DenialCode::InvalidPassword), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn lifecycle_and_list_denials_are_forbidden() {
        assert_eq!(denial_status(DenialCode::LinkDisabled), StatusCode::FORBIDDEN);
        assert_eq!(denial_status(DenialCode::LinkExpired), StatusCode::FORBIDDEN);
        assert_eq!(denial_status(DenialCode::MaxAccessReached), StatusCode::FORBIDDEN);
        assert_eq!(denial_status(DenialCode::EmailNotAllowed), StatusCode::FORBIDDEN);
    }
}
