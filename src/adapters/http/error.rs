//! Maps entitlement errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::premium::dto::ErrorResponse;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::DomainError;

const GENERIC_ERROR: &str = "Something went wrong. Please try again later.";

/// API error type that converts entitlement errors to HTTP responses.
#[derive(Debug)]
pub struct EntitlementApiError(pub EntitlementError);

impl From<EntitlementError> for EntitlementApiError {
    fn from(err: EntitlementError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for EntitlementApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl EntitlementApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EntitlementError::InvalidCode(_)
            | EntitlementError::AlreadyRedeemed(_)
            | EntitlementError::LimitReached(_) => StatusCode::BAD_REQUEST,
            EntitlementError::NotFound(_) | EntitlementError::AccountNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EntitlementError::Unauthenticated => StatusCode::UNAUTHORIZED,
            EntitlementError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EntitlementError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EntitlementApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            EntitlementError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Request failed with infrastructure error");
                GENERIC_ERROR.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse::new(self.0.code().to_string(), message);
        (status, Json(body)).into_response()
    }
}
