// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping of API errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use planmorph_api::{ApiError, AuthError};
use planmorph_domain::FieldViolation;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
    /// Machine-readable reason for authentication failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Every rejected field, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
    /// The authentication failure reason, if any.
    pub reason: Option<String>,
    /// Field-level validation details.
    pub details: Vec<FieldViolation>,
}

impl HttpError {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            reason: None,
            details: Vec::new(),
        }
    }

    /// Builds a 500 for failures outside the API layer.
    pub fn internal(message: String) -> Self {
        error!(error = %message, "Internal server error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            String::from("Internal server error"),
        )
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            reason: self.reason,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { reason, message } => Self {
                status: StatusCode::UNAUTHORIZED,
                message,
                reason: Some(reason),
                details: Vec::new(),
            },
            ApiError::InvalidInput { violations } => Self {
                status: StatusCode::BAD_REQUEST,
                message: String::from("Validation failed"),
                reason: None,
                details: violations,
            },
            ApiError::PasswordPolicyViolation { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::ResourceNotFound { ref message, .. } => {
                Self::new(StatusCode::NOT_FOUND, message.clone())
            }
            ApiError::Conflict { message } => Self::new(StatusCode::CONFLICT, message),
            ApiError::DomainRuleViolation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            // Details were logged where the error was raised.
            ApiError::Internal { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Internal server error"),
            ),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self::from(ApiError::from(err))
    }
}
