// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use planmorph::CoreError;
use planmorph_domain::{DomainError, FieldViolation};
use planmorph_persistence::PersistenceError;
use tracing::error;

/// Authentication errors.
///
/// Each variant maps to a stable machine-readable reason so clients can
/// tell a missing credential from an expired one without parsing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer credential was presented.
    MissingCredential,
    /// The credential is not shaped like a session token.
    MalformedCredential,
    /// The session existed but is past its expiry.
    ExpiredCredential,
    /// The credential does not match any live session.
    InvalidCredential,
    /// The email and password pair was rejected.
    InvalidLogin,
    /// The identity store could not be read.
    Internal(String),
}

impl AuthError {
    /// Returns the machine-readable reason code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::ExpiredCredential => "expired_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::InvalidLogin => "invalid_login",
            Self::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "No bearer token provided"),
            Self::MalformedCredential => write!(f, "Bearer token is malformed"),
            Self::ExpiredCredential => {
                write!(f, "Your session has expired. Please log in again.")
            }
            Self::InvalidCredential => write!(f, "Bearer token is not valid"),
            Self::InvalidLogin => write!(f, "Invalid email or password"),
            Self::Internal(msg) => write!(f, "Authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The machine-readable reason code.
        reason: String,
        /// A human-readable description.
        message: String,
    },
    /// A lifecycle rule refused the change.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// Every rejected field.
        violations: Vec<FieldViolation>,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The write conflicts with existing data.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds an input error for a single field.
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::from(FieldViolation::new(field, message))
    }

    /// Builds a not-found error.
    #[must_use]
    pub fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { message, .. } => {
                write!(f, "Authentication failed: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { violations } => {
                let joined: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "Invalid input: {}", joined.join("; "))
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(message) => Self::Internal { message },
            _ => Self::AuthenticationFailed {
                reason: err.reason().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<FieldViolation> for ApiError {
    fn from(violation: FieldViolation) -> Self {
        Self::InvalidInput {
            violations: vec![violation],
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::not_found("Record", message),
            PersistenceError::DuplicateEmail(email) => Self::Conflict {
                message: format!("An entry with email '{email}' already exists"),
            },
            PersistenceError::StatusChanged { .. } => Self::Conflict {
                message: err.to_string(),
            },
            PersistenceError::TransitionRefused(domain_err) => translate_domain_error(domain_err),
            PersistenceError::ResetTokenUsed | PersistenceError::ResetTokenExpired => {
                Self::invalid("token", err.to_string())
            }
            _ => {
                error!(error = %err, "Persistence failure");
                Self::Internal {
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(violations) => ApiError::InvalidInput { violations },
        DomainError::InvalidValue { .. } | DomainError::InvalidTicketNumber(_) => {
            ApiError::InvalidInput {
                violations: err.violations(),
            }
        }
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// A reply whose email does not own the ticket is reported exactly like a
/// missing ticket so callers cannot learn which ticket numbers exist.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::ClientMismatch => ticket_not_found(),
    }
}

/// The single not-found shape used by every public ticket path.
#[must_use]
pub fn ticket_not_found() -> ApiError {
    ApiError::not_found("Ticket", "Ticket not found or email does not match")
}
