// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use planmorph_domain::{DomainError, FieldViolation};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored value no longer parses as its domain type.
    InvalidStoredValue(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A unique email constraint rejected the write.
    DuplicateEmail(String),
    /// Another unique constraint rejected the write.
    UniqueViolation(String),
    /// The entity's status changed between read and write.
    StatusChanged {
        /// The status the write expected to find.
        expected: String,
    },
    /// The stored status refuses a change planned against an older read.
    TransitionRefused(DomainError),
    /// A password reset token was already used.
    ResetTokenUsed,
    /// A password reset token is past its expiry.
    ResetTokenExpired,
    /// No unique ticket number could be allocated.
    TicketNumberUnavailable { attempts: u32 },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::InvalidStoredValue(msg) => write!(f, "Invalid stored value: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DuplicateEmail(email) => write!(f, "Email already registered: {email}"),
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::StatusChanged { expected } => {
                write!(f, "Status is no longer '{expected}'; reload and retry")
            }
            Self::TransitionRefused(err) => write!(f, "Transition refused: {err}"),
            Self::ResetTokenUsed => write!(f, "Password reset token was already used"),
            Self::ResetTokenExpired => write!(f, "Password reset token has expired"),
            Self::TicketNumberUnavailable { attempts } => {
                write!(f, "Could not allocate a ticket number after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for PersistenceError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::InvalidStoredValue(err.to_string())
    }
}

impl From<FieldViolation> for PersistenceError {
    fn from(err: FieldViolation) -> Self {
        Self::InvalidStoredValue(err.to_string())
    }
}
