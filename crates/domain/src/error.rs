// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::lifecycle::EntityKind;
use serde::{Deserialize, Serialize};

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The offending field, named as it appears on the wire.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new violation for `field`.
    #[must_use]
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more input fields were rejected.
    ///
    /// Validators collect every violation before returning so callers can
    /// report them all at once.
    Validation(Vec<FieldViolation>),
    /// A closed-set value could not be parsed.
    InvalidValue {
        /// The field being parsed.
        field: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The requested status change is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The kind of entity being transitioned.
        entity: EntityKind,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// A ticket number did not match the `ST-00000` format.
    InvalidTicketNumber(String),
}

impl DomainError {
    /// Builds a validation error holding a single violation.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }

    /// Returns the field violations carried by this error.
    ///
    /// Non-validation errors are expressed as a single violation so the
    /// API layer can render every domain error uniformly.
    #[must_use]
    pub fn violations(&self) -> Vec<FieldViolation> {
        match self {
            Self::Validation(violations) => violations.clone(),
            Self::InvalidValue { field, value } => {
                vec![FieldViolation::new(field, format!("invalid value '{value}'"))]
            }
            Self::InvalidStatusTransition { .. } => {
                vec![FieldViolation::new("status", self.to_string())]
            }
            Self::InvalidTicketNumber(_) => {
                vec![FieldViolation::new("ticket_number", self.to_string())]
            }
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(violations) => {
                let joined: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "Validation failed: {}", joined.join("; "))
            }
            Self::InvalidValue { field, value } => {
                write!(f, "Invalid {field}: '{value}'")
            }
            Self::InvalidStatusTransition {
                entity,
                from,
                to,
                reason,
            } => {
                write!(
                    f,
                    "Cannot move {} from '{from}' to '{to}': {reason}",
                    entity.as_str()
                )
            }
            Self::InvalidTicketNumber(value) => {
                write!(f, "Invalid ticket number '{value}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}

impl From<FieldViolation> for DomainError {
    fn from(violation: FieldViolation) -> Self {
        Self::Validation(vec![violation])
    }
}

/// Accumulates field violations while validating a multi-field input.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a violation.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Records the violation carried by `result`, if any.
    ///
    /// The result is left in place so the caller can consume it with `?`
    /// once [`Violations::finish`] has succeeded.
    pub fn note<T>(&mut self, result: &Result<T, FieldViolation>) {
        if let Err(violation) = result {
            self.0.push(violation.clone());
        }
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the accumulated violations into a result.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any violation was recorded.
    pub fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}
