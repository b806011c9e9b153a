// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! RFC 3339 timestamps.
//!
//! Records carry timestamps as UTC RFC 3339 strings with whole seconds, so
//! stored values sort correctly as text. These helpers are the only place
//! that formats or parses them.

use crate::error::{DomainError, FieldViolation};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Formats an instant as a UTC RFC 3339 string, dropping sub-second
/// precision.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented (years outside
/// 0..=9999).
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, DomainError> {
    let invalid = || DomainError::InvalidValue {
        field: "timestamp",
        value: at.unix_timestamp().to_string(),
    };
    at.to_offset(UtcOffset::UTC)
        .replace_nanosecond(0)
        .map_err(|_| invalid())?
        .format(&Rfc3339)
        .map_err(|_| invalid())
}

/// Parses an RFC 3339 timestamp supplied by a caller.
///
/// # Errors
///
/// Returns a violation naming `field` if the value is not RFC 3339.
pub fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, FieldViolation> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).map_err(|_| {
        FieldViolation::new(
            field,
            "Must be an RFC 3339 timestamp such as 2026-03-01T10:00:00Z",
        )
    })
}

/// Returns the instant `days` whole days after `from`.
#[must_use]
pub fn days_after(from: OffsetDateTime, days: u16) -> OffsetDateTime {
    from + Duration::days(i64::from(days))
}
