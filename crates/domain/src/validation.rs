// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation shared by every submission form.
//!
//! Each helper validates one field and returns the normalized value or a
//! [`FieldViolation`]. Callers collect violations with
//! [`crate::error::Violations`] so all problems are reported together.

use crate::error::FieldViolation;

/// Maximum length of a stored email address.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Validates a person's name: trimmed, between 2 and 255 characters.
///
/// # Errors
///
/// Returns a violation if the name is empty or outside the length bounds.
pub fn validate_name(field: &str, value: &str) -> Result<String, FieldViolation> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, "Name is required"));
    }
    let len: usize = trimmed.chars().count();
    if !(2..=255).contains(&len) {
        return Err(FieldViolation::new(
            field,
            "Name must be between 2 and 255 characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// Validates and normalizes an email address.
///
/// The address is trimmed and lowercased. It must have exactly one `@`, a
/// non-empty local part, and a domain containing a dot that neither starts
/// nor ends the domain.
///
/// # Errors
///
/// Returns a violation if the address is malformed.
pub fn normalize_email(field: &str, value: &str) -> Result<String, FieldViolation> {
    let normalized: String = value.trim().to_lowercase();
    let invalid = || FieldViolation::new(field, "Please provide a valid email address");

    if normalized.is_empty() || normalized.len() > MAX_EMAIL_LENGTH {
        return Err(invalid());
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let mut parts = normalized.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    if local.is_empty() || domain.len() < 3 {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    if domain.contains("..") {
        return Err(invalid());
    }

    Ok(normalized)
}

/// Validates a Kenyan phone number.
///
/// Accepted shapes are an optional `+254` or `0` prefix followed by a `1` or
/// `7` and exactly eight more digits (`0712345678`, `+254712345678`,
/// `712345678`).
///
/// # Errors
///
/// Returns a violation if the number does not match.
pub fn validate_phone(field: &str, value: &str) -> Result<String, FieldViolation> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, "Phone number is required"));
    }

    let subscriber: &str = trimmed
        .strip_prefix("+254")
        .or_else(|| trimmed.strip_prefix('0'))
        .unwrap_or(trimmed);

    let mut digits = subscriber.chars();
    let valid: bool = matches!(digits.next(), Some('1' | '7'))
        && subscriber.len() == 9
        && digits.all(|c| c.is_ascii_digit());

    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(FieldViolation::new(
            field,
            "Please provide a valid Kenyan phone number",
        ))
    }
}

/// Validates a required free-text field, trimmed, with character bounds.
///
/// # Errors
///
/// Returns a violation if the text is empty or outside `min..=max`.
pub fn required_text(
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldViolation> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(field, format!("{label} is required")));
    }
    let len: usize = trimmed.chars().count();
    if len < min || len > max {
        return Err(FieldViolation::new(
            field,
            format!("{label} must be between {min} and {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validates an optional free-text field.
///
/// Blank input is treated as absent.
///
/// # Errors
///
/// Returns a violation if the trimmed text exceeds `max` characters.
pub fn optional_text(
    field: &str,
    label: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldViolation> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(FieldViolation::new(
            field,
            format!("{label} must not exceed {max} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validates an optional absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns a violation if a non-blank value is not an http(s) URL with a host.
pub fn optional_url(field: &str, value: Option<&str>) -> Result<Option<String>, FieldViolation> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let rest: Option<&str> = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') && trimmed.len() <= 500 => {
            Ok(Some(trimmed.to_string()))
        }
        _ => Err(FieldViolation::new(field, "Must be a valid http(s) URL")),
    }
}

/// Validates an ordered list of short labels (skills, technologies).
///
/// Entries are trimmed and blanks dropped; order is preserved.
///
/// # Errors
///
/// Returns a violation if fewer than `min` entries remain or an entry is
/// longer than 100 characters.
pub fn label_list(
    field: &str,
    values: &[String],
    min: usize,
) -> Result<Vec<String>, FieldViolation> {
    let cleaned: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.len() < min {
        return Err(FieldViolation::new(
            field,
            format!("At least {min} entry is required"),
        ));
    }
    if cleaned.iter().any(|v| v.chars().count() > 100) {
        return Err(FieldViolation::new(
            field,
            "Entries must not exceed 100 characters",
        ));
    }
    Ok(cleaned)
}
