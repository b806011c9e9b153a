// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::FieldViolation;
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};

/// A non-negative amount in minor currency units (cents).
///
/// Amounts arrive over the wire as decimal numbers and are rounded to the
/// nearest cent. They serialize back as decimal numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    ///
    /// # Errors
    ///
    /// Returns a violation if `cents` is negative.
    pub fn from_cents(field: &str, cents: i64) -> Result<Self, FieldViolation> {
        if cents < 0 {
            return Err(FieldViolation::new(field, "Amount must not be negative"));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from a decimal value in major units.
    ///
    /// # Errors
    ///
    /// Returns a violation if the value is negative, not finite, or too large
    /// to represent.
    pub fn from_major(field: &str, value: f64) -> Result<Self, FieldViolation> {
        if !value.is_finite() || value < 0.0 {
            return Err(FieldViolation::new(
                field,
                "Amount must be a non-negative number",
            ));
        }
        let cents: i64 = (value * 100.0)
            .round()
            .to_i64()
            .ok_or_else(|| FieldViolation::new(field, "Amount is too large"))?;
        Ok(Self(cents))
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the amount in major units.
    #[must_use]
    pub fn to_major(&self) -> f64 {
        self.0.to_f64().unwrap_or_default() / 100.0
    }
}

impl std::fmt::Display for Money {
    /// Formats as `75,000.00`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole: String = (self.0 / 100).to_string();
        let mut grouped: String = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        write!(f, "{grouped}.{:02}", self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}
