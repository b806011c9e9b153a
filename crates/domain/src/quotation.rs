// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{DomainError, FieldViolation, Violations};
use crate::money::Money;
use crate::project_request::ProjectType;
use crate::validation::optional_text;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Maximum number of line items in a cost breakdown.
pub const MAX_BREAKDOWN_ITEMS: usize = 50;

closed_enum! {
    /// How often a recurring cost is billed.
    pub enum RecurringPeriod: "recurring_period" {
        Monthly => "monthly",
        Quarterly => "quarterly",
        Yearly => "yearly",
        Never => "none",
    }
}

/// An itemized cost breakdown: category label to non-negative amount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CostBreakdown(BTreeMap<String, Money>);

impl CostBreakdown {
    /// Validates an untyped breakdown as submitted by an admin.
    ///
    /// The value must be a JSON object whose keys are non-blank labels of at
    /// most 100 characters and whose values are non-negative numbers.
    ///
    /// # Errors
    ///
    /// Returns a violation naming `field` on the first malformed entry.
    pub fn from_value(field: &str, value: &Value) -> Result<Self, FieldViolation> {
        let Value::Object(entries) = value else {
            return Err(FieldViolation::new(field, "Cost breakdown must be an object"));
        };
        if entries.len() > MAX_BREAKDOWN_ITEMS {
            return Err(FieldViolation::new(
                field,
                format!("Cost breakdown must not exceed {MAX_BREAKDOWN_ITEMS} items"),
            ));
        }

        let mut items: BTreeMap<String, Money> = BTreeMap::new();
        for (label, amount) in entries {
            let label: &str = label.trim();
            if label.is_empty() || label.chars().count() > 100 {
                return Err(FieldViolation::new(
                    field,
                    "Cost breakdown labels must be 1 to 100 characters",
                ));
            }
            let Some(amount) = amount.as_f64() else {
                return Err(FieldViolation::new(
                    field,
                    format!("Cost breakdown amount for '{label}' must be a number"),
                ));
            };
            items.insert(label.to_string(), Money::from_major(field, amount)?);
        }
        Ok(Self(items))
    }

    /// Restores a breakdown from its stored JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid breakdown.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(text).map_err(|_| DomainError::InvalidValue {
            field: "cost_breakdown",
            value: text.to_string(),
        })?;
        Ok(Self::from_value("cost_breakdown", &value)?)
    }

    /// Serializes the breakdown to JSON text for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::InvalidValue {
            field: "cost_breakdown",
            value: e.to_string(),
        })
    }

    /// Iterates over `(label, amount)` pairs in label order.
    pub fn items(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(label, amount)| (label.as_str(), *amount))
    }

    /// Returns true if there are no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CostBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter())
    }
}

/// An unvalidated quotation as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuotationDraft {
    pub request_id: Option<i64>,
    pub total_cost: Option<f64>,
    pub timeline_weeks: Option<i64>,
    pub cost_breakdown: Option<Value>,
    pub notes: Option<String>,
    pub recurring_cost: Option<f64>,
    pub recurring_period: Option<String>,
    pub recurring_description: Option<String>,
}

/// A validated quotation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuotation {
    pub request_id: i64,
    pub total_cost: Money,
    pub timeline_weeks: u16,
    pub cost_breakdown: Option<CostBreakdown>,
    pub notes: Option<String>,
    pub recurring_cost: Money,
    pub recurring_period: RecurringPeriod,
    pub recurring_description: Option<String>,
}

impl QuotationDraft {
    /// Validates every field of the quotation.
    ///
    /// Absent recurring fields default to zero cost and period `none`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<NewQuotation, DomainError> {
        let request_id = match self.request_id {
            Some(id) if id >= 1 => Ok(id),
            _ => Err(FieldViolation::new(
                "request_id",
                "Valid request ID is required",
            )),
        };
        let total_cost = self.total_cost.map_or_else(
            || Err(FieldViolation::new("total_cost", "Total cost is required")),
            |value| Money::from_major("total_cost", value),
        );
        let timeline_weeks = match self.timeline_weeks.map(u16::try_from) {
            Some(Ok(weeks)) if (1..=104).contains(&weeks) => Ok(weeks),
            _ => Err(FieldViolation::new(
                "timeline_weeks",
                "Timeline must be between 1 and 104 weeks",
            )),
        };
        let cost_breakdown = match &self.cost_breakdown {
            None | Some(Value::Null) => Ok(None),
            Some(value) => CostBreakdown::from_value("cost_breakdown", value).map(Some),
        };
        let notes = optional_text("notes", "Notes", self.notes.as_deref(), 2000);
        let recurring_cost = self
            .recurring_cost
            .map_or(Ok(Money::ZERO), |value| {
                Money::from_major("recurring_cost", value)
            });
        let recurring_period = self
            .recurring_period
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or(Ok(RecurringPeriod::Never), |raw| {
                RecurringPeriod::parse_field("recurring_period", raw)
            });
        let recurring_description = optional_text(
            "recurring_description",
            "Recurring description",
            self.recurring_description.as_deref(),
            500,
        );

        let mut violations: Violations = Violations::new();
        violations.note(&request_id);
        violations.note(&total_cost);
        violations.note(&timeline_weeks);
        violations.note(&cost_breakdown);
        violations.note(&notes);
        violations.note(&recurring_cost);
        violations.note(&recurring_period);
        violations.note(&recurring_description);
        violations.finish()?;

        Ok(NewQuotation {
            request_id: request_id?,
            total_cost: total_cost?,
            timeline_weeks: timeline_weeks?,
            cost_breakdown: cost_breakdown?,
            notes: notes?,
            recurring_cost: recurring_cost?,
            recurring_period: recurring_period?,
            recurring_description: recurring_description?,
        })
    }
}

/// A stored quotation.
///
/// Multiple quotations may exist per request; the newest is the one shown
/// to staff by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quotation {
    pub id: i64,
    pub request_id: i64,
    pub total_cost: Money,
    pub timeline_weeks: u16,
    pub cost_breakdown: Option<CostBreakdown>,
    pub notes: Option<String>,
    pub recurring_cost: Money,
    pub recurring_period: RecurringPeriod,
    pub recurring_description: Option<String>,
    pub sent_at: String,
}

/// A quotation together with the contact details of the request it prices.
///
/// Staff use this in the quotation overview, where the request itself is
/// not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub client_name: String,
    pub client_email: String,
    pub project_type: ProjectType,
}
