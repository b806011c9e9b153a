// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Support tickets, their clients, and ticket messages.

use crate::error::{DomainError, FieldViolation, Violations};
use crate::lifecycle::{EntityKind, StatusMachine, TransitionTrigger};
use crate::validation::{normalize_email, optional_text, required_text, validate_name};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

closed_enum! {
    /// Lifecycle status of a support ticket.
    pub enum TicketStatus: "status" {
        Open => "open",
        InProgress => "in_progress",
        /// Staff are waiting on the client; a client reply resumes work.
        WaitingClient => "waiting_client",
        Resolved => "resolved",
        /// Closed to client interaction. Only an admin edit can reopen it.
        Closed => "closed",
    }
}

impl StatusMachine for TicketStatus {
    const ENTITY: EntityKind = EntityKind::SupportTicket;

    fn initial() -> Self {
        Self::Open
    }

    fn as_str(&self) -> &'static str {
        Self::as_str(self)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    fn permits(&self, target: Self, trigger: TransitionTrigger) -> bool {
        match trigger {
            TransitionTrigger::AdminEdit => true,
            TransitionTrigger::ClientReply => {
                !self.is_terminal()
                    && (*self == target
                        || (*self == Self::WaitingClient && target == Self::InProgress))
            }
            TransitionTrigger::AdminResponse => {
                *self == target || (*self == Self::Open && target == Self::InProgress)
            }
            TransitionTrigger::QuotationIssued
            | TransitionTrigger::AssessmentAssigned
            | TransitionTrigger::InterviewScheduled => false,
        }
    }
}

impl TicketStatus {
    /// The status a client reply leaves the ticket in.
    #[must_use]
    pub const fn after_client_reply(self) -> Self {
        match self {
            Self::WaitingClient => Self::InProgress,
            other => other,
        }
    }

    /// The status an admin response leaves the ticket in.
    #[must_use]
    pub const fn after_admin_response(self) -> Self {
        match self {
            Self::Open => Self::InProgress,
            other => other,
        }
    }
}

closed_enum! {
    /// Ticket urgency, adjustable by staff.
    #[derive(Default)]
    pub enum TicketPriority: "priority" {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

closed_enum! {
    /// What a ticket is about.
    pub enum TicketCategory: "category" {
        Bug => "bug",
        FeatureRequest => "feature_request",
        TechnicalIssue => "technical_issue",
        Billing => "billing",
        General => "general",
    }
}

closed_enum! {
    /// A support client's service tier.
    #[derive(Default)]
    pub enum PlanType: "plan_type" {
        #[default]
        Basic => "basic",
        Standard => "standard",
        Premium => "premium",
    }
}

impl PlanType {
    /// The target first-response time for tickets raised on this plan.
    #[must_use]
    pub const fn sla_hours(&self) -> u32 {
        match self {
            Self::Basic => 48,
            Self::Standard => 24,
            Self::Premium => 4,
        }
    }
}

closed_enum! {
    /// Who authored a ticket message.
    pub enum SenderType: "sender_type" {
        Client => "client",
        Admin => "admin",
    }
}

/// Human-readable ticket identifier, `ST-` followed by a zero-padded
/// sequence number of at least five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketNumber(u32);

impl TicketNumber {
    const PREFIX: &'static str = "ST-";

    /// Creates the ticket number for a sequence value.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` is zero.
    pub fn from_sequence(sequence: u32) -> Result<Self, DomainError> {
        if sequence == 0 {
            return Err(DomainError::InvalidTicketNumber(String::from("0")));
        }
        Ok(Self(sequence))
    }

    /// Parses a ticket number such as `ST-00042`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTicketNumber` if the value is malformed.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidTicketNumber(value.to_string());
        let digits: &str = value.trim().strip_prefix(Self::PREFIX).ok_or_else(invalid)?;
        if digits.len() < 5 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence: u32 = digits.parse().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }
        Ok(Self(sequence))
    }

    /// Returns the underlying sequence value.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:05}", Self::PREFIX, self.0)
    }
}

impl Serialize for TicketNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TicketNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// An unvalidated ticket submission from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketDraft {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub subject: String,
    pub description: String,
    pub category: String,
}

/// A validated ticket submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub subject: String,
    pub description: String,
    pub category: TicketCategory,
}

impl TicketDraft {
    /// Validates every field of the submission.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<NewTicket, DomainError> {
        let full_name = validate_name("full_name", &self.full_name);
        let email = normalize_email("email", &self.email);
        let phone = optional_text("phone", "Phone", self.phone.as_deref(), 50);
        let company_name =
            optional_text("company_name", "Company name", self.company_name.as_deref(), 255);
        let subject = required_text("subject", "Subject", &self.subject, 1, 255);
        let description = required_text("description", "Description", &self.description, 1, 10_000);
        let category = TicketCategory::parse_field("category", &self.category);

        let mut violations: Violations = Violations::new();
        violations.note(&full_name);
        violations.note(&email);
        violations.note(&phone);
        violations.note(&company_name);
        violations.note(&subject);
        violations.note(&description);
        violations.note(&category);
        violations.finish()?;

        Ok(NewTicket {
            full_name: full_name?,
            email: email?,
            phone: phone?,
            company_name: company_name?,
            subject: subject?,
            description: description?,
            category: category?,
        })
    }
}

/// An unvalidated client reply on a ticket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientReplyDraft {
    pub email: String,
    pub message: String,
    pub sender_name: Option<String>,
}

/// A validated client reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReply {
    pub email: String,
    pub message: String,
    pub sender_name: Option<String>,
}

impl ClientReplyDraft {
    /// Validates the reply.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every rejected field.
    pub fn validate(&self) -> Result<ClientReply, DomainError> {
        let email = normalize_email("email", &self.email);
        let message = required_text("message", "Message", &self.message, 1, 10_000);
        let sender_name =
            optional_text("sender_name", "Sender name", self.sender_name.as_deref(), 255);

        let mut violations: Violations = Violations::new();
        violations.note(&email);
        violations.note(&message);
        violations.note(&sender_name);
        violations.finish()?;

        Ok(ClientReply {
            email: email?,
            message: message?,
            sender_name: sender_name?,
        })
    }
}

/// An unvalidated admin response on a ticket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminResponseDraft {
    pub message: String,
    pub is_internal_note: bool,
}

/// A validated admin response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminResponse {
    pub message: String,
    pub is_internal_note: bool,
}

impl AdminResponseDraft {
    /// Validates the response.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the message is blank or too long.
    pub fn validate(&self) -> Result<AdminResponse, DomainError> {
        let message: String = required_text("message", "Message", &self.message, 1, 10_000)?;
        Ok(AdminResponse {
            message,
            is_internal_note: self.is_internal_note,
        })
    }
}

/// An unvalidated partial ticket update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TicketPatchDraft {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<i64>,
    pub resolution_notes: Option<String>,
}

/// A validated partial ticket update. At least one field is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketPatch {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_to: Option<i64>,
    pub resolution_notes: Option<String>,
}

impl TicketPatchDraft {
    /// Validates the patch.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a field is invalid or no field
    /// is present.
    pub fn validate(&self) -> Result<TicketPatch, DomainError> {
        let status = self
            .status
            .as_deref()
            .map(|raw| TicketStatus::parse_field("status", raw))
            .transpose();
        let priority = self
            .priority
            .as_deref()
            .map(|raw| TicketPriority::parse_field("priority", raw))
            .transpose();
        let assigned_to = match self.assigned_to {
            Some(id) if id < 1 => Err(FieldViolation::new(
                "assigned_to",
                "Assignee must be an admin id",
            )),
            other => Ok(other),
        };
        let resolution_notes = optional_text(
            "resolution_notes",
            "Resolution notes",
            self.resolution_notes.as_deref(),
            5000,
        );

        let mut violations: Violations = Violations::new();
        violations.note(&status);
        violations.note(&priority);
        violations.note(&assigned_to);
        violations.note(&resolution_notes);
        violations.finish()?;

        let patch: TicketPatch = TicketPatch {
            status: status?,
            priority: priority?,
            assigned_to: assigned_to?,
            resolution_notes: resolution_notes?,
        };
        if patch == TicketPatch::default() {
            return Err(DomainError::field("patch", "No fields to update"));
        }
        Ok(patch)
    }
}

/// A support client, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportClient {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub plan_type: PlanType,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored support ticket.
///
/// `client_plan` and `response_sla_hours` are snapshotted at creation and
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportTicket {
    pub id: i64,
    pub ticket_number: TicketNumber,
    pub client_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub subject: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub client_plan: PlanType,
    pub response_sla_hours: u32,
    pub assigned_to: Option<i64>,
    pub assigned_at: Option<String>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<i64>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An append-only message on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketMessage {
    pub id: i64,
    pub ticket_id: i64,
    pub sender_type: SenderType,
    pub sender_id: Option<i64>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub message: String,
    pub is_internal_note: bool,
    pub created_at: String,
}

/// Aggregate ticket counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TicketStats {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub in_progress_tickets: i64,
    pub waiting_client_tickets: i64,
    pub resolved_tickets: i64,
    pub closed_tickets: i64,
    pub urgent_tickets: i64,
    pub high_priority_tickets: i64,
    pub premium_clients: i64,
    pub tickets_last_7_days: i64,
}
