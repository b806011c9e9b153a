// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared status-machine vocabulary.
//!
//! Project requests, support tickets and talent applications all follow the
//! same pattern: an entity is created in a fixed initial status and then
//! moved by a small set of triggers. Each entity kind supplies its own
//! transition table through [`StatusMachine::permits`]; everything else
//! (error reporting, terminal checks) is shared.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// The kinds of entity governed by a status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ProjectRequest,
    SupportTicket,
    TalentApplication,
}

impl EntityKind {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectRequest => "project_request",
            Self::SupportTicket => "support_ticket",
            Self::TalentApplication => "talent_application",
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_request" => Ok(Self::ProjectRequest),
            "support_ticket" => Ok(Self::SupportTicket),
            "talent_application" => Ok(Self::TalentApplication),
            _ => Err(DomainError::InvalidValue {
                field: "entity_kind",
                value: s.to_string(),
            }),
        }
    }
}

/// What caused a status change.
///
/// Triggers are fixed at compile time. A status machine decides which
/// `(from, to)` pairs each trigger may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionTrigger {
    /// An authenticated admin edited the status directly.
    AdminEdit,
    /// A quotation row was created for a project request.
    QuotationIssued,
    /// A client replied to their own ticket.
    ClientReply,
    /// An admin posted a response (or internal note) on a ticket.
    AdminResponse,
    /// An admin assigned an assessment task to an applicant.
    AssessmentAssigned,
    /// An admin scheduled an interview with an applicant.
    InterviewScheduled,
}

impl TransitionTrigger {
    /// Returns the string representation used in activity details.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminEdit => "admin_edit",
            Self::QuotationIssued => "quotation_issued",
            Self::ClientReply => "client_reply",
            Self::AdminResponse => "admin_response",
            Self::AssessmentAssigned => "assessment_assigned",
            Self::InterviewScheduled => "interview_scheduled",
        }
    }
}

/// A closed set of statuses with a fixed transition table.
pub trait StatusMachine: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// The entity kind this machine governs.
    const ENTITY: EntityKind;

    /// The status every newly created entity starts in.
    fn initial() -> Self;

    /// Returns the string representation used for persistence and the API.
    fn as_str(&self) -> &'static str;

    /// Returns true if no further client-facing progress is expected.
    fn is_terminal(&self) -> bool;

    /// Returns true if `trigger` may move an entity from `self` to `target`.
    fn permits(&self, target: Self, trigger: TransitionTrigger) -> bool;

    /// Validates a transition against the table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the table refuses it.
    fn validate_transition(
        &self,
        target: Self,
        trigger: TransitionTrigger,
    ) -> Result<(), DomainError> {
        if self.permits(target, trigger) {
            return Ok(());
        }
        Err(DomainError::InvalidStatusTransition {
            entity: Self::ENTITY,
            from: self.as_str().to_string(),
            to: target.as_str().to_string(),
            reason: format!("not permitted by {} trigger", trigger.as_str()),
        })
    }
}
