// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use planmorph_domain::{
    ApplicationStatus, CostBreakdown, InterviewType, Money, PlanType, RecurringPeriod,
    TicketCategory, TicketNumber, TicketPriority, TicketStatus,
};
use serde::Serialize;

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipient {
    /// The staff mailbox configured on the dispatcher.
    Staff,
    /// A specific person.
    Person { email: String, name: Option<String> },
}

impl Recipient {
    /// Creates a person recipient.
    #[must_use]
    pub fn person(email: &str, name: Option<&str>) -> Self {
        Self::Person {
            email: email.to_string(),
            name: name.map(str::to_string),
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Staff => write!(f, "staff"),
            Self::Person { email, .. } => write!(f, "{email}"),
        }
    }
}

/// What a client sees in their quotation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    pub client_name: String,
    pub project_type: String,
    pub requirements: String,
    pub total_cost: Money,
    pub timeline_weeks: u16,
    pub cost_breakdown: Option<CostBreakdown>,
    pub notes: Option<String>,
    pub recurring_cost: Money,
    pub recurring_period: RecurringPeriod,
    pub recurring_description: Option<String>,
}

/// The message to send, with the data it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum Template {
    /// Staff alert for a new project request.
    NewRequestAlert {
        request_id: i64,
        client_name: String,
        client_email: String,
        client_phone: String,
        company_name: Option<String>,
        project_type: String,
        budget_range: Option<String>,
        requirements: String,
    },
    /// Confirmation to the client who submitted a project request.
    RequestConfirmation {
        client_name: String,
        project_type: String,
    },
    /// The priced quotation for a project request.
    Quotation(QuoteSummary),
    /// Confirmation to a client who opened a ticket.
    TicketCreated {
        ticket_number: TicketNumber,
        subject: String,
        category: TicketCategory,
        sla_hours: u32,
    },
    /// Staff alert for a new ticket.
    NewTicketAlert {
        ticket_number: TicketNumber,
        client_name: String,
        client_email: String,
        subject: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
        plan: PlanType,
    },
    /// Staff alert for client activity on a ticket.
    TicketActivityAlert {
        ticket_number: TicketNumber,
        client_name: Option<String>,
        action: String,
    },
    /// Tells a client their ticket changed status.
    TicketStatusUpdated {
        ticket_number: TicketNumber,
        status: TicketStatus,
        resolution_notes: Option<String>,
    },
    /// Forwards a staff response to the client.
    TicketResponse {
        ticket_number: TicketNumber,
        message: String,
    },
    /// Confirms receipt of a talent application.
    ApplicationReceived {
        application_id: i64,
        needs_assessment: bool,
    },
    /// Sends an assessment task to an applicant.
    AssessmentAssigned {
        application_id: i64,
        task_title: String,
        task_description: String,
        deadline: String,
    },
    /// Sends interview details to an applicant.
    InterviewScheduled {
        interview_type: InterviewType,
        scheduled_at: String,
        duration_minutes: u16,
        meeting_link: Option<String>,
        location: Option<String>,
    },
    /// Tells an applicant their application changed status.
    ApplicationStatusChanged {
        application_id: i64,
        status: ApplicationStatus,
        notes: Option<String>,
    },
    /// A single-use password reset token.
    PasswordReset {
        reset_token: String,
        expires_in_minutes: u32,
    },
}

impl Template {
    /// A short stable name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewRequestAlert { .. } => "new_request_alert",
            Self::RequestConfirmation { .. } => "request_confirmation",
            Self::Quotation(_) => "quotation",
            Self::TicketCreated { .. } => "ticket_created",
            Self::NewTicketAlert { .. } => "new_ticket_alert",
            Self::TicketActivityAlert { .. } => "ticket_activity_alert",
            Self::TicketStatusUpdated { .. } => "ticket_status_updated",
            Self::TicketResponse { .. } => "ticket_response",
            Self::ApplicationReceived { .. } => "application_received",
            Self::AssessmentAssigned { .. } => "assessment_assigned",
            Self::InterviewScheduled { .. } => "interview_scheduled",
            Self::ApplicationStatusChanged { .. } => "application_status_changed",
            Self::PasswordReset { .. } => "password_reset",
        }
    }
}

/// A template addressed to a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: Recipient,
    pub template: Template,
}

impl Notification {
    /// Creates a new `Notification`.
    #[must_use]
    pub const fn new(recipient: Recipient, template: Template) -> Self {
        Self {
            recipient,
            template,
        }
    }

    /// Creates a notification for the staff mailbox.
    #[must_use]
    pub const fn to_staff(template: Template) -> Self {
        Self::new(Recipient::Staff, template)
    }
}
