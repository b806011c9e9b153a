// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

#[macro_use]
mod macros;

mod error;
mod lifecycle;
mod money;
mod project_request;
mod quotation;
mod support_ticket;
mod talent;
mod timestamp;
mod validation;

#[cfg(test)]
mod tests;

pub use error::{DomainError, FieldViolation, Violations};
pub use lifecycle::{EntityKind, StatusMachine, TransitionTrigger};
pub use money::Money;
pub use project_request::{
    BudgetRange, NewProjectRequest, ProjectRequest, ProjectRequestDraft, ProjectType,
    RequestStatus,
};
pub use quotation::{
    CostBreakdown, MAX_BREAKDOWN_ITEMS, NewQuotation, Quotation, QuotationDetail, QuotationDraft,
    RecurringPeriod,
};
pub use support_ticket::{
    AdminResponse, AdminResponseDraft, ClientReply, ClientReplyDraft, NewTicket, PlanType,
    SenderType, SupportClient, SupportTicket, TicketCategory, TicketDraft, TicketMessage,
    TicketNumber, TicketPatch, TicketPatchDraft, TicketPriority, TicketStats, TicketStatus,
};
pub use talent::{
    ApplicationDraft, ApplicationStatus, AssessmentDraft, Availability, DEFAULT_ASSESSMENT_DAYS,
    DEFAULT_INTERVIEW_MINUTES, ExperienceLevel, InterviewDraft, InterviewType,
    MAX_NOTABLE_PROJECTS, NewApplication, NewAssessment, NewInterview, NotableProject,
    StatusUpdate, StatusUpdateDraft, TalentApplication, TalentAssessment, TalentInterview,
    TalentRole, needs_assessment,
};
pub use timestamp::{days_after, format_timestamp, parse_timestamp};
pub use validation::{
    MAX_EMAIL_LENGTH, label_list, normalize_email, optional_text, optional_url, required_text,
    validate_name, validate_phone,
};
