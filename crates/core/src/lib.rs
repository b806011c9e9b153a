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

//! The lifecycle engine.
//!
//! Every function here is pure: it takes the current record and a validated
//! input, checks the move against the entity's transition table, and
//! returns what to write (next status, derived fields, activity entry) and
//! what to send once the write has committed. Nothing here touches the
//! database or the network.

mod error;
mod project_request;
mod support_ticket;
mod talent;
mod transition;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use project_request::{
    QUOTATION_EMAIL_TIMEOUT, plan_quotation, plan_request_status, quotation_deletion_event,
    request_submission_delivery, request_submission_event,
};
pub use support_ticket::{
    TicketDerivation, TicketUpdate, derive_ticket_fields, plan_admin_response, plan_client_reply,
    plan_ticket_update, rebase_ticket_message, ticket_submission_delivery, ticket_submission_event,
};
pub use talent::{
    AssessmentPlan, InterviewPlan, application_delivery, application_event,
    plan_application_status, plan_assessment, plan_interview,
};
pub use transition::{Transition, creation_event};
