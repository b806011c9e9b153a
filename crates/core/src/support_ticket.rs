// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::transition::{Transition, creation_event};
use planmorph_audit::{ActivityEvent, Actor};
use planmorph_domain::{
    AdminResponse, ClientReply, NewTicket, PlanType, StatusMachine, SupportTicket, TicketPatch,
    TicketPriority, TicketStatus, TransitionTrigger, format_timestamp,
};
use planmorph_notify::{DeliveryPolicy, Notification, PendingDelivery, Recipient, Template};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Fields computed once when a ticket is created and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketDerivation {
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// The client's plan at submission time.
    pub plan: PlanType,
    /// Response target for `plan`, snapshotted onto the ticket.
    pub sla_hours: u32,
}

/// Computes the derived fields for a new ticket from the client's current
/// plan.
#[must_use]
pub fn derive_ticket_fields(plan: PlanType) -> TicketDerivation {
    TicketDerivation {
        status: TicketStatus::initial(),
        priority: TicketPriority::default(),
        plan,
        sla_hours: plan.sla_hours(),
    }
}

/// Builds the activity entry for a submitted ticket.
#[must_use]
pub fn ticket_submission_event(ticket: &NewTicket, derived: &TicketDerivation) -> ActivityEvent {
    let mut details: Map<String, Value> = Map::new();
    details.insert(String::from("category"), Value::from(ticket.category.as_str()));
    details.insert(String::from("plan"), Value::from(derived.plan.as_str()));
    details.insert(String::from("sla_hours"), Value::from(derived.sla_hours));
    creation_event::<TicketStatus>(Actor::client(Some(ticket.full_name.clone())), details)
}

/// The notifications for a stored ticket: a confirmation to the client and
/// an alert to staff.
///
/// Both are sent in the background. A failed email never turns a stored
/// ticket into a failed submission.
#[must_use]
pub fn ticket_submission_delivery(ticket: &SupportTicket) -> PendingDelivery {
    PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![
            Notification::new(
                Recipient::person(&ticket.client_email, Some(&ticket.client_name)),
                Template::TicketCreated {
                    ticket_number: ticket.ticket_number,
                    subject: ticket.subject.clone(),
                    category: ticket.category,
                    sla_hours: ticket.response_sla_hours,
                },
            ),
            Notification::to_staff(Template::NewTicketAlert {
                ticket_number: ticket.ticket_number,
                client_name: ticket.client_name.clone(),
                client_email: ticket.client_email.clone(),
                subject: ticket.subject.clone(),
                description: ticket.description.clone(),
                category: ticket.category,
                priority: ticket.priority,
                plan: ticket.client_plan,
            }),
        ],
    )
}

/// Plans a client reply on their own ticket.
///
/// The ticket number and email pair is the client's only credential. A
/// reply to a ticket waiting on the client hands it back to staff.
///
/// # Errors
///
/// Returns `CoreError::ClientMismatch` if the email does not own the
/// ticket, or a domain violation if the ticket is closed.
pub fn plan_client_reply(
    ticket: &SupportTicket,
    reply: &ClientReply,
) -> Result<Transition<TicketStatus>, CoreError> {
    if !ticket.client_email.eq_ignore_ascii_case(&reply.email) {
        return Err(CoreError::ClientMismatch);
    }

    let sender: String = reply
        .sender_name
        .clone()
        .unwrap_or_else(|| ticket.client_name.clone());
    let transition: Transition<TicketStatus> = Transition::plan(
        ticket.status,
        ticket.status.after_client_reply(),
        TransitionTrigger::ClientReply,
        Actor::client(Some(sender.clone())),
    )?;

    Ok(transition
        .as_message()
        .with_detail("sender_type", "client")
        .with_delivery(PendingDelivery::new(
            DeliveryPolicy::FireAndForget,
            vec![Notification::to_staff(Template::TicketActivityAlert {
                ticket_number: ticket.ticket_number,
                client_name: Some(sender),
                action: String::from("New client reply"),
            })],
        )))
}

/// Plans an admin response or internal note on a ticket.
///
/// The first response moves an open ticket to in progress. Internal notes
/// are never sent to the client.
///
/// # Errors
///
/// Returns an error if the table refuses the implied status change.
pub fn plan_admin_response(
    ticket: &SupportTicket,
    response: &AdminResponse,
    actor: Actor,
) -> Result<Transition<TicketStatus>, CoreError> {
    let transition: Transition<TicketStatus> = Transition::plan(
        ticket.status,
        ticket.status.after_admin_response(),
        TransitionTrigger::AdminResponse,
        actor,
    )?
    .as_message()
    .with_detail("sender_type", "admin")
    .with_detail("is_internal_note", response.is_internal_note);

    if response.is_internal_note {
        return Ok(transition);
    }

    Ok(transition.with_delivery(PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![Notification::new(
            Recipient::person(&ticket.client_email, Some(&ticket.client_name)),
            Template::TicketResponse {
                ticket_number: ticket.ticket_number,
                message: response.message.clone(),
            },
        )],
    )))
}

/// Re-derives a planned message transition from the ticket's stored status.
///
/// A message is never dropped because an admin changed the status after
/// the message was planned. A client reply still cannot land on a closed
/// ticket.
///
/// # Errors
///
/// Returns a domain violation if the stored status refuses the message.
pub fn rebase_ticket_message(
    transition: &Transition<TicketStatus>,
    current: TicketStatus,
) -> Result<Transition<TicketStatus>, CoreError> {
    if transition.from == current {
        return Ok(transition.clone());
    }
    let to: TicketStatus = match transition.trigger {
        TransitionTrigger::ClientReply => current.after_client_reply(),
        TransitionTrigger::AdminResponse => current.after_admin_response(),
        _ => transition.to,
    };
    transition.clone().rebase(current, to)
}

/// The column writes an admin ticket update produces.
///
/// `None` leaves a column untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketUpdate {
    pub transition: Transition<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_to: Option<i64>,
    pub assigned_at: Option<String>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<i64>,
    pub closed_at: Option<String>,
}

/// Plans a partial admin update of a ticket.
///
/// Entering `resolved` stamps `resolved_at` and `resolved_by`; entering
/// `closed` stamps `closed_at`; a new assignee stamps `assigned_at`. A
/// status change notifies the client with the new status and any
/// resolution notes.
///
/// # Arguments
///
/// * `ticket` - The ticket as currently stored
/// * `patch` - The validated patch
/// * `admin_id` - The acting admin
/// * `admin_name` - The acting admin's email, for the activity log
/// * `now` - The time of the update
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn plan_ticket_update(
    ticket: &SupportTicket,
    patch: &TicketPatch,
    admin_id: i64,
    admin_name: &str,
    now: OffsetDateTime,
) -> Result<TicketUpdate, CoreError> {
    let target: TicketStatus = patch.status.unwrap_or(ticket.status);
    let mut transition: Transition<TicketStatus> = Transition::plan(
        ticket.status,
        target,
        TransitionTrigger::AdminEdit,
        Actor::admin(admin_id, admin_name.to_string()),
    )?;
    let stamp: String = format_timestamp(now)?;

    let mut changes: Map<String, Value> = Map::new();
    if let Some(status) = patch.status {
        changes.insert(String::from("status"), Value::from(status.as_str()));
    }
    if let Some(priority) = patch.priority {
        changes.insert(String::from("priority"), Value::from(priority.as_str()));
    }
    if let Some(assignee) = patch.assigned_to {
        changes.insert(String::from("assigned_to"), Value::from(assignee));
    }
    if let Some(notes) = &patch.resolution_notes {
        changes.insert(String::from("resolution_notes"), Value::from(notes.as_str()));
    }
    transition = transition.with_detail("changes", Value::Object(changes));

    let entering = |status: TicketStatus| transition.changes_status() && target == status;
    let resolving: bool = entering(TicketStatus::Resolved);
    let closing: bool = entering(TicketStatus::Closed);
    let reassigned: bool = patch
        .assigned_to
        .is_some_and(|assignee| ticket.assigned_to != Some(assignee));

    if transition.changes_status() {
        let notes: Option<String> = patch
            .resolution_notes
            .clone()
            .or_else(|| ticket.resolution_notes.clone());
        transition = transition.with_delivery(PendingDelivery::new(
            DeliveryPolicy::FireAndForget,
            vec![Notification::new(
                Recipient::person(&ticket.client_email, Some(&ticket.client_name)),
                Template::TicketStatusUpdated {
                    ticket_number: ticket.ticket_number,
                    status: target,
                    resolution_notes: notes,
                },
            )],
        ));
    }

    Ok(TicketUpdate {
        transition,
        priority: patch.priority,
        assigned_to: patch.assigned_to,
        assigned_at: reassigned.then(|| stamp.clone()),
        resolution_notes: patch.resolution_notes.clone(),
        resolved_at: resolving.then(|| stamp.clone()),
        resolved_by: resolving.then_some(admin_id),
        closed_at: closing.then_some(stamp),
    })
}
