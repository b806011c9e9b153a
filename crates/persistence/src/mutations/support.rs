// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Support ticket mutations.
//!
//! Ticket numbers come from the `ticket_counters` row, bumped inside the
//! ticket transaction. The counter only ever grows, so numbers are never
//! reused; the UNIQUE constraint on `ticket_number` is the backstop, and a
//! collision retries the whole transaction.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph::{
    CoreError, TicketDerivation, TicketUpdate, Transition, derive_ticket_fields,
    rebase_ticket_message, ticket_submission_event,
};
use planmorph_domain::{
    NewTicket, PlanType, SupportClient, SupportTicket, TicketMessage, TicketNumber, TicketStatus,
};
use tracing::{info, warn};

use crate::data_models::{NewTicketMessage, SupportClientRow, SupportTicketRow, TicketMessageRow};
use crate::diesel_schema::{support_clients, support_tickets, ticket_counters, ticket_messages};
use crate::error::PersistenceError;
use crate::mutations::activity::insert_activity;

/// How many times a ticket submission is retried on a number collision.
pub const TICKET_NUMBER_ATTEMPTS: u32 = 3;

const TICKET_COUNTER: &str = "support_ticket";

fn load_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<SupportTicket, PersistenceError> {
    support_tickets::table
        .find(ticket_id)
        .select(SupportTicketRow::as_select())
        .first(conn)?
        .try_into()
}

fn next_ticket_number(conn: &mut SqliteConnection) -> Result<TicketNumber, PersistenceError> {
    let value: i64 = diesel::update(ticket_counters::table.find(TICKET_COUNTER))
        .set(ticket_counters::last_value.eq(ticket_counters::last_value + 1))
        .returning(ticket_counters::last_value)
        .get_result(conn)?;
    let sequence: u32 = u32::try_from(value)
        .map_err(|_| PersistenceError::InvalidStoredValue(format!("ticket counter: {value}")))?;
    Ok(TicketNumber::from_sequence(sequence)?)
}

/// Finds the client by email, creating a `basic` client on first contact.
fn upsert_client(
    conn: &mut SqliteConnection,
    ticket: &NewTicket,
    now: &str,
) -> Result<SupportClient, PersistenceError> {
    diesel::insert_into(support_clients::table)
        .values((
            support_clients::full_name.eq(&ticket.full_name),
            support_clients::email.eq(&ticket.email),
            support_clients::phone.eq(ticket.phone.as_deref()),
            support_clients::company_name.eq(ticket.company_name.as_deref()),
            support_clients::plan_type.eq(PlanType::default().as_str()),
            support_clients::created_at.eq(now),
            support_clients::updated_at.eq(now),
        ))
        .on_conflict(support_clients::email)
        .do_nothing()
        .execute(conn)?;

    support_clients::table
        .filter(support_clients::email.eq(&ticket.email))
        .select(SupportClientRow::as_select())
        .first(conn)?
        .try_into()
}

fn submit_ticket_once(
    conn: &mut SqliteConnection,
    ticket: &NewTicket,
    now: &str,
) -> Result<SupportTicket, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let client: SupportClient = upsert_client(conn, ticket, now)?;
        let derived: TicketDerivation = derive_ticket_fields(client.plan_type);
        let number: TicketNumber = next_ticket_number(conn)?;
        let sla_hours: i32 = i32::try_from(derived.sla_hours).map_err(|_| {
            PersistenceError::InvalidStoredValue(format!("sla hours: {}", derived.sla_hours))
        })?;

        let ticket_id: i64 = diesel::insert_into(support_tickets::table)
            .values((
                support_tickets::ticket_number.eq(number.to_string()),
                support_tickets::client_id.eq(client.id),
                support_tickets::client_name.eq(&ticket.full_name),
                support_tickets::client_email.eq(&ticket.email),
                support_tickets::client_phone.eq(ticket.phone.as_deref()),
                support_tickets::subject.eq(&ticket.subject),
                support_tickets::description.eq(&ticket.description),
                support_tickets::category.eq(ticket.category.as_str()),
                support_tickets::priority.eq(derived.priority.as_str()),
                support_tickets::status.eq(derived.status.as_str()),
                support_tickets::client_plan.eq(derived.plan.as_str()),
                support_tickets::response_sla_hours.eq(sla_hours),
                support_tickets::created_at.eq(now),
                support_tickets::updated_at.eq(now),
            ))
            .returning(support_tickets::id)
            .get_result(conn)?;

        insert_activity(conn, &ticket_submission_event(ticket, &derived), ticket_id, now)?;
        info!(
            ticket_id,
            %number,
            plan = derived.plan.as_str(),
            sla_hours = derived.sla_hours,
            "Support ticket stored"
        );
        load_ticket(conn, ticket_id)
    })
}

/// Stores a ticket, creating its client on first contact.
///
/// The client's current plan is snapshotted onto the ticket together with
/// its response SLA; later plan changes never touch existing tickets.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ticket` - The validated submission
/// * `now` - The creation timestamp
///
/// # Errors
///
/// Returns `TicketNumberUnavailable` if every attempt collided, or a
/// database error.
pub fn submit_ticket(
    conn: &mut SqliteConnection,
    ticket: &NewTicket,
    now: &str,
) -> Result<SupportTicket, PersistenceError> {
    for attempt in 1..=TICKET_NUMBER_ATTEMPTS {
        match submit_ticket_once(conn, ticket, now) {
            Err(PersistenceError::UniqueViolation(message)) if message.contains("ticket_number") => {
                warn!(attempt, "Ticket number collision; retrying");
            }
            result => return result,
        }
    }
    Err(PersistenceError::TicketNumberUnavailable {
        attempts: TICKET_NUMBER_ATTEMPTS,
    })
}

fn current_status(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<TicketStatus, PersistenceError> {
    let status: String = support_tickets::table
        .find(ticket_id)
        .select(support_tickets::status)
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("support ticket {ticket_id}")))?;
    Ok(status.parse::<TicketStatus>()?)
}

/// Appends a message to a ticket and applies the status change it implies.
///
/// The transition is re-derived from the status stored when the write
/// lock is taken, so a message planned before a concurrent admin edit is
/// still stored.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ticket_id` - The ticket
/// * `message` - The message to store
/// * `transition` - The planned ticket transition
/// * `now` - The message timestamp
///
/// # Errors
///
/// Returns `TransitionRefused` if the stored status no longer accepts the
/// message (a client reply to a ticket closed in the meantime), `NotFound`
/// if the ticket is gone, or a database error.
pub fn add_ticket_message(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    message: &NewTicketMessage,
    transition: &Transition<TicketStatus>,
    now: &str,
) -> Result<TicketMessage, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let current: TicketStatus = current_status(conn, ticket_id)?;
        let applied: Transition<TicketStatus> = rebase_ticket_message(transition, current)
            .map_err(|err| match err {
                CoreError::DomainViolation(domain_err) => {
                    PersistenceError::TransitionRefused(domain_err)
                }
                CoreError::ClientMismatch => {
                    PersistenceError::NotFound(format!("support ticket {ticket_id}"))
                }
            })?;
        if applied.from != transition.from {
            warn!(
                ticket_id,
                planned = transition.from.as_str(),
                stored = current.as_str(),
                "Ticket status moved before the message was stored"
            );
        }

        diesel::update(support_tickets::table.find(ticket_id))
            .set((
                support_tickets::status.eq(applied.to.as_str()),
                support_tickets::updated_at.eq(now),
            ))
            .execute(conn)?;

        let row: TicketMessageRow = diesel::insert_into(ticket_messages::table)
            .values((
                ticket_messages::ticket_id.eq(ticket_id),
                ticket_messages::sender_type.eq(message.sender_type.as_str()),
                ticket_messages::sender_id.eq(message.sender_id),
                ticket_messages::sender_name.eq(message.sender_name.as_deref()),
                ticket_messages::sender_email.eq(message.sender_email.as_deref()),
                ticket_messages::message.eq(&message.message),
                ticket_messages::is_internal_note.eq(i32::from(message.is_internal_note)),
                ticket_messages::created_at.eq(now),
            ))
            .returning(TicketMessageRow::as_returning())
            .get_result(conn)?;

        insert_activity(conn, &applied.activity, ticket_id, now)?;
        info!(
            ticket_id,
            sender = message.sender_type.as_str(),
            internal = message.is_internal_note,
            from = applied.from.as_str(),
            to = applied.to.as_str(),
            "Ticket message stored"
        );
        TicketMessage::try_from(row)
    })
}

/// Column writes for an admin ticket update. `None` leaves a column alone.
#[derive(AsChangeset)]
#[diesel(table_name = support_tickets)]
struct TicketChangeset<'a> {
    status: &'a str,
    priority: Option<&'a str>,
    assigned_to: Option<i64>,
    assigned_at: Option<&'a str>,
    resolution_notes: Option<&'a str>,
    resolved_at: Option<&'a str>,
    resolved_by: Option<i64>,
    closed_at: Option<&'a str>,
    updated_at: &'a str,
}

/// Applies a planned admin update to a ticket.
///
/// # Errors
///
/// Returns `StatusChanged` if the ticket moved since it was read, or a
/// database error.
pub fn update_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    update: &TicketUpdate,
    now: &str,
) -> Result<SupportTicket, PersistenceError> {
    let changes: TicketChangeset<'_> = TicketChangeset {
        status: update.transition.to.as_str(),
        priority: update.priority.map(|p| p.as_str()),
        assigned_to: update.assigned_to,
        assigned_at: update.assigned_at.as_deref(),
        resolution_notes: update.resolution_notes.as_deref(),
        resolved_at: update.resolved_at.as_deref(),
        resolved_by: update.resolved_by,
        closed_at: update.closed_at.as_deref(),
        updated_at: now,
    };

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(
            support_tickets::table
                .find(ticket_id)
                .filter(support_tickets::status.eq(update.transition.from.as_str())),
        )
        .set(&changes)
        .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::StatusChanged {
                expected: update.transition.from.as_str().to_string(),
            });
        }

        insert_activity(conn, &update.transition.activity, ticket_id, now)?;
        info!(
            ticket_id,
            from = update.transition.from.as_str(),
            to = update.transition.to.as_str(),
            "Ticket updated"
        );
        load_ticket(conn, ticket_id)
    })
}

/// Changes a client's plan.
///
/// Only future tickets see the new plan.
///
/// # Errors
///
/// Returns `NotFound` if there is no such client.
pub fn set_client_plan(
    conn: &mut SqliteConnection,
    client_id: i64,
    plan: PlanType,
    now: &str,
) -> Result<SupportClient, PersistenceError> {
    let row: SupportClientRow = diesel::update(support_clients::table.find(client_id))
        .set((
            support_clients::plan_type.eq(plan.as_str()),
            support_clients::updated_at.eq(now),
        ))
        .returning(SupportClientRow::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("support client {client_id}")))?;

    info!(client_id, plan = plan.as_str(), "Client plan changed");
    row.try_into()
}
