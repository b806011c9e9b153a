// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Support ticket, message, and client queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph_domain::{
    PlanType, SupportClient, SupportTicket, TicketMessage, TicketNumber, TicketPriority,
    TicketStats, TicketStatus,
};
use tracing::debug;

use crate::data_models::{SupportClientRow, SupportTicketRow, TicketMessageRow};
use crate::diesel_schema::{support_clients, support_tickets, ticket_messages};
use crate::error::PersistenceError;

/// Retrieves a ticket by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Option<SupportTicket>, PersistenceError> {
    support_tickets::table
        .find(ticket_id)
        .select(SupportTicketRow::as_select())
        .first(conn)
        .optional()?
        .map(SupportTicket::try_from)
        .transpose()
}

/// Retrieves a ticket by its human-readable number.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_ticket_by_number(
    conn: &mut SqliteConnection,
    ticket_number: TicketNumber,
) -> Result<Option<SupportTicket>, PersistenceError> {
    debug!(%ticket_number, "Loading ticket by number");

    support_tickets::table
        .filter(support_tickets::ticket_number.eq(ticket_number.to_string()))
        .select(SupportTicketRow::as_select())
        .first(conn)
        .optional()?
        .map(SupportTicket::try_from)
        .transpose()
}

/// Lists tickets newest first, optionally filtered by status and priority.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_tickets(
    conn: &mut SqliteConnection,
    status: Option<TicketStatus>,
    priority: Option<TicketPriority>,
) -> Result<Vec<SupportTicket>, PersistenceError> {
    let mut query = support_tickets::table
        .select(SupportTicketRow::as_select())
        .order((support_tickets::created_at.desc(), support_tickets::id.desc()))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(support_tickets::status.eq(status.as_str()));
    }
    if let Some(priority) = priority {
        query = query.filter(support_tickets::priority.eq(priority.as_str()));
    }

    let rows: Vec<SupportTicketRow> = query.load(conn)?;
    rows.into_iter().map(SupportTicket::try_from).collect()
}

/// Lists a ticket's messages oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ticket_id` - The ticket
/// * `include_internal` - Whether to include internal notes; never true for
///   client-facing reads
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_ticket_messages(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    include_internal: bool,
) -> Result<Vec<TicketMessage>, PersistenceError> {
    let mut query = ticket_messages::table
        .filter(ticket_messages::ticket_id.eq(ticket_id))
        .select(TicketMessageRow::as_select())
        .order((ticket_messages::created_at.asc(), ticket_messages::id.asc()))
        .into_boxed();
    if !include_internal {
        query = query.filter(ticket_messages::is_internal_note.eq(0));
    }

    let rows: Vec<TicketMessageRow> = query.load(conn)?;
    rows.into_iter().map(TicketMessage::try_from).collect()
}

/// Retrieves a support client by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_support_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<SupportClient>, PersistenceError> {
    support_clients::table
        .find(client_id)
        .select(SupportClientRow::as_select())
        .first(conn)
        .optional()?
        .map(SupportClient::try_from)
        .transpose()
}

/// Retrieves a support client by normalized email.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_support_client_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<SupportClient>, PersistenceError> {
    support_clients::table
        .filter(support_clients::email.eq(email))
        .select(SupportClientRow::as_select())
        .first(conn)
        .optional()?
        .map(SupportClient::try_from)
        .transpose()
}

fn count_status(conn: &mut SqliteConnection, status: TicketStatus) -> QueryResult<i64> {
    support_tickets::table
        .filter(support_tickets::status.eq(status.as_str()))
        .count()
        .get_result(conn)
}

fn count_priority(conn: &mut SqliteConnection, priority: TicketPriority) -> QueryResult<i64> {
    support_tickets::table
        .filter(support_tickets::priority.eq(priority.as_str()))
        .count()
        .get_result(conn)
}

/// Aggregates ticket counts for the admin dashboard.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `recent_cutoff` - RFC 3339 timestamp; tickets created at or after it
///   count as recent
///
/// # Errors
///
/// Returns an error if any count query fails.
pub fn ticket_stats(
    conn: &mut SqliteConnection,
    recent_cutoff: &str,
) -> Result<TicketStats, PersistenceError> {
    Ok(TicketStats {
        total_tickets: support_tickets::table.count().get_result(conn)?,
        open_tickets: count_status(conn, TicketStatus::Open)?,
        in_progress_tickets: count_status(conn, TicketStatus::InProgress)?,
        waiting_client_tickets: count_status(conn, TicketStatus::WaitingClient)?,
        resolved_tickets: count_status(conn, TicketStatus::Resolved)?,
        closed_tickets: count_status(conn, TicketStatus::Closed)?,
        urgent_tickets: count_priority(conn, TicketPriority::Urgent)?,
        high_priority_tickets: count_priority(conn, TicketPriority::High)?,
        premium_clients: support_clients::table
            .filter(support_clients::plan_type.eq(PlanType::Premium.as_str()))
            .count()
            .get_result(conn)?,
        tickets_last_7_days: support_tickets::table
            .filter(support_tickets::created_at.ge(recent_cutoff))
            .count()
            .get_result(conn)?,
    })
}
