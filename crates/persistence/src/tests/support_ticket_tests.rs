// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;
use std::sync::Arc;

use planmorph::{TicketUpdate, Transition, plan_admin_response, plan_client_reply, plan_ticket_update};
use planmorph_audit::{ActivityAction, ActivityRecord, Actor};
use planmorph_domain::{
    AdminResponse, ClientReply, EntityKind, PlanType, SenderType, SupportClient, SupportTicket,
    TicketMessage, TicketPatch, TicketPriority, TicketStats, TicketStatus,
};
use time::OffsetDateTime;

use crate::tests::helpers::{create_test_admin, create_test_new_ticket, create_test_persistence};
use crate::{NewTicketMessage, Persistence, PersistenceError};

fn submit(persistence: &Persistence, email: &str) -> SupportTicket {
    persistence
        .submit_ticket(&create_test_new_ticket(email))
        .unwrap()
}

fn move_to(persistence: &Persistence, ticket: &SupportTicket, admin: &Actor, status: TicketStatus) -> SupportTicket {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let patch: TicketPatch = TicketPatch {
        status: Some(status),
        ..TicketPatch::default()
    };
    let update: TicketUpdate = plan_ticket_update(
        ticket,
        &patch,
        admin.id.unwrap(),
        admin.name.as_deref().unwrap(),
        now,
    )
    .unwrap();
    persistence.update_ticket(ticket.id, &update, now).unwrap()
}

fn client_message(reply: &ClientReply) -> NewTicketMessage {
    NewTicketMessage {
        sender_type: SenderType::Client,
        sender_id: None,
        sender_name: reply.sender_name.clone(),
        sender_email: Some(reply.email.clone()),
        message: reply.message.clone(),
        is_internal_note: false,
    }
}

fn admin_message(admin: &Actor, response: &AdminResponse) -> NewTicketMessage {
    NewTicketMessage {
        sender_type: SenderType::Admin,
        sender_id: admin.id,
        sender_name: admin.name.clone(),
        sender_email: None,
        message: response.message.clone(),
        is_internal_note: response.is_internal_note,
    }
}

#[test]
fn test_first_ticket_creates_basic_client_and_snapshots_sla() {
    let persistence: Persistence = create_test_persistence();

    let ticket: SupportTicket = submit(&persistence, "jane@x.com");

    assert_eq!(ticket.ticket_number.to_string(), "ST-00001");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.priority, TicketPriority::Medium);
    assert_eq!(ticket.client_plan, PlanType::Basic);
    assert_eq!(ticket.response_sla_hours, 48);

    let client: SupportClient = persistence
        .get_support_client_by_email("jane@x.com")
        .unwrap()
        .unwrap();
    assert_eq!(client.id, ticket.client_id);
    assert_eq!(client.plan_type, PlanType::Basic);

    let activity: Vec<ActivityRecord> = persistence
        .list_activity(EntityKind::SupportTicket, ticket.id)
        .unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].action, ActivityAction::Created);
}

#[test]
fn test_returning_client_reuses_client_row() {
    let persistence: Persistence = create_test_persistence();

    let first: SupportTicket = submit(&persistence, "jane@x.com");
    let second: SupportTicket = submit(&persistence, "jane@x.com");

    assert_eq!(first.client_id, second.client_id);
    assert_eq!(second.ticket_number.sequence(), first.ticket_number.sequence() + 1);
}

#[test]
fn test_sla_snapshot_survives_plan_change() {
    let persistence: Persistence = create_test_persistence();
    let before: SupportTicket = submit(&persistence, "jane@x.com");

    let client: SupportClient = persistence
        .set_client_plan(before.client_id, PlanType::Premium)
        .unwrap();
    assert_eq!(client.plan_type, PlanType::Premium);

    let after: SupportTicket = submit(&persistence, "jane@x.com");
    let reloaded: SupportTicket = persistence.get_ticket(before.id).unwrap().unwrap();

    assert_eq!(reloaded.response_sla_hours, 48);
    assert_eq!(reloaded.client_plan, PlanType::Basic);
    assert_eq!(after.response_sla_hours, 4);
    assert_eq!(after.client_plan, PlanType::Premium);
}

#[test]
fn test_set_plan_for_unknown_client_is_not_found() {
    let persistence: Persistence = create_test_persistence();

    let result: Result<SupportClient, PersistenceError> =
        persistence.set_client_plan(404, PlanType::Standard);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_concurrent_submissions_get_distinct_numbers() {
    const SUBMISSIONS: usize = 12;
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "planmorph-numbering-{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    let persistence: Arc<Persistence> = Arc::new(Persistence::new_with_file(&path, 4).unwrap());

    let handles: Vec<std::thread::JoinHandle<SupportTicket>> = (0..SUBMISSIONS)
        .map(|i| {
            let persistence: Arc<Persistence> = Arc::clone(&persistence);
            std::thread::spawn(move || {
                persistence
                    .submit_ticket(&create_test_new_ticket(&format!("client{i}@x.com")))
                    .unwrap()
            })
        })
        .collect();
    let numbers: HashSet<String> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().ticket_number.to_string())
        .collect();

    assert_eq!(numbers.len(), SUBMISSIONS);
    assert_eq!(persistence.list_tickets(None, None).unwrap().len(), SUBMISSIONS);

    drop(persistence);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

#[test]
fn test_client_reply_on_waiting_ticket_moves_to_in_progress() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");
    let waiting: SupportTicket = move_to(&persistence, &ticket, &admin, TicketStatus::WaitingClient);
    let reply: ClientReply = ClientReply {
        email: String::from("jane@x.com"),
        message: String::from("Here is the screenshot."),
        sender_name: None,
    };

    let transition: Transition<TicketStatus> = plan_client_reply(&waiting, &reply).unwrap();
    persistence
        .add_ticket_message(waiting.id, &client_message(&reply), &transition)
        .unwrap();

    let reloaded: SupportTicket = persistence.get_ticket(ticket.id).unwrap().unwrap();
    assert_eq!(reloaded.status, TicketStatus::InProgress);
}

#[test]
fn test_client_reply_on_open_ticket_keeps_status() {
    let persistence: Persistence = create_test_persistence();
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");
    let reply: ClientReply = ClientReply {
        email: String::from("jane@x.com"),
        message: String::from("Any update?"),
        sender_name: Some(String::from("Jane")),
    };

    let transition: Transition<TicketStatus> = plan_client_reply(&ticket, &reply).unwrap();
    let message: TicketMessage = persistence
        .add_ticket_message(ticket.id, &client_message(&reply), &transition)
        .unwrap();

    assert_eq!(message.sender_type, SenderType::Client);
    let reloaded: SupportTicket = persistence.get_ticket(ticket.id).unwrap().unwrap();
    assert_eq!(reloaded.status, TicketStatus::Open);
}

#[test]
fn test_client_reply_survives_concurrent_admin_update() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");
    let in_progress: SupportTicket =
        move_to(&persistence, &ticket, &admin, TicketStatus::InProgress);
    let reply: ClientReply = ClientReply {
        email: String::from("jane@x.com"),
        message: String::from("Still broken on mobile."),
        sender_name: None,
    };

    // Planned against in_progress; staff ask the client for details first.
    let transition: Transition<TicketStatus> = plan_client_reply(&in_progress, &reply).unwrap();
    move_to(&persistence, &in_progress, &admin, TicketStatus::WaitingClient);

    let message: TicketMessage = persistence
        .add_ticket_message(ticket.id, &client_message(&reply), &transition)
        .unwrap();

    assert_eq!(message.message, "Still broken on mobile.");
    let reloaded: SupportTicket = persistence.get_ticket(ticket.id).unwrap().unwrap();
    assert_eq!(reloaded.status, TicketStatus::InProgress);
    let activity: Vec<ActivityRecord> = persistence
        .list_activity(EntityKind::SupportTicket, ticket.id)
        .unwrap();
    assert_eq!(activity[0].action, ActivityAction::MessageAdded);
    let details = activity[0].details.as_ref().unwrap();
    assert_eq!(details["from"], "waiting_client");
    assert_eq!(details["to"], "in_progress");
}

#[test]
fn test_client_reply_refused_when_ticket_closed_meanwhile() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");
    let reply: ClientReply = ClientReply {
        email: String::from("jane@x.com"),
        message: String::from("One more thing."),
        sender_name: None,
    };

    let transition: Transition<TicketStatus> = plan_client_reply(&ticket, &reply).unwrap();
    move_to(&persistence, &ticket, &admin, TicketStatus::Closed);

    let result: Result<TicketMessage, PersistenceError> =
        persistence.add_ticket_message(ticket.id, &client_message(&reply), &transition);

    assert!(matches!(result, Err(PersistenceError::TransitionRefused(_))));
    assert!(persistence.list_ticket_messages(ticket.id, true).unwrap().is_empty());
}

#[test]
fn test_internal_notes_hidden_from_client_view() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");

    let note: AdminResponse = AdminResponse {
        message: String::from("Probably the payment webhook."),
        is_internal_note: true,
    };
    let transition: Transition<TicketStatus> =
        plan_admin_response(&ticket, &note, admin.clone()).unwrap();
    persistence
        .add_ticket_message(ticket.id, &admin_message(&admin, &note), &transition)
        .unwrap();

    let current: SupportTicket = persistence.get_ticket(ticket.id).unwrap().unwrap();
    let response: AdminResponse = AdminResponse {
        message: String::from("We are looking into it."),
        is_internal_note: false,
    };
    let transition: Transition<TicketStatus> =
        plan_admin_response(&current, &response, admin.clone()).unwrap();
    persistence
        .add_ticket_message(ticket.id, &admin_message(&admin, &response), &transition)
        .unwrap();

    let public: Vec<TicketMessage> = persistence.list_ticket_messages(ticket.id, false).unwrap();
    let everything: Vec<TicketMessage> = persistence.list_ticket_messages(ticket.id, true).unwrap();

    assert_eq!(public.len(), 1);
    assert_eq!(public[0].message, "We are looking into it.");
    assert_eq!(everything.len(), 2);
    assert!(everything[0].is_internal_note);
}

#[test]
fn test_resolve_stamps_resolver_and_logs_update() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");

    let resolved: SupportTicket = move_to(&persistence, &ticket, &admin, TicketStatus::Resolved);

    assert_eq!(resolved.status, TicketStatus::Resolved);
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolved_by, admin.id);
    assert_eq!(resolved.closed_at, None);
    let activity: Vec<ActivityRecord> = persistence
        .list_activity(EntityKind::SupportTicket, ticket.id)
        .unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].action, ActivityAction::Updated);
    assert_eq!(activity[0].actor.id, admin.id);
}

#[test]
fn test_stale_update_is_rejected() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let ticket: SupportTicket = submit(&persistence, "jane@x.com");
    move_to(&persistence, &ticket, &admin, TicketStatus::InProgress);

    // `ticket` still says open.
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let patch: TicketPatch = TicketPatch {
        status: Some(TicketStatus::Closed),
        ..TicketPatch::default()
    };
    let update: TicketUpdate =
        plan_ticket_update(&ticket, &patch, admin.id.unwrap(), "ops", now).unwrap();
    let result: Result<SupportTicket, PersistenceError> =
        persistence.update_ticket(ticket.id, &update, now);

    assert_eq!(
        result,
        Err(PersistenceError::StatusChanged {
            expected: String::from("open")
        })
    );
}

#[test]
fn test_ticket_stats_counts() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let first: SupportTicket = submit(&persistence, "jane@x.com");
    submit(&persistence, "joe@x.com");
    move_to(&persistence, &first, &admin, TicketStatus::Closed);
    let joe: SupportClient = persistence
        .get_support_client_by_email("joe@x.com")
        .unwrap()
        .unwrap();
    persistence.set_client_plan(joe.id, PlanType::Premium).unwrap();

    let stats: TicketStats = persistence.ticket_stats().unwrap();

    assert_eq!(stats.total_tickets, 2);
    assert_eq!(stats.open_tickets, 1);
    assert_eq!(stats.closed_tickets, 1);
    assert_eq!(stats.urgent_tickets, 0);
    assert_eq!(stats.premium_clients, 1);
    assert_eq!(stats.tickets_last_7_days, 2);
}
