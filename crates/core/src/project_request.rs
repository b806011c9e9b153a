// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::transition::{Transition, creation_event};
use planmorph_audit::{ActivityAction, ActivityEvent, Actor};
use planmorph_domain::{
    EntityKind, NewProjectRequest, NewQuotation, ProjectRequest, RequestStatus, TransitionTrigger,
};
use planmorph_notify::{
    DeliveryPolicy, Notification, PendingDelivery, QuoteSummary, Recipient, Template,
};
use serde_json::{Map, Value};
use std::time::Duration;

/// How long issuing a quotation waits for the quote email.
pub const QUOTATION_EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the activity entry for a submitted project request.
#[must_use]
pub fn request_submission_event(request: &NewProjectRequest) -> ActivityEvent {
    let mut details: Map<String, Value> = Map::new();
    details.insert(
        String::from("project_type"),
        Value::from(request.project_type.as_str()),
    );
    creation_event::<RequestStatus>(Actor::client(Some(request.client_name.clone())), details)
}

/// Builds the request activity entry for a deleted quotation.
///
/// The request keeps its status; the entry only records that a quote was
/// taken back.
#[must_use]
pub fn quotation_deletion_event(quotation_id: i64, actor: Actor) -> ActivityEvent {
    let mut details: Map<String, Value> = Map::new();
    details.insert(String::from("quotation_deleted"), Value::from(quotation_id));
    ActivityEvent::new(
        EntityKind::ProjectRequest,
        ActivityAction::Updated,
        actor,
        Some(Value::Object(details)),
    )
}

/// The notifications for a stored project request: a staff alert and a
/// client confirmation, both sent in the background.
#[must_use]
pub fn request_submission_delivery(request: &ProjectRequest) -> PendingDelivery {
    PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![
            Notification::to_staff(Template::NewRequestAlert {
                request_id: request.id,
                client_name: request.client_name.clone(),
                client_email: request.client_email.clone(),
                client_phone: request.client_phone.clone(),
                company_name: request.company_name.clone(),
                project_type: request.project_type.as_str().to_string(),
                budget_range: request.budget_range.map(|b| b.as_str().to_string()),
                requirements: request.requirements.clone(),
            }),
            Notification::new(
                Recipient::person(&request.client_email, Some(&request.client_name)),
                Template::RequestConfirmation {
                    client_name: request.client_name.clone(),
                    project_type: request.project_type.as_str().to_string(),
                },
            ),
        ],
    )
}

/// Plans issuing a quotation against a project request.
///
/// The request moves to `Quoted`. The quote email is awaited for at most
/// [`QUOTATION_EMAIL_TIMEOUT`] so the caller can report whether it went out.
///
/// # Arguments
///
/// * `request` - The request being quoted
/// * `quotation` - The validated quotation
/// * `actor` - The admin issuing it
///
/// # Errors
///
/// Returns an error if the request's status does not allow quoting.
pub fn plan_quotation(
    request: &ProjectRequest,
    quotation: &NewQuotation,
    actor: Actor,
) -> Result<Transition<RequestStatus>, CoreError> {
    let transition: Transition<RequestStatus> = Transition::plan(
        request.status,
        RequestStatus::Quoted,
        TransitionTrigger::QuotationIssued,
        actor,
    )?;

    let summary: QuoteSummary = QuoteSummary {
        client_name: request.client_name.clone(),
        project_type: request.project_type.as_str().to_string(),
        requirements: request.requirements.clone(),
        total_cost: quotation.total_cost,
        timeline_weeks: quotation.timeline_weeks,
        cost_breakdown: quotation.cost_breakdown.clone(),
        notes: quotation.notes.clone(),
        recurring_cost: quotation.recurring_cost,
        recurring_period: quotation.recurring_period,
        recurring_description: quotation.recurring_description.clone(),
    };

    Ok(transition
        .with_detail("total_cost", quotation.total_cost.to_major())
        .with_detail("timeline_weeks", quotation.timeline_weeks)
        .with_delivery(PendingDelivery::new(
            DeliveryPolicy::AwaitedBestEffort {
                timeout: QUOTATION_EMAIL_TIMEOUT,
            },
            vec![Notification::new(
                Recipient::person(&request.client_email, Some(&request.client_name)),
                Template::Quotation(summary),
            )],
        )))
}

/// Plans an admin status edit on a project request.
///
/// Status edits never notify the client.
///
/// # Errors
///
/// Returns an error if `target` is `Quoted`, which only a quotation can set.
pub fn plan_request_status(
    request: &ProjectRequest,
    target: RequestStatus,
    actor: Actor,
) -> Result<Transition<RequestStatus>, CoreError> {
    Transition::plan(request.status, target, TransitionTrigger::AdminEdit, actor)
}
