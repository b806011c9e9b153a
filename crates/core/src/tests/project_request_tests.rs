// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_admin, create_test_request};
use crate::{
    CoreError, QUOTATION_EMAIL_TIMEOUT, Transition, plan_quotation, plan_request_status,
    quotation_deletion_event, request_submission_delivery,
};
use planmorph_audit::{ActivityAction, ActivityEvent};
use planmorph_domain::{
    DomainError, EntityKind, NewQuotation, QuotationDraft, RequestStatus, TransitionTrigger,
};
use planmorph_notify::{DeliveryPolicy, PendingDelivery, Recipient, Template};

fn create_test_quotation() -> NewQuotation {
    QuotationDraft {
        request_id: Some(11),
        total_cost: Some(75_000.0),
        timeline_weeks: Some(4),
        ..QuotationDraft::default()
    }
    .validate()
    .unwrap()
}

#[test]
fn test_submission_alerts_staff_and_confirms_to_client() {
    let delivery: PendingDelivery =
        request_submission_delivery(&create_test_request(RequestStatus::Pending));

    assert_eq!(delivery.policy, DeliveryPolicy::FireAndForget);
    assert_eq!(delivery.notifications.len(), 2);
    assert_eq!(delivery.notifications[0].recipient, Recipient::Staff);
    assert_eq!(delivery.notifications[0].template.kind(), "new_request_alert");
    assert_eq!(
        delivery.notifications[1].recipient,
        Recipient::person("jane@x.com", Some("Jane Doe"))
    );
}

#[test]
fn test_quotation_moves_pending_request_to_quoted() {
    let transition: Transition<RequestStatus> = plan_quotation(
        &create_test_request(RequestStatus::Pending),
        &create_test_quotation(),
        create_test_admin(),
    )
    .unwrap();

    assert_eq!(transition.from, RequestStatus::Pending);
    assert_eq!(transition.to, RequestStatus::Quoted);
    assert_eq!(transition.trigger, TransitionTrigger::QuotationIssued);
    assert_eq!(transition.activity.action, ActivityAction::Updated);
}

#[test]
fn test_quotation_email_is_awaited_with_timeout() {
    let transition: Transition<RequestStatus> = plan_quotation(
        &create_test_request(RequestStatus::Pending),
        &create_test_quotation(),
        create_test_admin(),
    )
    .unwrap();

    assert_eq!(
        transition.delivery.policy,
        DeliveryPolicy::AwaitedBestEffort {
            timeout: QUOTATION_EMAIL_TIMEOUT
        }
    );
    match &transition.delivery.notifications[0].template {
        Template::Quotation(summary) => {
            assert_eq!(summary.total_cost.cents(), 7_500_000);
            assert_eq!(summary.timeline_weeks, 4);
        }
        other => panic!("unexpected template {}", other.kind()),
    }
}

#[test]
fn test_requote_keeps_request_quoted() {
    let transition: Transition<RequestStatus> = plan_quotation(
        &create_test_request(RequestStatus::Quoted),
        &create_test_quotation(),
        create_test_admin(),
    )
    .unwrap();
    assert!(!transition.changes_status());
}

#[test]
fn test_quotation_rejected_for_decided_request() {
    let result: Result<Transition<RequestStatus>, CoreError> = plan_quotation(
        &create_test_request(RequestStatus::Approved),
        &create_test_quotation(),
        create_test_admin(),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}

#[test]
fn test_admin_cannot_set_quoted_directly() {
    let result: Result<Transition<RequestStatus>, CoreError> = plan_request_status(
        &create_test_request(RequestStatus::Pending),
        RequestStatus::Quoted,
        create_test_admin(),
    );
    assert!(result.is_err());
}

#[test]
fn test_admin_can_reset_rejected_request_without_notifying() {
    let transition: Transition<RequestStatus> = plan_request_status(
        &create_test_request(RequestStatus::Rejected),
        RequestStatus::Pending,
        create_test_admin(),
    )
    .unwrap();

    assert_eq!(transition.to, RequestStatus::Pending);
    assert!(transition.delivery.is_empty());
    let details = transition.activity.details.unwrap();
    assert_eq!(details["from"], "Rejected");
    assert_eq!(details["to"], "Pending");
}

#[test]
fn test_quotation_deletion_is_logged_against_request() {
    let event: ActivityEvent = quotation_deletion_event(31, create_test_admin());

    assert_eq!(event.entity, EntityKind::ProjectRequest);
    assert_eq!(event.action, ActivityAction::Updated);
    assert_eq!(event.actor, create_test_admin());
    assert_eq!(
        event.details.as_ref().and_then(|d| d.get("quotation_deleted")),
        Some(&serde_json::json!(31))
    );
}
