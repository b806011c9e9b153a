// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use planmorph_domain::{ProjectRequestDraft, Quotation, RequestStatus};
use planmorph_notify::{DeliveryOutcome, DeliveryPolicy};
use planmorph_persistence::Persistence;

use super::helpers::{
    create_test_admin, create_test_persistence, create_test_quotation_draft,
    create_test_request_draft,
};
use crate::{
    AllQuotationsResponse, ApiError, ApiResult, AuthenticatedAdmin, ProjectRequestDetailResponse,
    ProjectRequestResponse, QuotationDetailResponse, QuotationResponse, RequestListQuery,
    RequestStatusUpdate, delete_project_request, delete_quotation, get_project_request,
    get_quotation, issue_quotation, list_all_quotations, list_project_requests, list_quotations,
    submit_project_request, update_project_request_status,
};

fn submit_test_request(persistence: &Persistence) -> i64 {
    submit_project_request(persistence, &create_test_request_draft())
        .unwrap()
        .response
        .request
        .id
}

#[test]
fn test_submit_request_starts_pending_and_notifies_both_sides() {
    let persistence: Persistence = create_test_persistence();

    let result: ApiResult<ProjectRequestResponse> =
        submit_project_request(&persistence, &create_test_request_draft()).unwrap();

    assert_eq!(result.response.request.status, RequestStatus::Pending);
    assert_eq!(result.delivery.policy, DeliveryPolicy::FireAndForget);
    let kinds: Vec<&str> = result
        .delivery
        .notifications
        .iter()
        .map(|n| n.template.kind())
        .collect();
    assert_eq!(kinds, vec!["new_request_alert", "request_confirmation"]);
}

#[test]
fn test_submit_request_rejects_invalid_fields() {
    let persistence: Persistence = create_test_persistence();
    let draft: ProjectRequestDraft = ProjectRequestDraft {
        client_phone: String::from("12345"),
        project_type: String::from("Space Program"),
        ..create_test_request_draft()
    };

    let result = submit_project_request(&persistence, &draft);

    let Err(ApiError::InvalidInput { violations }) = result else {
        panic!("Expected invalid input");
    };
    let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
    assert!(fields.contains(&"client_phone"));
    assert!(fields.contains(&"project_type"));
    assert!(
        list_project_requests(&persistence, &RequestListQuery::default())
            .unwrap()
            .requests
            .is_empty()
    );
}

#[test]
fn test_list_requests_filters_by_status() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let quoted_id: i64 = submit_test_request(&persistence);
    submit_test_request(&persistence);
    issue_quotation(
        &persistence,
        &create_test_quotation_draft(quoted_id, 85_000.0),
        &admin,
    )
    .unwrap();

    let quoted = list_project_requests(
        &persistence,
        &RequestListQuery {
            status: Some(String::from("Quoted")),
        },
    )
    .unwrap();
    let all = list_project_requests(&persistence, &RequestListQuery::default()).unwrap();

    assert_eq!(quoted.count, 1);
    assert_eq!(quoted.requests[0].id, quoted_id);
    assert_eq!(all.count, 2);
}

#[test]
fn test_list_requests_rejects_unknown_status() {
    let persistence: Persistence = create_test_persistence();

    let result = list_project_requests(
        &persistence,
        &RequestListQuery {
            status: Some(String::from("Archived")),
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_issue_quotation_moves_request_to_quoted() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);

    let result: ApiResult<Quotation> = issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, 85_000.0),
        &admin,
    )
    .unwrap();

    assert!(matches!(
        result.delivery.policy,
        DeliveryPolicy::AwaitedBestEffort { .. }
    ));
    assert_eq!(result.delivery.notifications[0].template.kind(), "quotation");
    let detail = get_project_request(&persistence, request_id).unwrap();
    assert_eq!(detail.request.status, RequestStatus::Quoted);
    assert_eq!(detail.quotations.len(), 1);
    assert_eq!(detail.quotations[0].id, result.response.id);
    assert!(!detail.activity.is_empty());
}

#[test]
fn test_quotation_response_reports_delivery_outcome() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);
    let quote: Quotation = issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, 85_000.0),
        &admin,
    )
    .unwrap()
    .response;

    let response: QuotationResponse = QuotationResponse::new(
        quote,
        &DeliveryOutcome::Failed {
            error: String::from("SMTP unreachable"),
        },
    );

    assert!(!response.email_sent);
    assert_eq!(response.request_status, RequestStatus::Quoted);
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();
    assert_eq!(json["email_error"], "SMTP unreachable");
}

#[test]
fn test_requote_is_allowed_and_listed_newest_first() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);

    let first: Quotation = issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, 85_000.0),
        &admin,
    )
    .unwrap()
    .response;
    let second: Quotation = issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, 70_000.0),
        &admin,
    )
    .unwrap()
    .response;

    let listed = list_quotations(&persistence, request_id).unwrap();
    let ids: Vec<i64> = listed.quotations.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn test_quotation_on_approved_request_is_refused() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);
    update_project_request_status(
        &persistence,
        request_id,
        &RequestStatusUpdate {
            status: String::from("Approved"),
        },
        &admin,
    )
    .unwrap();

    let result = issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, 85_000.0),
        &admin,
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "status_transition"
    ));
    assert!(list_quotations(&persistence, request_id).unwrap().quotations.is_empty());
}

#[test]
fn test_quotation_for_missing_request_is_not_found() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);

    let result = issue_quotation(
        &persistence,
        &create_test_quotation_draft(999, 85_000.0),
        &admin,
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_quotation_rejects_negative_total() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);

    let result = issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, -1.0),
        &admin,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_admin_cannot_set_quoted_directly() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);

    let result = update_project_request_status(
        &persistence,
        request_id,
        &RequestStatusUpdate {
            status: String::from("Quoted"),
        },
        &admin,
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_admin_can_reset_decision_to_pending() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);
    let to = |status: &str| RequestStatusUpdate {
        status: status.to_string(),
    };

    update_project_request_status(&persistence, request_id, &to("Rejected"), &admin).unwrap();
    let reset: ProjectRequestResponse =
        update_project_request_status(&persistence, request_id, &to("Pending"), &admin).unwrap();

    assert_eq!(reset.request.status, RequestStatus::Pending);
}

#[test]
fn test_delete_request_removes_it_and_its_quotations() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);
    issue_quotation(
        &persistence,
        &create_test_quotation_draft(request_id, 85_000.0),
        &admin,
    )
    .unwrap();

    delete_project_request(&persistence, request_id, &admin).unwrap();

    assert!(matches!(
        get_project_request(&persistence, request_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        delete_project_request(&persistence, request_id, &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

fn issue_test_quotation(
    persistence: &Persistence,
    admin: &AuthenticatedAdmin,
    request_id: i64,
    total: f64,
) -> Quotation {
    issue_quotation(
        persistence,
        &create_test_quotation_draft(request_id, total),
        admin,
    )
    .unwrap()
    .response
}

#[test]
fn test_get_quotation_includes_client_details() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);
    let quote: Quotation = issue_test_quotation(&persistence, &admin, request_id, 85_000.0);

    let detail: QuotationDetailResponse = get_quotation(&persistence, quote.id).unwrap();

    assert_eq!(detail.quote.quotation.id, quote.id);
    assert_eq!(detail.quote.client_email, "jane@x.com");
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["quote"]["id"], quote.id);
    assert_eq!(json["quote"]["request_id"], request_id);
    assert_eq!(json["quote"]["client_name"], "Jane Doe");
    assert_eq!(json["quote"]["project_type"], "Business Website");
}

#[test]
fn test_get_missing_quotation_is_not_found() {
    let persistence: Persistence = create_test_persistence();

    assert!(matches!(
        get_quotation(&persistence, 77),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_list_all_quotations_counts_every_request() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let first: i64 = submit_test_request(&persistence);
    let second: i64 = submit_test_request(&persistence);
    issue_test_quotation(&persistence, &admin, first, 40_000.0);
    issue_test_quotation(&persistence, &admin, first, 45_000.0);
    let latest: Quotation = issue_test_quotation(&persistence, &admin, second, 90_000.0);

    let listed: AllQuotationsResponse = list_all_quotations(&persistence).unwrap();

    assert_eq!(listed.total, 3);
    assert_eq!(listed.quotes.len(), 3);
    assert_eq!(listed.quotes[0].quotation.id, latest.id);
}

#[test]
fn test_delete_quotation_keeps_request_and_logs_it() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let request_id: i64 = submit_test_request(&persistence);
    let quote: Quotation = issue_test_quotation(&persistence, &admin, request_id, 85_000.0);

    delete_quotation(&persistence, quote.id, &admin).unwrap();

    let detail: ProjectRequestDetailResponse =
        get_project_request(&persistence, request_id).unwrap();
    assert_eq!(detail.request.status, RequestStatus::Quoted);
    assert!(detail.quotations.is_empty());
    assert_eq!(
        detail.activity[0]
            .details
            .as_ref()
            .and_then(|d| d.get("quotation_deleted")),
        Some(&serde_json::json!(quote.id))
    );
    assert!(matches!(
        delete_quotation(&persistence, quote.id, &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
