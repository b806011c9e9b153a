// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use planmorph_domain::{
    ApplicationDraft, ApplicationStatus, AssessmentDraft, InterviewDraft, StatusUpdateDraft,
};
use planmorph_persistence::Persistence;

use super::helpers::{create_test_admin, create_test_application_draft, create_test_persistence};
use crate::{
    ApiError, ApplicationListQuery, AuthenticatedAdmin, assign_assessment, get_application,
    list_applications, schedule_interview, submit_application, update_application_status,
};

const APPLICANT_EMAIL: &str = "amina@example.com";

fn submit_test_application(persistence: &Persistence) -> i64 {
    submit_application(persistence, &create_test_application_draft(APPLICANT_EMAIL))
        .unwrap()
        .response
        .application_id
}

fn status(value: &str) -> StatusUpdateDraft {
    StatusUpdateDraft {
        status: value.to_string(),
        admin_notes: None,
    }
}

fn create_test_assessment_draft() -> AssessmentDraft {
    AssessmentDraft {
        task_title: String::from("Build a todo API"),
        task_description: String::from("CRUD endpoints with tests."),
        deadline_days: Some(5),
        ..AssessmentDraft::default()
    }
}

fn create_test_interview_draft() -> InterviewDraft {
    InterviewDraft {
        interview_type: String::from("video"),
        scheduled_at: String::from("2026-11-02T10:00:00Z"),
        meeting_link: Some(String::from("https://meet.example.com/abc")),
        ..InterviewDraft::default()
    }
}

#[test]
fn test_submit_application_reports_assessment_need() {
    let persistence: Persistence = create_test_persistence();
    let junior: ApplicationDraft = ApplicationDraft {
        experience_level: String::from("beginner"),
        portfolio_url: None,
        ..create_test_application_draft("junior@example.com")
    };

    let senior = submit_application(
        &persistence,
        &create_test_application_draft(APPLICANT_EMAIL),
    )
    .unwrap();
    let junior = submit_application(&persistence, &junior).unwrap();

    assert!(!senior.response.needs_assessment);
    assert!(junior.response.needs_assessment);
    assert_eq!(
        senior.delivery.notifications[0].template.kind(),
        "application_received"
    );
    let json: serde_json::Value = serde_json::to_value(&junior.response).unwrap();
    assert_eq!(json["needsAssessment"], true);
    assert!(json["applicationId"].is_i64());
}

#[test]
fn test_duplicate_application_email_is_rejected() {
    let persistence: Persistence = create_test_persistence();
    submit_test_application(&persistence);

    let result = submit_application(
        &persistence,
        &create_test_application_draft("AMINA@example.com"),
    );

    match result {
        Err(ApiError::InvalidInput { violations }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "email");
            assert_eq!(
                violations[0].message,
                "An application with this email already exists"
            );
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_submit_application_rejects_unknown_role() {
    let persistence: Persistence = create_test_persistence();
    let draft: ApplicationDraft = ApplicationDraft {
        role: String::from("astronaut"),
        ..create_test_application_draft(APPLICANT_EMAIL)
    };

    let result = submit_application(&persistence, &draft);

    let Err(ApiError::InvalidInput { violations }) = result else {
        panic!("Expected invalid input");
    };
    assert_eq!(violations[0].field, "role");
}

#[test]
fn test_list_applications_filters_by_status_and_role() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let reviewed_id: i64 = submit_test_application(&persistence);
    let designer: ApplicationDraft = ApplicationDraft {
        role: String::from("designer"),
        ..create_test_application_draft("designer@example.com")
    };
    submit_application(&persistence, &designer).unwrap();
    update_application_status(&persistence, reviewed_id, &status("under_review"), &admin)
        .unwrap();

    let under_review = list_applications(
        &persistence,
        &ApplicationListQuery {
            status: Some(String::from("under_review")),
            role: None,
        },
    )
    .unwrap();
    let designers = list_applications(
        &persistence,
        &ApplicationListQuery {
            status: None,
            role: Some(String::from("designer")),
        },
    )
    .unwrap();

    assert_eq!(under_review.count, 1);
    assert_eq!(under_review.applications[0].id, reviewed_id);
    assert_eq!(designers.count, 1);
}

#[test]
fn test_status_update_records_reviewer_and_notifies_applicant() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);

    let result = update_application_status(
        &persistence,
        application_id,
        &StatusUpdateDraft {
            status: String::from("accepted"),
            admin_notes: Some(String::from("Strong portfolio.")),
        },
        &admin,
    )
    .unwrap();

    let application = result.response.application;
    assert_eq!(application.status, ApplicationStatus::Accepted);
    assert_eq!(application.reviewed_by, Some(admin.admin_id));
    assert!(application.reviewed_at.is_some());
    assert_eq!(application.admin_notes.as_deref(), Some("Strong portfolio."));
    assert_eq!(
        result.delivery.notifications[0].template.kind(),
        "application_status_changed"
    );
}

#[test]
fn test_decided_application_only_reopens_to_review() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);
    update_application_status(&persistence, application_id, &status("rejected"), &admin)
        .unwrap();

    let to_accepted =
        update_application_status(&persistence, application_id, &status("accepted"), &admin);
    let to_review =
        update_application_status(&persistence, application_id, &status("under_review"), &admin);

    assert!(matches!(
        to_accepted,
        Err(ApiError::DomainRuleViolation { .. })
    ));
    assert!(to_review.is_ok());
}

#[test]
fn test_status_edit_cannot_claim_assessment_assigned() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);

    let result = update_application_status(
        &persistence,
        application_id,
        &status("assessment_assigned"),
        &admin,
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_assign_assessment_sets_status_and_deadline() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);

    let result = assign_assessment(
        &persistence,
        application_id,
        &create_test_assessment_draft(),
        &admin,
    )
    .unwrap();

    assert_eq!(result.response.assigned_by, Some(admin.admin_id));
    assert_eq!(
        result.delivery.notifications[0].template.kind(),
        "assessment_assigned"
    );
    let detail = get_application(&persistence, application_id).unwrap();
    assert_eq!(
        detail.application.status,
        ApplicationStatus::AssessmentAssigned
    );
    assert_eq!(
        detail.application.assessment_deadline.as_deref(),
        Some(result.response.deadline.as_str())
    );
    assert_eq!(detail.assessments.len(), 1);
}

#[test]
fn test_assign_assessment_rejects_decided_application() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);
    update_application_status(&persistence, application_id, &status("withdrawn"), &admin)
        .unwrap();

    let result = assign_assessment(
        &persistence,
        application_id,
        &create_test_assessment_draft(),
        &admin,
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
    let detail = get_application(&persistence, application_id).unwrap();
    assert!(detail.assessments.is_empty());
}

#[test]
fn test_schedule_interview_records_interviewer() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);

    let result = schedule_interview(
        &persistence,
        application_id,
        &create_test_interview_draft(),
        &admin,
    )
    .unwrap();

    assert_eq!(result.response.interviewer_id, Some(admin.admin_id));
    assert_eq!(result.response.duration_minutes, 60);
    let detail = get_application(&persistence, application_id).unwrap();
    assert_eq!(
        detail.application.status,
        ApplicationStatus::InterviewScheduled
    );
    assert!(detail.application.interview_scheduled_at.is_some());
    assert_eq!(detail.interviews.len(), 1);
    assert!(detail.activity.len() >= 2);
}

#[test]
fn test_schedule_interview_rejects_bad_timestamp() {
    let persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedAdmin = create_test_admin(&persistence);
    let application_id: i64 = submit_test_application(&persistence);
    let draft: InterviewDraft = InterviewDraft {
        scheduled_at: String::from("next tuesday"),
        ..create_test_interview_draft()
    };

    let result = schedule_interview(&persistence, application_id, &draft, &admin);

    let Err(ApiError::InvalidInput { violations }) = result else {
        panic!("Expected invalid input");
    };
    assert_eq!(violations[0].field, "scheduled_at");
}

#[test]
fn test_missing_application_is_not_found() {
    let persistence: Persistence = create_test_persistence();

    let result = get_application(&persistence, 42);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
