// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use planmorph::{
    AssessmentPlan, InterviewPlan, Transition, application_event, plan_application_status,
    plan_assessment, plan_interview,
};
use planmorph_audit::{ActivityRecord, Actor};
use planmorph_domain::{
    ApplicationStatus, EntityKind, InterviewType, NewApplication, NewAssessment, NewInterview,
    NotableProject, StatusUpdate, TalentApplication, TalentAssessment, TalentInterview,
    TalentRole,
};
use time::{Duration, OffsetDateTime};

use crate::tests::helpers::{
    create_test_admin, create_test_application, create_test_new_application,
    create_test_persistence,
};
use crate::{Persistence, PersistenceError};

#[test]
fn test_new_application_starts_pending() {
    let persistence: Persistence = create_test_persistence();

    let application: TalentApplication = create_test_application(&persistence, "sam@x.com");

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert!(!application.needs_assessment);
    assert_eq!(application.skills, vec!["Rust", "SQL"]);
    assert_eq!(application.years_of_experience, Some(3));
}

#[test]
fn test_structured_lists_round_trip() {
    let persistence: Persistence = create_test_persistence();
    let mut new: NewApplication = create_test_new_application("sam@x.com");
    new.notable_projects = vec![NotableProject {
        title: String::from("Shop"),
        description: None,
        url: Some(String::from("https://shop.example")),
        technologies: vec![String::from("Rust")],
        role: Some(String::from("Lead")),
    }];

    let stored: TalentApplication = persistence
        .insert_application(&new, &application_event(&new))
        .unwrap();

    assert_eq!(stored.notable_projects, new.notable_projects);
}

#[test]
fn test_duplicate_email_rejected_without_touching_existing_row() {
    let persistence: Persistence = create_test_persistence();
    let original: TalentApplication = create_test_application(&persistence, "sam@x.com");
    let mut second: NewApplication = create_test_new_application("sam@x.com");
    second.full_name = String::from("Someone Else");

    let result: Result<TalentApplication, PersistenceError> =
        persistence.insert_application(&second, &application_event(&second));

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateEmail(String::from("sam@x.com")))
    );
    let reloaded: TalentApplication = persistence.get_application(original.id).unwrap().unwrap();
    assert_eq!(reloaded, original);
    assert_eq!(persistence.list_applications(None, None).unwrap().len(), 1);
}

#[test]
fn test_assign_assessment_forces_flag_and_records_task() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let application: TalentApplication = create_test_application(&persistence, "sam@x.com");
    let assessment: NewAssessment = NewAssessment {
        task_title: String::from("Build a CLI"),
        task_description: String::from("Parse a CSV and print totals."),
        task_requirements: None,
        task_type: Some(String::from("coding")),
        deadline_days: 7,
    };
    let plan: AssessmentPlan = plan_assessment(
        &application,
        &assessment,
        admin.clone(),
        OffsetDateTime::now_utc(),
    )
    .unwrap();

    let stored: TalentAssessment = persistence
        .assign_assessment(application.id, &assessment, &plan, admin.id.unwrap())
        .unwrap();

    assert_eq!(stored.deadline, plan.deadline);
    assert_eq!(stored.assigned_by, admin.id);
    let reloaded: TalentApplication = persistence.get_application(application.id).unwrap().unwrap();
    assert_eq!(reloaded.status, ApplicationStatus::AssessmentAssigned);
    assert!(reloaded.needs_assessment);
    assert_eq!(reloaded.assessment_task.as_deref(), Some("Build a CLI"));
    assert_eq!(reloaded.assessment_deadline, Some(plan.deadline));
    assert_eq!(persistence.list_assessments(application.id).unwrap().len(), 1);
}

#[test]
fn test_schedule_interview() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let application: TalentApplication = create_test_application(&persistence, "sam@x.com");
    let interview: NewInterview = NewInterview {
        interview_type: InterviewType::Video,
        scheduled_at: OffsetDateTime::now_utc() + Duration::days(3),
        duration_minutes: 45,
        meeting_link: Some(String::from("https://meet.example/abc")),
        location: None,
        notes: None,
    };
    let plan: InterviewPlan = plan_interview(&application, &interview, admin.clone()).unwrap();

    let stored: TalentInterview = persistence
        .schedule_interview(application.id, &interview, &plan, admin.id.unwrap())
        .unwrap();

    assert_eq!(stored.interview_type, InterviewType::Video);
    assert_eq!(stored.duration_minutes, 45);
    let reloaded: TalentApplication = persistence.get_application(application.id).unwrap().unwrap();
    assert_eq!(reloaded.status, ApplicationStatus::InterviewScheduled);
    assert_eq!(reloaded.interview_scheduled_at, Some(plan.scheduled_at));
    assert_eq!(persistence.list_interviews(application.id).unwrap().len(), 1);
}

#[test]
fn test_status_decision_stamps_reviewer_and_logs() {
    let persistence: Persistence = create_test_persistence();
    let admin: Actor = create_test_admin(&persistence);
    let application: TalentApplication = create_test_application(&persistence, "sam@x.com");
    let update: StatusUpdate = StatusUpdate {
        status: ApplicationStatus::Accepted,
        admin_notes: Some(String::from("Strong portfolio.")),
    };
    let transition: Transition<ApplicationStatus> =
        plan_application_status(&application, &update, admin.clone()).unwrap();

    let stored: TalentApplication = persistence
        .update_application_status(application.id, &update, &transition, admin.id.unwrap())
        .unwrap();

    assert_eq!(stored.status, ApplicationStatus::Accepted);
    assert_eq!(stored.reviewed_by, admin.id);
    assert!(stored.reviewed_at.is_some());
    assert_eq!(stored.admin_notes.as_deref(), Some("Strong portfolio."));
    let activity: Vec<ActivityRecord> = persistence
        .list_activity(EntityKind::TalentApplication, application.id)
        .unwrap();
    assert_eq!(activity.len(), 2);
}

#[test]
fn test_list_applications_filters() {
    let persistence: Persistence = create_test_persistence();
    create_test_application(&persistence, "sam@x.com");
    let mut designer: NewApplication = create_test_new_application("ann@x.com");
    designer.role = TalentRole::Designer;
    persistence
        .insert_application(&designer, &application_event(&designer))
        .unwrap();

    let designers: Vec<TalentApplication> = persistence
        .list_applications(None, Some(TalentRole::Designer))
        .unwrap();
    let pending: Vec<TalentApplication> = persistence
        .list_applications(Some(ApplicationStatus::Pending), None)
        .unwrap();
    let accepted: Vec<TalentApplication> = persistence
        .list_applications(Some(ApplicationStatus::Accepted), None)
        .unwrap();

    assert_eq!(designers.len(), 1);
    assert_eq!(designers[0].email, "ann@x.com");
    assert_eq!(pending.len(), 2);
    assert!(accepted.is_empty());
}
