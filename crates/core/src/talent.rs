// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::transition::{Transition, creation_event};
use planmorph_audit::{ActivityEvent, Actor};
use planmorph_domain::{
    ApplicationStatus, NewApplication, NewAssessment, NewInterview, StatusUpdate,
    TalentApplication, TransitionTrigger, days_after, format_timestamp,
};
use planmorph_notify::{DeliveryPolicy, Notification, PendingDelivery, Recipient, Template};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Builds the activity entry for a new application.
#[must_use]
pub fn application_event(application: &NewApplication) -> ActivityEvent {
    let mut details: Map<String, Value> = Map::new();
    details.insert(String::from("role"), Value::from(application.role.as_str()));
    details.insert(
        String::from("needs_assessment"),
        Value::from(application.needs_assessment()),
    );
    creation_event::<ApplicationStatus>(
        Actor::client(Some(application.full_name.clone())),
        details,
    )
}

/// The confirmation sent to an applicant once their application is stored.
#[must_use]
pub fn application_delivery(application: &TalentApplication) -> PendingDelivery {
    PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![
            Notification::new(
                Recipient::person(&application.email, Some(&application.full_name)),
                Template::ApplicationReceived {
                    application_id: application.id,
                    needs_assessment: application.needs_assessment,
                },
            ),
        ],
    )
}

/// An assessment assignment ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentPlan {
    pub transition: Transition<ApplicationStatus>,
    /// The computed deadline, RFC 3339.
    pub deadline: String,
}

/// Plans assigning an assessment task.
///
/// The deadline is `now` plus the task's deadline days. The application
/// moves to `assessment_assigned` and the applicant receives the task.
///
/// # Errors
///
/// Returns an error if the application is in a terminal status or the
/// deadline cannot be represented.
pub fn plan_assessment(
    application: &TalentApplication,
    assessment: &NewAssessment,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<AssessmentPlan, CoreError> {
    let deadline: String = format_timestamp(days_after(now, assessment.deadline_days))?;
    let transition: Transition<ApplicationStatus> = Transition::plan(
        application.status,
        ApplicationStatus::AssessmentAssigned,
        TransitionTrigger::AssessmentAssigned,
        actor,
    )?
    .with_detail("task_title", assessment.task_title.as_str())
    .with_detail("deadline", deadline.as_str())
    .with_delivery(PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![Notification::new(
            Recipient::person(&application.email, Some(&application.full_name)),
            Template::AssessmentAssigned {
                application_id: application.id,
                task_title: assessment.task_title.clone(),
                task_description: assessment.task_description.clone(),
                deadline: deadline.clone(),
            },
        )],
    ));

    Ok(AssessmentPlan {
        transition,
        deadline,
    })
}

/// An interview booking ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewPlan {
    pub transition: Transition<ApplicationStatus>,
    /// The interview start, RFC 3339.
    pub scheduled_at: String,
}

/// Plans scheduling an interview.
///
/// # Errors
///
/// Returns an error if the application is in a terminal status.
pub fn plan_interview(
    application: &TalentApplication,
    interview: &NewInterview,
    actor: Actor,
) -> Result<InterviewPlan, CoreError> {
    let scheduled_at: String = format_timestamp(interview.scheduled_at)?;
    let transition: Transition<ApplicationStatus> = Transition::plan(
        application.status,
        ApplicationStatus::InterviewScheduled,
        TransitionTrigger::InterviewScheduled,
        actor,
    )?
    .with_detail("interview_type", interview.interview_type.as_str())
    .with_detail("scheduled_at", scheduled_at.as_str())
    .with_delivery(PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![Notification::new(
            Recipient::person(&application.email, Some(&application.full_name)),
            Template::InterviewScheduled {
                interview_type: interview.interview_type,
                scheduled_at: scheduled_at.clone(),
                duration_minutes: interview.duration_minutes,
                meeting_link: interview.meeting_link.clone(),
                location: interview.location.clone(),
            },
        )],
    ));

    Ok(InterviewPlan {
        transition,
        scheduled_at,
    })
}

/// Plans an admin status decision on an application.
///
/// Every decision sends the applicant the message for the new status.
///
/// # Errors
///
/// Returns an error if the table refuses the change.
pub fn plan_application_status(
    application: &TalentApplication,
    update: &StatusUpdate,
    actor: Actor,
) -> Result<Transition<ApplicationStatus>, CoreError> {
    let transition: Transition<ApplicationStatus> = Transition::plan(
        application.status,
        update.status,
        TransitionTrigger::AdminEdit,
        actor,
    )?;

    Ok(transition.with_delivery(PendingDelivery::new(
        DeliveryPolicy::FireAndForget,
        vec![Notification::new(
            Recipient::person(&application.email, Some(&application.full_name)),
            Template::ApplicationStatusChanged {
                application_id: application.id,
                status: update.status,
                notes: update.admin_notes.clone(),
            },
        )],
    )))
}
