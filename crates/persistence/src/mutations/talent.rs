// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Talent application mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph::{AssessmentPlan, InterviewPlan, Transition};
use planmorph_audit::ActivityEvent;
use planmorph_domain::{
    ApplicationStatus, NewApplication, NewAssessment, NewInterview, StatusUpdate,
    TalentApplication, TalentAssessment, TalentInterview,
};
use tracing::info;

use crate::data_models::{TalentApplicationRow, TalentAssessmentRow, TalentInterviewRow};
use crate::diesel_schema::{talent_applications, talent_assessments, talent_interviews};
use crate::error::PersistenceError;
use crate::mutations::activity::insert_activity;
use crate::queries::talent::application_email_exists;

fn load_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<TalentApplication, PersistenceError> {
    talent_applications::table
        .find(application_id)
        .select(TalentApplicationRow::as_select())
        .first(conn)?
        .try_into()
}

fn stale(transition: &Transition<ApplicationStatus>) -> PersistenceError {
    PersistenceError::StatusChanged {
        expected: transition.from.as_str().to_string(),
    }
}

/// Stores a new application.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `application` - The validated application
/// * `event` - The creation activity
/// * `now` - The creation timestamp
///
/// # Errors
///
/// Returns `DuplicateEmail` if an application with the same email exists;
/// the existing row is left untouched.
pub fn insert_application(
    conn: &mut SqliteConnection,
    application: &NewApplication,
    event: &ActivityEvent,
    now: &str,
) -> Result<TalentApplication, PersistenceError> {
    let skills: String = serde_json::to_string(&application.skills)?;
    let technologies: String = serde_json::to_string(&application.technologies)?;
    let notable_projects: String = serde_json::to_string(&application.notable_projects)?;
    let years: Option<i32> = application
        .years_of_experience
        .map(i32::try_from)
        .transpose()
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let duplicate = || PersistenceError::DuplicateEmail(application.email.clone());

    conn.immediate_transaction(|conn| {
        if application_email_exists(conn, &application.email)? {
            return Err(duplicate());
        }

        let application_id: i64 = diesel::insert_into(talent_applications::table)
            .values((
                talent_applications::full_name.eq(&application.full_name),
                talent_applications::email.eq(&application.email),
                talent_applications::phone.eq(application.phone.as_deref()),
                talent_applications::location.eq(application.location.as_deref()),
                talent_applications::role.eq(application.role.as_str()),
                talent_applications::specialization.eq(&application.specialization),
                talent_applications::experience_level.eq(application.experience_level.as_str()),
                talent_applications::years_of_experience.eq(years),
                talent_applications::portfolio_url.eq(application.portfolio_url.as_deref()),
                talent_applications::github_url.eq(application.github_url.as_deref()),
                talent_applications::linkedin_url.eq(application.linkedin_url.as_deref()),
                talent_applications::behance_url.eq(application.behance_url.as_deref()),
                talent_applications::dribbble_url.eq(application.dribbble_url.as_deref()),
                talent_applications::skills.eq(&skills),
                talent_applications::technologies.eq(&technologies),
                talent_applications::notable_projects.eq(&notable_projects),
                talent_applications::previous_companies
                    .eq(application.previous_companies.as_deref()),
                talent_applications::why_join.eq(&application.why_join),
                talent_applications::availability.eq(application.availability.as_str()),
                talent_applications::expected_salary_range
                    .eq(application.expected_salary_range.as_deref()),
                talent_applications::status.eq(ApplicationStatus::Pending.as_str()),
                talent_applications::needs_assessment
                    .eq(i32::from(application.needs_assessment())),
                talent_applications::created_at.eq(now),
                talent_applications::updated_at.eq(now),
            ))
            .returning(talent_applications::id)
            .get_result(conn)
            .map_err(|e| match PersistenceError::from(e) {
                PersistenceError::UniqueViolation(_) => duplicate(),
                other => other,
            })?;

        insert_activity(conn, event, application_id, now)?;
        info!(
            application_id,
            role = application.role.as_str(),
            "Talent application stored"
        );
        load_application(conn, application_id)
    })
}

/// Stores an assessment task and moves the application to
/// `assessment_assigned`.
///
/// The application's `needs_assessment` flag is set and its summary
/// columns point at the new task.
///
/// # Errors
///
/// Returns `StatusChanged` if the application moved since it was read, or
/// a database error.
pub fn assign_assessment(
    conn: &mut SqliteConnection,
    application_id: i64,
    assessment: &NewAssessment,
    plan: &AssessmentPlan,
    admin_id: i64,
    now: &str,
) -> Result<TalentAssessment, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(
            talent_applications::table
                .find(application_id)
                .filter(talent_applications::status.eq(plan.transition.from.as_str())),
        )
        .set((
            talent_applications::status.eq(plan.transition.to.as_str()),
            talent_applications::needs_assessment.eq(1),
            talent_applications::assessment_task.eq(&assessment.task_title),
            talent_applications::assessment_deadline.eq(&plan.deadline),
            talent_applications::updated_at.eq(now),
        ))
        .execute(conn)?;
        if updated == 0 {
            return Err(stale(&plan.transition));
        }

        let row: TalentAssessmentRow = diesel::insert_into(talent_assessments::table)
            .values((
                talent_assessments::application_id.eq(application_id),
                talent_assessments::task_title.eq(&assessment.task_title),
                talent_assessments::task_description.eq(&assessment.task_description),
                talent_assessments::task_requirements.eq(assessment.task_requirements.as_deref()),
                talent_assessments::task_type.eq(assessment.task_type.as_deref()),
                talent_assessments::deadline.eq(&plan.deadline),
                talent_assessments::assigned_by.eq(admin_id),
                talent_assessments::created_at.eq(now),
            ))
            .returning(TalentAssessmentRow::as_returning())
            .get_result(conn)?;

        insert_activity(conn, &plan.transition.activity, application_id, now)?;
        info!(application_id, deadline = %plan.deadline, "Assessment assigned");
        Ok(TalentAssessment::from(row))
    })
}

/// Stores an interview and moves the application to `interview_scheduled`.
///
/// # Errors
///
/// Returns `StatusChanged` if the application moved since it was read, or
/// a database error.
pub fn schedule_interview(
    conn: &mut SqliteConnection,
    application_id: i64,
    interview: &NewInterview,
    plan: &InterviewPlan,
    admin_id: i64,
    now: &str,
) -> Result<TalentInterview, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(
            talent_applications::table
                .find(application_id)
                .filter(talent_applications::status.eq(plan.transition.from.as_str())),
        )
        .set((
            talent_applications::status.eq(plan.transition.to.as_str()),
            talent_applications::interview_scheduled_at.eq(&plan.scheduled_at),
            talent_applications::updated_at.eq(now),
        ))
        .execute(conn)?;
        if updated == 0 {
            return Err(stale(&plan.transition));
        }

        let row: TalentInterviewRow = diesel::insert_into(talent_interviews::table)
            .values((
                talent_interviews::application_id.eq(application_id),
                talent_interviews::interview_type.eq(interview.interview_type.as_str()),
                talent_interviews::scheduled_at.eq(&plan.scheduled_at),
                talent_interviews::duration_minutes.eq(i32::from(interview.duration_minutes)),
                talent_interviews::meeting_link.eq(interview.meeting_link.as_deref()),
                talent_interviews::location.eq(interview.location.as_deref()),
                talent_interviews::notes.eq(interview.notes.as_deref()),
                talent_interviews::interviewer_id.eq(admin_id),
                talent_interviews::created_at.eq(now),
            ))
            .returning(TalentInterviewRow::as_returning())
            .get_result(conn)?;

        insert_activity(conn, &plan.transition.activity, application_id, now)?;
        info!(application_id, scheduled_at = %plan.scheduled_at, "Interview scheduled");
        TalentInterview::try_from(row)
    })
}

/// Records an admin decision on an application.
///
/// The reviewer and review time are always stamped; notes are replaced
/// only when the update carries them.
///
/// # Errors
///
/// Returns `StatusChanged` if the application moved since it was read, or
/// a database error.
pub fn update_application_status(
    conn: &mut SqliteConnection,
    application_id: i64,
    update: &StatusUpdate,
    transition: &Transition<ApplicationStatus>,
    admin_id: i64,
    now: &str,
) -> Result<TalentApplication, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let target = talent_applications::table
            .find(application_id)
            .filter(talent_applications::status.eq(transition.from.as_str()));
        let status = (
            talent_applications::status.eq(transition.to.as_str()),
            talent_applications::reviewed_by.eq(admin_id),
            talent_applications::reviewed_at.eq(now),
            talent_applications::updated_at.eq(now),
        );
        let updated: usize = match update.admin_notes.as_deref() {
            Some(notes) => diesel::update(target)
                .set((status, talent_applications::admin_notes.eq(notes)))
                .execute(conn)?,
            None => diesel::update(target).set(status).execute(conn)?,
        };
        if updated == 0 {
            return Err(stale(transition));
        }

        insert_activity(conn, &transition.activity, application_id, now)?;
        info!(
            application_id,
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            "Application status updated"
        );
        load_application(conn, application_id)
    })
}
