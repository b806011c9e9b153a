// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Talent application queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph_domain::{
    ApplicationStatus, TalentApplication, TalentAssessment, TalentInterview, TalentRole,
};

use crate::data_models::{TalentApplicationRow, TalentAssessmentRow, TalentInterviewRow};
use crate::diesel_schema::{talent_applications, talent_assessments, talent_interviews};
use crate::error::PersistenceError;

/// Retrieves an application by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Option<TalentApplication>, PersistenceError> {
    talent_applications::table
        .find(application_id)
        .select(TalentApplicationRow::as_select())
        .first(conn)
        .optional()?
        .map(TalentApplication::try_from)
        .transpose()
}

/// Returns true if an application already uses `email`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn application_email_exists(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        talent_applications::table.filter(talent_applications::email.eq(email)),
    ))
    .get_result(conn)?)
}

/// Lists applications newest first, optionally filtered by status and role.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_applications(
    conn: &mut SqliteConnection,
    status: Option<ApplicationStatus>,
    role: Option<TalentRole>,
) -> Result<Vec<TalentApplication>, PersistenceError> {
    let mut query = talent_applications::table
        .select(TalentApplicationRow::as_select())
        .order((
            talent_applications::created_at.desc(),
            talent_applications::id.desc(),
        ))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(talent_applications::status.eq(status.as_str()));
    }
    if let Some(role) = role {
        query = query.filter(talent_applications::role.eq(role.as_str()));
    }

    let rows: Vec<TalentApplicationRow> = query.load(conn)?;
    rows.into_iter().map(TalentApplication::try_from).collect()
}

/// Lists an application's assessments, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_assessments(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<TalentAssessment>, PersistenceError> {
    let rows: Vec<TalentAssessmentRow> = talent_assessments::table
        .filter(talent_assessments::application_id.eq(application_id))
        .order((
            talent_assessments::created_at.desc(),
            talent_assessments::id.desc(),
        ))
        .select(TalentAssessmentRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(TalentAssessment::from).collect())
}

/// Lists an application's interviews by scheduled time.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_interviews(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<TalentInterview>, PersistenceError> {
    let rows: Vec<TalentInterviewRow> = talent_interviews::table
        .filter(talent_interviews::application_id.eq(application_id))
        .order((
            talent_interviews::scheduled_at.asc(),
            talent_interviews::id.asc(),
        ))
        .select(TalentInterviewRow::as_select())
        .load(conn)?;

    rows.into_iter().map(TalentInterview::try_from).collect()
}
