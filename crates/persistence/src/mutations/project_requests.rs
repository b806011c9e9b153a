// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Project request and quotation mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph::Transition;
use planmorph_audit::ActivityEvent;
use planmorph_domain::{
    CostBreakdown, NewProjectRequest, NewQuotation, ProjectRequest, Quotation, RequestStatus,
};
use tracing::info;

use crate::data_models::{ProjectRequestRow, QuotationRow};
use crate::diesel_schema::{project_requests, quotations};
use crate::error::PersistenceError;
use crate::mutations::activity::insert_activity;

fn load_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<ProjectRequest, PersistenceError> {
    project_requests::table
        .find(request_id)
        .select(ProjectRequestRow::as_select())
        .first(conn)?
        .try_into()
}

/// Moves a request from `transition.from` to `transition.to`.
///
/// Fails with `StatusChanged` if another writer moved it first.
fn apply_status(
    conn: &mut SqliteConnection,
    request_id: i64,
    transition: &Transition<RequestStatus>,
    now: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        project_requests::table
            .find(request_id)
            .filter(project_requests::status.eq(transition.from.as_str())),
    )
    .set((
        project_requests::status.eq(transition.to.as_str()),
        project_requests::updated_at.eq(now),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::StatusChanged {
            expected: transition.from.as_str().to_string(),
        });
    }
    Ok(())
}

/// Stores a new project request in its initial status.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - The validated request
/// * `event` - The creation activity
/// * `now` - The creation timestamp
///
/// # Errors
///
/// Returns an error if any write fails; nothing is stored in that case.
pub fn insert_project_request(
    conn: &mut SqliteConnection,
    request: &NewProjectRequest,
    event: &ActivityEvent,
    now: &str,
) -> Result<ProjectRequest, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let request_id: i64 = diesel::insert_into(project_requests::table)
            .values((
                project_requests::client_name.eq(&request.client_name),
                project_requests::client_email.eq(&request.client_email),
                project_requests::client_phone.eq(&request.client_phone),
                project_requests::company_name.eq(request.company_name.as_deref()),
                project_requests::project_type.eq(request.project_type.as_str()),
                project_requests::requirements.eq(&request.requirements),
                project_requests::budget_range.eq(request.budget_range.map(|b| b.as_str())),
                project_requests::status.eq(RequestStatus::Pending.as_str()),
                project_requests::created_at.eq(now),
                project_requests::updated_at.eq(now),
            ))
            .returning(project_requests::id)
            .get_result(conn)?;

        insert_activity(conn, event, request_id, now)?;
        info!(request_id, "Project request stored");
        load_request(conn, request_id)
    })
}

/// Stores a quotation and moves its request to `Quoted` atomically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `quotation` - The validated quotation
/// * `transition` - The planned request transition
/// * `now` - The issue timestamp
///
/// # Errors
///
/// Returns `StatusChanged` if the request moved since it was read, or a
/// database error. Neither row changes on failure.
pub fn insert_quotation(
    conn: &mut SqliteConnection,
    quotation: &NewQuotation,
    transition: &Transition<RequestStatus>,
    now: &str,
) -> Result<Quotation, PersistenceError> {
    let breakdown: Option<String> = quotation
        .cost_breakdown
        .as_ref()
        .map(CostBreakdown::to_json)
        .transpose()?;

    conn.immediate_transaction(|conn| {
        apply_status(conn, quotation.request_id, transition, now)?;

        let row: QuotationRow = diesel::insert_into(quotations::table)
            .values((
                quotations::request_id.eq(quotation.request_id),
                quotations::total_cost_cents.eq(quotation.total_cost.cents()),
                quotations::timeline_weeks.eq(i32::from(quotation.timeline_weeks)),
                quotations::cost_breakdown.eq(breakdown.as_deref()),
                quotations::notes.eq(quotation.notes.as_deref()),
                quotations::recurring_cost_cents.eq(quotation.recurring_cost.cents()),
                quotations::recurring_period.eq(quotation.recurring_period.as_str()),
                quotations::recurring_description.eq(quotation.recurring_description.as_deref()),
                quotations::sent_at.eq(now),
            ))
            .returning(QuotationRow::as_returning())
            .get_result(conn)?;

        insert_activity(conn, &transition.activity, quotation.request_id, now)?;
        info!(
            request_id = quotation.request_id,
            total_cents = quotation.total_cost.cents(),
            "Quotation issued"
        );
        Quotation::try_from(row)
    })
}

/// Applies an admin status edit to a request.
///
/// # Errors
///
/// Returns `StatusChanged` if the request moved since it was read, or a
/// database error.
pub fn update_request_status(
    conn: &mut SqliteConnection,
    request_id: i64,
    transition: &Transition<RequestStatus>,
    now: &str,
) -> Result<ProjectRequest, PersistenceError> {
    conn.immediate_transaction(|conn| {
        apply_status(conn, request_id, transition, now)?;
        insert_activity(conn, &transition.activity, request_id, now)?;
        info!(
            request_id,
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            "Project request status updated"
        );
        load_request(conn, request_id)
    })
}

/// Deletes a request; its quotations go with it.
///
/// Returns false if there was no such request.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_project_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<bool, PersistenceError> {
    let removed: usize =
        diesel::delete(project_requests::table.find(request_id)).execute(conn)?;
    if removed > 0 {
        info!(request_id, "Project request deleted");
    }
    Ok(removed > 0)
}

/// Deletes a quotation and records it on the owning request.
///
/// The request's status is left as it is. Returns the request id, or
/// `None` if there was no such quotation.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `quotation_id` - The quotation to delete
/// * `event` - The activity entry for the request
/// * `now` - The deletion timestamp
///
/// # Errors
///
/// Returns an error if the delete or the activity write fails.
pub fn delete_quotation(
    conn: &mut SqliteConnection,
    quotation_id: i64,
    event: &ActivityEvent,
    now: &str,
) -> Result<Option<i64>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let request_id: Option<i64> = quotations::table
            .find(quotation_id)
            .select(quotations::request_id)
            .first(conn)
            .optional()?;
        let Some(request_id) = request_id else {
            return Ok(None);
        };

        diesel::delete(quotations::table.find(quotation_id)).execute(conn)?;
        insert_activity(conn, event, request_id, now)?;
        info!(quotation_id, request_id, "Quotation deleted");
        Ok(Some(request_id))
    })
}
