// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Project request and quotation queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph_domain::{ProjectRequest, ProjectType, Quotation, QuotationDetail, RequestStatus};
use tracing::debug;

use crate::data_models::{ProjectRequestRow, QuotationRow};
use crate::diesel_schema::{project_requests, quotations};
use crate::error::PersistenceError;

/// Retrieves a project request by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_project_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Option<ProjectRequest>, PersistenceError> {
    debug!(request_id, "Loading project request");

    project_requests::table
        .find(request_id)
        .select(ProjectRequestRow::as_select())
        .first(conn)
        .optional()?
        .map(ProjectRequest::try_from)
        .transpose()
}

/// Lists project requests newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_project_requests(
    conn: &mut SqliteConnection,
    status: Option<RequestStatus>,
) -> Result<Vec<ProjectRequest>, PersistenceError> {
    let mut query = project_requests::table
        .select(ProjectRequestRow::as_select())
        .order((project_requests::created_at.desc(), project_requests::id.desc()))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(project_requests::status.eq(status.as_str()));
    }

    let rows: Vec<ProjectRequestRow> = query.load(conn)?;
    rows.into_iter().map(ProjectRequest::try_from).collect()
}

/// Lists the quotations issued for a request, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_quotations(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Vec<Quotation>, PersistenceError> {
    let rows: Vec<QuotationRow> = quotations::table
        .filter(quotations::request_id.eq(request_id))
        .order((quotations::sent_at.desc(), quotations::id.desc()))
        .select(QuotationRow::as_select())
        .load(conn)?;

    rows.into_iter().map(Quotation::try_from).collect()
}

type QuotationDetailRow = (QuotationRow, String, String, String);

fn to_detail(row: QuotationDetailRow) -> Result<QuotationDetail, PersistenceError> {
    let (quotation, client_name, client_email, project_type) = row;
    Ok(QuotationDetail {
        quotation: Quotation::try_from(quotation)?,
        client_name,
        client_email,
        project_type: project_type.parse::<ProjectType>()?,
    })
}

/// Retrieves one quotation with its request's contact details.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be parsed.
pub fn get_quotation(
    conn: &mut SqliteConnection,
    quotation_id: i64,
) -> Result<Option<QuotationDetail>, PersistenceError> {
    debug!(quotation_id, "Loading quotation");

    quotations::table
        .inner_join(project_requests::table)
        .filter(quotations::id.eq(quotation_id))
        .select((
            QuotationRow::as_select(),
            project_requests::client_name,
            project_requests::client_email,
            project_requests::project_type,
        ))
        .first::<QuotationDetailRow>(conn)
        .optional()?
        .map(to_detail)
        .transpose()
}

/// Lists every quotation newest first, with its request's contact details.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_all_quotations(
    conn: &mut SqliteConnection,
) -> Result<Vec<QuotationDetail>, PersistenceError> {
    let rows: Vec<QuotationDetailRow> = quotations::table
        .inner_join(project_requests::table)
        .order((quotations::sent_at.desc(), quotations::id.desc()))
        .select((
            QuotationRow::as_select(),
            project_requests::client_name,
            project_requests::client_email,
            project_requests::project_type,
        ))
        .load(conn)?;

    rows.into_iter().map(to_detail).collect()
}
