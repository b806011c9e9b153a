// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account, session, and password reset queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{
    AdminData, AdminRow, PasswordResetData, PasswordResetRow, SessionData, SessionRow,
};
use crate::diesel_schema::{admins, password_resets, sessions};
use crate::error::PersistenceError;

/// Retrieves an admin by email.
///
/// The email must already be normalized to lowercase.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_admin_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AdminData>, PersistenceError> {
    debug!("Looking up admin by email");

    let row: Option<AdminRow> = admins::table
        .filter(admins::email.eq(email))
        .select(AdminRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(AdminData::from))
}

/// Retrieves an admin by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_admin(
    conn: &mut SqliteConnection,
    admin_id: i64,
) -> Result<Option<AdminData>, PersistenceError> {
    let row: Option<AdminRow> = admins::table
        .find(admin_id)
        .select(AdminRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(AdminData::from))
}

/// Counts admin accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_admins(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(admins::table.count().get_result(conn)?)
}

/// Retrieves a session by its token.
///
/// Expiry is not checked here.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    let row: Option<SessionRow> = sessions::table
        .filter(sessions::token.eq(token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SessionData::from))
}

/// Retrieves a password reset by its token.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_password_reset(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<PasswordResetData>, PersistenceError> {
    let row: Option<PasswordResetRow> = password_resets::table
        .filter(password_resets::token.eq(token))
        .select(PasswordResetRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(PasswordResetData::from))
}
