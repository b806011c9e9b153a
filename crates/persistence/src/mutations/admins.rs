// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin account, session, and password reset mutations.
//!
//! Passwords arrive here already hashed; hashing belongs to the
//! authentication service.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info, warn};

use crate::data_models::{PasswordResetData, PasswordResetRow};
use crate::diesel_schema::{admins, password_resets, sessions};
use crate::error::PersistenceError;

/// Creates an admin account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The normalized email
/// * `name` - The display name
/// * `password_hash` - The bcrypt hash
/// * `now` - The creation timestamp
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is taken.
pub fn create_admin(
    conn: &mut SqliteConnection,
    email: &str,
    name: &str,
    password_hash: &str,
    now: &str,
) -> Result<i64, PersistenceError> {
    info!(email, "Creating admin");

    let admin_id: i64 = diesel::insert_into(admins::table)
        .values((
            admins::email.eq(email),
            admins::name.eq(name),
            admins::password_hash.eq(password_hash),
            admins::created_at.eq(now),
        ))
        .returning(admins::id)
        .get_result(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::UniqueViolation(_) => {
                PersistenceError::DuplicateEmail(email.to_string())
            }
            other => other,
        })?;

    info!(admin_id, "Admin created");
    Ok(admin_id)
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    admin_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    debug!(admin_id, "Updating last_login_at");

    diesel::update(admins::table.find(admin_id))
        .set(admins::last_login_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Stores a new session.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    token: &str,
    admin_id: i64,
    now: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let session_id: i64 = diesel::insert_into(sessions::table)
        .values((
            sessions::token.eq(token),
            sessions::admin_id.eq(admin_id),
            sessions::created_at.eq(now),
            sessions::expires_at.eq(expires_at),
        ))
        .returning(sessions::id)
        .get_result(conn)?;

    debug!(session_id, admin_id, "Session created");
    Ok(session_id)
}

/// Deletes a session by token. Unknown tokens are ignored.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(conn: &mut SqliteConnection, token: &str) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table.filter(sessions::token.eq(token))).execute(conn)?;
    Ok(())
}

/// Deletes sessions whose expiry is at or before `now`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    let removed: usize =
        diesel::delete(sessions::table.filter(sessions::expires_at.le(now))).execute(conn)?;
    if removed > 0 {
        debug!(removed, "Removed expired sessions");
    }
    Ok(removed)
}

/// Stores a password reset token.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_password_reset(
    conn: &mut SqliteConnection,
    token: &str,
    admin_id: i64,
    now: &str,
    expires_at: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(password_resets::table)
        .values((
            password_resets::token.eq(token),
            password_resets::admin_id.eq(admin_id),
            password_resets::created_at.eq(now),
            password_resets::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    info!(admin_id, "Password reset issued");
    Ok(())
}

/// Consumes a reset token and replaces the admin's password.
///
/// Marking the token used, writing the new hash, and revoking every
/// session of the admin happen in one transaction. The token is claimed
/// with a conditional update, so a concurrent second use fails.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `token` - The reset token
/// * `password_hash` - The new bcrypt hash
/// * `now` - The current timestamp
///
/// # Errors
///
/// Returns `NotFound` for an unknown token, `ResetTokenExpired` or
/// `ResetTokenUsed` when the token can no longer be used, or a database
/// error.
pub fn complete_password_reset(
    conn: &mut SqliteConnection,
    token: &str,
    password_hash: &str,
    now: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let reset: PasswordResetData = password_resets::table
            .filter(password_resets::token.eq(token))
            .select(PasswordResetRow::as_select())
            .first(conn)
            .optional()?
            .map(PasswordResetData::from)
            .ok_or_else(|| PersistenceError::NotFound(String::from("password reset")))?;

        if reset.used_at.is_some() {
            return Err(PersistenceError::ResetTokenUsed);
        }
        if reset.expires_at.as_str() <= now {
            warn!(admin_id = reset.admin_id, "Expired password reset token presented");
            return Err(PersistenceError::ResetTokenExpired);
        }

        let claimed: usize = diesel::update(
            password_resets::table
                .find(reset.reset_id)
                .filter(password_resets::used_at.is_null()),
        )
        .set(password_resets::used_at.eq(now))
        .execute(conn)?;
        if claimed == 0 {
            return Err(PersistenceError::ResetTokenUsed);
        }

        diesel::update(admins::table.find(reset.admin_id))
            .set(admins::password_hash.eq(password_hash))
            .execute(conn)?;
        let revoked: usize =
            diesel::delete(sessions::table.filter(sessions::admin_id.eq(reset.admin_id)))
                .execute(conn)?;

        info!(admin_id = reset.admin_id, revoked, "Password reset completed");
        Ok(reset.admin_id)
    })
}
