// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph_audit::ActivityEvent;
use tracing::debug;

use crate::diesel_schema::activity_log;
use crate::error::PersistenceError;

/// Writes an activity event against `entity_id`.
///
/// Callers run this inside the transaction of the mutation it describes.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event` - The event to record
/// * `entity_id` - The id of the affected row
/// * `now` - The RFC 3339 timestamp to record
///
/// # Errors
///
/// Returns an error if the details cannot be serialized or the insert fails.
pub fn insert_activity(
    conn: &mut SqliteConnection,
    event: &ActivityEvent,
    entity_id: i64,
    now: &str,
) -> Result<i64, PersistenceError> {
    let details: Option<String> = event
        .details
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let activity_id: i64 = diesel::insert_into(activity_log::table)
        .values((
            activity_log::entity_kind.eq(event.entity.as_str()),
            activity_log::entity_id.eq(entity_id),
            activity_log::action.eq(event.action.as_str()),
            activity_log::actor_type.eq(event.actor.actor_type.as_str()),
            activity_log::actor_id.eq(event.actor.id),
            activity_log::actor_name.eq(event.actor.name.as_deref()),
            activity_log::details.eq(details),
            activity_log::created_at.eq(now),
        ))
        .returning(activity_log::id)
        .get_result(conn)?;

    debug!(
        activity_id,
        entity = event.entity.as_str(),
        entity_id,
        action = event.action.as_str(),
        "Recorded activity"
    );
    Ok(activity_id)
}
