// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use planmorph_audit::ActivityRecord;
use planmorph_domain::EntityKind;

use crate::data_models::ActivityRow;
use crate::diesel_schema::activity_log;
use crate::error::PersistenceError;

/// Lists the activity recorded against one entity, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `entity` - The kind of entity
/// * `entity_id` - The entity's id
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be parsed.
pub fn list_activity(
    conn: &mut SqliteConnection,
    entity: EntityKind,
    entity_id: i64,
) -> Result<Vec<ActivityRecord>, PersistenceError> {
    let rows: Vec<ActivityRow> = activity_log::table
        .filter(activity_log::entity_kind.eq(entity.as_str()))
        .filter(activity_log::entity_id.eq(entity_id))
        .order((activity_log::created_at.desc(), activity_log::id.desc()))
        .select(ActivityRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ActivityRecord::try_from).collect()
}
