// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use enroll::NewSelection;
use enroll_domain::{Placement, PlanId, SelectionId, SessionId};

use crate::backend::PersistenceBackend;
use crate::data_models::to_i32;
use crate::diesel_schema::selections;
use crate::error::PersistenceError;

fn position_column(placement: Placement) -> Result<Option<i32>, PersistenceError> {
    placement
        .waitlist_position()
        .map(|position| to_i32("waitlist_position", position))
        .transpose()
}

/// Inserts a selection and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including a second selection for
/// the same enrollment and course.
pub fn insert_selection(
    conn: &mut SqliteConnection,
    selection: &NewSelection,
) -> Result<SelectionId, PersistenceError> {
    diesel::insert_into(selections::table)
        .values((
            selections::enrollment_id.eq(selection.enrollment_id.value()),
            selections::course_id.eq(selection.course_id.value()),
            selections::session_id.eq(selection.session_id.value()),
            selections::status.eq(selection.placement.status_str()),
            selections::waitlist_position.eq(position_column(selection.placement)?),
            selections::created_at.eq(selection.created_at.as_micros()),
        ))
        .execute(conn)?;

    Ok(SelectionId::new(conn.get_last_insert_rowid()?))
}

/// Points a selection at another session.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn move_selection(
    conn: &mut SqliteConnection,
    selection_id: SelectionId,
    session_id: SessionId,
) -> Result<(), PersistenceError> {
    diesel::update(selections::table)
        .filter(selections::selection_id.eq(selection_id.value()))
        .set(selections::session_id.eq(session_id.value()))
        .execute(conn)?;
    Ok(())
}

/// Attaches or clears the payment plan.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_selection_plan(
    conn: &mut SqliteConnection,
    selection_id: SelectionId,
    plan_id: Option<PlanId>,
) -> Result<(), PersistenceError> {
    diesel::update(selections::table)
        .filter(selections::selection_id.eq(selection_id.value()))
        .set(selections::plan_id.eq(plan_id.map(PlanId::value)))
        .execute(conn)?;
    Ok(())
}

/// Overwrites both placement columns.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_placement(
    conn: &mut SqliteConnection,
    selection_id: SelectionId,
    placement: Placement,
) -> Result<(), PersistenceError> {
    diesel::update(selections::table)
        .filter(selections::selection_id.eq(selection_id.value()))
        .set((
            selections::status.eq(placement.status_str()),
            selections::waitlist_position.eq(position_column(placement)?),
        ))
        .execute(conn)?;
    Ok(())
}

/// Deletes a selection.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_selection(
    conn: &mut SqliteConnection,
    selection_id: SelectionId,
) -> Result<(), PersistenceError> {
    diesel::delete(selections::table.filter(selections::selection_id.eq(selection_id.value())))
        .execute(conn)?;
    Ok(())
}
