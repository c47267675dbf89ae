// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use enroll_domain::{CourseId, EnrollmentId, Selection, SelectionId, SessionId};

use crate::data_models::{SelectionRow, convert_all};
use crate::diesel_schema::{enrollments, selections};
use crate::error::PersistenceError;
use crate::queries::active_status_names;

/// Loads a selection by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_selection(
    conn: &mut SqliteConnection,
    selection_id: SelectionId,
) -> Result<Option<Selection>, PersistenceError> {
    selections::table
        .filter(selections::selection_id.eq(selection_id.value()))
        .select(SelectionRow::as_select())
        .first::<SelectionRow>(conn)
        .optional()?
        .map(Selection::try_from)
        .transpose()
}

/// Loads the enrollment's selection for a course.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_selection_for_course(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    course_id: CourseId,
) -> Result<Option<Selection>, PersistenceError> {
    selections::table
        .filter(selections::enrollment_id.eq(enrollment_id.value()))
        .filter(selections::course_id.eq(course_id.value()))
        .select(SelectionRow::as_select())
        .first::<SelectionRow>(conn)
        .optional()?
        .map(Selection::try_from)
        .transpose()
}

/// Loads all selections of an enrollment in creation order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn selections_for_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
) -> Result<Vec<Selection>, PersistenceError> {
    let rows: Vec<SelectionRow> = selections::table
        .filter(selections::enrollment_id.eq(enrollment_id.value()))
        .order(selections::selection_id.asc())
        .select(SelectionRow::as_select())
        .load(conn)?;
    convert_all(rows)
}

/// Loads the selections of a session that compete for its seats, in queue order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn eligible_selections(
    conn: &mut SqliteConnection,
    session_id: SessionId,
) -> Result<Vec<Selection>, PersistenceError> {
    let rows: Vec<SelectionRow> = selections::table
        .inner_join(enrollments::table)
        .filter(selections::session_id.eq(session_id.value()))
        .filter(enrollments::status.eq_any(active_status_names()))
        .order((selections::created_at.asc(), selections::selection_id.asc()))
        .select(SelectionRow::as_select())
        .load(conn)?;
    convert_all(rows)
}

/// Loads the selections of a session whose enrollment is outside the active
/// set, in queue order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn inactive_selections(
    conn: &mut SqliteConnection,
    session_id: SessionId,
) -> Result<Vec<Selection>, PersistenceError> {
    let rows: Vec<SelectionRow> = selections::table
        .inner_join(enrollments::table)
        .filter(selections::session_id.eq(session_id.value()))
        .filter(enrollments::status.ne_all(active_status_names()))
        .order((selections::created_at.asc(), selections::selection_id.asc()))
        .select(SelectionRow::as_select())
        .load(conn)?;
    convert_all(rows)
}
