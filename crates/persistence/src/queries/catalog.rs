// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use enroll_domain::{Course, CourseId, CourseSession, PaymentPlan, PlanId, SessionId};

use crate::data_models::{CourseRow, PlanRow, SessionRow, convert_all};
use crate::diesel_schema::{course_sessions, courses, payment_plans};
use crate::error::PersistenceError;

/// Loads a course by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_course(
    conn: &mut SqliteConnection,
    course_id: CourseId,
) -> Result<Option<Course>, PersistenceError> {
    courses::table
        .filter(courses::course_id.eq(course_id.value()))
        .select(CourseRow::as_select())
        .first::<CourseRow>(conn)
        .optional()?
        .map(Course::try_from)
        .transpose()
}

/// Loads a course by its unique code.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_course_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<Course>, PersistenceError> {
    courses::table
        .filter(courses::code.eq(code))
        .select(CourseRow::as_select())
        .first::<CourseRow>(conn)
        .optional()?
        .map(Course::try_from)
        .transpose()
}

/// Lists all courses in creation order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_courses(conn: &mut SqliteConnection) -> Result<Vec<Course>, PersistenceError> {
    let rows: Vec<CourseRow> = courses::table
        .order(courses::course_id.asc())
        .select(CourseRow::as_select())
        .load(conn)?;
    convert_all(rows)
}

/// Loads a session by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_session(
    conn: &mut SqliteConnection,
    session_id: SessionId,
) -> Result<Option<CourseSession>, PersistenceError> {
    course_sessions::table
        .filter(course_sessions::session_id.eq(session_id.value()))
        .select(SessionRow::as_select())
        .first::<SessionRow>(conn)
        .optional()?
        .map(CourseSession::try_from)
        .transpose()
}

/// Lists every session, grouped by course.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_sessions(conn: &mut SqliteConnection) -> Result<Vec<CourseSession>, PersistenceError> {
    let rows: Vec<SessionRow> = course_sessions::table
        .order((
            course_sessions::course_id.asc(),
            course_sessions::session_id.asc(),
        ))
        .select(SessionRow::as_select())
        .load(conn)?;
    convert_all(rows)
}

/// Loads a payment plan by ID, active or not.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_plan(
    conn: &mut SqliteConnection,
    plan_id: PlanId,
) -> Result<Option<PaymentPlan>, PersistenceError> {
    payment_plans::table
        .filter(payment_plans::plan_id.eq(plan_id.value()))
        .select(PlanRow::as_select())
        .first::<PlanRow>(conn)
        .optional()?
        .map(PaymentPlan::try_from)
        .transpose()
}

/// Lists the active plans of every course.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_active_plans(conn: &mut SqliteConnection) -> Result<Vec<PaymentPlan>, PersistenceError> {
    let rows: Vec<PlanRow> = payment_plans::table
        .filter(payment_plans::is_active.eq(1))
        .order((payment_plans::course_id.asc(), payment_plans::plan_id.asc()))
        .select(PlanRow::as_select())
        .load(conn)?;
    convert_all(rows)
}
