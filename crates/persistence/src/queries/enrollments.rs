// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use enroll_domain::{Enrollment, EnrollmentId, EnrollmentStatus, UserId};

use crate::data_models::{EnrollmentRow, convert_all};
use crate::diesel_schema::enrollments;
use crate::error::PersistenceError;

/// Loads an enrollment by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_enrollment(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
) -> Result<Option<Enrollment>, PersistenceError> {
    enrollments::table
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .select(EnrollmentRow::as_select())
        .first::<EnrollmentRow>(conn)
        .optional()?
        .map(Enrollment::try_from)
        .transpose()
}

/// Finds the user's most recent enrollment that is neither confirmed nor rejected.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_open_enrollment(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Option<Enrollment>, PersistenceError> {
    let closed: [&str; 2] = [
        EnrollmentStatus::Confirmed.as_str(),
        EnrollmentStatus::Rejected.as_str(),
    ];

    enrollments::table
        .filter(enrollments::user_id.eq(user_id.as_str()))
        .filter(enrollments::status.ne_all(closed))
        .order((
            enrollments::created_at.desc(),
            enrollments::enrollment_id.desc(),
        ))
        .select(EnrollmentRow::as_select())
        .first::<EnrollmentRow>(conn)
        .optional()?
        .map(Enrollment::try_from)
        .transpose()
}

/// Lists enrollments, optionally restricted to one status, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_enrollments(
    conn: &mut SqliteConnection,
    status: Option<EnrollmentStatus>,
) -> Result<Vec<Enrollment>, PersistenceError> {
    let mut query = enrollments::table
        .select(EnrollmentRow::as_select())
        .order(enrollments::enrollment_id.asc())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(enrollments::status.eq(status.as_str()));
    }

    let rows: Vec<EnrollmentRow> = query.load(conn)?;
    convert_all(rows)
}
