// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog mutations: course creation, session edits and the bonus counter.

use diesel::prelude::*;
use enroll_domain::{CourseId, CourseSeed, PlanId, SessionId, SessionSchedule};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::to_i32;
use crate::diesel_schema::{course_sessions, courses, payment_plans};
use crate::error::PersistenceError;

/// IDs assigned to a newly inserted course and its children, in seed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededCourse {
    pub course_id: CourseId,
    pub session_ids: Vec<SessionId>,
    pub plan_ids: Vec<PlanId>,
}

/// Inserts a course with its sessions and plans.
///
/// # Errors
///
/// Returns an error if an insert fails, including when a course or session
/// code is already taken.
pub fn insert_course(
    conn: &mut SqliteConnection,
    seed: &CourseSeed,
) -> Result<SeededCourse, PersistenceError> {
    let bonus_limit: Option<i32> = seed
        .bonus_limit
        .map(|limit| to_i32("bonus_limit", limit))
        .transpose()?;

    diesel::insert_into(courses::table)
        .values((
            courses::code.eq(seed.code),
            courses::title.eq(seed.title),
            courses::modality.eq(seed.modality.as_str()),
            courses::bonus_limit.eq(bonus_limit),
            courses::bonus_awarded.eq(0),
        ))
        .execute(conn)?;
    let course_id: i64 = conn.get_last_insert_rowid()?;

    let mut session_ids: Vec<SessionId> = Vec::with_capacity(seed.sessions.len());
    for session in &seed.sessions {
        diesel::insert_into(course_sessions::table)
            .values((
                course_sessions::course_id.eq(course_id),
                course_sessions::code.eq(session.code),
                course_sessions::weekday.eq(session.weekday),
                course_sessions::start_time.eq(session.start_time),
                course_sessions::end_time.eq(session.end_time),
                course_sessions::level.eq(session.level),
                course_sessions::capacity.eq(to_i32("capacity", session.capacity)?),
            ))
            .execute(conn)?;
        session_ids.push(SessionId::new(conn.get_last_insert_rowid()?));
    }

    let mut plan_ids: Vec<PlanId> = Vec::with_capacity(seed.plans.len());
    for plan in &seed.plans {
        diesel::insert_into(payment_plans::table)
            .values((
                payment_plans::course_id.eq(course_id),
                payment_plans::label.eq(plan.label),
                payment_plans::months.eq(to_i32("months", plan.months)?),
                payment_plans::price_cents.eq(plan.price_cents),
                payment_plans::is_active.eq(1),
            ))
            .execute(conn)?;
        plan_ids.push(PlanId::new(conn.get_last_insert_rowid()?));
    }

    info!(
        course_id,
        code = seed.code,
        sessions = session_ids.len(),
        plans = plan_ids.len(),
        "Course created"
    );

    Ok(SeededCourse {
        course_id: CourseId::new(course_id),
        session_ids,
        plan_ids,
    })
}

/// Overwrites a session's capacity.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_session_capacity(
    conn: &mut SqliteConnection,
    session_id: SessionId,
    capacity: u32,
) -> Result<(), PersistenceError> {
    diesel::update(course_sessions::table)
        .filter(course_sessions::session_id.eq(session_id.value()))
        .set(course_sessions::capacity.eq(to_i32("capacity", capacity)?))
        .execute(conn)?;
    Ok(())
}

/// Overwrites a session's schedule labels.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_session_schedule(
    conn: &mut SqliteConnection,
    session_id: SessionId,
    schedule: &SessionSchedule,
) -> Result<(), PersistenceError> {
    diesel::update(course_sessions::table)
        .filter(course_sessions::session_id.eq(session_id.value()))
        .set((
            course_sessions::weekday.eq(&schedule.weekday),
            course_sessions::start_time.eq(&schedule.start_time),
            course_sessions::end_time.eq(&schedule.end_time),
            course_sessions::level.eq(&schedule.level),
        ))
        .execute(conn)?;
    Ok(())
}

/// Increments the bonus counter unless it has reached the limit.
///
/// The comparison and the increment are a single statement, so the limit
/// holds under concurrent writers.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn increment_bonus_if_below_limit(
    conn: &mut SqliteConnection,
    course_id: CourseId,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(courses::table)
        .filter(courses::course_id.eq(course_id.value()))
        .filter(courses::bonus_limit.is_not_null())
        .filter(courses::bonus_awarded.lt(courses::bonus_limit.assume_not_null()))
        .set(courses::bonus_awarded.eq(courses::bonus_awarded + 1))
        .execute(conn)?;

    debug!(course_id = %course_id, incremented = updated == 1, "Bonus increment attempted");
    Ok(updated == 1)
}

/// Overwrites the bonus counter.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_bonus_awarded(
    conn: &mut SqliteConnection,
    course_id: CourseId,
    value: u32,
) -> Result<(), PersistenceError> {
    diesel::update(courses::table)
        .filter(courses::course_id.eq(course_id.value()))
        .set(courses::bonus_awarded.eq(to_i32("bonus_awarded", value)?))
        .execute(conn)?;
    Ok(())
}
