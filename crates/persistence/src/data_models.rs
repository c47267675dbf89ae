// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain values.
//!
//! Integer flags are stored as `0`/`1`, enums as their upper-case names and
//! dates as ISO `YYYY-MM-DD` text.

use diesel::prelude::*;
use enroll_domain::{
    ConfirmationToken, Course, CourseId, CourseSession, Enrollment, EnrollmentId, PaymentPlan,
    Placement, PlanId, Selection, SelectionId, SessionId, Timestamp, UserId,
};
use std::str::FromStr;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::diesel_schema::{course_sessions, courses, enrollments, payment_plans, selections};
use crate::error::PersistenceError;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CourseRow {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub modality: String,
    pub bonus_limit: Option<i32>,
    pub bonus_awarded: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = course_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionRow {
    pub session_id: i64,
    pub course_id: i64,
    pub code: String,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub level: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payment_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanRow {
    pub plan_id: i64,
    pub course_id: i64,
    pub label: String,
    pub months: i32,
    pub price_cents: i64,
    pub is_active: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EnrollmentRow {
    pub enrollment_id: i64,
    pub user_id: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub total_amount_cents: i64,
    pub registration_fee_cents: i64,
    pub registration_fee_discount: i32,
    pub has_waitlist: i32,
    pub promo_bonus_granted: i32,
    pub confirmation_day: Option<String>,
    pub token: Option<String>,
    pub token_sequence: Option<i32>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = selections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SelectionRow {
    pub selection_id: i64,
    pub enrollment_id: i64,
    pub course_id: i64,
    pub session_id: i64,
    pub plan_id: Option<i64>,
    pub status: String,
    pub waitlist_position: Option<i32>,
    pub created_at: i64,
}

fn to_u32(column: &str, value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::InvalidRow(format!("{column} is negative: {value}")))
}

/// Converts a count to the signed column type.
pub fn to_i32(column: &str, value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::InvalidRow(format!("{column} is too large: {value}")))
}

const fn flag(value: i32) -> bool {
    value != 0
}

const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Formats a date the way it is stored.
#[must_use]
pub fn format_day(day: Date) -> String {
    day.format(DAY_FORMAT).unwrap_or_else(|_| day.to_string())
}

fn parse_day(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DAY_FORMAT)
        .map_err(|e| PersistenceError::InvalidRow(format!("confirmation_day '{value}': {e}")))
}

fn parse<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = enroll_domain::DomainError>,
{
    value
        .parse()
        .map_err(|e: enroll_domain::DomainError| PersistenceError::InvalidRow(e.to_string()))
}

impl TryFrom<CourseRow> for Course {
    type Error = PersistenceError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CourseId::new(row.course_id),
            code: row.code,
            title: row.title,
            modality: parse(&row.modality)?,
            bonus_limit: row
                .bonus_limit
                .map(|limit| to_u32("bonus_limit", limit))
                .transpose()?,
            bonus_awarded: to_u32("bonus_awarded", row.bonus_awarded)?,
        })
    }
}

impl TryFrom<SessionRow> for CourseSession {
    type Error = PersistenceError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SessionId::new(row.session_id),
            course_id: CourseId::new(row.course_id),
            code: row.code,
            weekday: row.weekday,
            start_time: row.start_time,
            end_time: row.end_time,
            level: row.level,
            capacity: to_u32("capacity", row.capacity)?,
        })
    }
}

impl TryFrom<PlanRow> for PaymentPlan {
    type Error = PersistenceError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlanId::new(row.plan_id),
            course_id: CourseId::new(row.course_id),
            label: row.label,
            months: to_u32("months", row.months)?,
            price_cents: row.price_cents,
            is_active: flag(row.is_active),
        })
    }
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = PersistenceError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let token: Option<ConfirmationToken> = match (row.token, row.token_sequence) {
            (Some(code), Some(sequence)) => Some(ConfirmationToken::from_parts(
                code,
                to_u32("token_sequence", sequence)?,
            )),
            (None, None) => None,
            (code, sequence) => {
                return Err(PersistenceError::InvalidRow(format!(
                    "token {code:?} does not match sequence {sequence:?}"
                )));
            }
        };

        Ok(Self {
            id: EnrollmentId::new(row.enrollment_id),
            user_id: UserId::new(row.user_id),
            status: parse(&row.status)?,
            payment_method: row.payment_method.as_deref().map(parse).transpose()?,
            payment_status: parse(&row.payment_status)?,
            total_amount_cents: row.total_amount_cents,
            registration_fee_cents: row.registration_fee_cents,
            registration_fee_discount: flag(row.registration_fee_discount),
            has_waitlist: flag(row.has_waitlist),
            promo_bonus_granted: flag(row.promo_bonus_granted),
            confirmation_day: row.confirmation_day.as_deref().map(parse_day).transpose()?,
            token,
            created_at: Timestamp::from_micros(row.created_at),
        })
    }
}

impl TryFrom<SelectionRow> for Selection {
    type Error = PersistenceError;

    fn try_from(row: SelectionRow) -> Result<Self, Self::Error> {
        let placement: Placement =
            Placement::from_columns(&row.status, row.waitlist_position.map(i64::from))
                .map_err(|e| PersistenceError::InvalidRow(e.to_string()))?;

        Ok(Self {
            id: SelectionId::new(row.selection_id),
            enrollment_id: EnrollmentId::new(row.enrollment_id),
            course_id: CourseId::new(row.course_id),
            session_id: SessionId::new(row.session_id),
            plan_id: row.plan_id.map(PlanId::new),
            placement,
            created_at: Timestamp::from_micros(row.created_at),
        })
    }
}

/// Converts a batch of rows, failing on the first invalid one.
///
/// # Errors
///
/// Returns an error if any row cannot be converted.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, PersistenceError>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
