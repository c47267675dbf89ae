// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use enroll_domain::{
    ConfirmationToken, EnrollmentId, EnrollmentStatus, EnrollmentTotal, PaymentMethod,
    PaymentStatus, Timestamp, UserId,
};
use time::Date;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_day, to_i32};
use crate::diesel_schema::{enrollments, token_counter};
use crate::error::PersistenceError;

/// Inserts a draft enrollment and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_enrollment(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    created_at: Timestamp,
) -> Result<EnrollmentId, PersistenceError> {
    diesel::insert_into(enrollments::table)
        .values((
            enrollments::user_id.eq(user_id.as_str()),
            enrollments::status.eq(EnrollmentStatus::Draft.as_str()),
            enrollments::payment_status.eq(PaymentStatus::Pending.as_str()),
            enrollments::created_at.eq(created_at.as_micros()),
        ))
        .execute(conn)?;

    let enrollment_id: i64 = conn.get_last_insert_rowid()?;
    Ok(EnrollmentId::new(enrollment_id))
}

/// Overwrites the enrollment status.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_status(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    status: EnrollmentStatus,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set(enrollments::status.eq(status.as_str()))
        .execute(conn)?;
    Ok(())
}

/// Overwrites the payment status.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_payment_status(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    status: PaymentStatus,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set(enrollments::payment_status.eq(status.as_str()))
        .execute(conn)?;
    Ok(())
}

/// Records the payment method.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_payment_method(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    method: PaymentMethod,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set(enrollments::payment_method.eq(Some(method.as_str())))
        .execute(conn)?;
    Ok(())
}

/// Overwrites the waitlist flag.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_has_waitlist(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    has_waitlist: bool,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set(enrollments::has_waitlist.eq(i32::from(has_waitlist)))
        .execute(conn)?;
    Ok(())
}

/// Overwrites the stored totals.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_totals(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    totals: &EnrollmentTotal,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set((
            enrollments::total_amount_cents.eq(totals.total_cents),
            enrollments::registration_fee_cents.eq(totals.registration_fee.amount_cents),
            enrollments::registration_fee_discount
                .eq(i32::from(totals.registration_fee.discounted)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Records the confirmation day and token.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_confirmation(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
    day: Date,
    token: &ConfirmationToken,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set((
            enrollments::confirmation_day.eq(Some(format_day(day))),
            enrollments::token.eq(Some(token.code())),
            enrollments::token_sequence.eq(Some(to_i32("token_sequence", token.sequence())?)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Marks the promotional bonus as granted.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_bonus_granted(
    conn: &mut SqliteConnection,
    enrollment_id: EnrollmentId,
) -> Result<(), PersistenceError> {
    diesel::update(enrollments::table)
        .filter(enrollments::enrollment_id.eq(enrollment_id.value()))
        .set(enrollments::promo_bonus_granted.eq(1))
        .execute(conn)?;
    Ok(())
}

/// Increments the global token counter and returns the new value.
///
/// # Errors
///
/// Returns an error if the update fails or the counter row is missing.
pub fn next_token_sequence(conn: &mut SqliteConnection) -> Result<u32, PersistenceError> {
    let value: i32 = diesel::update(token_counter::table)
        .filter(token_counter::counter_id.eq(1))
        .set(token_counter::value.eq(token_counter::value + 1))
        .returning(token_counter::value)
        .get_result(conn)?;

    debug!(value, "Token sequence drawn");
    u32::try_from(value)
        .map_err(|_| PersistenceError::InvalidRow(format!("token counter is negative: {value}")))
}
