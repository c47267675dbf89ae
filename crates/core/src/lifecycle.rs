// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Enrollment status, payment and confirmation operations.

use crate::bonus::grant_bonus;
use crate::context::OperationContext;
use crate::engine::{
    reallocate_enrollment, refresh_totals, require_course, require_enrollment,
};
use crate::error::CoreError;
use crate::ledger::Ledger;
use crate::outcome::BonusOutcome;
use enroll_domain::{
    ConfirmationToken, Course, CourseId, Enrollment, EnrollmentId, EnrollmentStatus,
    PaymentMethod, PaymentStatus, Selection, UserId, validate_bonus_count,
    validate_confirmation_day,
};
use time::Date;
use tracing::info;

/// Returns the user's open enrollment or creates a draft.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn ensure_enrollment<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    user_id: &UserId,
) -> Result<Enrollment, L::Error> {
    if let Some(existing) = ledger.open_enrollment_for_user(user_id)? {
        return Ok(existing);
    }

    let created: Enrollment = ledger.insert_enrollment(user_id, ctx.timestamp())?;
    refresh_totals(ledger, ctx, created.id)?;
    info!(user_id = %user_id, enrollment_id = %created.id, "Enrollment created");

    require_enrollment(ledger, created.id)
}

/// Records the payment method.
///
/// # Errors
///
/// Returns an error if the enrollment does not exist.
pub fn select_payment_method<L: Ledger>(
    ledger: &mut L,
    enrollment_id: EnrollmentId,
    method: PaymentMethod,
) -> Result<(), L::Error> {
    require_enrollment(ledger, enrollment_id)?;
    ledger.set_payment_method(enrollment_id, method)?;
    info!(enrollment_id = %enrollment_id, method = %method, "Payment method selected");
    Ok(())
}

/// Submits a draft, entering its selections into seat allocation.
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment does not exist
/// - The enrollment is past submission
/// - It has no selections, a selection without a plan, or no payment method
pub fn submit_enrollment<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
) -> Result<(), L::Error> {
    let enrollment: Enrollment = require_enrollment(ledger, enrollment_id)?;
    if !matches!(
        enrollment.status,
        EnrollmentStatus::Draft | EnrollmentStatus::Submitted
    ) {
        return Err(CoreError::InvalidStatusTransition {
            from: enrollment.status,
            to: EnrollmentStatus::Submitted,
        }
        .into());
    }

    let selections: Vec<Selection> = ledger.selections_for_enrollment(enrollment_id)?;
    if selections.is_empty() {
        return Err(CoreError::IncompleteEnrollment("no course selected").into());
    }
    if selections.iter().any(|s| s.plan_id.is_none()) {
        return Err(CoreError::IncompleteEnrollment("a selection has no payment plan").into());
    }
    if enrollment.payment_method.is_none() {
        return Err(CoreError::IncompleteEnrollment("no payment method selected").into());
    }

    change_status(ledger, enrollment, EnrollmentStatus::Submitted)?;
    refresh_totals(ledger, ctx, enrollment_id)?;
    Ok(())
}

/// Overwrites the status. Crossing the active-set boundary reallocates every
/// session the enrollment is queued in.
///
/// # Errors
///
/// Returns an error if the enrollment does not exist.
pub fn update_enrollment_status<L: Ledger>(
    ledger: &mut L,
    enrollment_id: EnrollmentId,
    status: EnrollmentStatus,
) -> Result<(), L::Error> {
    let enrollment: Enrollment = require_enrollment(ledger, enrollment_id)?;
    change_status(ledger, enrollment, status)
}

fn change_status<L: Ledger>(
    ledger: &mut L,
    mut enrollment: Enrollment,
    status: EnrollmentStatus,
) -> Result<(), L::Error> {
    let previous: EnrollmentStatus = enrollment.status;
    ledger.set_enrollment_status(enrollment.id, status)?;
    enrollment.status = status;

    if previous.is_active() != status.is_active() {
        reallocate_enrollment(ledger, &enrollment)?;
    }

    info!(
        enrollment_id = %enrollment.id,
        from = %previous,
        to = %status,
        "Enrollment status changed"
    );
    Ok(())
}

/// Overwrites the payment status, granting the bonus on confirmation.
///
/// # Errors
///
/// Returns an error if the enrollment does not exist.
pub fn update_payment_status<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
    status: PaymentStatus,
) -> Result<Option<BonusOutcome>, L::Error> {
    require_enrollment(ledger, enrollment_id)?;
    ledger.set_payment_status(enrollment_id, status)?;
    info!(enrollment_id = %enrollment_id, status = %status, "Payment status changed");

    if status == PaymentStatus::Confirmed {
        return grant_bonus(ledger, ctx, enrollment_id).map(Some);
    }
    Ok(None)
}

/// Books the confirmation visit and issues the enrollment token.
///
/// A token is drawn only once per enrollment; rebooking keeps it. A
/// submitted enrollment moves on to waiting for payment.
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment does not exist or is still a draft
/// - The day is outside the bookable range
pub fn schedule_confirmation<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
    day: Date,
) -> Result<ConfirmationToken, L::Error> {
    let enrollment: Enrollment = require_enrollment(ledger, enrollment_id)?;
    if enrollment.status == EnrollmentStatus::Draft {
        return Err(CoreError::InvalidStatusTransition {
            from: EnrollmentStatus::Draft,
            to: EnrollmentStatus::WaitingPayment,
        }
        .into());
    }
    validate_confirmation_day(day, ctx.today(), ctx.settings.earliest_confirmation_day)
        .map_err(CoreError::from)?;

    let token: ConfirmationToken = match enrollment.token.clone() {
        Some(token) => token,
        None => ConfirmationToken::from_sequence(ledger.next_token_sequence()?),
    };
    ledger.set_confirmation(enrollment_id, day, &token)?;

    if enrollment.status == EnrollmentStatus::Submitted {
        ledger.set_enrollment_status(enrollment_id, EnrollmentStatus::WaitingPayment)?;
    }

    info!(
        enrollment_id = %enrollment_id,
        day = %day,
        token = %token,
        "Confirmation scheduled"
    );
    Ok(token)
}

/// Corrects a course's bonus counter.
///
/// # Errors
///
/// Returns an error if the course does not exist or the value exceeds its limit.
pub fn set_bonus_awarded<L: Ledger>(
    ledger: &mut L,
    course_id: CourseId,
    value: u32,
) -> Result<(), L::Error> {
    let course: Course = require_course(ledger, course_id)?;
    validate_bonus_count(value, course.bonus_limit).map_err(CoreError::from)?;
    ledger.set_bonus_awarded(course_id, value)?;
    info!(course_id = %course_id, value, "Bonus counter updated");
    Ok(())
}
