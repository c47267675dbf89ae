// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat reallocation and the derived enrollment fields that follow it.

use crate::context::OperationContext;
use crate::error::CoreError;
use crate::ledger::Ledger;
use enroll_domain::{
    Candidate, Course, CourseId, CourseSession, Enrollment, EnrollmentId, EnrollmentTotal,
    PaymentPlan, Placement, PlanId, Selection, SelectionId, SessionAllocation, SessionId,
    allocate_session, compute_total,
};
use std::collections::BTreeSet;
use tracing::debug;

pub fn require_course<L: Ledger>(ledger: &mut L, id: CourseId) -> Result<Course, L::Error> {
    ledger
        .course(id)?
        .ok_or_else(|| CoreError::not_found("Course", id).into())
}

pub fn require_session<L: Ledger>(
    ledger: &mut L,
    id: SessionId,
) -> Result<CourseSession, L::Error> {
    ledger
        .session(id)?
        .ok_or_else(|| CoreError::not_found("Session", id).into())
}

pub fn require_enrollment<L: Ledger>(
    ledger: &mut L,
    id: EnrollmentId,
) -> Result<Enrollment, L::Error> {
    ledger
        .enrollment(id)?
        .ok_or_else(|| CoreError::not_found("Enrollment", id).into())
}

pub fn require_selection<L: Ledger>(
    ledger: &mut L,
    id: SelectionId,
) -> Result<Selection, L::Error> {
    ledger
        .selection(id)?
        .ok_or_else(|| CoreError::not_found("Selection", id).into())
}

/// Inactive plans are treated as missing.
pub fn require_active_plan<L: Ledger>(
    ledger: &mut L,
    id: PlanId,
) -> Result<PaymentPlan, L::Error> {
    ledger
        .plan(id)?
        .filter(|plan| plan.is_active)
        .ok_or_else(|| CoreError::not_found("Plan", id).into())
}

/// Recomputes and persists every placement in one session.
///
/// Selections of enrollments in the active set compete for the seats.
/// Selections of other enrollments get a provisional placement behind them.
/// Rows whose placement already matches are left untouched.
///
/// # Errors
///
/// Returns an error if the session does not exist or storage fails.
pub fn reallocate_session<L: Ledger>(
    ledger: &mut L,
    session_id: SessionId,
) -> Result<SessionAllocation, L::Error> {
    let session: CourseSession = require_session(ledger, session_id)?;
    let eligible: Vec<Candidate> = ledger
        .eligible_selections(session_id)?
        .iter()
        .map(Candidate::from_selection)
        .collect();
    let inactive: Vec<Candidate> = ledger
        .inactive_selections(session_id)?
        .iter()
        .map(Candidate::from_selection)
        .collect();

    let allocation: SessionAllocation = allocate_session(session.capacity, &eligible, &inactive);

    let mut written: usize = 0;
    for assignment in allocation.changes() {
        ledger.set_placement(assignment.selection_id, assignment.placement)?;
        written += 1;
    }

    debug!(
        session_id = %session_id,
        capacity = session.capacity,
        reserved = allocation.reserved_count(),
        waitlisted = allocation.waitlist_count(),
        changed = written,
        "Reallocated session"
    );

    Ok(allocation)
}

/// Reallocates each distinct session once and refreshes the waitlist flag of
/// every enrollment that has a selection in them.
///
/// # Errors
///
/// Returns an error if a session does not exist or storage fails.
pub fn reallocate_sessions<L: Ledger>(
    ledger: &mut L,
    sessions: impl IntoIterator<Item = SessionId>,
) -> Result<(), L::Error> {
    let sessions: BTreeSet<SessionId> = sessions.into_iter().collect();
    let mut affected: BTreeSet<EnrollmentId> = BTreeSet::new();

    for session_id in sessions {
        let allocation: SessionAllocation = reallocate_session(ledger, session_id)?;
        affected.extend(allocation.affected_enrollments());
    }

    for enrollment_id in affected {
        refresh_waitlist_flag(ledger, enrollment_id)?;
    }
    Ok(())
}

/// Settles a selection after it was created or moved, returning its final placement.
///
/// `touched` lists every session whose queue changed. The owning enrollment's
/// derived fields are refreshed afterwards.
///
/// # Errors
///
/// Returns an error if a referenced record does not exist or storage fails.
pub fn settle_selection<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment: &Enrollment,
    selection_id: SelectionId,
    touched: impl IntoIterator<Item = SessionId>,
) -> Result<Placement, L::Error> {
    reallocate_sessions(ledger, touched)?;
    refresh_enrollment(ledger, ctx, enrollment.id)?;

    Ok(require_selection(ledger, selection_id)?.placement)
}

/// Sets `has_waitlist` from the enrollment's current placements.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn refresh_waitlist_flag<L: Ledger>(
    ledger: &mut L,
    enrollment_id: EnrollmentId,
) -> Result<bool, L::Error> {
    let has_waitlist: bool = ledger
        .selections_for_enrollment(enrollment_id)?
        .iter()
        .any(|selection| !selection.placement.is_reserved());
    ledger.set_has_waitlist(enrollment_id, has_waitlist)?;
    Ok(has_waitlist)
}

/// Recomputes the stored total from the attached plans and today's fee.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn refresh_totals<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
) -> Result<EnrollmentTotal, L::Error> {
    let selections: Vec<Selection> = ledger.selections_for_enrollment(enrollment_id)?;
    let mut prices: Vec<i64> = Vec::with_capacity(selections.len());
    for plan_id in selections.iter().filter_map(|s| s.plan_id) {
        if let Some(plan) = ledger.plan(plan_id)? {
            prices.push(plan.price_cents);
        }
    }

    let totals: EnrollmentTotal = compute_total(prices, &ctx.settings.fee_policy, ctx.today());
    ledger.set_totals(enrollment_id, &totals)?;
    Ok(totals)
}

/// Refreshes both derived fields of an enrollment.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn refresh_enrollment<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
) -> Result<(), L::Error> {
    refresh_waitlist_flag(ledger, enrollment_id)?;
    refresh_totals(ledger, ctx, enrollment_id)?;
    Ok(())
}

/// Reallocates every session the enrollment holds a selection in.
///
/// Used when the enrollment enters or leaves the active set. `enrollment`
/// must carry its new status.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn reallocate_enrollment<L: Ledger>(
    ledger: &mut L,
    enrollment: &Enrollment,
) -> Result<(), L::Error> {
    let selections: Vec<Selection> = ledger.selections_for_enrollment(enrollment.id)?;
    reallocate_sessions(ledger, selections.iter().map(|s| s.session_id))?;
    refresh_waitlist_flag(ledger, enrollment.id)?;
    Ok(())
}
