// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::context::OperationContext;
use crate::engine::{
    reallocate_sessions, refresh_enrollment, refresh_totals, require_active_plan,
    require_enrollment, require_selection, require_session, settle_selection,
};
use crate::error::CoreError;
use crate::ledger::{Ledger, NewSelection};
use enroll_domain::{
    CourseId, CourseSession, Enrollment, EnrollmentId, PaymentPlan, Placement, PlanId, Selection,
    SelectionId, SessionId,
};
use tracing::info;

/// Chooses `session_id` for `course_id`, replacing the enrollment's earlier
/// choice for that course.
///
/// Choosing the session already held is a no-op. Any other change moves the
/// existing selection in place and clears the attached plan. The selection
/// keeps its creation time, which is what orders every session's queue.
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment or session does not exist
/// - The session belongs to a different course
pub fn select_session<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
    course_id: CourseId,
    session_id: SessionId,
) -> Result<(SelectionId, Placement), L::Error> {
    let enrollment: Enrollment = require_enrollment(ledger, enrollment_id)?;
    let session: CourseSession = require_session(ledger, session_id)?;
    if session.course_id != course_id {
        return Err(CoreError::SessionCourseMismatch {
            session: session_id,
            course: course_id,
        }
        .into());
    }

    let (selection_id, previous_session): (SelectionId, Option<SessionId>) =
        match ledger.selection_for_course(enrollment_id, course_id)? {
            Some(existing) if existing.session_id == session_id => {
                return Ok((existing.id, existing.placement));
            }
            Some(existing) => {
                ledger.move_selection(existing.id, session_id)?;
                ledger.set_selection_plan(existing.id, None)?;
                (existing.id, Some(existing.session_id))
            }
            None => {
                let created: Selection = ledger.insert_selection(&NewSelection {
                    enrollment_id,
                    course_id,
                    session_id,
                    placement: Placement::Reserved,
                    created_at: ctx.timestamp(),
                })?;
                (created.id, None)
            }
        };

    let touched = previous_session.into_iter().chain(std::iter::once(session_id));
    let placement: Placement = settle_selection(ledger, ctx, &enrollment, selection_id, touched)?;

    info!(
        enrollment_id = %enrollment_id,
        selection_id = %selection_id,
        session_id = %session_id,
        placement = %placement,
        "Session selected"
    );
    Ok((selection_id, placement))
}

fn require_owned<L: Ledger>(
    ledger: &mut L,
    selection_id: SelectionId,
    requester: EnrollmentId,
    action: &'static str,
) -> Result<Selection, L::Error> {
    let selection: Selection = require_selection(ledger, selection_id)?;
    if selection.enrollment_id != requester {
        return Err(CoreError::PermissionDenied { action }.into());
    }
    Ok(selection)
}

/// Drops a selection and closes the gap it leaves in its session.
///
/// # Errors
///
/// Returns an error if the selection does not exist or belongs to another enrollment.
pub fn remove_selection<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    selection_id: SelectionId,
    requester: EnrollmentId,
) -> Result<(), L::Error> {
    let selection: Selection = require_owned(ledger, selection_id, requester, "remove_selection")?;

    ledger.delete_selection(selection_id)?;
    reallocate_sessions(ledger, [selection.session_id])?;
    refresh_enrollment(ledger, ctx, selection.enrollment_id)?;

    info!(
        enrollment_id = %selection.enrollment_id,
        selection_id = %selection_id,
        session_id = %selection.session_id,
        "Selection removed"
    );
    Ok(())
}

/// Attaches a payment plan of the selection's course and refreshes the total.
///
/// # Errors
///
/// Returns an error if:
/// - The selection does not exist or belongs to another enrollment
/// - The plan does not exist or is inactive
/// - The plan belongs to another course
pub fn attach_plan<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    selection_id: SelectionId,
    plan_id: PlanId,
    requester: EnrollmentId,
) -> Result<(), L::Error> {
    let selection: Selection = require_owned(ledger, selection_id, requester, "attach_plan")?;
    let plan: PaymentPlan = require_active_plan(ledger, plan_id)?;
    if plan.course_id != selection.course_id {
        return Err(CoreError::IncompatiblePlan {
            plan: plan_id,
            course: selection.course_id,
        }
        .into());
    }

    ledger.set_selection_plan(selection_id, Some(plan_id))?;
    refresh_totals(ledger, ctx, selection.enrollment_id)?;

    info!(
        selection_id = %selection_id,
        plan_id = %plan_id,
        "Plan attached"
    );
    Ok(())
}

/// Moves a selection to another session of the same course.
///
/// The selection keeps its creation time, so it takes its place in the
/// destination queue by when it was first made. Its plan is kept.
///
/// # Errors
///
/// Returns an error if:
/// - The selection or session does not exist
/// - The session belongs to a different course
pub fn move_selection<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    selection_id: SelectionId,
    session_id: SessionId,
) -> Result<Placement, L::Error> {
    let selection: Selection = require_selection(ledger, selection_id)?;
    let destination: CourseSession = require_session(ledger, session_id)?;
    if destination.course_id != selection.course_id {
        return Err(CoreError::SessionCourseMismatch {
            session: session_id,
            course: selection.course_id,
        }
        .into());
    }
    if selection.session_id == session_id {
        return Ok(selection.placement);
    }

    let enrollment: Enrollment = require_enrollment(ledger, selection.enrollment_id)?;
    ledger.move_selection(selection_id, session_id)?;
    let placement: Placement = settle_selection(
        ledger,
        ctx,
        &enrollment,
        selection_id,
        [selection.session_id, session_id],
    )?;

    info!(
        selection_id = %selection_id,
        from = %selection.session_id,
        to = %session_id,
        placement = %placement,
        "Selection moved"
    );
    Ok(placement)
}
