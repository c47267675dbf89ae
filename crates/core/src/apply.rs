// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::context::OperationContext;
use crate::error::CoreError;
use crate::ledger::Ledger;
use crate::outcome::CommandOutcome;
use crate::{lifecycle, selections, sessions};
use enroll_domain::{Enrollment, Placement, SelectionId, SessionSchedule};
use tracing::debug;

/// Applies a command against a ledger.
///
/// The caller owns the transaction: it must open it before calling and
/// roll back on error, so that a failed command leaves nothing behind.
///
/// # Arguments
///
/// * `ledger` - Storage access scoped to the open transaction
/// * `ctx` - Settings and the instant the command is applied at
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(CommandOutcome)` describing the result
/// * `Err(L::Error)` if the command is invalid or storage fails
///
/// # Errors
///
/// Returns an error if:
/// - A referenced record does not exist
/// - The command violates an enrollment rule
/// - The storage layer fails
pub fn apply<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    command: &Command,
) -> Result<CommandOutcome, L::Error> {
    debug!(command = command.name(), "Applying command");

    match command {
        Command::EnsureEnrollment { user_id } => {
            let enrollment: Enrollment = lifecycle::ensure_enrollment(ledger, ctx, user_id)?;
            Ok(CommandOutcome::Enrollment(enrollment))
        }
        Command::SelectSession {
            enrollment_id,
            course_id,
            session_id,
        } => {
            let (selection_id, placement): (SelectionId, Placement) = selections::select_session(
                ledger,
                ctx,
                *enrollment_id,
                *course_id,
                *session_id,
            )?;
            Ok(CommandOutcome::Placed {
                selection_id,
                placement,
            })
        }
        Command::RemoveSelection {
            selection_id,
            requester,
        } => {
            selections::remove_selection(ledger, ctx, *selection_id, *requester)?;
            Ok(CommandOutcome::Updated)
        }
        Command::AttachPlan {
            selection_id,
            plan_id,
            requester,
        } => {
            selections::attach_plan(ledger, ctx, *selection_id, *plan_id, *requester)?;
            Ok(CommandOutcome::Updated)
        }
        Command::SelectPaymentMethod {
            enrollment_id,
            method,
        } => {
            lifecycle::select_payment_method(ledger, *enrollment_id, *method)?;
            Ok(CommandOutcome::Updated)
        }
        Command::SubmitEnrollment { enrollment_id } => {
            lifecycle::submit_enrollment(ledger, ctx, *enrollment_id)?;
            Ok(CommandOutcome::Updated)
        }
        Command::ScheduleConfirmation { enrollment_id, day } => {
            let token = lifecycle::schedule_confirmation(ledger, ctx, *enrollment_id, *day)?;
            Ok(CommandOutcome::Scheduled { day: *day, token })
        }
        Command::SetSessionCapacity {
            session_id,
            capacity,
        } => {
            sessions::set_session_capacity(ledger, *session_id, *capacity)?;
            Ok(CommandOutcome::Updated)
        }
        Command::ForceWaitlistOnly { session_id } => {
            sessions::force_waitlist_only(ledger, *session_id)?;
            Ok(CommandOutcome::Updated)
        }
        Command::MoveSelection {
            selection_id,
            session_id,
        } => {
            let placement: Placement =
                selections::move_selection(ledger, ctx, *selection_id, *session_id)?;
            Ok(CommandOutcome::Placed {
                selection_id: *selection_id,
                placement,
            })
        }
        Command::UpdateSessionDetails {
            session_id,
            weekday,
            start_time,
            end_time,
            level,
            capacity,
        } => {
            let schedule: SessionSchedule =
                SessionSchedule::new(weekday, start_time, end_time, level)
                    .map_err(CoreError::from)?;
            sessions::update_session_details(ledger, *session_id, &schedule, *capacity)?;
            Ok(CommandOutcome::Updated)
        }
        Command::UpdateEnrollmentStatus {
            enrollment_id,
            status,
        } => {
            lifecycle::update_enrollment_status(ledger, *enrollment_id, *status)?;
            Ok(CommandOutcome::Updated)
        }
        Command::UpdatePaymentStatus {
            enrollment_id,
            status,
        } => {
            let bonus = lifecycle::update_payment_status(ledger, ctx, *enrollment_id, *status)?;
            Ok(CommandOutcome::PaymentUpdated { bonus })
        }
        Command::SetBonusAwarded { course_id, value } => {
            lifecycle::set_bonus_awarded(ledger, *course_id, *value)?;
            Ok(CommandOutcome::Updated)
        }
    }
}
