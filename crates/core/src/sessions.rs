// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::engine::{reallocate_sessions, require_session};
use crate::error::CoreError;
use crate::ledger::Ledger;
use enroll_domain::{Selection, SessionId, SessionSchedule, validate_capacity};
use tracing::info;

/// Sets a session's capacity and reallocates its queue.
///
/// Raising capacity promotes the head of the waitlist. Lowering it demotes
/// the most recently created reserved selections.
///
/// # Errors
///
/// Returns an error if the capacity is below 1 or the session does not exist.
pub fn set_session_capacity<L: Ledger>(
    ledger: &mut L,
    session_id: SessionId,
    capacity: i64,
) -> Result<(), L::Error> {
    let capacity: u32 = validate_capacity(capacity).map_err(CoreError::from)?;
    require_session(ledger, session_id)?;

    ledger.set_session_capacity(session_id, capacity)?;
    reallocate_sessions(ledger, [session_id])?;

    info!(session_id = %session_id, capacity, "Session capacity updated");
    Ok(())
}

/// Freezes a session at its current reserved count so that every newcomer waits.
///
/// The capacity may become 0 when nobody holds a seat.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn force_waitlist_only<L: Ledger>(
    ledger: &mut L,
    session_id: SessionId,
) -> Result<u32, L::Error> {
    require_session(ledger, session_id)?;
    let eligible: Vec<Selection> = ledger.eligible_selections(session_id)?;
    let reserved: u32 = u32::try_from(
        eligible
            .iter()
            .filter(|selection| selection.placement.is_reserved())
            .count(),
    )
    .unwrap_or(u32::MAX);

    ledger.set_session_capacity(session_id, reserved)?;
    reallocate_sessions(ledger, [session_id])?;

    info!(session_id = %session_id, capacity = reserved, "Session switched to waitlist only");
    Ok(reserved)
}

/// Rewrites a session's schedule and capacity in one step.
///
/// # Errors
///
/// Returns an error if:
/// - A schedule field is blank
/// - The capacity is below 1
/// - The session does not exist
pub fn update_session_details<L: Ledger>(
    ledger: &mut L,
    session_id: SessionId,
    schedule: &SessionSchedule,
    capacity: i64,
) -> Result<(), L::Error> {
    let capacity: u32 = validate_capacity(capacity).map_err(CoreError::from)?;
    require_session(ledger, session_id)?;

    ledger.set_session_schedule(session_id, schedule)?;
    ledger.set_session_capacity(session_id, capacity)?;
    reallocate_sessions(ledger, [session_id])?;

    info!(
        session_id = %session_id,
        weekday = %schedule.weekday,
        start_time = %schedule.start_time,
        capacity,
        "Session details updated"
    );
    Ok(())
}
