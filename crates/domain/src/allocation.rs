// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat allocation for a single course session.
//!
//! Allocation is a pure function of the session capacity and the session's
//! eligible selections. It is always recomputed from scratch.
//!
//! ## Ordering Rule (Authoritative)
//!
//! Selections are ordered by:
//! 1. The instant the selection was created (earliest wins)
//! 2. Selection ID (lowest wins), so the order is total
//!
//! Nothing else (payment state, plan price, later session changes)
//! influences the order.
//!
//! ## Invariants
//!
//! - At most `capacity` selections are reserved
//! - Waitlist positions are exactly `1..=waitlist_count`
//! - If a later selection is reserved, every earlier one is reserved
//! - Allocating an already-allocated set changes nothing
//! - Selections of inactive enrollments never displace eligible ones

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use crate::placement::Placement;
use crate::types::{EnrollmentId, Selection, SelectionId, Timestamp};

/// A selection competing for a seat in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub selection_id: SelectionId,
    pub enrollment_id: EnrollmentId,
    pub created_at: Timestamp,
    /// The placement currently persisted for the selection.
    pub current: Placement,
}

impl Candidate {
    /// Creates a candidate from a ledger selection.
    #[must_use]
    pub const fn from_selection(selection: &Selection) -> Self {
        Self {
            selection_id: selection.id,
            enrollment_id: selection.enrollment_id,
            created_at: selection.created_at,
            current: selection.placement,
        }
    }

    const fn sort_key(&self) -> (Timestamp, SelectionId) {
        (self.created_at, self.selection_id)
    }
}

/// The computed placement of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub selection_id: SelectionId,
    pub enrollment_id: EnrollmentId,
    pub previous: Placement,
    pub placement: Placement,
    /// The owning enrollment is outside the active set.
    pub provisional: bool,
}

impl Assignment {
    /// Returns true if the persisted placement must be rewritten.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.previous != self.placement
    }
}

/// The result of allocating one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAllocation {
    /// The capacity the allocation was computed against.
    pub capacity: u32,
    /// One assignment per candidate: eligible ones in queue order, then
    /// provisional ones in queue order.
    pub assignments: Vec<Assignment>,
}

impl SessionAllocation {
    /// Assignments whose placement differs from what is persisted.
    pub fn changes(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.is_change())
    }

    /// Returns true if nothing needs to be written.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.changes().next().is_none()
    }

    /// Number of seats held by eligible selections.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| !a.provisional && a.placement.is_reserved())
            .count()
    }

    /// Number of waitlisted eligible selections.
    #[must_use]
    pub fn waitlist_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| !a.provisional && !a.placement.is_reserved())
            .count()
    }

    /// The computed placement of a selection, if it took part in the allocation.
    #[must_use]
    pub fn placement_of(&self, selection_id: SelectionId) -> Option<Placement> {
        self.assignments
            .iter()
            .find(|a| a.selection_id == selection_id)
            .map(|a| a.placement)
    }

    /// Enrollments owning at least one changed selection.
    #[must_use]
    pub fn affected_enrollments(&self) -> BTreeSet<EnrollmentId> {
        self.changes().map(|a| a.enrollment_id).collect()
    }
}

/// Seats and waitlist numbering of one session while it is being allocated.
struct Queue {
    capacity: u32,
    reserved: u32,
    next_position: NonZeroU32,
}

impl Queue {
    const fn new(capacity: u32) -> Self {
        Self {
            capacity,
            reserved: 0,
            next_position: NonZeroU32::MIN,
        }
    }

    const fn has_free_seat(&self) -> bool {
        self.reserved < self.capacity
    }

    fn take_seat(&mut self) -> Placement {
        if self.has_free_seat() {
            self.reserved += 1;
            Placement::Reserved
        } else {
            self.join_waitlist()
        }
    }

    fn join_waitlist(&mut self) -> Placement {
        let position: NonZeroU32 = self.next_position;
        self.next_position = position.saturating_add(1);
        Placement::Waitlisted { position }
    }
}

fn in_queue_order(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut ordered: Vec<&Candidate> = candidates.iter().collect();
    ordered.sort_by_key(|c| c.sort_key());
    ordered
}

const fn assign(candidate: &Candidate, placement: Placement, provisional: bool) -> Assignment {
    Assignment {
        selection_id: candidate.selection_id,
        enrollment_id: candidate.enrollment_id,
        previous: candidate.current,
        placement,
        provisional,
    }
}

/// Allocates the seats of a session among its eligible selections.
///
/// # Arguments
///
/// * `capacity` - The number of seats in the session
/// * `candidates` - The session's eligible selections, in any order
///
/// # Returns
///
/// A `SessionAllocation` listing every candidate in queue order: the first
/// `capacity` reserved, the remainder waitlisted with positions `1, 2, ...`.
#[must_use]
pub fn allocate(capacity: u32, candidates: &[Candidate]) -> SessionAllocation {
    allocate_session(capacity, candidates, &[])
}

/// Allocates a session and places the selections of inactive enrollments
/// behind the eligible ones.
///
/// An inactive selection never takes a seat from an eligible one. It is shown
/// as reserved while the eligible selections leave a seat free. Otherwise it
/// is waitlisted after every eligible waitlisted selection and every earlier
/// inactive one, so waitlist positions stay unique across the whole session.
#[must_use]
pub fn allocate_session(
    capacity: u32,
    eligible: &[Candidate],
    inactive: &[Candidate],
) -> SessionAllocation {
    let mut queue = Queue::new(capacity);
    let mut assignments: Vec<Assignment> = Vec::with_capacity(eligible.len() + inactive.len());

    for candidate in in_queue_order(eligible) {
        assignments.push(assign(candidate, queue.take_seat(), false));
    }

    let seat_left: bool = queue.has_free_seat();
    for candidate in in_queue_order(inactive) {
        let placement: Placement = if seat_left {
            Placement::Reserved
        } else {
            queue.join_waitlist()
        };
        assignments.push(assign(candidate, placement, true));
    }

    SessionAllocation {
        capacity,
        assignments,
    }
}
