// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side projection of session capacity.
//!
//! Counts are always derived from ledger rows; nothing here is stored.

use serde::{Deserialize, Serialize};

use crate::types::{CourseSession, SessionId};

/// Capacity and queue figures of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOccupancy {
    pub session_id: SessionId,
    pub capacity: u32,
    /// Reserved selections of active enrollments.
    pub reserved: u32,
    /// `max(capacity - reserved, 0)`.
    pub available: u32,
    /// Waitlisted selections of active enrollments.
    pub waitlist: u32,
}

impl SessionOccupancy {
    /// Builds the projection for a session from its counted selections.
    #[must_use]
    pub const fn from_counts(session: &CourseSession, reserved: u32, waitlist: u32) -> Self {
        Self {
            session_id: session.id,
            capacity: session.capacity,
            reserved,
            available: session.capacity.saturating_sub(reserved),
            waitlist,
        }
    }

    /// Returns true if reserved seats exceed capacity.
    ///
    /// Only possible between an administrative capacity change and the
    /// reallocation that follows it in the same transaction.
    #[must_use]
    pub const fn is_over_capacity(&self) -> bool {
        self.reserved > self.capacity
    }

    /// Returns true if a new eligible selection would be waitlisted.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.available == 0
    }
}
