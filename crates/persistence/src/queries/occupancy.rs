// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The capacity and waitlist projection, computed from selection rows.

use diesel::dsl::count_star;
use diesel::prelude::*;
use enroll_domain::{CourseSession, RESERVED, SessionId, SessionOccupancy};
use std::collections::BTreeMap;

use crate::diesel_schema::{enrollments, selections};
use crate::error::PersistenceError;
use crate::queries::active_status_names;

/// Reserved and waitlisted counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementCounts {
    pub reserved: u32,
    pub waitlist: u32,
}

fn to_count(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Counts placements per session across enrollments in the active set.
///
/// Sessions without eligible selections are absent from the map.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn placement_counts(
    conn: &mut SqliteConnection,
) -> Result<BTreeMap<SessionId, PlacementCounts>, PersistenceError> {
    let rows: Vec<(i64, String, i64)> = selections::table
        .inner_join(enrollments::table)
        .filter(enrollments::status.eq_any(active_status_names()))
        .group_by((selections::session_id, selections::status))
        .select((selections::session_id, selections::status, count_star()))
        .load(conn)?;

    let mut counts: BTreeMap<SessionId, PlacementCounts> = BTreeMap::new();
    for (session_id, status, count) in rows {
        let entry = counts.entry(SessionId::new(session_id)).or_default();
        if status == RESERVED {
            entry.reserved = to_count(count);
        } else {
            entry.waitlist = to_count(count);
        }
    }
    Ok(counts)
}

/// Builds the occupancy of each session from the counts.
#[must_use]
pub fn occupancy_for(
    sessions: &[CourseSession],
    counts: &BTreeMap<SessionId, PlacementCounts>,
) -> Vec<SessionOccupancy> {
    sessions
        .iter()
        .map(|session| {
            let count: PlacementCounts = counts.get(&session.id).copied().unwrap_or_default();
            SessionOccupancy::from_counts(session, count.reserved, count.waitlist)
        })
        .collect()
}
