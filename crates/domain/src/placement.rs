// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation outcome of a single selection.
//!
//! A selection is either holding a seat or waiting in line. The waitlist
//! position is part of the variant, so a waitlisted selection without a
//! position (or a reserved one with a position) cannot be constructed.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Status string persisted for reserved selections.
pub const RESERVED: &str = "RESERVED";
/// Status string persisted for waitlisted selections.
pub const WAITLIST: &str = "WAITLIST";

/// Where a selection stands in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placement {
    /// Holds one of the session's seats.
    Reserved,
    /// Waiting for a seat. Positions are dense and 1-based per session.
    #[serde(rename = "WAITLIST")]
    Waitlisted {
        /// 1-based position in the session's waitlist.
        position: NonZeroU32,
    },
}

impl Placement {
    /// Builds a waitlisted placement from a 1-based position.
    ///
    /// Returns `None` for position 0.
    #[must_use]
    pub fn waitlisted(position: u32) -> Option<Self> {
        NonZeroU32::new(position).map(|position| Self::Waitlisted { position })
    }

    /// Returns the persisted status string.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Reserved => RESERVED,
            Self::Waitlisted { .. } => WAITLIST,
        }
    }

    /// Returns the waitlist position, if waitlisted.
    #[must_use]
    pub const fn waitlist_position(&self) -> Option<u32> {
        match self {
            Self::Reserved => None,
            Self::Waitlisted { position } => Some(position.get()),
        }
    }

    /// Returns true if the placement holds a seat.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self, Self::Reserved)
    }

    /// Rebuilds a placement from its persisted columns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlacement` if the status is unknown, a
    /// reserved row carries a position, or a waitlisted row lacks a valid one.
    pub fn from_columns(status: &str, position: Option<i64>) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidPlacement {
            status: status.to_string(),
            position,
        };

        match (status, position) {
            (RESERVED, None) => Ok(Self::Reserved),
            (WAITLIST, Some(raw)) => u32::try_from(raw)
                .ok()
                .and_then(Self::waitlisted)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reserved => f.write_str(RESERVED),
            Self::Waitlisted { position } => write!(f, "{WAITLIST} #{position}"),
        }
    }
}
