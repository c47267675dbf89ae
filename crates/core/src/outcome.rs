// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enroll_domain::{ConfirmationToken, Enrollment, Placement, SelectionId};
use time::Date;

/// What happened to the promotional bonus when a payment was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusOutcome {
    /// The bonus was granted and the course counter incremented.
    Granted,
    /// The enrollment already held the bonus.
    AlreadyGranted,
    /// The enrollment has no selection in a course with a bonus.
    NotEligible,
    /// The course counter had reached its limit.
    LimitReached,
}

impl BonusOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "GRANTED",
            Self::AlreadyGranted => "ALREADY_GRANTED",
            Self::NotEligible => "NOT_ELIGIBLE",
            Self::LimitReached => "LIMIT_REACHED",
        }
    }
}

/// The result of a successfully applied command.
///
/// Commands are atomic: on error none of their writes are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The enrollment that was found or created.
    Enrollment(Enrollment),
    /// The selection's placement after the command settled.
    Placed {
        selection_id: SelectionId,
        placement: Placement,
    },
    /// A payment status change and what it did to the bonus.
    PaymentUpdated {
        /// `None` unless the new status is confirmed.
        bonus: Option<BonusOutcome>,
    },
    /// The booked confirmation visit.
    Scheduled { day: Date, token: ConfirmationToken },
    /// The command had no value to report.
    Updated,
}
