// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enroll_domain::{CourseId, DomainError, EnrollmentStatus, PlanId, SessionId};

/// Errors that can occur while applying an enrollment command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// The requester does not own the record they tried to change.
    #[error("Permission denied: {action}")]
    PermissionDenied {
        /// The attempted action.
        action: &'static str,
    },
    /// A payment plan was attached to a selection of another course.
    #[error("Plan {plan} does not belong to course {course}")]
    IncompatiblePlan {
        /// The rejected plan.
        plan: PlanId,
        /// The course of the selection.
        course: CourseId,
    },
    /// Session capacity must be at least one.
    #[error("Invalid capacity: {0}. Must be at least 1")]
    InvalidCapacity(i64),
    /// A session was used for a course it does not belong to.
    #[error("Session {session} does not belong to course {course}")]
    SessionCourseMismatch {
        /// The session that was requested.
        session: SessionId,
        /// The course the request was made for.
        course: CourseId,
    },
    /// The enrollment is missing something required for submission.
    #[error("Enrollment incomplete: {0}")]
    IncompleteEnrollment(&'static str),
    /// The enrollment cannot move to the requested status from where it is.
    #[error("Cannot move enrollment from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: EnrollmentStatus,
        /// The requested status.
        to: EnrollmentStatus,
    },
    /// The confirmation day is outside the bookable range.
    #[error("Invalid confirmation date: {0}")]
    InvalidConfirmationDate(DomainError),
    /// A bonus counter value is above the course limit.
    #[error("Invalid bonus count: {0}")]
    InvalidBonusCount(DomainError),
    /// Any other domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(DomainError),
}

impl CoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCapacity { capacity } => Self::InvalidCapacity(capacity),
            DomainError::ConfirmationDayOutOfRange { .. } => Self::InvalidConfirmationDate(err),
            DomainError::BonusCountAboveLimit { .. } => Self::InvalidBonusCount(err),
            other => Self::DomainViolation(other),
        }
    }
}
