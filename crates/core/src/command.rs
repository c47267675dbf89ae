// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enroll_domain::{
    CourseId, EnrollmentId, EnrollmentStatus, PaymentMethod, PaymentStatus, PlanId, SelectionId,
    SessionId, UserId,
};
use time::Date;

/// A command represents user or administrator intent as data only.
///
/// Commands are the only way to request state changes. Every command is
/// applied inside one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Return the user's open enrollment, creating a draft if there is none.
    EnsureEnrollment {
        /// The requesting user.
        user_id: UserId,
    },
    /// Choose a session for a course, replacing any earlier choice for that course.
    SelectSession {
        /// The enrollment making the choice.
        enrollment_id: EnrollmentId,
        /// The course being chosen.
        course_id: CourseId,
        /// The session being chosen.
        session_id: SessionId,
    },
    /// Drop a selection.
    RemoveSelection {
        /// The selection to drop.
        selection_id: SelectionId,
        /// The enrollment asking for the removal. Must own the selection.
        requester: EnrollmentId,
    },
    /// Attach a payment plan to a selection.
    AttachPlan {
        /// The selection receiving the plan.
        selection_id: SelectionId,
        /// The plan to attach.
        plan_id: PlanId,
        /// The enrollment asking for the change. Must own the selection.
        requester: EnrollmentId,
    },
    /// Record the payment method an enrollment will use.
    SelectPaymentMethod {
        /// The enrollment.
        enrollment_id: EnrollmentId,
        /// The chosen method.
        method: PaymentMethod,
    },
    /// Submit a complete draft, entering it into seat allocation.
    SubmitEnrollment {
        /// The enrollment to submit.
        enrollment_id: EnrollmentId,
    },
    /// Book the in-person confirmation visit.
    ScheduleConfirmation {
        /// The enrollment.
        enrollment_id: EnrollmentId,
        /// The requested day.
        day: Date,
    },
    /// Set a session's capacity. Administrators only.
    SetSessionCapacity {
        /// The session.
        session_id: SessionId,
        /// The new capacity. Must be at least 1.
        capacity: i64,
    },
    /// Shrink capacity to the current reserved count so newcomers wait. Administrators only.
    ForceWaitlistOnly {
        /// The session.
        session_id: SessionId,
    },
    /// Move a selection to another session of the same course. Administrators only.
    MoveSelection {
        /// The selection to move.
        selection_id: SelectionId,
        /// The destination session.
        session_id: SessionId,
    },
    /// Edit a session's schedule and capacity. Administrators only.
    UpdateSessionDetails {
        /// The session.
        session_id: SessionId,
        /// Day of the week label.
        weekday: String,
        /// Start time label.
        start_time: String,
        /// End time label.
        end_time: String,
        /// Audience level label.
        level: String,
        /// The new capacity. Must be at least 1.
        capacity: i64,
    },
    /// Overwrite an enrollment's status. Administrators only.
    UpdateEnrollmentStatus {
        /// The enrollment.
        enrollment_id: EnrollmentId,
        /// The new status.
        status: EnrollmentStatus,
    },
    /// Overwrite an enrollment's payment status. Administrators only.
    UpdatePaymentStatus {
        /// The enrollment.
        enrollment_id: EnrollmentId,
        /// The new payment status.
        status: PaymentStatus,
    },
    /// Correct a course's bonus counter. Administrators only.
    SetBonusAwarded {
        /// The course.
        course_id: CourseId,
        /// The new counter value.
        value: u32,
    },
}

impl Command {
    /// A stable name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EnsureEnrollment { .. } => "EnsureEnrollment",
            Self::SelectSession { .. } => "SelectSession",
            Self::RemoveSelection { .. } => "RemoveSelection",
            Self::AttachPlan { .. } => "AttachPlan",
            Self::SelectPaymentMethod { .. } => "SelectPaymentMethod",
            Self::SubmitEnrollment { .. } => "SubmitEnrollment",
            Self::ScheduleConfirmation { .. } => "ScheduleConfirmation",
            Self::SetSessionCapacity { .. } => "SetSessionCapacity",
            Self::ForceWaitlistOnly { .. } => "ForceWaitlistOnly",
            Self::MoveSelection { .. } => "MoveSelection",
            Self::UpdateSessionDetails { .. } => "UpdateSessionDetails",
            Self::UpdateEnrollmentStatus { .. } => "UpdateEnrollmentStatus",
            Self::UpdatePaymentStatus { .. } => "UpdatePaymentStatus",
            Self::SetBonusAwarded { .. } => "SetBonusAwarded",
        }
    }

    /// Whether only administrators may issue this command.
    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::SetSessionCapacity { .. }
                | Self::ForceWaitlistOnly { .. }
                | Self::MoveSelection { .. }
                | Self::UpdateSessionDetails { .. }
                | Self::UpdateEnrollmentStatus { .. }
                | Self::UpdatePaymentStatus { .. }
                | Self::SetBonusAwarded { .. }
        )
    }
}
