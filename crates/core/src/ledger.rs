// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage port the engine runs against.
//!
//! Every method is called from inside a single transaction opened by the
//! caller. Implementations must not commit on their own.

use crate::error::CoreError;
use enroll_domain::{
    ConfirmationToken, Course, CourseId, CourseSession, Enrollment, EnrollmentId,
    EnrollmentStatus, EnrollmentTotal, PaymentMethod, PaymentPlan, PaymentStatus, Placement,
    PlanId, Selection, SelectionId, SessionId, SessionSchedule, Timestamp, UserId,
};
use time::Date;

/// A selection row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSelection {
    pub enrollment_id: EnrollmentId,
    pub course_id: CourseId,
    pub session_id: SessionId,
    pub placement: Placement,
    pub created_at: Timestamp,
}

/// Transactional access to catalog, enrollment and selection records.
pub trait Ledger {
    /// The storage error type. Engine failures are lifted into it.
    type Error: From<CoreError>;

    // Catalog

    /// Loads a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn course(&mut self, id: CourseId) -> Result<Option<Course>, Self::Error>;

    /// Loads a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn session(&mut self, id: SessionId) -> Result<Option<CourseSession>, Self::Error>;

    /// Loads a payment plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn plan(&mut self, id: PlanId) -> Result<Option<PaymentPlan>, Self::Error>;

    /// Overwrites a session's capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_session_capacity(&mut self, id: SessionId, capacity: u32) -> Result<(), Self::Error>;

    /// Overwrites a session's schedule fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_session_schedule(
        &mut self,
        id: SessionId,
        schedule: &SessionSchedule,
    ) -> Result<(), Self::Error>;

    /// Atomically increments the course bonus counter if it is below the limit.
    ///
    /// Returns `true` when the counter was incremented. Courses without a
    /// limit are never incremented.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn increment_bonus_if_below_limit(&mut self, id: CourseId) -> Result<bool, Self::Error>;

    /// Overwrites the course bonus counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_bonus_awarded(&mut self, id: CourseId, value: u32) -> Result<(), Self::Error>;

    // Enrollments

    /// Loads an enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn enrollment(&mut self, id: EnrollmentId) -> Result<Option<Enrollment>, Self::Error>;

    /// Finds the user's most recent enrollment that is neither confirmed nor rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn open_enrollment_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<Option<Enrollment>, Self::Error>;

    /// Creates a draft enrollment for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn insert_enrollment(
        &mut self,
        user_id: &UserId,
        created_at: Timestamp,
    ) -> Result<Enrollment, Self::Error>;

    /// Overwrites the enrollment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_enrollment_status(
        &mut self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<(), Self::Error>;

    /// Overwrites the payment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_payment_status(
        &mut self,
        id: EnrollmentId,
        status: PaymentStatus,
    ) -> Result<(), Self::Error>;

    /// Records the chosen payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_payment_method(
        &mut self,
        id: EnrollmentId,
        method: PaymentMethod,
    ) -> Result<(), Self::Error>;

    /// Overwrites the derived waitlist flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_has_waitlist(&mut self, id: EnrollmentId, has_waitlist: bool)
    -> Result<(), Self::Error>;

    /// Overwrites the stored total and registration fee.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_totals(&mut self, id: EnrollmentId, totals: &EnrollmentTotal)
    -> Result<(), Self::Error>;

    /// Records the booked confirmation day and the enrollment token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_confirmation(
        &mut self,
        id: EnrollmentId,
        day: Date,
        token: &ConfirmationToken,
    ) -> Result<(), Self::Error>;

    /// Marks the promotional bonus as granted to the enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn mark_bonus_granted(&mut self, id: EnrollmentId) -> Result<(), Self::Error>;

    /// Draws the next value of the global token counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn next_token_sequence(&mut self) -> Result<u32, Self::Error>;

    // Selections

    /// Loads a selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn selection(&mut self, id: SelectionId) -> Result<Option<Selection>, Self::Error>;

    /// Loads the enrollment's selection for a course, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn selection_for_course(
        &mut self,
        enrollment_id: EnrollmentId,
        course_id: CourseId,
    ) -> Result<Option<Selection>, Self::Error>;

    /// Loads every selection of an enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn selections_for_enrollment(
        &mut self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Selection>, Self::Error>;

    /// Loads the selections of a session whose enrollment is in the active set.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn eligible_selections(&mut self, session_id: SessionId)
    -> Result<Vec<Selection>, Self::Error>;

    /// Loads the selections of a session whose enrollment is outside the active set.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    fn inactive_selections(&mut self, session_id: SessionId)
    -> Result<Vec<Selection>, Self::Error>;

    /// Inserts a selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails, including when the
    /// enrollment already holds a selection for the course.
    fn insert_selection(&mut self, selection: &NewSelection) -> Result<Selection, Self::Error>;

    /// Points a selection at another session. Its creation time is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn move_selection(&mut self, id: SelectionId, session_id: SessionId)
    -> Result<(), Self::Error>;

    /// Attaches or clears the selection's payment plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_selection_plan(
        &mut self,
        id: SelectionId,
        plan_id: Option<PlanId>,
    ) -> Result<(), Self::Error>;

    /// Overwrites a selection's placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn set_placement(&mut self, id: SelectionId, placement: Placement) -> Result<(), Self::Error>;

    /// Deletes a selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    fn delete_selection(&mut self, id: SelectionId) -> Result<(), Self::Error>;
}
