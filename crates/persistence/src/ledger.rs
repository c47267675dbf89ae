// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The engine's storage port backed by a `SQLite` connection.

use diesel::SqliteConnection;
use enroll::{Ledger, NewSelection};
use enroll_domain::{
    ConfirmationToken, Course, CourseId, CourseSession, Enrollment, EnrollmentId,
    EnrollmentStatus, EnrollmentTotal, PaymentMethod, PaymentPlan, PaymentStatus, Placement,
    PlanId, Selection, SelectionId, SessionId, SessionSchedule, Timestamp, UserId,
};
use time::Date;

use crate::error::PersistenceError;
use crate::{mutations, queries};

/// A `Ledger` over a connection that is inside an open transaction.
pub struct SqliteLedger<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteLedger<'c> {
    pub const fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl Ledger for SqliteLedger<'_> {
    type Error = PersistenceError;

    fn course(&mut self, id: CourseId) -> Result<Option<Course>, PersistenceError> {
        queries::catalog::find_course(self.conn, id)
    }

    fn session(&mut self, id: SessionId) -> Result<Option<CourseSession>, PersistenceError> {
        queries::catalog::find_session(self.conn, id)
    }

    fn plan(&mut self, id: PlanId) -> Result<Option<PaymentPlan>, PersistenceError> {
        queries::catalog::find_plan(self.conn, id)
    }

    fn set_session_capacity(&mut self, id: SessionId, capacity: u32) -> Result<(), PersistenceError> {
        mutations::catalog::set_session_capacity(self.conn, id, capacity)
    }

    fn set_session_schedule(
        &mut self,
        id: SessionId,
        schedule: &SessionSchedule,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::set_session_schedule(self.conn, id, schedule)
    }

    fn increment_bonus_if_below_limit(&mut self, id: CourseId) -> Result<bool, PersistenceError> {
        mutations::catalog::increment_bonus_if_below_limit(self.conn, id)
    }

    fn set_bonus_awarded(&mut self, id: CourseId, value: u32) -> Result<(), PersistenceError> {
        mutations::catalog::set_bonus_awarded(self.conn, id, value)
    }

    fn enrollment(&mut self, id: EnrollmentId) -> Result<Option<Enrollment>, PersistenceError> {
        queries::enrollments::find_enrollment(self.conn, id)
    }

    fn open_enrollment_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<Option<Enrollment>, PersistenceError> {
        queries::enrollments::find_open_enrollment(self.conn, user_id)
    }

    fn insert_enrollment(
        &mut self,
        user_id: &UserId,
        created_at: Timestamp,
    ) -> Result<Enrollment, PersistenceError> {
        let id: EnrollmentId =
            mutations::enrollments::insert_enrollment(self.conn, user_id, created_at)?;
        queries::enrollments::find_enrollment(self.conn, id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Enrollment {id} after insert")))
    }

    fn set_enrollment_status(
        &mut self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<(), PersistenceError> {
        mutations::enrollments::set_status(self.conn, id, status)
    }

    fn set_payment_status(
        &mut self,
        id: EnrollmentId,
        status: PaymentStatus,
    ) -> Result<(), PersistenceError> {
        mutations::enrollments::set_payment_status(self.conn, id, status)
    }

    fn set_payment_method(
        &mut self,
        id: EnrollmentId,
        method: PaymentMethod,
    ) -> Result<(), PersistenceError> {
        mutations::enrollments::set_payment_method(self.conn, id, method)
    }

    fn set_has_waitlist(
        &mut self,
        id: EnrollmentId,
        has_waitlist: bool,
    ) -> Result<(), PersistenceError> {
        mutations::enrollments::set_has_waitlist(self.conn, id, has_waitlist)
    }

    fn set_totals(
        &mut self,
        id: EnrollmentId,
        totals: &EnrollmentTotal,
    ) -> Result<(), PersistenceError> {
        mutations::enrollments::set_totals(self.conn, id, totals)
    }

    fn set_confirmation(
        &mut self,
        id: EnrollmentId,
        day: Date,
        token: &ConfirmationToken,
    ) -> Result<(), PersistenceError> {
        mutations::enrollments::set_confirmation(self.conn, id, day, token)
    }

    fn mark_bonus_granted(&mut self, id: EnrollmentId) -> Result<(), PersistenceError> {
        mutations::enrollments::mark_bonus_granted(self.conn, id)
    }

    fn next_token_sequence(&mut self) -> Result<u32, PersistenceError> {
        mutations::enrollments::next_token_sequence(self.conn)
    }

    fn selection(&mut self, id: SelectionId) -> Result<Option<Selection>, PersistenceError> {
        queries::selections::find_selection(self.conn, id)
    }

    fn selection_for_course(
        &mut self,
        enrollment_id: EnrollmentId,
        course_id: CourseId,
    ) -> Result<Option<Selection>, PersistenceError> {
        queries::selections::find_selection_for_course(self.conn, enrollment_id, course_id)
    }

    fn selections_for_enrollment(
        &mut self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Selection>, PersistenceError> {
        queries::selections::selections_for_enrollment(self.conn, enrollment_id)
    }

    fn eligible_selections(
        &mut self,
        session_id: SessionId,
    ) -> Result<Vec<Selection>, PersistenceError> {
        queries::selections::eligible_selections(self.conn, session_id)
    }

    fn inactive_selections(
        &mut self,
        session_id: SessionId,
    ) -> Result<Vec<Selection>, PersistenceError> {
        queries::selections::inactive_selections(self.conn, session_id)
    }

    fn insert_selection(&mut self, selection: &NewSelection) -> Result<Selection, PersistenceError> {
        let id: SelectionId = mutations::selections::insert_selection(self.conn, selection)?;
        queries::selections::find_selection(self.conn, id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Selection {id} after insert")))
    }

    fn move_selection(
        &mut self,
        id: SelectionId,
        session_id: SessionId,
    ) -> Result<(), PersistenceError> {
        mutations::selections::move_selection(self.conn, id, session_id)
    }

    fn set_selection_plan(
        &mut self,
        id: SelectionId,
        plan_id: Option<PlanId>,
    ) -> Result<(), PersistenceError> {
        mutations::selections::set_selection_plan(self.conn, id, plan_id)
    }

    fn set_placement(&mut self, id: SelectionId, placement: Placement) -> Result<(), PersistenceError> {
        mutations::selections::set_placement(self.conn, id, placement)
    }

    fn delete_selection(&mut self, id: SelectionId) -> Result<(), PersistenceError> {
        mutations::selections::delete_selection(self.conn, id)
    }
}
