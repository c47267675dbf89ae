// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory `Ledger` used to exercise the engine without a database.

use crate::{CoreError, Ledger, NewSelection};
use enroll_domain::{
    ConfirmationToken, Course, CourseId, CourseSession, Enrollment, EnrollmentId,
    EnrollmentStatus, EnrollmentTotal, Modality, PaymentMethod, PaymentPlan, PaymentStatus,
    Placement, PlanId, Selection, SelectionId, SessionId, SessionSchedule, Timestamp, UserId,
};
use std::collections::BTreeMap;
use time::Date;

#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    pub courses: BTreeMap<CourseId, Course>,
    pub sessions: BTreeMap<SessionId, CourseSession>,
    pub plans: BTreeMap<PlanId, PaymentPlan>,
    pub enrollments: BTreeMap<EnrollmentId, Enrollment>,
    pub selections: BTreeMap<SelectionId, Selection>,
    pub token_counter: u32,
    /// Number of placement writes, to check that settled sessions are left alone.
    pub placement_writes: usize,
    next_id: i64,
}

impl MemoryLedger {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_course(&mut self, code: &str, modality: Modality, bonus_limit: Option<u32>) -> CourseId {
        let id = CourseId::new(self.next_id());
        self.courses.insert(
            id,
            Course {
                id,
                code: code.to_string(),
                title: code.to_uppercase(),
                modality,
                bonus_limit,
                bonus_awarded: 0,
            },
        );
        id
    }

    pub fn add_session(&mut self, course_id: CourseId, code: &str, capacity: u32) -> SessionId {
        let id = SessionId::new(self.next_id());
        self.sessions.insert(
            id,
            CourseSession {
                id,
                course_id,
                code: code.to_string(),
                weekday: String::from("Sábado"),
                start_time: String::from("09:30"),
                end_time: String::from("11:00"),
                level: String::from("Ensino Médio"),
                capacity,
            },
        );
        id
    }

    pub fn add_plan(&mut self, course_id: CourseId, price_cents: i64, is_active: bool) -> PlanId {
        let id = PlanId::new(self.next_id());
        self.plans.insert(
            id,
            PaymentPlan {
                id,
                course_id,
                label: String::from("Mensal"),
                months: 1,
                price_cents,
                is_active,
            },
        );
        id
    }

    /// Inserts an enrollment directly in the given status.
    pub fn add_enrollment(&mut self, user: &str, status: EnrollmentStatus) -> EnrollmentId {
        let id = EnrollmentId::new(self.next_id());
        self.enrollments.insert(
            id,
            Enrollment {
                id,
                user_id: UserId::new(user),
                status,
                payment_method: Some(PaymentMethod::Pix),
                payment_status: PaymentStatus::Pending,
                total_amount_cents: 0,
                registration_fee_cents: 0,
                registration_fee_discount: false,
                has_waitlist: false,
                promo_bonus_granted: false,
                confirmation_day: None,
                token: None,
                created_at: Timestamp::from_micros(0),
            },
        );
        id
    }

    pub fn placement(&self, id: SelectionId) -> Placement {
        self.selections[&id].placement
    }

    pub fn enrollment_row(&self, id: EnrollmentId) -> &Enrollment {
        &self.enrollments[&id]
    }

    fn enrollment_mut(&mut self, id: EnrollmentId) -> Result<&mut Enrollment, CoreError> {
        self.enrollments
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("Enrollment", id))
    }

    fn selection_mut(&mut self, id: SelectionId) -> Result<&mut Selection, CoreError> {
        self.selections
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("Selection", id))
    }
}

impl Ledger for MemoryLedger {
    type Error = CoreError;

    fn course(&mut self, id: CourseId) -> Result<Option<Course>, CoreError> {
        Ok(self.courses.get(&id).cloned())
    }

    fn session(&mut self, id: SessionId) -> Result<Option<CourseSession>, CoreError> {
        Ok(self.sessions.get(&id).cloned())
    }

    fn plan(&mut self, id: PlanId) -> Result<Option<PaymentPlan>, CoreError> {
        Ok(self.plans.get(&id).cloned())
    }

    fn set_session_capacity(&mut self, id: SessionId, capacity: u32) -> Result<(), CoreError> {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.capacity = capacity;
        }
        Ok(())
    }

    fn set_session_schedule(
        &mut self,
        id: SessionId,
        schedule: &SessionSchedule,
    ) -> Result<(), CoreError> {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.weekday.clone_from(&schedule.weekday);
            session.start_time.clone_from(&schedule.start_time);
            session.end_time.clone_from(&schedule.end_time);
            session.level.clone_from(&schedule.level);
        }
        Ok(())
    }

    fn increment_bonus_if_below_limit(&mut self, id: CourseId) -> Result<bool, CoreError> {
        let Some(course) = self.courses.get_mut(&id) else {
            return Ok(false);
        };
        match course.bonus_limit {
            Some(limit) if course.bonus_awarded < limit => {
                course.bonus_awarded += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn set_bonus_awarded(&mut self, id: CourseId, value: u32) -> Result<(), CoreError> {
        if let Some(course) = self.courses.get_mut(&id) {
            course.bonus_awarded = value;
        }
        Ok(())
    }

    fn enrollment(&mut self, id: EnrollmentId) -> Result<Option<Enrollment>, CoreError> {
        Ok(self.enrollments.get(&id).cloned())
    }

    fn open_enrollment_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<Option<Enrollment>, CoreError> {
        Ok(self
            .enrollments
            .values()
            .filter(|e| &e.user_id == user_id && e.status.is_open())
            .max_by_key(|e| (e.created_at, e.id))
            .cloned())
    }

    fn insert_enrollment(
        &mut self,
        user_id: &UserId,
        created_at: Timestamp,
    ) -> Result<Enrollment, CoreError> {
        let id = EnrollmentId::new(self.next_id());
        let enrollment = Enrollment {
            id,
            user_id: user_id.clone(),
            status: EnrollmentStatus::Draft,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            total_amount_cents: 0,
            registration_fee_cents: 0,
            registration_fee_discount: false,
            has_waitlist: false,
            promo_bonus_granted: false,
            confirmation_day: None,
            token: None,
            created_at,
        };
        self.enrollments.insert(id, enrollment.clone());
        Ok(enrollment)
    }

    fn set_enrollment_status(
        &mut self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<(), CoreError> {
        self.enrollment_mut(id)?.status = status;
        Ok(())
    }

    fn set_payment_status(
        &mut self,
        id: EnrollmentId,
        status: PaymentStatus,
    ) -> Result<(), CoreError> {
        self.enrollment_mut(id)?.payment_status = status;
        Ok(())
    }

    fn set_payment_method(
        &mut self,
        id: EnrollmentId,
        method: PaymentMethod,
    ) -> Result<(), CoreError> {
        self.enrollment_mut(id)?.payment_method = Some(method);
        Ok(())
    }

    fn set_has_waitlist(&mut self, id: EnrollmentId, has_waitlist: bool) -> Result<(), CoreError> {
        self.enrollment_mut(id)?.has_waitlist = has_waitlist;
        Ok(())
    }

    fn set_totals(&mut self, id: EnrollmentId, totals: &EnrollmentTotal) -> Result<(), CoreError> {
        let enrollment = self.enrollment_mut(id)?;
        enrollment.total_amount_cents = totals.total_cents;
        enrollment.registration_fee_cents = totals.registration_fee.amount_cents;
        enrollment.registration_fee_discount = totals.registration_fee.discounted;
        Ok(())
    }

    fn set_confirmation(
        &mut self,
        id: EnrollmentId,
        day: Date,
        token: &ConfirmationToken,
    ) -> Result<(), CoreError> {
        let enrollment = self.enrollment_mut(id)?;
        enrollment.confirmation_day = Some(day);
        enrollment.token = Some(token.clone());
        Ok(())
    }

    fn mark_bonus_granted(&mut self, id: EnrollmentId) -> Result<(), CoreError> {
        self.enrollment_mut(id)?.promo_bonus_granted = true;
        Ok(())
    }

    fn next_token_sequence(&mut self) -> Result<u32, CoreError> {
        self.token_counter += 1;
        Ok(self.token_counter)
    }

    fn selection(&mut self, id: SelectionId) -> Result<Option<Selection>, CoreError> {
        Ok(self.selections.get(&id).cloned())
    }

    fn selection_for_course(
        &mut self,
        enrollment_id: EnrollmentId,
        course_id: CourseId,
    ) -> Result<Option<Selection>, CoreError> {
        Ok(self
            .selections
            .values()
            .find(|s| s.enrollment_id == enrollment_id && s.course_id == course_id)
            .cloned())
    }

    fn selections_for_enrollment(
        &mut self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<Selection>, CoreError> {
        Ok(self
            .selections
            .values()
            .filter(|s| s.enrollment_id == enrollment_id)
            .cloned()
            .collect())
    }

    fn eligible_selections(&mut self, session_id: SessionId) -> Result<Vec<Selection>, CoreError> {
        let mut eligible: Vec<Selection> = self
            .selections
            .values()
            .filter(|s| s.session_id == session_id)
            .filter(|s| {
                self.enrollments
                    .get(&s.enrollment_id)
                    .is_some_and(|e| e.status.is_active())
            })
            .cloned()
            .collect();
        eligible.sort_by_key(|s| (s.created_at, s.id));
        Ok(eligible)
    }

    fn inactive_selections(&mut self, session_id: SessionId) -> Result<Vec<Selection>, CoreError> {
        let mut inactive: Vec<Selection> = self
            .selections
            .values()
            .filter(|s| s.session_id == session_id)
            .filter(|s| {
                self.enrollments
                    .get(&s.enrollment_id)
                    .is_some_and(|e| !e.status.is_active())
            })
            .cloned()
            .collect();
        inactive.sort_by_key(|s| (s.created_at, s.id));
        Ok(inactive)
    }

    fn insert_selection(&mut self, selection: &NewSelection) -> Result<Selection, CoreError> {
        assert!(
            !self.selections.values().any(|s| {
                s.enrollment_id == selection.enrollment_id && s.course_id == selection.course_id
            }),
            "duplicate selection for course"
        );
        let id = SelectionId::new(self.next_id());
        let row = Selection {
            id,
            enrollment_id: selection.enrollment_id,
            course_id: selection.course_id,
            session_id: selection.session_id,
            plan_id: None,
            placement: selection.placement,
            created_at: selection.created_at,
        };
        self.selections.insert(id, row.clone());
        Ok(row)
    }

    fn move_selection(&mut self, id: SelectionId, session_id: SessionId) -> Result<(), CoreError> {
        self.selection_mut(id)?.session_id = session_id;
        Ok(())
    }

    fn set_selection_plan(
        &mut self,
        id: SelectionId,
        plan_id: Option<PlanId>,
    ) -> Result<(), CoreError> {
        self.selection_mut(id)?.plan_id = plan_id;
        Ok(())
    }

    fn set_placement(&mut self, id: SelectionId, placement: Placement) -> Result<(), CoreError> {
        self.selection_mut(id)?.placement = placement;
        self.placement_writes += 1;
        Ok(())
    }

    fn delete_selection(&mut self, id: SelectionId) -> Result<(), CoreError> {
        self.selections.remove(&id);
        Ok(())
    }
}
