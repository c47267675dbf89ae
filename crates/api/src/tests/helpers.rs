// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use enroll::{EngineSettings, OperationContext};
use enroll_domain::{CourseSeed, Modality, PlanSeed, SessionSeed, UserId};
use enroll_persistence::{Persistence, SeededCourse};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{
    AttachPlanRequest, AuthenticatedActor, Role, SelectPaymentMethodRequest,
    SelectSessionRequest, attach_plan, ensure_enrollment, select_payment_method, select_session,
    submit_enrollment,
};

pub struct TestCatalog {
    pub course_id: i64,
    pub session_ids: Vec<i64>,
    pub plan_id: i64,
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(UserId::new("admin-1"), Role::Admin)
}

pub fn create_test_student(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(UserId::new(id), Role::Student)
}

pub fn create_test_context(offset_secs: i64) -> OperationContext {
    let base: OffsetDateTime = datetime!(2026-01-02 12:00:00 UTC);
    OperationContext::new(
        EngineSettings::default(),
        base + Duration::seconds(offset_secs),
    )
}

/// An in-memory store holding one bonus course with two sessions.
pub fn setup_test_persistence(capacity: u32) -> (Persistence, TestCatalog) {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create persistence");
    let session = |code: &'static str| SessionSeed {
        code,
        weekday: "Terça-feira",
        start_time: "18:00",
        end_time: "19:30",
        level: "Ensino Médio",
        capacity,
    };
    let seeded: SeededCourse = persistence
        .add_course(&CourseSeed {
            code: "redacao",
            title: "Redação",
            modality: Modality::Redacao,
            bonus_limit: Some(1),
            sessions: vec![session("R1"), session("R2")],
            plans: vec![PlanSeed {
                label: "Mensal",
                months: 1,
                price_cents: 30_000,
            }],
        })
        .expect("Failed to seed course");
    let catalog = TestCatalog {
        course_id: seeded.course_id.value(),
        session_ids: seeded.session_ids.iter().map(|id| id.value()).collect(),
        plan_id: seeded.plan_ids[0].value(),
    };
    (persistence, catalog)
}

/// Drives a student from a fresh draft to a submitted enrollment.
///
/// Returns the enrollment and selection IDs.
pub fn submit_student(
    persistence: &mut Persistence,
    catalog: &TestCatalog,
    student: &AuthenticatedActor,
    session_id: i64,
    at: i64,
) -> (i64, i64) {
    let ctx = create_test_context(at);
    let enrollment_id = ensure_enrollment(persistence, &ctx, student)
        .unwrap()
        .enrollment
        .enrollment_id;
    let placement = select_session(
        persistence,
        &ctx,
        student,
        enrollment_id,
        &SelectSessionRequest {
            course_id: catalog.course_id,
            session_id,
        },
    )
    .unwrap();
    attach_plan(
        persistence,
        &ctx,
        student,
        enrollment_id,
        placement.selection_id,
        &AttachPlanRequest {
            plan_id: catalog.plan_id,
        },
    )
    .unwrap();
    select_payment_method(
        persistence,
        &ctx,
        student,
        enrollment_id,
        &SelectPaymentMethodRequest {
            method: String::from("pix"),
        },
    )
    .unwrap();
    submit_enrollment(persistence, &ctx, student, enrollment_id).unwrap();
    (enrollment_id, placement.selection_id)
}
