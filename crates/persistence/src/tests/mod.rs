// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod read_model_tests;

use crate::{Persistence, SeededCourse};
use enroll::{Command, CommandOutcome, EngineSettings, OperationContext};
use enroll_domain::{
    CourseId, CourseSeed, EnrollmentId, Modality, PaymentMethod, Placement, PlanId, PlanSeed,
    SelectionId, SessionId, SessionSeed, UserId,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A course with two sessions and one plan, plus a bonus-free second course.
pub struct TestCatalog {
    pub course: CourseId,
    pub session_x: SessionId,
    pub session_y: SessionId,
    pub plan: PlanId,
    pub other_course: CourseId,
    pub other_session: SessionId,
    pub other_plan: PlanId,
}

fn create_test_session(code: &'static str, capacity: u32) -> SessionSeed {
    SessionSeed {
        code,
        weekday: "Sábado",
        start_time: "09:30",
        end_time: "11:00",
        level: "Ensino Médio",
        capacity,
    }
}

fn create_test_plan(price_cents: i64) -> PlanSeed {
    PlanSeed {
        label: "Mensal",
        months: 1,
        price_cents,
    }
}

pub fn create_test_seeds(capacity: u32, bonus_limit: Option<u32>) -> Vec<CourseSeed> {
    vec![
        CourseSeed {
            code: "redacao",
            title: "Redação",
            modality: Modality::Redacao,
            bonus_limit,
            sessions: vec![
                create_test_session("R1", capacity),
                create_test_session("R2", capacity),
            ],
            plans: vec![create_test_plan(30_000)],
        },
        CourseSeed {
            code: "exatas",
            title: "Exatas",
            modality: Modality::Exatas,
            bonus_limit: None,
            sessions: vec![create_test_session("EX1", 24)],
            plans: vec![create_test_plan(35_000)],
        },
    ]
}

pub fn create_test_catalog(persistence: &mut Persistence, capacity: u32) -> TestCatalog {
    create_test_catalog_with_bonus(persistence, capacity, Some(10))
}

pub fn create_test_catalog_with_bonus(
    persistence: &mut Persistence,
    capacity: u32,
    bonus_limit: Option<u32>,
) -> TestCatalog {
    let seeds: Vec<CourseSeed> = create_test_seeds(capacity, bonus_limit);
    let main: SeededCourse = persistence.add_course(&seeds[0]).unwrap();
    let other: SeededCourse = persistence.add_course(&seeds[1]).unwrap();
    TestCatalog {
        course: main.course_id,
        session_x: main.session_ids[0],
        session_y: main.session_ids[1],
        plan: main.plan_ids[0],
        other_course: other.course_id,
        other_session: other.session_ids[0],
        other_plan: other.plan_ids[0],
    }
}

/// A context `offset_secs` after a fixed instant on the 2nd of the month.
pub fn create_test_context(offset_secs: i64) -> OperationContext {
    let base: OffsetDateTime = datetime!(2026-01-02 12:00:00 UTC);
    OperationContext::new(
        EngineSettings::default(),
        base + Duration::seconds(offset_secs),
    )
}

pub fn run(persistence: &mut Persistence, at: i64, command: Command) -> CommandOutcome {
    persistence
        .execute(&create_test_context(at), &command)
        .unwrap()
}

pub fn ensure(persistence: &mut Persistence, at: i64, user: &str) -> EnrollmentId {
    match run(
        persistence,
        at,
        Command::EnsureEnrollment {
            user_id: UserId::new(user),
        },
    ) {
        CommandOutcome::Enrollment(enrollment) => enrollment.id,
        other => panic!("unexpected outcome {other:?}"),
    }
}

pub fn select(
    persistence: &mut Persistence,
    at: i64,
    enrollment_id: EnrollmentId,
    course_id: CourseId,
    session_id: SessionId,
) -> (SelectionId, Placement) {
    match run(
        persistence,
        at,
        Command::SelectSession {
            enrollment_id,
            course_id,
            session_id,
        },
    ) {
        CommandOutcome::Placed {
            selection_id,
            placement,
        } => (selection_id, placement),
        other => panic!("unexpected outcome {other:?}"),
    }
}

/// Takes a user through the whole draft flow and submits the enrollment.
pub fn enroll_student(
    persistence: &mut Persistence,
    at: i64,
    user: &str,
    course_id: CourseId,
    session_id: SessionId,
    plan_id: PlanId,
) -> (EnrollmentId, SelectionId) {
    let enrollment_id: EnrollmentId = ensure(persistence, at, user);
    let (selection_id, _) = select(persistence, at, enrollment_id, course_id, session_id);
    run(
        persistence,
        at,
        Command::AttachPlan {
            selection_id,
            plan_id,
            requester: enrollment_id,
        },
    );
    run(
        persistence,
        at,
        Command::SelectPaymentMethod {
            enrollment_id,
            method: PaymentMethod::Pix,
        },
    );
    run(
        persistence,
        at,
        Command::SubmitEnrollment { enrollment_id },
    );
    (enrollment_id, selection_id)
}

pub fn placement_of(persistence: &mut Persistence, selection_id: SelectionId) -> Placement {
    let selection = crate::queries::selections::find_selection(&mut persistence.conn, selection_id)
        .unwrap()
        .expect("selection exists");
    selection.placement
}

pub fn waitlisted(position: u32) -> Placement {
    Placement::waitlisted(position).unwrap()
}

/// A database file path unique to this test run. Removed on drop.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new(name: &str) -> Self {
        let id: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir().join(format!(
            "enroll_{name}_{}_{id}.db",
            std::process::id()
        ));
        let db = Self { path };
        db.remove_files();
        db
    }

    fn remove_files(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        self.remove_files();
    }
}
