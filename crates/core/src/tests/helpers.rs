// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::memory_ledger::MemoryLedger;
use crate::{Command, CommandOutcome, CoreError, EngineSettings, OperationContext, apply};
use enroll_domain::{
    CourseId, EnrollmentId, EnrollmentStatus, Modality, Placement, PlanId, SelectionId,
    SessionId,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// A course with two sessions, a plan, and a second course with its own session and plan.
pub struct Catalog {
    pub course: CourseId,
    pub session_x: SessionId,
    pub session_y: SessionId,
    pub plan: PlanId,
    pub other_course: CourseId,
    pub other_session: SessionId,
    pub other_plan: PlanId,
}

pub fn create_test_catalog(ledger: &mut MemoryLedger, capacity: u32) -> Catalog {
    let course = ledger.add_course("redacao", Modality::Redacao, Some(10));
    let session_x = ledger.add_session(course, "R1", capacity);
    let session_y = ledger.add_session(course, "R2", capacity);
    let plan = ledger.add_plan(course, 30_000, true);
    let other_course = ledger.add_course("exatas", Modality::Exatas, None);
    let other_session = ledger.add_session(other_course, "EX1", 24);
    let other_plan = ledger.add_plan(other_course, 35_000, true);
    Catalog {
        course,
        session_x,
        session_y,
        plan,
        other_course,
        other_session,
        other_plan,
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

pub fn run(ledger: &mut MemoryLedger, at: i64, command: Command) -> CommandOutcome {
    apply(ledger, &create_test_context(at), &command).unwrap()
}

pub fn try_run(
    ledger: &mut MemoryLedger,
    at: i64,
    command: Command,
) -> Result<CommandOutcome, CoreError> {
    apply(ledger, &create_test_context(at), &command)
}

pub fn select(
    ledger: &mut MemoryLedger,
    at: i64,
    enrollment_id: EnrollmentId,
    course_id: CourseId,
    session_id: SessionId,
) -> (SelectionId, Placement) {
    match run(
        ledger,
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

pub fn submitted(ledger: &mut MemoryLedger, user: &str) -> EnrollmentId {
    ledger.add_enrollment(user, EnrollmentStatus::Submitted)
}

pub fn waitlisted(position: u32) -> Placement {
    Placement::waitlisted(position).unwrap()
}
