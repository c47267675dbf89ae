// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_catalog, run, select, submitted, try_run, waitlisted};
use crate::tests::memory_ledger::MemoryLedger;
use crate::{Command, CommandOutcome, CoreError};
use enroll_domain::{
    EnrollmentId, EnrollmentStatus, PaymentMethod, Placement, PlanId, UserId,
};
use time::macros::date;

fn ensure(ledger: &mut MemoryLedger, user: &str) -> EnrollmentId {
    match run(
        ledger,
        0,
        Command::EnsureEnrollment {
            user_id: UserId::new(user),
        },
    ) {
        CommandOutcome::Enrollment(enrollment) => enrollment.id,
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_ensure_enrollment_reuses_open_draft() {
    let mut ledger = MemoryLedger::default();

    let first = ensure(&mut ledger, "ana");
    let second = ensure(&mut ledger, "ana");

    assert_eq!(first, second);
    assert_eq!(ledger.enrollments.len(), 1);
    let row = ledger.enrollment_row(first);
    assert_eq!(row.status, EnrollmentStatus::Draft);
    // Discounted registration fee on the 2nd of the month.
    assert_eq!(row.registration_fee_cents, 7_500);
    assert!(row.registration_fee_discount);
    assert_eq!(row.total_amount_cents, 7_500);
}

#[test]
fn test_ensure_enrollment_starts_over_after_confirmation() {
    let mut ledger = MemoryLedger::default();
    let first = ensure(&mut ledger, "ana");
    ledger
        .enrollments
        .get_mut(&first)
        .unwrap()
        .status = EnrollmentStatus::Confirmed;

    let second = ensure(&mut ledger, "ana");

    assert_ne!(first, second);
}

#[test]
fn test_attach_plan_updates_total() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 2);
    let enrollment = ensure(&mut ledger, "ana");
    let (selection, _) = select(&mut ledger, 1, enrollment, catalog.course, catalog.session_x);
    let (other, _) = select(
        &mut ledger,
        2,
        enrollment,
        catalog.other_course,
        catalog.other_session,
    );

    run(
        &mut ledger,
        3,
        Command::AttachPlan {
            selection_id: selection,
            plan_id: catalog.plan,
            requester: enrollment,
        },
    );
    run(
        &mut ledger,
        4,
        Command::AttachPlan {
            selection_id: other,
            plan_id: catalog.other_plan,
            requester: enrollment,
        },
    );

    assert_eq!(
        ledger.enrollment_row(enrollment).total_amount_cents,
        30_000 + 35_000 + 7_500
    );
}

#[test]
fn test_attach_plan_rejects_foreign_selection() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 2);
    let owner = submitted(&mut ledger, "owner");
    let intruder = submitted(&mut ledger, "intruder");
    let (selection, _) = select(&mut ledger, 1, owner, catalog.course, catalog.session_x);

    let result = try_run(
        &mut ledger,
        2,
        Command::AttachPlan {
            selection_id: selection,
            plan_id: catalog.plan,
            requester: intruder,
        },
    );

    assert_eq!(
        result,
        Err(CoreError::PermissionDenied {
            action: "attach_plan"
        })
    );
}

#[test]
fn test_attach_plan_rejects_plan_of_other_course() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 2);
    let owner = submitted(&mut ledger, "owner");
    let (selection, _) = select(&mut ledger, 1, owner, catalog.course, catalog.session_x);

    let result = try_run(
        &mut ledger,
        2,
        Command::AttachPlan {
            selection_id: selection,
            plan_id: catalog.other_plan,
            requester: owner,
        },
    );

    assert_eq!(
        result,
        Err(CoreError::IncompatiblePlan {
            plan: catalog.other_plan,
            course: catalog.course,
        })
    );
    assert_eq!(ledger.selections[&selection].plan_id, None);
}

#[test]
fn test_attach_plan_rejects_inactive_or_missing_plan() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 2);
    let retired = ledger.add_plan(catalog.course, 10_000, false);
    let owner = submitted(&mut ledger, "owner");
    let (selection, _) = select(&mut ledger, 1, owner, catalog.course, catalog.session_x);

    for plan_id in [retired, PlanId::new(404)] {
        let result = try_run(
            &mut ledger,
            2,
            Command::AttachPlan {
                selection_id: selection,
                plan_id,
                requester: owner,
            },
        );
        assert!(matches!(
            result,
            Err(CoreError::NotFound { entity: "Plan", .. })
        ));
    }
}

#[test]
fn test_remove_selection_requires_ownership() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 2);
    let owner = submitted(&mut ledger, "owner");
    let intruder = submitted(&mut ledger, "intruder");
    let (selection, _) = select(&mut ledger, 1, owner, catalog.course, catalog.session_x);

    let result = try_run(
        &mut ledger,
        2,
        Command::RemoveSelection {
            selection_id: selection,
            requester: intruder,
        },
    );

    assert_eq!(
        result,
        Err(CoreError::PermissionDenied {
            action: "remove_selection"
        })
    );
    assert!(ledger.selections.contains_key(&selection));
}

#[test]
fn test_submit_requires_complete_enrollment() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 2);
    let enrollment = ensure(&mut ledger, "ana");
    let submit = Command::SubmitEnrollment {
        enrollment_id: enrollment,
    };

    assert_eq!(
        try_run(&mut ledger, 1, submit.clone()),
        Err(CoreError::IncompleteEnrollment("no course selected"))
    );

    let (selection, _) = select(&mut ledger, 2, enrollment, catalog.course, catalog.session_x);
    assert_eq!(
        try_run(&mut ledger, 3, submit.clone()),
        Err(CoreError::IncompleteEnrollment(
            "a selection has no payment plan"
        ))
    );

    run(
        &mut ledger,
        4,
        Command::AttachPlan {
            selection_id: selection,
            plan_id: catalog.plan,
            requester: enrollment,
        },
    );
    assert_eq!(
        try_run(&mut ledger, 5, submit.clone()),
        Err(CoreError::IncompleteEnrollment("no payment method selected"))
    );

    run(
        &mut ledger,
        6,
        Command::SelectPaymentMethod {
            enrollment_id: enrollment,
            method: PaymentMethod::Boleto,
        },
    );
    assert_eq!(try_run(&mut ledger, 7, submit), Ok(CommandOutcome::Updated));
    assert_eq!(
        ledger.enrollment_row(enrollment).status,
        EnrollmentStatus::Submitted
    );
}

#[test]
fn test_submit_rejected_after_review_started() {
    let mut ledger = MemoryLedger::default();
    let enrollment = ledger.add_enrollment("ana", EnrollmentStatus::UnderReview);

    let result = try_run(
        &mut ledger,
        1,
        Command::SubmitEnrollment {
            enrollment_id: enrollment,
        },
    );

    assert_eq!(
        result,
        Err(CoreError::InvalidStatusTransition {
            from: EnrollmentStatus::UnderReview,
            to: EnrollmentStatus::Submitted,
        })
    );
}

#[test]
fn test_submission_enters_allocation_in_queue_order() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 1);
    let early = ledger.add_enrollment("early", EnrollmentStatus::Draft);
    let late = submitted(&mut ledger, "late");
    let (early_sel, _) = select(&mut ledger, 1, early, catalog.course, catalog.session_x);
    let (late_sel, late_placement) = select(&mut ledger, 2, late, catalog.course, catalog.session_x);
    assert_eq!(late_placement, Placement::Reserved);
    run(
        &mut ledger,
        3,
        Command::AttachPlan {
            selection_id: early_sel,
            plan_id: catalog.plan,
            requester: early,
        },
    );

    run(
        &mut ledger,
        4,
        Command::SubmitEnrollment {
            enrollment_id: early,
        },
    );

    assert_eq!(ledger.placement(early_sel), Placement::Reserved);
    assert_eq!(ledger.placement(late_sel), waitlisted(1));
    assert!(ledger.enrollment_row(late).has_waitlist);
}

#[test]
fn test_rejection_releases_seat() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 1);
    let first = submitted(&mut ledger, "first");
    let second = submitted(&mut ledger, "second");
    select(&mut ledger, 1, first, catalog.course, catalog.session_x);
    let (second_sel, _) = select(&mut ledger, 2, second, catalog.course, catalog.session_x);

    run(
        &mut ledger,
        3,
        Command::UpdateEnrollmentStatus {
            enrollment_id: first,
            status: EnrollmentStatus::Rejected,
        },
    );

    assert_eq!(ledger.placement(second_sel), Placement::Reserved);
    assert!(!ledger.enrollment_row(second).has_waitlist);
}

#[test]
fn test_status_change_within_active_set_keeps_placements() {
    let mut ledger = MemoryLedger::default();
    let catalog = create_test_catalog(&mut ledger, 1);
    let first = submitted(&mut ledger, "first");
    let (sel, _) = select(&mut ledger, 1, first, catalog.course, catalog.session_x);
    let writes = ledger.placement_writes;

    run(
        &mut ledger,
        2,
        Command::UpdateEnrollmentStatus {
            enrollment_id: first,
            status: EnrollmentStatus::UnderReview,
        },
    );

    assert_eq!(ledger.placement(sel), Placement::Reserved);
    assert_eq!(ledger.placement_writes, writes);
}

#[test]
fn test_schedule_confirmation_issues_token_once() {
    let mut ledger = MemoryLedger::default();
    let enrollment = submitted(&mut ledger, "ana");
    ledger.token_counter = 41;

    let first = run(
        &mut ledger,
        1,
        Command::ScheduleConfirmation {
            enrollment_id: enrollment,
            day: date!(2026 - 01 - 06),
        },
    );
    let second = run(
        &mut ledger,
        2,
        Command::ScheduleConfirmation {
            enrollment_id: enrollment,
            day: date!(2026 - 01 - 08),
        },
    );

    let CommandOutcome::Scheduled { token, .. } = &first else {
        panic!("unexpected outcome {first:?}");
    };
    assert_eq!(token.code(), "R00042");
    assert_eq!(
        second,
        CommandOutcome::Scheduled {
            day: date!(2026 - 01 - 08),
            token: token.clone(),
        }
    );
    assert_eq!(ledger.token_counter, 42);
    let row = ledger.enrollment_row(enrollment);
    assert_eq!(row.status, EnrollmentStatus::WaitingPayment);
    assert_eq!(row.confirmation_day, Some(date!(2026 - 01 - 08)));
    assert_eq!(row.token.as_ref(), Some(token));
}

#[test]
fn test_schedule_confirmation_rejects_drafts_and_bad_days() {
    let mut ledger = MemoryLedger::default();
    let draft = ledger.add_enrollment("draft", EnrollmentStatus::Draft);
    let enrollment = submitted(&mut ledger, "ana");

    let result = try_run(
        &mut ledger,
        1,
        Command::ScheduleConfirmation {
            enrollment_id: draft,
            day: date!(2026 - 01 - 06),
        },
    );
    assert!(matches!(
        result,
        Err(CoreError::InvalidStatusTransition { .. })
    ));

    for day in [date!(2026 - 01 - 04), date!(2027 - 01 - 03)] {
        let result = try_run(
            &mut ledger,
            2,
            Command::ScheduleConfirmation {
                enrollment_id: enrollment,
                day,
            },
        );
        assert!(matches!(result, Err(CoreError::InvalidConfirmationDate(_))));
    }
    assert_eq!(ledger.token_counter, 0);
    assert_eq!(
        ledger.enrollment_row(enrollment).status,
        EnrollmentStatus::Submitted
    );
}
