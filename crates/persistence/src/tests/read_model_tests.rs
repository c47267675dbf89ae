// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_catalog, enroll_student, ensure, run, select};
use crate::{Persistence, PersistenceError};
use enroll::Command;
use enroll_domain::{EnrollmentStatus, SessionOccupancy};

#[test]
fn test_drafts_do_not_count_towards_occupancy() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let catalog = create_test_catalog(&mut persistence, 2);
    enroll_student(&mut persistence, 1, "s1", catalog.course, catalog.session_x, catalog.plan);
    let draft = ensure(&mut persistence, 2, "s2");
    select(&mut persistence, 2, draft, catalog.course, catalog.session_x);

    let occupancy: SessionOccupancy = persistence.session_occupancy(catalog.session_x).unwrap();

    assert_eq!(occupancy.capacity, 2);
    assert_eq!(occupancy.reserved, 1);
    assert_eq!(occupancy.available, 1);
    assert_eq!(occupancy.waitlist, 0);
}

#[test]
fn test_list_courses_groups_sessions_with_occupancy() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let catalog = create_test_catalog(&mut persistence, 1);
    enroll_student(&mut persistence, 1, "s1", catalog.course, catalog.session_x, catalog.plan);
    enroll_student(&mut persistence, 2, "s2", catalog.course, catalog.session_x, catalog.plan);

    let courses = persistence.list_courses().unwrap();
    let main = courses
        .iter()
        .find(|c| c.course.id == catalog.course)
        .unwrap();

    assert_eq!(main.sessions.len(), 2);
    assert_eq!(main.plans.len(), 1);
    let x = main
        .sessions
        .iter()
        .find(|s| s.session.id == catalog.session_x)
        .unwrap();
    assert_eq!(x.occupancy.reserved, 1);
    assert_eq!(x.occupancy.waitlist, 1);
    assert_eq!(x.occupancy.available, 0);
    let y = main
        .sessions
        .iter()
        .find(|s| s.session.id == catalog.session_y)
        .unwrap();
    assert_eq!(y.occupancy.reserved, 0);
    assert_eq!(y.occupancy.available, 1);
}

#[test]
fn test_session_queue_is_in_arrival_order() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let catalog = create_test_catalog(&mut persistence, 1);
    let (_, sel1) = enroll_student(&mut persistence, 1, "s1", catalog.course, catalog.session_x, catalog.plan);
    let (_, sel2) = enroll_student(&mut persistence, 2, "s2", catalog.course, catalog.session_x, catalog.plan);
    let (_, sel3) = enroll_student(&mut persistence, 3, "s3", catalog.course, catalog.session_x, catalog.plan);

    let queue: Vec<_> = persistence
        .session_queue(catalog.session_x)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();

    assert_eq!(queue, vec![sel1, sel2, sel3]);
}

#[test]
fn test_unknown_session_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_catalog(&mut persistence, 1);

    let result = persistence.session_occupancy(enroll_domain::SessionId::new(999));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_list_enrollments_filters_by_status() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let catalog = create_test_catalog(&mut persistence, 2);
    let (submitted, _) = enroll_student(&mut persistence, 1, "s1", catalog.course, catalog.session_x, catalog.plan);
    ensure(&mut persistence, 2, "s2");
    let (rejected, _) = enroll_student(&mut persistence, 3, "s3", catalog.course, catalog.session_x, catalog.plan);
    run(
        &mut persistence,
        4,
        Command::UpdateEnrollmentStatus {
            enrollment_id: rejected,
            status: EnrollmentStatus::Rejected,
        },
    );

    let all = persistence.list_enrollments(None).unwrap();
    let only_submitted = persistence
        .list_enrollments(Some(EnrollmentStatus::Submitted))
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(only_submitted.len(), 1);
    assert_eq!(only_submitted[0].id, submitted);
}
