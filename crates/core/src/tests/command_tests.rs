// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, CoreError};
use enroll_domain::{
    CourseId, DomainError, EnrollmentId, EnrollmentStatus, SelectionId, SessionId, UserId,
};
use time::macros::date;

#[test]
fn test_student_commands_do_not_require_admin() {
    let commands = [
        Command::EnsureEnrollment {
            user_id: UserId::new("ana"),
        },
        Command::RemoveSelection {
            selection_id: SelectionId::new(1),
            requester: EnrollmentId::new(1),
        },
        Command::ScheduleConfirmation {
            enrollment_id: EnrollmentId::new(1),
            day: date!(2026 - 01 - 06),
        },
    ];
    for command in commands {
        assert!(!command.requires_admin(), "{}", command.name());
    }
}

#[test]
fn test_admin_commands_require_admin() {
    let commands = [
        Command::ForceWaitlistOnly {
            session_id: SessionId::new(1),
        },
        Command::UpdateEnrollmentStatus {
            enrollment_id: EnrollmentId::new(1),
            status: EnrollmentStatus::Confirmed,
        },
        Command::SetBonusAwarded {
            course_id: CourseId::new(1),
            value: 0,
        },
    ];
    for command in commands {
        assert!(command.requires_admin(), "{}", command.name());
    }
}

#[test]
fn test_domain_errors_map_to_specific_core_errors() {
    assert_eq!(
        CoreError::from(DomainError::InvalidCapacity { capacity: 0 }),
        CoreError::InvalidCapacity(0)
    );
    assert!(matches!(
        CoreError::from(DomainError::BonusCountAboveLimit {
            value: 11,
            limit: 10
        }),
        CoreError::InvalidBonusCount(_)
    ));
    assert!(matches!(
        CoreError::from(DomainError::InvalidModality(String::from("X"))),
        CoreError::DomainViolation(_)
    ));
}

#[test]
fn test_not_found_message() {
    let err = CoreError::not_found("Session", SessionId::new(7));
    assert_eq!(err.to_string(), "Session 7 not found");
}
