// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-model shapes assembled from several queries.

use enroll_domain::{
    Course, CourseSession, Enrollment, PaymentPlan, Selection, SessionId, SessionOccupancy,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::queries::occupancy::{PlacementCounts, occupancy_for};

/// A session with its derived occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOverview {
    pub session: CourseSession,
    pub occupancy: SessionOccupancy,
}

/// A course with its sessions and the plans open for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOverview {
    pub course: Course,
    pub sessions: Vec<SessionOverview>,
    pub plans: Vec<PaymentPlan>,
}

/// An enrollment with its selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentOverview {
    pub enrollment: Enrollment,
    pub selections: Vec<Selection>,
}

/// Groups sessions and plans under their courses, preserving query order.
pub fn course_overviews(
    courses: Vec<Course>,
    sessions: &[CourseSession],
    plans: &[PaymentPlan],
    counts: &BTreeMap<SessionId, PlacementCounts>,
) -> Vec<CourseOverview> {
    courses
        .into_iter()
        .map(|course| {
            let course_sessions: Vec<CourseSession> = sessions
                .iter()
                .filter(|session| session.course_id == course.id)
                .cloned()
                .collect();
            let occupancy: Vec<SessionOccupancy> = occupancy_for(&course_sessions, counts);
            let sessions: Vec<SessionOverview> = course_sessions
                .into_iter()
                .zip(occupancy)
                .map(|(session, occupancy)| SessionOverview { session, occupancy })
                .collect();
            let plans: Vec<PaymentPlan> = plans
                .iter()
                .filter(|plan| plan.course_id == course.id)
                .cloned()
                .collect();

            CourseOverview {
                course,
                sessions,
                plans,
            }
        })
        .collect()
}
