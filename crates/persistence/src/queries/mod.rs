// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.

pub mod catalog;
pub mod enrollments;
pub mod occupancy;
pub mod selections;

use enroll_domain::{ACTIVE_ENROLLMENT_STATUSES, EnrollmentStatus};

/// Stored names of the statuses whose selections compete for seats.
pub(crate) fn active_status_names() -> Vec<&'static str> {
    ACTIVE_ENROLLMENT_STATUSES
        .iter()
        .map(EnrollmentStatus::as_str)
        .collect()
}
