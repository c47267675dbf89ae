// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocation;
mod catalog;
mod error;
mod occupancy;
mod placement;
mod pricing;
mod token;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use allocation::{Assignment, Candidate, SessionAllocation, allocate, allocate_session};
pub use catalog::{CourseSeed, PlanSeed, SessionSeed, default_catalog};
pub use error::DomainError;
pub use occupancy::SessionOccupancy;
pub use placement::{Placement, RESERVED, WAITLIST};
pub use pricing::{EnrollmentTotal, RegistrationFee, RegistrationFeePolicy, compute_total};
pub use token::ConfirmationToken;
pub use types::{
    ACTIVE_ENROLLMENT_STATUSES, Course, CourseId, CourseSession, Enrollment, EnrollmentId,
    EnrollmentStatus, Modality, PaymentMethod, PaymentPlan, PaymentStatus, PlanId, Selection,
    SelectionId, SessionId, Timestamp, UserId,
};
pub use validation::{
    CONFIRMATION_BOOKING_WINDOW_DAYS, SessionSchedule, validate_bonus_count, validate_capacity,
    validate_confirmation_day,
};
