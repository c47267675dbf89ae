// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for course pre-enrollment.
//!
//! Handlers translate transport-neutral requests into engine commands,
//! enforce role and ownership checks, and map every lower-layer error onto
//! `ApiError`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    attach_plan, ensure_enrollment, force_waitlist_only, get_enrollment, get_session,
    get_session_queue, list_courses, list_enrollments, move_selection, remove_selection,
    schedule_confirmation, select_payment_method, select_session, set_bonus_awarded,
    set_session_capacity, submit_enrollment, update_enrollment_status, update_payment_status,
    update_session_details,
};
pub use request_response::{
    AttachPlanRequest, CourseInfo, EnrollmentInfo, EnrollmentResponse, ListCoursesResponse,
    ListEnrollmentsResponse, MoveSelectionRequest, PaymentStatusResponse, PlacementResponse,
    PlanInfo, ScheduleConfirmationRequest, ScheduleConfirmationResponse, SelectPaymentMethodRequest,
    SelectSessionRequest, SelectionInfo, SessionInfo, SessionQueueResponse, SetBonusAwardedRequest,
    SetCapacityRequest, UpdateSessionDetailsRequest, UpdateStatusRequest, WriteResponse,
};
