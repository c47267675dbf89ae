// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};

/// API request to choose a session for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectSessionRequest {
    /// The course being chosen.
    pub course_id: i64,
    /// The session being chosen.
    pub session_id: i64,
}

/// API request to attach a payment plan to a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachPlanRequest {
    /// The plan to attach.
    pub plan_id: i64,
}

/// API request to record the payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectPaymentMethodRequest {
    /// One of `PIX`, `CARD`, `BOLETO`, `PRESENTIAL` (any case).
    pub method: String,
}

/// API request to book the confirmation visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfirmationRequest {
    /// The requested day (`YYYY-MM-DD`).
    pub day: String,
}

/// API request to set a session's capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCapacityRequest {
    /// The new capacity.
    pub capacity: i64,
}

/// API request to edit a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSessionDetailsRequest {
    /// Day of the week label.
    pub weekday: String,
    /// Start time label.
    pub start_time: String,
    /// End time label.
    pub end_time: String,
    /// Audience level label.
    pub level: String,
    /// The new capacity.
    pub capacity: i64,
}

/// API request to move a selection to another session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSelectionRequest {
    /// The destination session.
    pub session_id: i64,
}

/// API request to overwrite a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// The new status name.
    pub status: String,
}

/// API request to correct a bonus counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBonusAwardedRequest {
    /// The new counter value.
    pub value: u32,
}

/// A payment plan as shown in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub plan_id: i64,
    pub label: String,
    pub months: u32,
    pub price_cents: i64,
}

/// A session with its occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: i64,
    pub course_id: i64,
    pub code: String,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub level: String,
    pub capacity: u32,
    /// Reserved seats held by active enrollments.
    pub reserved: u32,
    /// Seats left before newcomers are waitlisted.
    pub available: u32,
    /// Waitlisted selections of active enrollments.
    pub waitlist: u32,
}

/// A course with its sessions and plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub course_id: i64,
    pub code: String,
    pub title: String,
    pub modality: String,
    pub bonus_limit: Option<u32>,
    pub bonus_awarded: u32,
    pub sessions: Vec<SessionInfo>,
    pub plans: Vec<PlanInfo>,
}

/// API response listing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCoursesResponse {
    pub courses: Vec<CourseInfo>,
}

/// A selection and its placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionInfo {
    pub selection_id: i64,
    pub enrollment_id: i64,
    pub course_id: i64,
    pub session_id: i64,
    pub plan_id: Option<i64>,
    /// `RESERVED` or `WAITLIST`.
    pub status: String,
    pub waitlist_position: Option<u32>,
}

/// An enrollment without its selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentInfo {
    pub enrollment_id: i64,
    pub user_id: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub total_amount_cents: i64,
    pub registration_fee_cents: i64,
    pub registration_fee_discount: bool,
    pub has_waitlist: bool,
    pub promo_bonus_granted: bool,
    /// The booked confirmation day (`YYYY-MM-DD`).
    pub confirmation_day: Option<String>,
    pub token: Option<String>,
}

/// API response for an enrollment with its selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub enrollment: EnrollmentInfo,
    pub selections: Vec<SelectionInfo>,
}

/// API response listing enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnrollmentsResponse {
    pub enrollments: Vec<EnrollmentInfo>,
}

/// API response for a command that placed a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResponse {
    pub selection_id: i64,
    /// `RESERVED` or `WAITLIST`.
    pub status: String,
    pub waitlist_position: Option<u32>,
    /// A success message.
    pub message: String,
}

/// API response for a booked confirmation visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfirmationResponse {
    pub enrollment_id: i64,
    pub day: String,
    pub token: String,
}

/// API response for a payment status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub enrollment_id: i64,
    pub payment_status: String,
    /// What happened to the promotional bonus, if it was considered.
    pub bonus: Option<String>,
}

/// API response for a session's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQueueResponse {
    pub session_id: i64,
    pub entries: Vec<SelectionInfo>,
}

/// Generic response for writes without a richer payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// A success message.
    pub message: String,
}
