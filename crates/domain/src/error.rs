// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A course modality string is not recognized.
    #[error("Invalid course modality: {0}")]
    InvalidModality(String),
    /// An enrollment status string is not recognized.
    #[error("Invalid enrollment status: {0}")]
    InvalidEnrollmentStatus(String),
    /// A payment status string is not recognized.
    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(String),
    /// A payment method string is not recognized.
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),
    /// A persisted placement is inconsistent.
    #[error("Invalid placement: status '{status}' with waitlist position {position:?}")]
    InvalidPlacement {
        /// The stored status value.
        status: String,
        /// The stored waitlist position.
        position: Option<i64>,
    },
    /// Session capacity must be at least one.
    #[error("Invalid capacity: {capacity}. Must be at least 1")]
    InvalidCapacity {
        /// The rejected capacity value.
        capacity: i64,
    },
    /// A required text field is empty.
    #[error("Field '{field}' must not be empty")]
    EmptyField {
        /// The name of the empty field.
        field: &'static str,
    },
    /// The confirmation day falls outside the bookable range.
    #[error("Confirmation day {day} is outside the bookable range {earliest}..={latest}")]
    ConfirmationDayOutOfRange {
        /// The requested day.
        day: time::Date,
        /// The earliest bookable day.
        earliest: time::Date,
        /// The latest bookable day.
        latest: time::Date,
    },
    /// The registration discount percentage is above 100.
    #[error("Invalid discount percentage: {0}. Must be between 0 and 100")]
    InvalidDiscountPercent(u8),
    /// A bonus counter would exceed its limit.
    #[error("Bonus count {value} exceeds the configured limit {limit}")]
    BonusCountAboveLimit {
        /// The requested counter value.
        value: u32,
        /// The course bonus limit.
        limit: u32,
    },
}
