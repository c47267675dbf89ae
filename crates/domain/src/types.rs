// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::placement::Placement;
use crate::token::ConfirmationToken;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Declares a numeric record identifier assigned by the store.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw store identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw store identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a course.
    CourseId
);
record_id!(
    /// Identifier of a course session (a class slot with its own capacity).
    SessionId
);
record_id!(
    /// Identifier of a payment plan.
    PlanId
);
record_id!(
    /// Identifier of a pre-enrollment.
    EnrollmentId
);
record_id!(
    /// Identifier of a selection in the ledger.
    SelectionId
);

/// Opaque identifier of the user owning an enrollment.
///
/// Supplied by the identity collaborator; never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point in time with microsecond resolution, stored as microseconds since the Unix epoch.
///
/// Used as the first-come-first-served ordering key of selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wraps a raw microsecond count.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Converts a wall-clock instant, saturating outside the representable range.
    #[must_use]
    pub fn from_datetime(instant: OffsetDateTime) -> Self {
        let micros: i128 = instant.unix_timestamp_nanos() / 1_000;
        Self(i64::try_from(micros).unwrap_or(if micros < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Returns the raw microsecond count.
    #[must_use]
    pub const fn as_micros(self) -> i64 {
        self.0
    }
}

/// Subject track of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    /// Essay writing.
    Redacao,
    /// Chemistry, physics and mathematics.
    Exatas,
    /// Mathematics.
    Matematica,
    /// Grammar.
    Gramatica,
}

impl Modality {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redacao => "REDACAO",
            Self::Exatas => "EXATAS",
            Self::Matematica => "MATEMATICA",
            Self::Gramatica => "GRAMATICA",
        }
    }
}

impl FromStr for Modality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REDACAO" => Ok(Self::Redacao),
            "EXATAS" => Ok(Self::Exatas),
            "MATEMATICA" => Ok(Self::Matematica),
            "GRAMATICA" => Ok(Self::Gramatica),
            _ => Err(DomainError::InvalidModality(s.to_string())),
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate lifecycle status of a pre-enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Being filled in by the student. Not counted toward capacity.
    #[default]
    Draft,
    /// Sent by the student.
    Submitted,
    /// Being reviewed by an administrator.
    UnderReview,
    /// Confirmation scheduled, waiting for payment.
    WaitingPayment,
    /// Enrollment confirmed.
    Confirmed,
    /// Parked by an administrator on the enrollment-level waitlist.
    Waitlisted,
    /// Rejected by an administrator.
    Rejected,
}

/// Enrollment statuses whose selections count toward session capacity.
pub const ACTIVE_ENROLLMENT_STATUSES: [EnrollmentStatus; 4] = [
    EnrollmentStatus::Submitted,
    EnrollmentStatus::UnderReview,
    EnrollmentStatus::WaitingPayment,
    EnrollmentStatus::Confirmed,
];

impl EnrollmentStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::WaitingPayment => "WAITING_PAYMENT",
            Self::Confirmed => "CONFIRMED",
            Self::Waitlisted => "WAITLISTED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if selections of an enrollment in this status are eligible for allocation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        match self {
            Self::Submitted | Self::UnderReview | Self::WaitingPayment | Self::Confirmed => true,
            Self::Draft | Self::Waitlisted | Self::Rejected => false,
        }
    }

    /// Returns true if the student may still work on an enrollment in this status.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Confirmed | Self::Rejected)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "UNDER_REVIEW" => Ok(Self::UnderReview),
            "WAITING_PAYMENT" => Ok(Self::WaitingPayment),
            "CONFIRMED" => Ok(Self::Confirmed),
            "WAITLISTED" => Ok(Self::Waitlisted),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidEnrollmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No payment registered yet.
    #[default]
    Pending,
    /// Payment confirmed by an administrator.
    Confirmed,
}

impl PaymentStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the student intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Instant bank transfer.
    Pix,
    /// Credit or debit card.
    Card,
    /// Bank slip.
    Boleto,
    /// Paid in person at the confirmation appointment.
    Presential,
}

impl PaymentMethod {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Card => "CARD",
            Self::Boleto => "BOLETO",
            Self::Presential => "PRESENTIAL",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PIX" => Ok(Self::Pix),
            "CARD" => Ok(Self::Card),
            "BOLETO" => Ok(Self::Boleto),
            "PRESENTIAL" => Ok(Self::Presential),
            _ => Err(DomainError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Unique slug (e.g. `redacao`).
    pub code: String,
    pub title: String,
    pub modality: Modality,
    /// Cap on the promotional bonus. `None` means the course grants no bonus.
    pub bonus_limit: Option<u32>,
    /// Bonuses granted so far. Never exceeds `bonus_limit`.
    pub bonus_awarded: u32,
}

impl Course {
    /// Returns true if another bonus can still be granted for this course.
    #[must_use]
    pub fn bonus_has_room(&self) -> bool {
        self.bonus_limit
            .is_some_and(|limit| self.bonus_awarded < limit)
    }
}

/// A weekly class slot of a course with its own capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSession {
    pub id: SessionId,
    pub course_id: CourseId,
    pub code: String,
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub level: String,
    pub capacity: u32,
}

/// A payment plan offered for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: PlanId,
    pub course_id: CourseId,
    pub label: String,
    pub months: u32,
    /// Price in cents.
    pub price_cents: i64,
    pub is_active: bool,
}

/// A student's pre-enrollment and its aggregate fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub status: EnrollmentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    /// Sum of attached plan prices plus the registration fee, in cents.
    pub total_amount_cents: i64,
    pub registration_fee_cents: i64,
    pub registration_fee_discount: bool,
    /// True iff any selection of this enrollment is waitlisted.
    pub has_waitlist: bool,
    pub promo_bonus_granted: bool,
    pub confirmation_day: Option<Date>,
    /// Assigned once when the confirmation is first scheduled.
    pub token: Option<ConfirmationToken>,
    pub created_at: Timestamp,
}

/// A student's claim on one session of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: SelectionId,
    pub enrollment_id: EnrollmentId,
    pub course_id: CourseId,
    pub session_id: SessionId,
    pub plan_id: Option<PlanId>,
    pub placement: Placement,
    /// Queue order in whichever session the selection points at.
    pub created_at: Timestamp,
}
