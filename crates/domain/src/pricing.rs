// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Amount owed by an enrollment.
//!
//! All amounts are integer cents.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::DomainError;

/// How the registration fee is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationFeePolicy {
    /// Full registration fee in cents.
    pub fee_cents: i64,
    /// Percentage taken off the fee while the discount is active.
    pub discount_percent: u8,
    /// Last day of the month (inclusive) on which the discount applies.
    pub discount_deadline_day: u8,
}

impl RegistrationFeePolicy {
    /// Creates a validated policy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDiscountPercent` if the discount exceeds 100.
    pub const fn new(
        fee_cents: i64,
        discount_percent: u8,
        discount_deadline_day: u8,
    ) -> Result<Self, DomainError> {
        if discount_percent > 100 {
            return Err(DomainError::InvalidDiscountPercent(discount_percent));
        }
        Ok(Self {
            fee_cents,
            discount_percent,
            discount_deadline_day,
        })
    }

    /// Returns true if the discount applies on the given day.
    #[must_use]
    pub const fn discount_active(&self, today: Date) -> bool {
        today.day() <= self.discount_deadline_day
    }

    /// Computes the registration fee charged on the given day.
    #[must_use]
    pub fn fee_on(&self, today: Date) -> RegistrationFee {
        if self.discount_active(today) {
            let discount = self.fee_cents * i64::from(self.discount_percent) / 100;
            RegistrationFee {
                amount_cents: self.fee_cents - discount,
                discounted: true,
            }
        } else {
            RegistrationFee {
                amount_cents: self.fee_cents,
                discounted: false,
            }
        }
    }
}

impl Default for RegistrationFeePolicy {
    fn default() -> Self {
        Self {
            fee_cents: 15_000,
            discount_percent: 50,
            discount_deadline_day: 10,
        }
    }
}

/// The registration fee charged to an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationFee {
    pub amount_cents: i64,
    pub discounted: bool,
}

/// Everything an enrollment owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentTotal {
    /// Plan prices plus the registration fee.
    pub total_cents: i64,
    pub registration_fee: RegistrationFee,
}

/// Computes the total owed from the prices of the attached plans.
///
/// Selections without a plan contribute nothing.
#[must_use]
pub fn compute_total<I>(plan_prices: I, policy: &RegistrationFeePolicy, today: Date) -> EnrollmentTotal
where
    I: IntoIterator<Item = i64>,
{
    let registration_fee = policy.fee_on(today);
    let plans: i64 = plan_prices.into_iter().sum();

    EnrollmentTotal {
        total_cents: plans + registration_fee.amount_cents,
        registration_fee,
    }
}
