// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::{Date, Duration};

/// How far ahead a confirmation appointment may be booked.
pub const CONFIRMATION_BOOKING_WINDOW_DAYS: i64 = 365;

/// Validates an administrator-requested session capacity.
///
/// # Errors
///
/// Returns `DomainError::InvalidCapacity` if the capacity is below 1 or does
/// not fit the capacity type.
pub fn validate_capacity(capacity: i64) -> Result<u32, DomainError> {
    if capacity < 1 {
        return Err(DomainError::InvalidCapacity { capacity });
    }
    u32::try_from(capacity).map_err(|_| DomainError::InvalidCapacity { capacity })
}

/// Schedule fields of a session, trimmed and checked for emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSchedule {
    pub weekday: String,
    pub start_time: String,
    pub end_time: String,
    pub level: String,
}

impl SessionSchedule {
    /// Trims every field and rejects empty ones.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyField` naming the first empty field.
    pub fn new(
        weekday: &str,
        start_time: &str,
        end_time: &str,
        level: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            weekday: non_empty("weekday", weekday)?,
            start_time: non_empty("start_time", start_time)?,
            end_time: non_empty("end_time", end_time)?,
            level: non_empty("level", level)?,
        })
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Validates a requested confirmation day.
///
/// The day must be on or after `earliest` and no more than
/// [`CONFIRMATION_BOOKING_WINDOW_DAYS`] after `today`.
///
/// # Errors
///
/// Returns `DomainError::ConfirmationDayOutOfRange` otherwise.
pub fn validate_confirmation_day(
    day: Date,
    today: Date,
    earliest: Date,
) -> Result<(), DomainError> {
    let latest = today.saturating_add(Duration::days(CONFIRMATION_BOOKING_WINDOW_DAYS));
    if day < earliest || day > latest {
        return Err(DomainError::ConfirmationDayOutOfRange {
            day,
            earliest,
            latest,
        });
    }
    Ok(())
}

/// Validates a manual correction of a course bonus counter.
///
/// # Errors
///
/// Returns `DomainError::BonusCountAboveLimit` if the course has a limit and
/// the value exceeds it.
pub const fn validate_bonus_count(value: u32, limit: Option<u32>) -> Result<(), DomainError> {
    match limit {
        Some(limit) if value > limit => Err(DomainError::BonusCountAboveLimit { value, limit }),
        _ => Ok(()),
    }
}
