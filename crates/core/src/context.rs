// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use enroll_domain::{Modality, RegistrationFeePolicy, Timestamp};
use time::macros::date;
use time::{Date, OffsetDateTime};

/// Deployment-wide settings the engine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Registration fee and its early-bird discount.
    pub fee_policy: RegistrationFeePolicy,
    /// Modality whose course carries the promotional bonus.
    pub bonus_modality: Modality,
    /// First day a confirmation visit can be booked.
    pub earliest_confirmation_day: Date,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fee_policy: RegistrationFeePolicy::default(),
            bonus_modality: Modality::Redacao,
            earliest_confirmation_day: date!(2026 - 01 - 05),
        }
    }
}

/// Settings plus the instant a command is applied at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    pub settings: EngineSettings,
    pub now: OffsetDateTime,
}

impl OperationContext {
    #[must_use]
    pub const fn new(settings: EngineSettings, now: OffsetDateTime) -> Self {
        Self { settings, now }
    }

    /// Builds a context stamped with the current UTC time.
    #[must_use]
    pub fn now_utc(settings: EngineSettings) -> Self {
        Self::new(settings, OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        Timestamp::from_datetime(self.now)
    }

    #[must_use]
    pub const fn today(&self) -> Date {
        self.now.date()
    }
}
