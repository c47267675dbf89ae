// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The limited promotional bonus granted on payment confirmation.

use crate::context::OperationContext;
use crate::engine::{require_course, require_enrollment};
use crate::ledger::Ledger;
use crate::outcome::BonusOutcome;
use enroll_domain::{Course, Enrollment, EnrollmentId, Selection};
use tracing::{debug, info};

/// Grants the bonus to an enrollment whose payment was just confirmed.
///
/// The course counter is incremented with a conditional write, so concurrent
/// confirmations can never push it past the limit.
///
/// # Errors
///
/// Returns an error if the enrollment does not exist or storage fails.
pub fn grant_bonus<L: Ledger>(
    ledger: &mut L,
    ctx: &OperationContext,
    enrollment_id: EnrollmentId,
) -> Result<BonusOutcome, L::Error> {
    let enrollment: Enrollment = require_enrollment(ledger, enrollment_id)?;
    if enrollment.promo_bonus_granted {
        return Ok(BonusOutcome::AlreadyGranted);
    }

    let selections: Vec<Selection> = ledger.selections_for_enrollment(enrollment_id)?;
    let mut bonus_course: Option<Course> = None;
    for selection in &selections {
        let course: Course = require_course(ledger, selection.course_id)?;
        if course.modality == ctx.settings.bonus_modality && course.bonus_limit.is_some() {
            bonus_course = Some(course);
            break;
        }
    }

    let Some(course) = bonus_course else {
        debug!(enrollment_id = %enrollment_id, "No bonus course selected");
        return Ok(BonusOutcome::NotEligible);
    };

    if !ledger.increment_bonus_if_below_limit(course.id)? {
        info!(
            enrollment_id = %enrollment_id,
            course_id = %course.id,
            "Bonus limit reached"
        );
        return Ok(BonusOutcome::LimitReached);
    }

    ledger.mark_bonus_granted(enrollment_id)?;
    info!(
        enrollment_id = %enrollment_id,
        course_id = %course.id,
        "Bonus granted"
    );
    Ok(BonusOutcome::Granted)
}
