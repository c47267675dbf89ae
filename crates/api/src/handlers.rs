// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every write goes through `execute`, which authorizes the command and runs
//! it in its own transaction.

use enroll::{BonusOutcome, Command, CommandOutcome, OperationContext};
use enroll_domain::{
    CourseId, Enrollment, EnrollmentId, EnrollmentStatus, PaymentMethod, PaymentStatus, Placement,
    PlanId, Selection, SelectionId, SessionId,
};
use enroll_persistence::{
    CourseOverview, EnrollmentOverview, Persistence, PersistenceError, SessionOverview,
};
use time::Date;
use time::macros::format_description;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AttachPlanRequest, CourseInfo, EnrollmentInfo, EnrollmentResponse, ListCoursesResponse,
    ListEnrollmentsResponse, MoveSelectionRequest, PaymentStatusResponse, PlacementResponse,
    PlanInfo, ScheduleConfirmationRequest, ScheduleConfirmationResponse, SelectPaymentMethodRequest,
    SelectSessionRequest, SelectionInfo, SessionInfo, SessionQueueResponse, SetBonusAwardedRequest,
    SetCapacityRequest, UpdateSessionDetailsRequest, UpdateStatusRequest, WriteResponse,
};

// ============================================================================
// Conversions
// ============================================================================

fn session_info(overview: &SessionOverview) -> SessionInfo {
    let session = &overview.session;
    SessionInfo {
        session_id: session.id.value(),
        course_id: session.course_id.value(),
        code: session.code.clone(),
        weekday: session.weekday.clone(),
        start_time: session.start_time.clone(),
        end_time: session.end_time.clone(),
        level: session.level.clone(),
        capacity: overview.occupancy.capacity,
        reserved: overview.occupancy.reserved,
        available: overview.occupancy.available,
        waitlist: overview.occupancy.waitlist,
    }
}

fn course_info(overview: &CourseOverview) -> CourseInfo {
    CourseInfo {
        course_id: overview.course.id.value(),
        code: overview.course.code.clone(),
        title: overview.course.title.clone(),
        modality: overview.course.modality.as_str().to_string(),
        bonus_limit: overview.course.bonus_limit,
        bonus_awarded: overview.course.bonus_awarded,
        sessions: overview.sessions.iter().map(session_info).collect(),
        plans: overview
            .plans
            .iter()
            .map(|plan| PlanInfo {
                plan_id: plan.id.value(),
                label: plan.label.clone(),
                months: plan.months,
                price_cents: plan.price_cents,
            })
            .collect(),
    }
}

fn selection_info(selection: &Selection) -> SelectionInfo {
    SelectionInfo {
        selection_id: selection.id.value(),
        enrollment_id: selection.enrollment_id.value(),
        course_id: selection.course_id.value(),
        session_id: selection.session_id.value(),
        plan_id: selection.plan_id.map(|plan| plan.value()),
        status: selection.placement.status_str().to_string(),
        waitlist_position: selection.placement.waitlist_position(),
    }
}

fn enrollment_info(enrollment: &Enrollment) -> EnrollmentInfo {
    EnrollmentInfo {
        enrollment_id: enrollment.id.value(),
        user_id: enrollment.user_id.as_str().to_string(),
        status: enrollment.status.as_str().to_string(),
        payment_method: enrollment
            .payment_method
            .map(|method| method.as_str().to_string()),
        payment_status: enrollment.payment_status.as_str().to_string(),
        total_amount_cents: enrollment.total_amount_cents,
        registration_fee_cents: enrollment.registration_fee_cents,
        registration_fee_discount: enrollment.registration_fee_discount,
        has_waitlist: enrollment.has_waitlist,
        promo_bonus_granted: enrollment.promo_bonus_granted,
        confirmation_day: enrollment.confirmation_day.map(|day| day.to_string()),
        token: enrollment
            .token
            .as_ref()
            .map(|token| token.code().to_string()),
    }
}

fn enrollment_response(overview: &EnrollmentOverview) -> EnrollmentResponse {
    EnrollmentResponse {
        enrollment: enrollment_info(&overview.enrollment),
        selections: overview.selections.iter().map(selection_info).collect(),
    }
}

fn placement_response(selection_id: SelectionId, placement: Placement) -> PlacementResponse {
    let message: String = match placement.waitlist_position() {
        Some(position) => format!("Waitlisted at position {position}"),
        None => String::from("Seat reserved"),
    };
    PlacementResponse {
        selection_id: selection_id.value(),
        status: placement.status_str().to_string(),
        waitlist_position: placement.waitlist_position(),
        message,
    }
}

fn written(message: impl Into<String>) -> WriteResponse {
    WriteResponse {
        success: true,
        message: message.into(),
    }
}

fn unexpected(outcome: &CommandOutcome) -> ApiError {
    ApiError::Internal {
        message: format!("Unexpected command outcome: {outcome:?}"),
    }
}

fn parse_day(value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        ApiError::InvalidInput {
            field: String::from("day"),
            message: format!("Expected YYYY-MM-DD, got '{value}': {e}"),
        }
    })
}

fn parse_enrollment_status(value: &str) -> Result<EnrollmentStatus, ApiError> {
    value.trim().to_uppercase().parse().map_err(translate_domain_error)
}

// ============================================================================
// Shared plumbing
// ============================================================================

/// Authorizes and executes a command in its own transaction.
///
/// # Errors
///
/// Returns an error if the actor may not issue the command or the command fails.
fn execute(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    command: Command,
) -> Result<CommandOutcome, ApiError> {
    AuthorizationService::authorize_command(actor, &command)?;
    let outcome: CommandOutcome = persistence.execute(ctx, &command)?;
    info!(
        actor = %actor.id,
        command = command.name(),
        "Command applied"
    );
    Ok(outcome)
}

/// Loads an enrollment the actor is allowed to touch.
fn load_enrollment(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    action: &str,
) -> Result<EnrollmentOverview, ApiError> {
    let overview: EnrollmentOverview = persistence
        .enrollment_overview(EnrollmentId::new(enrollment_id))
        .map_err(|e| match e {
            PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
                resource_type: String::from("Enrollment"),
                message,
            },
            other => ApiError::from(other),
        })?;
    AuthorizationService::authorize_enrollment_access(actor, &overview.enrollment, action)?;
    Ok(overview)
}

fn load_session(persistence: &mut Persistence, session_id: i64) -> Result<SessionInfo, ApiError> {
    let overview: SessionOverview = persistence
        .session_overview(SessionId::new(session_id))
        .map_err(|e| match e {
            PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
                resource_type: String::from("Session"),
                message,
            },
            other => ApiError::from(other),
        })?;
    Ok(session_info(&overview))
}

// ============================================================================
// Catalog and read model
// ============================================================================

/// Lists every course with its sessions, occupancy and plans.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub fn list_courses(persistence: &mut Persistence) -> Result<ListCoursesResponse, ApiError> {
    let courses: Vec<CourseOverview> = persistence.list_courses()?;
    Ok(ListCoursesResponse {
        courses: courses.iter().map(course_info).collect(),
    })
}

/// Returns one session with its occupancy.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn get_session(persistence: &mut Persistence, session_id: i64) -> Result<SessionInfo, ApiError> {
    load_session(persistence, session_id)
}

/// Lists a session's queue. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the session does not exist.
pub fn get_session_queue(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    session_id: i64,
) -> Result<SessionQueueResponse, ApiError> {
    AuthorizationService::authorize_admin_read(actor, "session_queue")?;
    let queue: Vec<Selection> = persistence
        .session_queue(SessionId::new(session_id))
        .map_err(|e| match e {
            PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
                resource_type: String::from("Session"),
                message,
            },
            other => ApiError::from(other),
        })?;
    Ok(SessionQueueResponse {
        session_id,
        entries: queue.iter().map(selection_info).collect(),
    })
}

/// Lists enrollments, optionally filtered by status. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the status is unknown.
pub fn list_enrollments(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    status: Option<&str>,
) -> Result<ListEnrollmentsResponse, ApiError> {
    AuthorizationService::authorize_admin_read(actor, "list_enrollments")?;
    let status: Option<EnrollmentStatus> = status.map(parse_enrollment_status).transpose()?;
    let enrollments: Vec<Enrollment> = persistence.list_enrollments(status)?;
    Ok(ListEnrollmentsResponse {
        enrollments: enrollments.iter().map(enrollment_info).collect(),
    })
}

/// Returns an enrollment with its selections.
///
/// # Errors
///
/// Returns an error if the enrollment does not exist or belongs to someone else.
pub fn get_enrollment(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
) -> Result<EnrollmentResponse, ApiError> {
    let overview: EnrollmentOverview =
        load_enrollment(persistence, actor, enrollment_id, "get_enrollment")?;
    Ok(enrollment_response(&overview))
}

// ============================================================================
// Student operations
// ============================================================================

/// Returns the actor's open enrollment, creating a draft if needed.
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn ensure_enrollment(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
) -> Result<EnrollmentResponse, ApiError> {
    let outcome: CommandOutcome = execute(
        persistence,
        ctx,
        actor,
        Command::EnsureEnrollment {
            user_id: actor.id.clone(),
        },
    )?;
    let enrollment_id: EnrollmentId = match outcome {
        CommandOutcome::Enrollment(enrollment) => enrollment.id,
        other => return Err(unexpected(&other)),
    };
    let overview: EnrollmentOverview =
        load_enrollment(persistence, actor, enrollment_id.value(), "ensure_enrollment")?;
    Ok(enrollment_response(&overview))
}

/// Chooses a session for a course.
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment does not exist or belongs to someone else
/// - The session does not belong to the course
pub fn select_session(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    request: &SelectSessionRequest,
) -> Result<PlacementResponse, ApiError> {
    load_enrollment(persistence, actor, enrollment_id, "select_session")?;
    let outcome: CommandOutcome = execute(
        persistence,
        ctx,
        actor,
        Command::SelectSession {
            enrollment_id: EnrollmentId::new(enrollment_id),
            course_id: CourseId::new(request.course_id),
            session_id: SessionId::new(request.session_id),
        },
    )?;
    match outcome {
        CommandOutcome::Placed {
            selection_id,
            placement,
        } => Ok(placement_response(selection_id, placement)),
        other => Err(unexpected(&other)),
    }
}

/// Drops a selection.
///
/// # Errors
///
/// Returns an error if the enrollment or selection is not the actor's.
pub fn remove_selection(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    selection_id: i64,
) -> Result<WriteResponse, ApiError> {
    load_enrollment(persistence, actor, enrollment_id, "remove_selection")?;
    execute(
        persistence,
        ctx,
        actor,
        Command::RemoveSelection {
            selection_id: SelectionId::new(selection_id),
            requester: EnrollmentId::new(enrollment_id),
        },
    )?;
    Ok(written(format!("Removed selection {selection_id}")))
}

/// Attaches a payment plan to a selection.
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment or selection is not the actor's
/// - The plan is inactive or belongs to another course
pub fn attach_plan(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    selection_id: i64,
    request: &AttachPlanRequest,
) -> Result<WriteResponse, ApiError> {
    load_enrollment(persistence, actor, enrollment_id, "attach_plan")?;
    execute(
        persistence,
        ctx,
        actor,
        Command::AttachPlan {
            selection_id: SelectionId::new(selection_id),
            plan_id: PlanId::new(request.plan_id),
            requester: EnrollmentId::new(enrollment_id),
        },
    )?;
    Ok(written(format!(
        "Attached plan {} to selection {selection_id}",
        request.plan_id
    )))
}

/// Records the payment method.
///
/// # Errors
///
/// Returns an error if the enrollment is not the actor's or the method is unknown.
pub fn select_payment_method(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    request: &SelectPaymentMethodRequest,
) -> Result<WriteResponse, ApiError> {
    let method: PaymentMethod = request
        .method
        .trim()
        .to_uppercase()
        .parse()
        .map_err(translate_domain_error)?;
    load_enrollment(persistence, actor, enrollment_id, "select_payment_method")?;
    execute(
        persistence,
        ctx,
        actor,
        Command::SelectPaymentMethod {
            enrollment_id: EnrollmentId::new(enrollment_id),
            method,
        },
    )?;
    Ok(written(format!("Payment method set to {method}")))
}

/// Submits a complete draft.
///
/// # Errors
///
/// Returns an error if the enrollment is not the actor's or is incomplete.
pub fn submit_enrollment(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
) -> Result<EnrollmentResponse, ApiError> {
    load_enrollment(persistence, actor, enrollment_id, "submit_enrollment")?;
    execute(
        persistence,
        ctx,
        actor,
        Command::SubmitEnrollment {
            enrollment_id: EnrollmentId::new(enrollment_id),
        },
    )?;
    let overview: EnrollmentOverview =
        load_enrollment(persistence, actor, enrollment_id, "submit_enrollment")?;
    Ok(enrollment_response(&overview))
}

/// Books the confirmation visit.
///
/// # Errors
///
/// Returns an error if:
/// - The enrollment is not the actor's or is still a draft
/// - The day is malformed or outside the bookable range
pub fn schedule_confirmation(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    request: &ScheduleConfirmationRequest,
) -> Result<ScheduleConfirmationResponse, ApiError> {
    let day: Date = parse_day(&request.day)?;
    load_enrollment(persistence, actor, enrollment_id, "schedule_confirmation")?;
    let outcome: CommandOutcome = execute(
        persistence,
        ctx,
        actor,
        Command::ScheduleConfirmation {
            enrollment_id: EnrollmentId::new(enrollment_id),
            day,
        },
    )?;
    match outcome {
        CommandOutcome::Scheduled { day, token } => Ok(ScheduleConfirmationResponse {
            enrollment_id,
            day: day.to_string(),
            token: token.code().to_string(),
        }),
        other => Err(unexpected(&other)),
    }
}

// ============================================================================
// Administrative operations
// ============================================================================

/// Sets a session's capacity. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the capacity is below 1.
pub fn set_session_capacity(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    session_id: i64,
    request: &SetCapacityRequest,
) -> Result<SessionInfo, ApiError> {
    execute(
        persistence,
        ctx,
        actor,
        Command::SetSessionCapacity {
            session_id: SessionId::new(session_id),
            capacity: request.capacity,
        },
    )?;
    load_session(persistence, session_id)
}

/// Shrinks a session to its reserved count. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the session does not exist.
pub fn force_waitlist_only(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    session_id: i64,
) -> Result<SessionInfo, ApiError> {
    execute(
        persistence,
        ctx,
        actor,
        Command::ForceWaitlistOnly {
            session_id: SessionId::new(session_id),
        },
    )?;
    load_session(persistence, session_id)
}

/// Edits a session's schedule and capacity. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, a field is blank or the
/// capacity is below 1.
pub fn update_session_details(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    session_id: i64,
    request: &UpdateSessionDetailsRequest,
) -> Result<SessionInfo, ApiError> {
    execute(
        persistence,
        ctx,
        actor,
        Command::UpdateSessionDetails {
            session_id: SessionId::new(session_id),
            weekday: request.weekday.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            level: request.level.clone(),
            capacity: request.capacity,
        },
    )?;
    load_session(persistence, session_id)
}

/// Moves a selection to another session of its course. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the session belongs to
/// another course.
pub fn move_selection(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    selection_id: i64,
    request: &MoveSelectionRequest,
) -> Result<PlacementResponse, ApiError> {
    let outcome: CommandOutcome = execute(
        persistence,
        ctx,
        actor,
        Command::MoveSelection {
            selection_id: SelectionId::new(selection_id),
            session_id: SessionId::new(request.session_id),
        },
    )?;
    match outcome {
        CommandOutcome::Placed {
            selection_id,
            placement,
        } => Ok(placement_response(selection_id, placement)),
        other => Err(unexpected(&other)),
    }
}

/// Overwrites an enrollment's status. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the status is unknown.
pub fn update_enrollment_status(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    request: &UpdateStatusRequest,
) -> Result<EnrollmentResponse, ApiError> {
    let status: EnrollmentStatus = parse_enrollment_status(&request.status)?;
    execute(
        persistence,
        ctx,
        actor,
        Command::UpdateEnrollmentStatus {
            enrollment_id: EnrollmentId::new(enrollment_id),
            status,
        },
    )?;
    let overview: EnrollmentOverview =
        load_enrollment(persistence, actor, enrollment_id, "update_enrollment_status")?;
    Ok(enrollment_response(&overview))
}

/// Overwrites an enrollment's payment status. Admins only.
///
/// Confirming a payment may grant the promotional bonus.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the status is unknown.
pub fn update_payment_status(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    enrollment_id: i64,
    request: &UpdateStatusRequest,
) -> Result<PaymentStatusResponse, ApiError> {
    let status: PaymentStatus = request
        .status
        .trim()
        .to_uppercase()
        .parse()
        .map_err(translate_domain_error)?;
    let outcome: CommandOutcome = execute(
        persistence,
        ctx,
        actor,
        Command::UpdatePaymentStatus {
            enrollment_id: EnrollmentId::new(enrollment_id),
            status,
        },
    )?;
    let bonus: Option<BonusOutcome> = match outcome {
        CommandOutcome::PaymentUpdated { bonus } => bonus,
        other => return Err(unexpected(&other)),
    };
    Ok(PaymentStatusResponse {
        enrollment_id,
        payment_status: status.as_str().to_string(),
        bonus: bonus.map(|outcome| outcome.as_str().to_string()),
    })
}

/// Corrects a course's bonus counter. Admins only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the value exceeds the limit.
pub fn set_bonus_awarded(
    persistence: &mut Persistence,
    ctx: &OperationContext,
    actor: &AuthenticatedActor,
    course_id: i64,
    request: &SetBonusAwardedRequest,
) -> Result<WriteResponse, ApiError> {
    execute(
        persistence,
        ctx,
        actor,
        Command::SetBonusAwarded {
            course_id: CourseId::new(course_id),
            value: request.value,
        },
    )?;
    Ok(written(format!(
        "Bonus counter of course {course_id} set to {}",
        request.value
    )))
}
