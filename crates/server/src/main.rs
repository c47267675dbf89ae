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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod identity;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use enroll::{EngineSettings, OperationContext};
use enroll_api::{
    ApiError, AttachPlanRequest, EnrollmentResponse, ListCoursesResponse, ListEnrollmentsResponse,
    MoveSelectionRequest, PaymentStatusResponse, PlacementResponse, ScheduleConfirmationRequest,
    ScheduleConfirmationResponse, SelectPaymentMethodRequest, SelectSessionRequest, SessionInfo,
    SessionQueueResponse, SetBonusAwardedRequest, SetCapacityRequest,
    UpdateSessionDetailsRequest, UpdateStatusRequest, WriteResponse,
};
use enroll_domain::{Modality, RegistrationFeePolicy, default_catalog};
use enroll_persistence::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF, Persistence};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::identity::Identity;

/// Enrollment Server - HTTP server for course pre-enrollment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Registration fee in cents
    #[arg(long, default_value_t = 15_000)]
    registration_fee_cents: i64,

    /// Percentage taken off the registration fee while the discount lasts
    #[arg(long, default_value_t = 50)]
    discount_percent: u8,

    /// Last day of the month (inclusive) the discount applies
    #[arg(long, default_value_t = 10)]
    discount_deadline_day: u8,

    /// Modality whose course carries the promotional bonus
    #[arg(long, default_value = "REDACAO")]
    bonus_modality: String,

    /// First day a confirmation visit can be booked (YYYY-MM-DD)
    #[arg(long, default_value = "2026-01-05")]
    earliest_confirmation_day: String,

    /// Attempts per command before giving up on write conflicts
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Insert the built-in course catalog if it is missing
    #[arg(long)]
    seed_catalog: bool,
}

impl Args {
    /// Builds the engine settings from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount, modality or date is invalid.
    fn engine_settings(&self) -> Result<EngineSettings, Box<dyn std::error::Error>> {
        let fee_policy: RegistrationFeePolicy = RegistrationFeePolicy::new(
            self.registration_fee_cents,
            self.discount_percent,
            self.discount_deadline_day,
        )?;
        let bonus_modality: Modality = self.bonus_modality.trim().to_uppercase().parse()?;
        let earliest_confirmation_day: Date = Date::parse(
            self.earliest_confirmation_day.trim(),
            format_description!("[year]-[month]-[day]"),
        )?;

        Ok(EngineSettings {
            fee_policy,
            bonus_modality,
            earliest_confirmation_day,
        })
    }
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Settings every command runs with.
    settings: EngineSettings,
    /// Source of the instant each command is applied at.
    clock: fn() -> OffsetDateTime,
}

impl AppState {
    fn new(persistence: Persistence, settings: EngineSettings) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            settings,
            clock: OffsetDateTime::now_utc,
        }
    }

    fn context(&self) -> OperationContext {
        OperationContext::new(self.settings, (self.clock)())
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Query parameters for listing enrollments.
#[derive(Debug, Clone, Default, Deserialize)]
struct ListEnrollmentsQuery {
    /// Optional status filter.
    status: Option<String>,
}

// ============================================================================
// Catalog and sessions
// ============================================================================

/// Handler for GET `/courses`.
async fn handle_list_courses(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListCoursesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::list_courses(&mut persistence)?))
}

/// Handler for GET `/sessions/{session_id}`.
async fn handle_get_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::get_session(&mut persistence, session_id)?))
}

/// Handler for GET `/sessions/{session_id}/queue`.
async fn handle_get_session_queue(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionQueueResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::get_session_queue(
        &mut persistence,
        &actor,
        session_id,
    )?))
}

/// Handler for PUT `/sessions/{session_id}`.
async fn handle_update_session(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(session_id): Path<i64>,
    Json(req): Json<UpdateSessionDetailsRequest>,
) -> Result<Json<SessionInfo>, HttpError> {
    info!(actor = %actor.id, session_id, "Handling update_session request");
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::update_session_details(
        &mut persistence,
        &ctx,
        &actor,
        session_id,
        &req,
    )?))
}

/// Handler for PUT `/sessions/{session_id}/capacity`.
async fn handle_set_capacity(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(session_id): Path<i64>,
    Json(req): Json<SetCapacityRequest>,
) -> Result<Json<SessionInfo>, HttpError> {
    info!(
        actor = %actor.id,
        session_id,
        capacity = req.capacity,
        "Handling set_capacity request"
    );
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::set_session_capacity(
        &mut persistence,
        &ctx,
        &actor,
        session_id,
        &req,
    )?))
}

/// Handler for POST `/sessions/{session_id}/waitlist_only`.
async fn handle_force_waitlist_only(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionInfo>, HttpError> {
    info!(actor = %actor.id, session_id, "Handling force_waitlist_only request");
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::force_waitlist_only(
        &mut persistence,
        &ctx,
        &actor,
        session_id,
    )?))
}

/// Handler for PUT `/selections/{selection_id}/session`.
async fn handle_move_selection(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(selection_id): Path<i64>,
    Json(req): Json<MoveSelectionRequest>,
) -> Result<Json<PlacementResponse>, HttpError> {
    info!(actor = %actor.id, selection_id, "Handling move_selection request");
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::move_selection(
        &mut persistence,
        &ctx,
        &actor,
        selection_id,
        &req,
    )?))
}

/// Handler for PUT `/courses/{course_id}/bonus_awarded`.
async fn handle_set_bonus_awarded(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(course_id): Path<i64>,
    Json(req): Json<SetBonusAwardedRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::set_bonus_awarded(
        &mut persistence,
        &ctx,
        &actor,
        course_id,
        &req,
    )?))
}

// ============================================================================
// Enrollments
// ============================================================================

/// Handler for POST `/enrollments`.
///
/// Returns the caller's open enrollment, creating a draft if needed.
async fn handle_ensure_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::ensure_enrollment(
        &mut persistence,
        &ctx,
        &actor,
    )?))
}

/// Handler for GET `/enrollments`.
async fn handle_list_enrollments(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Query(query): Query<ListEnrollmentsQuery>,
) -> Result<Json<ListEnrollmentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::list_enrollments(
        &mut persistence,
        &actor,
        query.status.as_deref(),
    )?))
}

/// Handler for GET `/enrollments/{enrollment_id}`.
async fn handle_get_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::get_enrollment(
        &mut persistence,
        &actor,
        enrollment_id,
    )?))
}

/// Handler for POST `/enrollments/{enrollment_id}/selections`.
async fn handle_select_session(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<SelectSessionRequest>,
) -> Result<Json<PlacementResponse>, HttpError> {
    info!(
        actor = %actor.id,
        enrollment_id,
        course_id = req.course_id,
        session_id = req.session_id,
        "Handling select_session request"
    );
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::select_session(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        &req,
    )?))
}

/// Handler for DELETE `/enrollments/{enrollment_id}/selections/{selection_id}`.
async fn handle_remove_selection(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path((enrollment_id, selection_id)): Path<(i64, i64)>,
) -> Result<Json<WriteResponse>, HttpError> {
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::remove_selection(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        selection_id,
    )?))
}

/// Handler for PUT `/enrollments/{enrollment_id}/selections/{selection_id}/plan`.
async fn handle_attach_plan(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path((enrollment_id, selection_id)): Path<(i64, i64)>,
    Json(req): Json<AttachPlanRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::attach_plan(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        selection_id,
        &req,
    )?))
}

/// Handler for PUT `/enrollments/{enrollment_id}/payment_method`.
async fn handle_select_payment_method(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<SelectPaymentMethodRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::select_payment_method(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        &req,
    )?))
}

/// Handler for POST `/enrollments/{enrollment_id}/submit`.
async fn handle_submit_enrollment(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    info!(actor = %actor.id, enrollment_id, "Handling submit request");
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::submit_enrollment(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
    )?))
}

/// Handler for POST `/enrollments/{enrollment_id}/confirmation`.
async fn handle_schedule_confirmation(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<ScheduleConfirmationRequest>,
) -> Result<Json<ScheduleConfirmationResponse>, HttpError> {
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::schedule_confirmation(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        &req,
    )?))
}

/// Handler for PUT `/enrollments/{enrollment_id}/status`.
async fn handle_update_enrollment_status(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<EnrollmentResponse>, HttpError> {
    info!(
        actor = %actor.id,
        enrollment_id,
        status = %req.status,
        "Handling update_enrollment_status request"
    );
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::update_enrollment_status(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        &req,
    )?))
}

/// Handler for PUT `/enrollments/{enrollment_id}/payment_status`.
async fn handle_update_payment_status(
    AxumState(app_state): AxumState<AppState>,
    Identity(actor): Identity,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<PaymentStatusResponse>, HttpError> {
    info!(
        actor = %actor.id,
        enrollment_id,
        status = %req.status,
        "Handling update_payment_status request"
    );
    let ctx: OperationContext = app_state.context();
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(enroll_api::update_payment_status(
        &mut persistence,
        &ctx,
        &actor,
        enrollment_id,
        &req,
    )?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/courses", get(handle_list_courses))
        .route(
            "/courses/{course_id}/bonus_awarded",
            put(handle_set_bonus_awarded),
        )
        .route(
            "/sessions/{session_id}",
            get(handle_get_session).put(handle_update_session),
        )
        .route("/sessions/{session_id}/queue", get(handle_get_session_queue))
        .route("/sessions/{session_id}/capacity", put(handle_set_capacity))
        .route(
            "/sessions/{session_id}/waitlist_only",
            post(handle_force_waitlist_only),
        )
        .route(
            "/selections/{selection_id}/session",
            put(handle_move_selection),
        )
        .route(
            "/enrollments",
            post(handle_ensure_enrollment).get(handle_list_enrollments),
        )
        .route("/enrollments/{enrollment_id}", get(handle_get_enrollment))
        .route(
            "/enrollments/{enrollment_id}/selections",
            post(handle_select_session),
        )
        .route(
            "/enrollments/{enrollment_id}/selections/{selection_id}",
            axum::routing::delete(handle_remove_selection),
        )
        .route(
            "/enrollments/{enrollment_id}/selections/{selection_id}/plan",
            put(handle_attach_plan),
        )
        .route(
            "/enrollments/{enrollment_id}/payment_method",
            put(handle_select_payment_method),
        )
        .route(
            "/enrollments/{enrollment_id}/submit",
            post(handle_submit_enrollment),
        )
        .route(
            "/enrollments/{enrollment_id}/confirmation",
            post(handle_schedule_confirmation),
        )
        .route(
            "/enrollments/{enrollment_id}/status",
            put(handle_update_enrollment_status),
        )
        .route(
            "/enrollments/{enrollment_id}/payment_status",
            put(handle_update_payment_status),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing enrollment server");

    let settings: EngineSettings = args.engine_settings()?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    let mut persistence: Persistence =
        persistence.with_retry_policy(args.max_attempts, DEFAULT_RETRY_BACKOFF);

    if args.seed_catalog {
        let inserted: usize = persistence.seed_catalog(&default_catalog())?;
        info!(inserted, "Default catalog checked");
    }

    let app: Router = build_router(AppState::new(persistence, settings));

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use enroll_domain::{CourseSeed, PlanSeed, SessionSeed};
    use enroll_persistence::SeededCourse;
    use time::macros::datetime;
    use tower::ServiceExt;

    struct TestIds {
        course_id: i64,
        session_id: i64,
        plan_id: i64,
    }

    fn fixed_clock() -> OffsetDateTime {
        datetime!(2026-01-02 12:00:00 UTC)
    }

    /// Helper to create test app state with one seeded course.
    fn create_test_app_state() -> (AppState, TestIds) {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let seeded: SeededCourse = persistence
            .add_course(&CourseSeed {
                code: "redacao",
                title: "Redação",
                modality: Modality::Redacao,
                bonus_limit: Some(10),
                sessions: vec![SessionSeed {
                    code: "R1",
                    weekday: "Terça-feira",
                    start_time: "18:00",
                    end_time: "19:30",
                    level: "Ensino Médio",
                    capacity: 1,
                }],
                plans: vec![PlanSeed {
                    label: "Mensal",
                    months: 1,
                    price_cents: 30_000,
                }],
            })
            .expect("Failed to seed course");
        let ids = TestIds {
            course_id: seeded.course_id.value(),
            session_id: seeded.session_ids[0].value(),
            plan_id: seeded.plan_ids[0].value(),
        };
        let app_state = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            settings: EngineSettings::default(),
            clock: fixed_clock,
        };
        (app_state, ids)
    }

    /// Sends a request as the given user and returns the status and body.
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        user: Option<(&str, &str)>,
        body: Option<serde_json::Value>,
    ) -> (HttpStatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user_id, role)) = user {
            builder = builder
                .header(USER_ID_HEADER, user_id)
                .header(USER_ROLE_HEADER, role);
        }
        let body: Body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = if body_bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, json)
    }

    async fn ensure(app: &Router, user_id: &str) -> i64 {
        let (status, body) =
            send(app, "POST", "/enrollments", Some((user_id, "student")), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        body["enrollment"]["enrollment_id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_student_flow_reaches_waiting_payment() {
        let (app_state, ids) = create_test_app_state();
        let app: Router = build_router(app_state);
        let student = Some(("student-1", "student"));

        let enrollment_id: i64 = ensure(&app, "student-1").await;

        let (status, placement) = send(
            &app,
            "POST",
            &format!("/enrollments/{enrollment_id}/selections"),
            student,
            Some(serde_json::json!({
                "course_id": ids.course_id,
                "session_id": ids.session_id,
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(placement["status"], "RESERVED");
        let selection_id: i64 = placement["selection_id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/enrollments/{enrollment_id}/selections/{selection_id}/plan"),
            student,
            Some(serde_json::json!({ "plan_id": ids.plan_id })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/enrollments/{enrollment_id}/payment_method"),
            student,
            Some(serde_json::json!({ "method": "pix" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, submitted) = send(
            &app,
            "POST",
            &format!("/enrollments/{enrollment_id}/submit"),
            student,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(submitted["enrollment"]["status"], "SUBMITTED");

        let (status, booked) = send(
            &app,
            "POST",
            &format!("/enrollments/{enrollment_id}/confirmation"),
            student,
            Some(serde_json::json!({ "day": "2026-01-05" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(booked["token"], "R00001");

        let (status, enrollment) = send(
            &app,
            "GET",
            &format!("/enrollments/{enrollment_id}"),
            student,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(enrollment["enrollment"]["status"], "WAITING_PAYMENT");
        assert_eq!(enrollment["enrollment"]["confirmation_day"], "2026-01-05");
    }

    #[tokio::test]
    async fn test_courses_report_occupancy() {
        let (app_state, ids) = create_test_app_state();
        let app: Router = build_router(app_state);

        let (status, courses) = send(&app, "GET", "/courses", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let session = &courses["courses"][0]["sessions"][0];
        assert_eq!(session["session_id"].as_i64(), Some(ids.session_id));
        assert_eq!(session["capacity"], 1);
        assert_eq!(session["available"], 1);
    }

    #[tokio::test]
    async fn test_student_cannot_change_capacity() {
        let (app_state, ids) = create_test_app_state();
        let app: Router = build_router(app_state);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/capacity", ids.session_id),
            Some(("student-1", "student")),
            Some(serde_json::json!({ "capacity": 5 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(body["error"], true);

        let (status, session) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/capacity", ids.session_id),
            Some(("admin-1", "admin")),
            Some(serde_json::json!({ "capacity": 5 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(session["capacity"], 5);
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let (status, body) = send(&app, "POST", "/enrollments", None, None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Missing x-user-id header");

        let (status, _) = send(
            &app,
            "POST",
            "/enrollments",
            Some(("student-1", "guest")),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);

        let (status, _) = send(&app, "GET", "/sessions/9999", None, None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_day_is_bad_request() {
        let (app_state, _) = create_test_app_state();
        let app: Router = build_router(app_state);
        let enrollment_id: i64 = ensure(&app, "student-1").await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/enrollments/{enrollment_id}/confirmation"),
            Some(("student-1", "student")),
            Some(serde_json::json!({ "day": "05/01/2026" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_incomplete_submit_is_unprocessable() {
        let (app_state, ids) = create_test_app_state();
        let app: Router = build_router(app_state);
        let enrollment_id: i64 = ensure(&app, "student-1").await;

        send(
            &app,
            "POST",
            &format!("/enrollments/{enrollment_id}/selections"),
            Some(("student-1", "student")),
            Some(serde_json::json!({
                "course_id": ids.course_id,
                "session_id": ids.session_id,
            })),
        )
        .await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/enrollments/{enrollment_id}/submit"),
            Some(("student-1", "student")),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    /// Runs the student steps up to submission.
    async fn submit(app: &Router, ids: &TestIds, user_id: &str) -> (i64, serde_json::Value) {
        let student = Some((user_id, "student"));
        let enrollment_id: i64 = ensure(app, user_id).await;
        let (_, placement) = send(
            app,
            "POST",
            &format!("/enrollments/{enrollment_id}/selections"),
            student,
            Some(serde_json::json!({
                "course_id": ids.course_id,
                "session_id": ids.session_id,
            })),
        )
        .await;
        let selection_id: i64 = placement["selection_id"].as_i64().unwrap();
        send(
            app,
            "PUT",
            &format!("/enrollments/{enrollment_id}/selections/{selection_id}/plan"),
            student,
            Some(serde_json::json!({ "plan_id": ids.plan_id })),
        )
        .await;
        send(
            app,
            "PUT",
            &format!("/enrollments/{enrollment_id}/payment_method"),
            student,
            Some(serde_json::json!({ "method": "pix" })),
        )
        .await;
        let (status, submitted) = send(
            app,
            "POST",
            &format!("/enrollments/{enrollment_id}/submit"),
            student,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        (enrollment_id, submitted)
    }

    #[tokio::test]
    async fn test_second_student_is_waitlisted_then_promoted() {
        let (app_state, ids) = create_test_app_state();
        let app: Router = build_router(app_state);

        let (first, first_submitted) = submit(&app, &ids, "student-1").await;
        let (second, second_submitted) = submit(&app, &ids, "student-2").await;
        assert_eq!(first_submitted["selections"][0]["status"], "RESERVED");
        assert_eq!(second_submitted["selections"][0]["status"], "WAITLIST");
        assert_eq!(second_submitted["selections"][0]["waitlist_position"], 1);
        assert_eq!(second_submitted["enrollment"]["has_waitlist"], true);

        let (status, queue) = send(
            &app,
            "GET",
            &format!("/sessions/{}/queue", ids.session_id),
            Some(("admin-1", "admin")),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(queue["entries"].as_array().map(Vec::len), Some(2));

        let first_selection: i64 = first_submitted["selections"][0]["selection_id"]
            .as_i64()
            .unwrap();
        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/enrollments/{first}/selections/{first_selection}"),
            Some(("student-1", "student")),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (_, enrollment) = send(
            &app,
            "GET",
            &format!("/enrollments/{second}"),
            Some(("student-2", "student")),
            None,
        )
        .await;
        assert_eq!(enrollment["selections"][0]["status"], "RESERVED");
        assert_eq!(enrollment["enrollment"]["has_waitlist"], false);
    }
}
