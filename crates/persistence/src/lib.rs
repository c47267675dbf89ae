// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for course pre-enrollment.
//!
//! This crate stores the catalog, enrollments and the selection ledger in
//! `SQLite` through Diesel, and runs engine commands inside write
//! transactions.
//!
//! ## Transactions
//!
//! Every command runs inside `BEGIN IMMEDIATE`, which takes `SQLite`'s
//! writer lock up front. Writers are serialized across connections and
//! processes, so the capacity check and the write that depends on it can
//! never interleave with another writer. A connection that cannot get the
//! lock within the busy timeout reports a conflict; the whole command is
//! then retried up to a bounded number of attempts.
//!
//! ## Read model
//!
//! Occupancy figures are computed from selection rows on every read. There
//! are no stored counters that could drift from the ledger.
//!
//! ## Testing
//!
//! Tests use unique shared-cache in-memory databases. Concurrency tests use
//! a temporary file database with one connection per thread.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use enroll::{Command, CommandOutcome, OperationContext, apply};
use enroll_domain::{
    Course, CourseId, CourseSeed, CourseSession, Enrollment, EnrollmentId, EnrollmentStatus,
    PaymentPlan, Selection, SessionId, SessionOccupancy, UserId,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod ledger;
mod mutations;
mod queries;
mod views;

#[cfg(test)]
mod tests;

pub use backend::sqlite::DEFAULT_BUSY_TIMEOUT;
pub use error::PersistenceError;
pub use ledger::SqliteLedger;
pub use mutations::SeededCourse;
pub use views::{CourseOverview, EnrollmentOverview, SessionOverview};

use backend::PersistenceBackend;
use queries::occupancy::PlacementCounts;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Attempts per command before giving up on write conflicts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Base delay between attempts; attempt `n` waits `n` times this.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Persistence adapter owning one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl Persistence {
    const fn from_connection(conn: SqliteConnection) -> Self {
        Self {
            conn,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(&shared_memory_url, DEFAULT_BUSY_TIMEOUT)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self::from_connection(conn))
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; their writes are serialized
    /// by the database lock.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(path_str, DEFAULT_BUSY_TIMEOUT)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self::from_connection(conn))
    }

    /// Overrides the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, max_attempts: u32, retry_backoff: Duration) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self.retry_backoff = retry_backoff;
        self
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Applies a command in its own immediate transaction.
    ///
    /// Conflicts roll the transaction back and the command is applied again,
    /// up to the configured number of attempts.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine rejects the command
    /// - Every attempt ended in a conflict
    /// - The database fails
    pub fn execute(
        &mut self,
        ctx: &OperationContext,
        command: &Command,
    ) -> Result<CommandOutcome, PersistenceError> {
        let mut attempt: u32 = 1;
        loop {
            let result: Result<CommandOutcome, PersistenceError> =
                self.conn.immediate_transaction(|conn| {
                    let mut ledger: SqliteLedger<'_> = SqliteLedger::new(conn);
                    apply(&mut ledger, ctx, command)
                });

            match result {
                Err(err) if err.is_retryable() => {
                    if attempt >= self.max_attempts {
                        warn!(
                            command = command.name(),
                            attempts = attempt,
                            error = %err,
                            "Giving up after repeated write conflicts"
                        );
                        return Err(PersistenceError::RetriesExhausted {
                            attempts: attempt,
                            last: err.to_string(),
                        });
                    }
                    warn!(
                        command = command.name(),
                        attempt,
                        error = %err,
                        "Write conflict, retrying"
                    );
                    std::thread::sleep(self.retry_backoff.saturating_mul(attempt));
                    attempt += 1;
                }
                Ok(outcome) => {
                    debug!(command = command.name(), attempt, "Command committed");
                    return Ok(outcome);
                }
                Err(err) => return Err(err),
            }
        }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Inserts a course with its sessions and plans.
    ///
    /// # Errors
    ///
    /// Returns an error if a code is already taken or the insert fails.
    pub fn add_course(&mut self, seed: &CourseSeed) -> Result<SeededCourse, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::catalog::insert_course(conn, seed))
    }

    /// Inserts every course of `catalog` whose code is not present yet.
    ///
    /// Returns the number of courses inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert fails. Nothing is inserted in that case.
    pub fn seed_catalog(&mut self, catalog: &[CourseSeed]) -> Result<usize, PersistenceError> {
        let inserted: usize = self.conn.immediate_transaction(|conn| {
            let mut inserted: usize = 0;
            for seed in catalog {
                if queries::catalog::find_course_by_code(conn, seed.code)?.is_some() {
                    debug!(code = seed.code, "Course already present, skipping");
                    continue;
                }
                mutations::catalog::insert_course(conn, seed)?;
                inserted += 1;
            }
            Ok::<usize, PersistenceError>(inserted)
        })?;

        info!(inserted, "Catalog seeded");
        Ok(inserted)
    }

    /// Loads a course by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn course_by_code(&mut self, code: &str) -> Result<Option<Course>, PersistenceError> {
        queries::catalog::find_course_by_code(&mut self.conn, code)
    }

    // ========================================================================
    // Read model
    // ========================================================================

    /// Lists every course with its active plans and per-session occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_courses(&mut self) -> Result<Vec<CourseOverview>, PersistenceError> {
        let courses: Vec<Course> = queries::catalog::list_courses(&mut self.conn)?;
        let sessions: Vec<CourseSession> = queries::catalog::list_sessions(&mut self.conn)?;
        let plans: Vec<PaymentPlan> = queries::catalog::list_active_plans(&mut self.conn)?;
        let counts: BTreeMap<SessionId, PlacementCounts> =
            queries::occupancy::placement_counts(&mut self.conn)?;

        Ok(views::course_overviews(courses, &sessions, &plans, &counts))
    }

    /// Loads a session with its occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or a query fails.
    pub fn session_overview(
        &mut self,
        session_id: SessionId,
    ) -> Result<SessionOverview, PersistenceError> {
        let session: CourseSession = queries::catalog::find_session(&mut self.conn, session_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Session {session_id}")))?;
        let counts: BTreeMap<SessionId, PlacementCounts> =
            queries::occupancy::placement_counts(&mut self.conn)?;

        let count: PlacementCounts = counts.get(&session_id).copied().unwrap_or_default();
        let occupancy: SessionOccupancy =
            SessionOccupancy::from_counts(&session, count.reserved, count.waitlist);
        Ok(SessionOverview { session, occupancy })
    }

    /// Computes the occupancy of one session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or a query fails.
    pub fn session_occupancy(
        &mut self,
        session_id: SessionId,
    ) -> Result<SessionOccupancy, PersistenceError> {
        Ok(self.session_overview(session_id)?.occupancy)
    }

    /// Lists the selections competing for a session, in queue order.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or a query fails.
    pub fn session_queue(
        &mut self,
        session_id: SessionId,
    ) -> Result<Vec<Selection>, PersistenceError> {
        if queries::catalog::find_session(&mut self.conn, session_id)?.is_none() {
            return Err(PersistenceError::NotFound(format!("Session {session_id}")));
        }
        queries::selections::eligible_selections(&mut self.conn, session_id)
    }

    /// Loads an enrollment with its selections.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment does not exist or a query fails.
    pub fn enrollment_overview(
        &mut self,
        enrollment_id: EnrollmentId,
    ) -> Result<EnrollmentOverview, PersistenceError> {
        let enrollment: Enrollment =
            queries::enrollments::find_enrollment(&mut self.conn, enrollment_id)?
                .ok_or_else(|| PersistenceError::NotFound(format!("Enrollment {enrollment_id}")))?;
        let selections: Vec<Selection> =
            queries::selections::selections_for_enrollment(&mut self.conn, enrollment_id)?;

        Ok(EnrollmentOverview {
            enrollment,
            selections,
        })
    }

    /// Finds the user's open enrollment without creating one.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn open_enrollment(
        &mut self,
        user_id: &UserId,
    ) -> Result<Option<Enrollment>, PersistenceError> {
        queries::enrollments::find_open_enrollment(&mut self.conn, user_id)
    }

    /// Lists enrollments, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn list_enrollments(
        &mut self,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<Enrollment>, PersistenceError> {
        queries::enrollments::list_enrollments(&mut self.conn, status)
    }

    /// Loads a course by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn course(&mut self, course_id: CourseId) -> Result<Option<Course>, PersistenceError> {
        queries::catalog::find_course(&mut self.conn, course_id)
    }
}
