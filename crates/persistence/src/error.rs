// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use enroll::CoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    /// A stored row cannot be converted into a domain value.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
    /// The requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Another writer held the lock or the transaction could not be serialized.
    #[error("Write conflict: {0}")]
    Conflict(String),
    /// Every attempt of a unit of work ended in a conflict.
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last conflict observed.
        last: String,
    },
    /// The command was rejected by the engine.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PersistenceError {
    /// Whether the whole unit of work may be retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

fn is_lock_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("busy")
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, ref info) => {
                Self::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(_, ref info) if is_lock_message(info.message()) => {
                Self::Conflict(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
