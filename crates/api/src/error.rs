// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use enroll::CoreError;
use enroll_domain::DomainError;
use enroll_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The actor does not own the targeted enrollment.
    #[error("Unauthorized: '{action}' is only allowed on your own enrollment")]
    NotOwner {
        /// The action that was attempted.
        action: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    #[error("{message}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// A human-readable description of the refusal.
        message: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A concurrent writer got in the way.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },
    /// The store stayed contended for every attempt.
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                ref action,
                required_role: _,
            }
            | AuthError::NotOwner { ref action } => Self::Unauthorized {
                action: action.clone(),
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidModality(_) => ApiError::InvalidInput {
            field: String::from("modality"),
            message,
        },
        DomainError::InvalidEnrollmentStatus(_) | DomainError::InvalidPaymentStatus(_) => {
            ApiError::InvalidInput {
                field: String::from("status"),
                message,
            }
        }
        DomainError::InvalidPaymentMethod(_) => ApiError::InvalidInput {
            field: String::from("method"),
            message,
        },
        DomainError::InvalidCapacity { .. } => ApiError::InvalidInput {
            field: String::from("capacity"),
            message,
        },
        DomainError::EmptyField { field } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        DomainError::ConfirmationDayOutOfRange { .. } => ApiError::InvalidInput {
            field: String::from("day"),
            message,
        },
        DomainError::InvalidDiscountPercent(_) => ApiError::InvalidInput {
            field: String::from("discount_percent"),
            message,
        },
        DomainError::BonusCountAboveLimit { .. } => ApiError::InvalidInput {
            field: String::from("value"),
            message,
        },
        DomainError::InvalidPlacement { .. } => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::NotFound { entity, .. } => ApiError::ResourceNotFound {
            resource_type: entity.to_string(),
            message,
        },
        CoreError::PermissionDenied { action } => ApiError::Unauthorized {
            action: action.to_string(),
            message,
        },
        CoreError::IncompatiblePlan { .. } => ApiError::DomainRuleViolation {
            rule: String::from("plan_matches_course"),
            message,
        },
        CoreError::SessionCourseMismatch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("session_matches_course"),
            message,
        },
        CoreError::IncompleteEnrollment(_) => ApiError::DomainRuleViolation {
            rule: String::from("complete_enrollment"),
            message,
        },
        CoreError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message,
        },
        CoreError::InvalidCapacity(_) => ApiError::InvalidInput {
            field: String::from("capacity"),
            message,
        },
        CoreError::InvalidConfirmationDate(_) => ApiError::InvalidInput {
            field: String::from("day"),
            message,
        },
        CoreError::InvalidBonusCount(_) => ApiError::InvalidInput {
            field: String::from("value"),
            message,
        },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Core(core_err) => translate_core_error(core_err),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::Conflict(message) => ApiError::Conflict { message },
        PersistenceError::RetriesExhausted { .. } => ApiError::Unavailable {
            message: err.to_string(),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
