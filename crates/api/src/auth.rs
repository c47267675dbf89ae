// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use enroll::Command;
use enroll_domain::{Enrollment, UserId};

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: staff with authority over sessions, statuses and payments.
    ///
    /// Admins may:
    /// - change session capacity and schedule
    /// - freeze a session so newcomers join the waitlist
    /// - move selections between sessions of a course
    /// - set enrollment and payment statuses
    /// - correct bonus counters
    /// - act on any enrollment
    Admin,
    /// Student role: may only act on their own enrollment.
    Student,
}

impl Role {
    /// Parses a role name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known role.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: '{value}'. Must be 'admin' or 'student'"),
            }),
        }
    }

    /// Returns the role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user this actor acts as.
    pub id: UserId,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true if this actor is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Builds an actor from identity supplied by an upstream authenticator.
///
/// Identity is trusted as given; only its shape is checked.
///
/// # Errors
///
/// Returns an error if the user id is blank.
pub fn authenticate_stub(user_id: &str, role: Role) -> Result<AuthenticatedActor, AuthError> {
    let trimmed: &str = user_id.trim();
    if trimmed.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Missing user id"),
        });
    }
    Ok(AuthenticatedActor::new(UserId::new(trimmed), role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may issue a command.
    ///
    /// Administrative commands require the Admin role; the rest are open to
    /// every authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `command` - The command to authorize
    ///
    /// # Errors
    ///
    /// Returns an error if the command requires the Admin role and the actor
    /// is a student.
    pub fn authorize_command(
        actor: &AuthenticatedActor,
        command: &Command,
    ) -> Result<(), AuthError> {
        if command.requires_admin() && !actor.is_admin() {
            return Err(AuthError::Unauthorized {
                action: command.name().to_string(),
                required_role: Role::Admin.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Checks if an actor may read or change an enrollment.
    ///
    /// Students may only touch their own enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if a student targets someone else's enrollment.
    pub fn authorize_enrollment_access(
        actor: &AuthenticatedActor,
        enrollment: &Enrollment,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || enrollment.user_id == actor.id {
            return Ok(());
        }
        Err(AuthError::NotOwner {
            action: action.to_string(),
        })
    }

    /// Checks if an actor may use the administrative read endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_admin_read(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.is_admin() {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: Role::Admin.as_str().to_string(),
        })
    }
}
