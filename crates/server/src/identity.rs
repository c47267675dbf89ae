// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity extraction for the server.
//!
//! The upstream authenticator forwards the caller's identity in two headers:
//!
//! - `x-user-id`: the user's identifier (required)
//! - `x-user-role`: `admin` or `student` (defaults to `student`)

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use enroll_api::{AuthenticatedActor, Role, authenticate_stub};
use tracing::{debug, warn};

use crate::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor for the calling actor.
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - The user id header is missing or blank
/// - A header is not valid text
/// - The role is unknown
pub struct Identity(pub AuthenticatedActor);

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, IdentityError> {
    parts
        .headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                warn!(header = name, "Header is not valid text");
                IdentityError::InvalidHeader(name.to_string())
            })
        })
        .transpose()
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id: &str = header_value(parts, USER_ID_HEADER)?.ok_or_else(|| {
            debug!("Missing user id header");
            IdentityError::MissingUserId
        })?;
        let role: Role = match header_value(parts, USER_ROLE_HEADER)? {
            Some(value) => {
                Role::parse(value).map_err(|e| IdentityError::Rejected(e.to_string()))?
            }
            None => Role::Student,
        };

        let actor: AuthenticatedActor =
            authenticate_stub(user_id, role).map_err(|e| IdentityError::Rejected(e.to_string()))?;
        debug!(user_id = %actor.id, role = ?actor.role, "Identity accepted");
        Ok(Self(actor))
    }
}

/// Identity extraction errors.
#[derive(Debug)]
pub enum IdentityError {
    /// The user id header is missing.
    MissingUserId,
    /// A header could not be read as text.
    InvalidHeader(String),
    /// The identity was malformed.
    Rejected(String),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingUserId => format!("Missing {USER_ID_HEADER} header"),
            Self::InvalidHeader(name) => format!("Header '{name}' is not valid text"),
            Self::Rejected(reason) => reason,
        };
        crate::HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
