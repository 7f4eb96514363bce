//! Request gate building blocks.
//!
//! A protected request passes an identity check (bearer token resolved to an
//! active user, see [`AuthService::authenticate_bearer`]) and then, for
//! restricted operations, a [`RoleRequirement`].
//!
//! [`AuthService::authenticate_bearer`]: crate::auth::AuthService::authenticate_bearer

use crate::{
    auth::AuthServiceError,
    domain::users::records::{Role, UserRecord},
};

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
///
/// # Errors
///
/// Returns [`AuthServiceError::MissingToken`] when there is no header and
/// [`AuthServiceError::MalformedHeader`] when it is not a non-empty bearer token.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthServiceError> {
    let value = header.ok_or(AuthServiceError::MissingToken)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthServiceError::MalformedHeader)?;

    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthServiceError::MalformedHeader);
    }

    Ok(token)
}

/// The set of roles allowed through a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    allowed: &'static [Role],
}

impl RoleRequirement {
    /// Administrators only.
    pub const ADMIN: Self = Self::any_of(&[Role::Admin]);

    /// Administrators and managers.
    pub const MANAGER: Self = Self::any_of(&[Role::Admin, Role::Manager]);

    #[must_use]
    /// Admit exactly the listed roles.
    pub const fn any_of(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// Admit `user` if their role is in the allowed set.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Forbidden`] otherwise.
    pub fn check(&self, user: &UserRecord) -> Result<(), AuthServiceError> {
        if self.allowed.contains(&user.role) {
            Ok(())
        } else {
            Err(AuthServiceError::Forbidden)
        }
    }
}
