//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::{PasswordError, TokenError};

/// Authentication and authorization failures.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("authorization token is missing")]
    MissingToken,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("user not found")]
    UnknownUser,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("insufficient role")]
    Forbidden,

    #[error("invalid user ID or password")]
    BadCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("password processing error")]
    Password(#[source] PasswordError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl AuthServiceError {
    /// Stable, low-cardinality label for logs and metrics.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MalformedHeader => "malformed_header",
            Self::Token(TokenError::Malformed) => "malformed_token",
            Self::Token(TokenError::InvalidSignature) => "invalid_signature",
            Self::Token(TokenError::Expired) => "expired",
            Self::Token(TokenError::Signing(_) | TokenError::OutOfRange(_)) => "token_error",
            Self::UnknownUser => "unknown_user",
            Self::AccountDisabled => "account_disabled",
            Self::Forbidden => "forbidden",
            Self::BadCredentials => "bad_credentials",
            Self::Validation(_) => "validation",
            Self::Password(_) => "password_error",
            Self::Sql(_) => "storage",
        }
    }
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<PasswordError> for AuthServiceError {
    fn from(error: PasswordError) -> Self {
        match error {
            PasswordError::TooShort => Self::Validation(error.to_string()),
            PasswordError::Hashing(_) => Self::Password(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_maps_to_validation() {
        let error = AuthServiceError::from(PasswordError::TooShort);

        assert!(
            matches!(&error, AuthServiceError::Validation(message) if message.contains('6')),
            "got {error:?}"
        );
    }

    #[test]
    fn token_failures_have_distinct_reasons() {
        assert_eq!(AuthServiceError::from(TokenError::Expired).reason(), "expired");
        assert_eq!(
            AuthServiceError::from(TokenError::InvalidSignature).reason(),
            "invalid_signature"
        );
        assert_eq!(AuthServiceError::from(TokenError::Malformed).reason(), "malformed_token");
    }
}
