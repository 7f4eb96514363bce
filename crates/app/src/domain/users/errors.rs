//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::PasswordError;

/// User management failures.
#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user ID or email is already in use")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("users cannot delete their own account")]
    SelfDeletion,

    #[error("{0}")]
    Validation(String),

    #[error("invalid data")]
    InvalidData,

    #[error("password processing error")]
    Password(#[source] PasswordError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PasswordError> for UsersServiceError {
    fn from(error: PasswordError) -> Self {
        match error {
            PasswordError::TooShort => Self::Validation(error.to_string()),
            PasswordError::Hashing(_) => Self::Password(error),
        }
    }
}
