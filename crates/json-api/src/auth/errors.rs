//! Auth Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use gbms_app::auth::{AuthServiceError, TokenError};

use crate::observability::record_auth_failure;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    let reason = error.reason();

    match error {
        AuthServiceError::MissingToken => rejected(reason, "Missing Authorization header"),
        AuthServiceError::MalformedHeader => {
            rejected(reason, "Authorization header must be a bearer token")
        }
        AuthServiceError::Token(TokenError::Expired) => rejected(reason, "Token has expired"),
        AuthServiceError::Token(TokenError::Malformed | TokenError::InvalidSignature) => {
            rejected(reason, "Invalid token")
        }
        AuthServiceError::UnknownUser => rejected(reason, "User not found"),
        AuthServiceError::AccountDisabled => rejected(reason, "Account is disabled"),
        AuthServiceError::BadCredentials => rejected(reason, "Invalid user ID or password"),
        AuthServiceError::Forbidden => {
            record_auth_failure(reason);
            warn!(reason, "request forbidden");

            StatusError::forbidden().brief("Insufficient permissions")
        }
        AuthServiceError::Validation(message) => StatusError::bad_request().brief(message),
        AuthServiceError::Token(source @ (TokenError::Signing(_) | TokenError::OutOfRange(_))) => {
            error!("failed to issue access token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("authentication storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

fn rejected(reason: &'static str, brief: &str) -> StatusError {
    record_auth_failure(reason);
    warn!(reason, "authentication rejected");

    StatusError::unauthorized().brief(brief)
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn identity_failures_are_unauthorized() {
        for error in [
            AuthServiceError::MissingToken,
            AuthServiceError::MalformedHeader,
            AuthServiceError::Token(TokenError::Malformed),
            AuthServiceError::Token(TokenError::InvalidSignature),
            AuthServiceError::Token(TokenError::Expired),
            AuthServiceError::UnknownUser,
            AuthServiceError::AccountDisabled,
            AuthServiceError::BadCredentials,
        ] {
            assert_eq!(into_status_error(error).code, StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn role_failures_are_forbidden() {
        assert_eq!(
            into_status_error(AuthServiceError::Forbidden).code,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn validation_message_is_passed_through() {
        let status = into_status_error(AuthServiceError::Validation("too short".to_string()));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "too short");
    }
}
