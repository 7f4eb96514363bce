//! Activity Errors

use salvo::http::StatusError;
use tracing::error;

use gbms_app::domain::activity::ActivityServiceError;

pub(crate) fn into_status_error(error: ActivityServiceError) -> StatusError {
    match error {
        ActivityServiceError::Validation(message) => StatusError::bad_request().brief(message),
        ActivityServiceError::InvalidReference | ActivityServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid activity query")
        }
        ActivityServiceError::Sql(source) => {
            error!("failed to read activity log: {source}");

            StatusError::internal_server_error()
        }
    }
}
