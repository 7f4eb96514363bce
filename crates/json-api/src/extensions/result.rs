//! Internal-error mapping for handler results.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

pub(crate) trait ResultExt<T> {
    /// Log the failure with `context` and hide it behind a bare 500.
    fn or_500(self, context: &'static str) -> Result<T, StatusError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, context: &'static str) -> Result<T, StatusError> {
        self.map_err(|source| {
            error!(error = %source, context, "internal error while handling request");

            StatusError::internal_server_error()
        })
    }
}
