//! Change Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gbms_app::{
    auth::{AuthServiceError, PasswordChange},
    domain::activity::data::Actor,
};

use crate::{auth::into_status_error, extensions::*, state::State};

/// Change Password Request
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest {
    pub current_password: String,
    /// At least 6 characters
    pub new_password: String,
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}

/// Change Password Handler
///
/// Replaces the caller's own password after checking the current one.
#[endpoint(
    tags("auth"),
    summary = "Change Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Password changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Wrong current password or new password too short"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ChangePasswordRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = Actor::new(depot.current_user_or_401()?, req.client_address());
    let request = json.into_inner();

    let change = PasswordChange {
        current_password: request.current_password,
        new_password: request.new_password,
    };

    state
        .app
        .auth
        .change_password(actor, change)
        .await
        .map_err(|error| match error {
            AuthServiceError::BadCredentials => {
                StatusError::bad_request().brief("Current password is incorrect")
            }
            other => into_status_error(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
