//! Login Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gbms_app::auth::LoginCredentials;

use crate::{auth::into_status_error, extensions::*, state::State, users::UserResponse};

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: String,

    pub user: UserResponse,
}

/// Login Handler
///
/// Exchanges a user ID and password for an access token.
#[endpoint(
    tags("auth"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Logged in"),
        (status_code = StatusCode::BAD_REQUEST, description = "User ID or password missing"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials or disabled account"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let credentials = LoginCredentials {
        user_id: request.user_id,
        password: request.password,
        client_address: req.client_address(),
    };

    let outcome = state
        .app
        .auth
        .login(credentials, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        expires_at: outcome.expires_at.to_string(),
        user: outcome.user.into(),
    }))
}
