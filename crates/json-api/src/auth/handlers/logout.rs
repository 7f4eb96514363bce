//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use gbms_app::domain::activity::data::Actor;

use crate::{auth::into_status_error, extensions::*, state::State};

/// Logout Handler
///
/// Records the logout. The token itself stays valid until it expires.
#[endpoint(
    tags("auth"),
    summary = "Log Out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Logged out"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not authenticated"),
    ),
)]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = Actor::new(depot.current_user_or_401()?, req.client_address());

    state
        .app
        .auth
        .logout(actor)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
