//! Current User Handler

use salvo::prelude::*;

use crate::{extensions::*, users::UserResponse};

/// Current User Handler
///
/// Returns the profile of the authenticated user.
#[endpoint(
    tags("auth"),
    summary = "Current User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let user = depot.current_user_or_401()?.clone();

    Ok(Json(user.into()))
}
