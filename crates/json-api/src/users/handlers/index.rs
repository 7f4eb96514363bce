//! User Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gbms_app::domain::users::data::UserFilter;

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, into_status_error},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    /// Users ordered by name
    pub users: Vec<UserResponse>,
}

/// User Index Handler
///
/// Lists accounts, optionally narrowed to a department or activation state.
#[endpoint(
    tags("users"),
    summary = "List Users",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    department: QueryParam<String, false>,
    active: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = UserFilter {
        department: department.into_inner().filter(|value| !value.trim().is_empty()),
        is_active: active.into_inner(),
    };

    let users = state
        .app
        .users
        .list_users(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}
