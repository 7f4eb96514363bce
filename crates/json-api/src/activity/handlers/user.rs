//! User Activity Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    activity::{ActivityResponse, into_status_error},
    extensions::*,
    state::State,
};

/// User Activity Handler
///
/// Entries performed by one user, newest first.
#[endpoint(
    tags("activity"),
    summary = "User Activity",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ActivityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let entries = state
        .app
        .activity
        .list_for_user(uuid.into_inner().into(), limit.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(entries.into()))
}
