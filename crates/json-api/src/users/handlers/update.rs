//! Update User Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gbms_app::domain::{activity::data::Actor, users::data::UserUpdate};

use crate::{
    extensions::*,
    state::State,
    users::{RoleName, UserResponse, into_status_error},
};

/// Update User Request
///
/// Omitted fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<RoleName>,
    pub phone: Option<String>,
    pub position: Option<String>,
    /// `false` disables the account and invalidates its tokens
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        UserUpdate {
            name: request.name,
            email: request.email,
            department: request.department,
            role: request.role.map(Into::into),
            phone: request.phone,
            position: request.position,
            is_active: request.is_active,
        }
    }
}

/// Update User Handler
#[endpoint(
    tags("users"),
    summary = "Update User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User updated"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
    ),
)]
#[tracing::instrument(
    name = "users.update",
    skip(uuid, json, req, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateUserRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = Actor::new(depot.current_user_or_401()?, req.client_address());
    let uuid = uuid.into_inner();

    tracing::Span::current().record("user_uuid", tracing::field::display(uuid));

    let user = state
        .app
        .users
        .update_user(actor, uuid.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
