//! Create User Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use gbms_app::domain::{activity::data::Actor, users::data::NewUser};

use crate::{
    extensions::*,
    state::State,
    users::{RoleName, UserResponse, into_status_error},
};

/// Create User Request
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateUserRequest {
    pub user_id: String,
    pub name: String,
    pub department: String,
    /// Initial password, at least 6 characters
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Defaults to `user`
    #[serde(default)]
    pub role: Option<RoleName>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    /// Defaults to `true`
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("user_id", &self.user_id)
            .field("department", &self.department)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        NewUser {
            user_id: request.user_id,
            password: request.password,
            name: request.name,
            department: request.department,
            email: request.email,
            role: request.role.map(Into::into).unwrap_or_default(),
            phone: request.phone,
            position: request.position,
            is_active: request.is_active.unwrap_or(true),
        }
    }
}

/// Create User Handler
#[endpoint(
    tags("users"),
    summary = "Create User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::CONFLICT, description = "User ID or email already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateUserRequest>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = Actor::new(depot.current_user_or_401()?, req.client_address());

    let user = state
        .app
        .users
        .create_user(actor, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/users/{}", user.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(user_uuid = %user.uuid, role = %user.role, "created user");

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use gbms_app::domain::users::{UsersServiceError, records::Role};

    use crate::test_helpers::{Mocks, make_user, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            make_user("root", Role::Admin),
            mocks,
            Router::with_path("users").post(handler),
        )
    }

    #[tokio::test]
    async fn creates_user_with_defaults() -> TestResult {
        let created = make_user("kim", Role::User);
        let uuid = created.uuid;

        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_create_user()
            .once()
            .withf(|actor, user| {
                actor.name == "root name"
                    && user.user_id == "kim"
                    && user.password == "kim-password"
                    && user.role == Role::User
                    && user.is_active
            })
            .return_once(move |_, _| Ok(created));

        let mut res = TestClient::post("http://example.com/users")
            .json(&json!({
                "userId": "kim",
                "name": "Kim",
                "department": "Planning",
                "password": "kim-password",
            }))
            .send(&make_service(mocks))
            .await;

        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body: UserResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/api/users/{uuid}")));
        assert_eq!(body.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_user_id_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_create_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/users")
            .json(&json!({
                "userId": "kim",
                "name": "Kim",
                "department": "Planning",
                "password": "kim-password",
                "role": "manager",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn short_password_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_create_user()
            .once()
            .return_once(|_, _| {
                Err(UsersServiceError::Validation(
                    "password must be at least 6 characters".to_string(),
                ))
            });

        let res = TestClient::post("http://example.com/users")
            .json(&json!({
                "userId": "kim",
                "name": "Kim",
                "department": "Planning",
                "password": "123",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_role_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/users")
            .json(&json!({
                "userId": "kim",
                "name": "Kim",
                "department": "Planning",
                "password": "kim-password",
                "role": "superuser",
            }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
