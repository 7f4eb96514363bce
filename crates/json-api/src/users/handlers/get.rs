//! Get User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, into_status_error},
};

/// Get User Handler
#[endpoint(
    tags("users"),
    summary = "Get User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User found"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .get_user(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gbms_app::domain::users::{UsersServiceError, records::Role};

    use crate::test_helpers::{Mocks, make_user, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            make_user("viewer", Role::User),
            mocks,
            Router::with_path("users/{uuid}").get(handler),
        )
    }

    #[tokio::test]
    async fn returns_user() -> TestResult {
        let user = make_user("kim", Role::Manager);
        let uuid = user.uuid;

        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_get_user()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(user));

        let response: UserResponse = TestClient::get(format!("http://example.com/users/{uuid}"))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.user_id, "kim");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_get_user()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/users/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_uuid_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/users/not-a-uuid")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
