//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use gbms_app::domain::activity::data::Actor;

use crate::{extensions::*, state::State, users::into_status_error};

/// Delete User Handler
///
/// Removes the account. Its activity history is kept.
#[endpoint(
    tags("users"),
    summary = "Delete User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "User deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cannot delete own account"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = Actor::new(depot.current_user_or_401()?, req.client_address());

    state
        .app
        .users
        .delete_user(actor, uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use gbms_app::domain::users::{UsersServiceError, records::Role};

    use crate::test_helpers::{Mocks, make_user, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            make_user("root", Role::Admin),
            mocks,
            Router::with_path("users/{uuid}").delete(handler),
        )
    }

    #[tokio::test]
    async fn delete_returns_204() -> TestResult {
        let uuid = Uuid::now_v7();
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_delete_user()
            .once()
            .withf(move |actor, requested| actor.name == "root name" && requested.into_uuid() == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/users/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn self_deletion_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_delete_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::SelfDeletion));

        let res = TestClient::delete(format!("http://example.com/users/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn missing_user_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_delete_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/users/{}", Uuid::now_v7()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
