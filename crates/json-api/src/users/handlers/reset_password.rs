//! Reset User Password Handler

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

use gbms_app::domain::activity::data::Actor;

use crate::{extensions::*, state::State, users::into_status_error};

/// Reset Password Request
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest {
    /// At least 6 characters
    pub new_password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResetPasswordRequest { .. }")
    }
}

/// Reset User Password Handler
///
/// Sets a new password for another account without knowing the old one.
#[endpoint(
    tags("users"),
    summary = "Reset User Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Password replaced"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password too short"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator role required"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<ResetPasswordRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = Actor::new(depot.current_user_or_401()?, req.client_address());

    state
        .app
        .users
        .reset_password(actor, uuid.into_inner().into(), json.into_inner().new_password)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use gbms_app::domain::users::{UsersServiceError, records::Role};

    use crate::test_helpers::{Mocks, make_user, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            make_user("root", Role::Admin),
            mocks,
            Router::with_path("users/{uuid}/password").put(handler),
        )
    }

    #[tokio::test]
    async fn reset_returns_204() -> TestResult {
        let uuid = Uuid::now_v7();
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_reset_password()
            .once()
            .withf(move |_, requested, password| {
                requested.into_uuid() == uuid && password == "fresh-password"
            })
            .return_once(|_, _, _| Ok(()));

        let res = TestClient::put(format!("http://example.com/users/{uuid}/password"))
            .json(&json!({ "newPassword": "fresh-password" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn short_password_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_reset_password()
            .once()
            .return_once(|_, _, _| {
                Err(UsersServiceError::Validation(
                    "password must be at least 6 characters".to_string(),
                ))
            });

        let res = TestClient::put(format!("http://example.com/users/{}/password", Uuid::now_v7()))
            .json(&json!({ "newPassword": "123" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
