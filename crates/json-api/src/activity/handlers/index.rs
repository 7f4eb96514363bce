//! Activity Log Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    activity::{ActivityResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Activity Log Handler
///
/// Most recent entries across all users, newest first. `limit` defaults to
/// 10 and is capped at 100.
#[endpoint(
    tags("activity"),
    summary = "Recent Activity",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ActivityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let entries = state
        .app
        .activity
        .list_recent(limit.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(entries.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use gbms_app::domain::{activity::records::ActivityAction, users::records::Role};

    use crate::{
        activity::models::tests::make_entry,
        test_helpers::{Mocks, make_user, service_as},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(
            make_user("viewer", Role::User),
            mocks,
            Router::with_path("activity-log").get(handler),
        )
    }

    #[tokio::test]
    async fn without_limit_uses_service_default() -> TestResult {
        let actor = make_user("kim", Role::User).uuid;
        let mut mocks = Mocks::default();

        mocks
            .activity
            .expect_list_recent()
            .once()
            .with(eq(None))
            .return_once(move |_| {
                Ok(vec![
                    make_entry(Some(actor), ActivityAction::Logout),
                    make_entry(Some(actor), ActivityAction::Login),
                ])
            });

        let response: ActivityResponse = TestClient::get("http://example.com/activity-log")
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        let actions: Vec<&str> = response.entries.iter().map(|e| e.action.as_str()).collect();

        assert_eq!(actions, ["logout", "login"]);

        Ok(())
    }

    #[tokio::test]
    async fn limit_is_forwarded() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .activity
            .expect_list_recent()
            .once()
            .with(eq(Some(500)))
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/activity-log?limit=500")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_limit_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/activity-log?limit=lots")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
