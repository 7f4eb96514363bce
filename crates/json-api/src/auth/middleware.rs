//! Auth middleware.
//!
//! [`authenticate`] resolves the bearer token into the current user and must
//! run before [`require_admin`].

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::AUTHORIZATION, prelude::*};

use gbms_app::auth::{RoleRequirement, parse_bearer};

use crate::{auth::into_status_error, extensions::*, state::State};

#[handler]
pub(crate) async fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let token = match parse_bearer(header) {
        Ok(token) => token.to_owned(),
        Err(rejection) => {
            res.render(into_status_error(rejection));
            ctrl.skip_rest();

            return;
        }
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    match state
        .app
        .auth
        .authenticate_bearer(&token, Timestamp::now())
        .await
    {
        Ok(user) => depot.insert_current_user(user),
        Err(rejection) => {
            res.render(into_status_error(rejection));
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

#[handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let verdict = depot
        .current_user_or_401()
        .and_then(|user| RoleRequirement::ADMIN.check(user).map_err(into_status_error));

    if let Err(status) = verdict {
        res.render(status);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

#[cfg(test)]
mod tests {
    use gbms_app::{
        auth::{AuthServiceError, TokenError},
        domain::users::records::{Role, UserRecord},
    };
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_user, service_as};

    use super::*;

    #[handler]
    async fn whoami(depot: &mut Depot, res: &mut Response) {
        let user_id = depot
            .current_user_or_401()
            .map_or_else(|_| "missing".to_string(), |user| user.user_id.clone());

        res.render(user_id);
    }

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .hoop(authenticate)
                .push(Router::new().get(whoami)),
        )
    }

    fn admin_only(user: UserRecord) -> Service {
        service_as(
            user,
            Mocks::default(),
            Router::new().hoop(require_admin).get(whoami),
        )
    }

    #[tokio::test]
    async fn missing_authorization_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn non_bearer_scheme_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token, _| token == "abc123")
            .return_once(|_, _| Err(AuthServiceError::Token(TokenError::Expired)));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn disabled_account_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_, _| Err(AuthServiceError::AccountDisabled));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn valid_token_exposes_current_user() -> TestResult {
        let user = make_user("kim", Role::User);
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .withf(|token, _| token == "abc123")
            .return_once(move |_, _| Ok(user));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer abc123", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "kim");

        Ok(())
    }

    #[tokio::test]
    async fn admin_passes_admin_gate() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .send(&admin_only(make_user("root", Role::Admin)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "root");

        Ok(())
    }

    #[tokio::test]
    async fn manager_is_forbidden_by_admin_gate() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&admin_only(make_user("lee", Role::Manager)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn admin_gate_without_identity_returns_401() -> TestResult {
        let service = Service::new(
            Router::new()
                .hoop(inject(Mocks::default().into_state()))
                .hoop(require_admin)
                .get(whoami),
        );

        let res = TestClient::get("http://example.com").send(&service).await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
