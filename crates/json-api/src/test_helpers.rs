//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use gbms_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        activity::MockActivityService,
        users::{
            MockUsersService,
            records::{Role, UserRecord, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

/// Mock services handed to a test router. Unset expectations fail on call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub auth: MockAuthService,
    pub users: MockUsersService,
    pub activity: MockActivityService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth),
            users: Arc::new(self.users),
            activity: Arc::new(self.activity),
        })
    }
}

pub(crate) fn make_user(user_id: &str, role: Role) -> UserRecord {
    UserRecord {
        uuid: UserUuid::new(),
        user_id: user_id.to_string(),
        name: format!("{user_id} name"),
        email: None,
        department: "Planning".to_string(),
        role,
        phone: None,
        position: None,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        last_login_at: None,
    }
}

/// Stand-in for the bearer middleware: marks every request as coming from
/// the wrapped user.
#[derive(Debug, Clone)]
pub(crate) struct InjectUser(pub UserRecord);

#[handler]
impl InjectUser {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_current_user(self.0.clone());
        ctrl.call_next(req, depot, res).await;
    }
}

/// Router with mocked state and no signed-in user.
pub(crate) fn anonymous_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Router with mocked state, signed in as `user`.
pub(crate) fn service_as(user: UserRecord, mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(InjectUser(user))
            .push(route),
    )
}
