//! App Router

use salvo::Router;

use crate::{
    activity,
    auth::{self, middleware},
    users,
};

/// Routes under `/api`. Everything except login sits behind the bearer
/// middleware; user mutations additionally require an administrator.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(Router::with_path("auth/login").post(auth::login::handler))
        .push(
            Router::new()
                .hoop(middleware::authenticate)
                .push(Router::with_path("auth/logout").post(auth::logout::handler))
                .push(Router::with_path("auth/me").get(auth::me::handler))
                .push(
                    Router::with_path("auth/change-password")
                        .post(auth::change_password::handler),
                )
                .push(Router::with_path("activity-log").get(activity::index::handler))
                .push(
                    Router::with_path("users").get(users::index::handler).push(
                        Router::with_path("{uuid}")
                            .get(users::get::handler)
                            .push(Router::with_path("activity").get(activity::user::handler)),
                    ),
                )
                .push(
                    Router::with_path("users")
                        .hoop(middleware::require_admin)
                        .post(users::create::handler)
                        .push(
                            Router::with_path("{uuid}")
                                .put(users::update::handler)
                                .delete(users::delete::handler)
                                .push(
                                    Router::with_path("password")
                                        .put(users::reset_password::handler),
                                ),
                        ),
                ),
        )
}
