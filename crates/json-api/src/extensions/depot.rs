//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use gbms_app::domain::users::records::UserRecord;

const CURRENT_USER_KEY: &str = "gbms.current_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Remember the user an authenticated request belongs to.
    fn insert_current_user(&mut self, user: UserRecord);

    fn current_user_or_401(&self) -> Result<&UserRecord, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: UserRecord) {
        self.insert(CURRENT_USER_KEY, user);
    }

    fn current_user_or_401(&self) -> Result<&UserRecord, StatusError> {
        self.get::<UserRecord>(CURRENT_USER_KEY)
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use gbms_app::domain::users::records::{Role, UserUuid};

    use super::*;

    #[test]
    fn current_user_round_trips_through_the_depot() {
        let user = UserRecord {
            uuid: UserUuid::new(),
            user_id: "kim".to_string(),
            name: "Kim".to_string(),
            email: None,
            department: "Planning".to_string(),
            role: Role::Manager,
            phone: None,
            position: None,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            last_login_at: None,
        };

        let mut depot = Depot::new();

        assert!(depot.current_user_or_401().is_err(), "empty depot has no user");

        depot.insert_current_user(user.clone());

        assert_eq!(depot.current_user_or_401().ok(), Some(&user));
    }
}
