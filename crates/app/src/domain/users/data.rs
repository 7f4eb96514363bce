//! Users Data

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::{
    auth::PasswordHash,
    domain::users::records::{Role, UserUuid},
};

/// New User Data
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: String,
    pub password: String,
    pub name: String,
    pub department: String,
    pub email: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NewUser")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("department", &self.department)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("phone", &self.phone)
            .field("position", &self.position)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// User Update Data
///
/// `None` leaves the stored value unchanged. The login identifier is not
/// updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// User listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

/// Validated user row ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserInsert {
    pub uuid: UserUuid,
    pub user_id: String,
    pub password_hash: PasswordHash,
    pub name: String,
    pub department: String,
    pub email: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
}
