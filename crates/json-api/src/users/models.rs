//! User Models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gbms_app::domain::users::records::{Role, UserRecord};

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RoleName {
    Admin,
    Manager,
    User,
}

impl From<Role> for RoleName {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Manager => Self::Manager,
            Role::User => Self::User,
        }
    }
}

impl From<RoleName> for Role {
    fn from(role: RoleName) -> Self {
        match role {
            RoleName::Admin => Self::Admin,
            RoleName::Manager => Self::Manager,
            RoleName::User => Self::User,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    /// Internal identifier
    pub uuid: Uuid,

    /// Login identifier
    pub user_id: String,

    /// Display name
    pub name: String,

    pub email: Option<String>,

    /// Department tag
    pub department: String,

    pub role: RoleName,

    pub phone: Option<String>,

    /// Job title
    pub position: Option<String>,

    /// Disabled accounts cannot sign in
    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,

    /// Time of the most recent successful login
    pub last_login_at: Option<String>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid.into(),
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            department: user.department,
            role: user.role.into(),
            phone: user.phone,
            position: user.position,
            is_active: user.is_active,
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
            last_login_at: user.last_login_at.as_ref().map(ToString::to_string),
        }
    }
}
