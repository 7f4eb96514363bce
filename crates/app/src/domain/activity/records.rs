//! Activity Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Activity Entry UUID
pub type ActivityUuid = TypedUuid<ActivityEntry>;

/// Kind of action an activity entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Login,
    Logout,
    Create,
    Update,
    Delete,
    Export,
    Import,
}

impl ActivityAction {
    /// Stored action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Import => "import",
        }
    }
}

impl Display for ActivityAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Stored action name that does not map to an [`ActivityAction`].
#[derive(Debug, Error)]
#[error("unknown activity action: {0}")]
pub struct UnknownAction(String);

impl FromStr for ActivityAction {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "export" => Ok(Self::Export),
            "import" => Ok(Self::Import),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Activity Entry
///
/// Entries are immutable once written. `actor` becomes `None` if the acting
/// user is later deleted; `actor_name` is resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub uuid: ActivityUuid,
    pub actor: Option<UserUuid>,
    pub actor_name: Option<String>,
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_uuid: Option<Uuid>,
    pub description: String,
    pub client_address: Option<String>,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn actions_parse_from_their_wire_names() -> TestResult {
        for action in [
            ActivityAction::Login,
            ActivityAction::Logout,
            ActivityAction::Create,
            ActivityAction::Update,
            ActivityAction::Delete,
            ActivityAction::Export,
            ActivityAction::Import,
        ] {
            assert_eq!(action.as_str().parse::<ActivityAction>()?, action);
        }

        Ok(())
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!("approve".parse::<ActivityAction>().is_err());
    }
}
