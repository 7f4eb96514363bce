//! Activity Data

use uuid::Uuid;

use crate::domain::{
    activity::records::ActivityAction,
    users::records::{UserRecord, UserUuid},
};

/// Number of entries returned when no limit is requested.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

/// Largest page of entries a single query returns.
pub const MAX_ACTIVITY_LIMIT: u32 = 100;

/// Resolve a requested page size into `1..=MAX_ACTIVITY_LIMIT`.
#[must_use]
pub fn clamp_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT)
}

/// New Activity Entry Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityEntry {
    pub actor: Option<UserUuid>,
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_uuid: Option<Uuid>,
    pub description: String,
    pub client_address: Option<String>,
}

/// The authenticated user performing a mutation, with the address their
/// request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub uuid: UserUuid,
    pub name: String,
    pub client_address: Option<String>,
}

impl Actor {
    /// Actor for `user`, seen from `client_address`.
    #[must_use]
    pub fn new(user: &UserRecord, client_address: Option<String>) -> Self {
        Self {
            uuid: user.uuid,
            name: user.name.clone(),
            client_address,
        }
    }

    /// Build an entry attributed to this actor.
    #[must_use]
    pub fn entry(
        &self,
        action: ActivityAction,
        entity_type: &str,
        entity_uuid: Option<Uuid>,
        description: String,
    ) -> NewActivityEntry {
        NewActivityEntry {
            actor: Some(self.uuid),
            action,
            entity_type: entity_type.to_string(),
            entity_uuid,
            description,
            client_address: self.client_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_ten() {
        assert_eq!(clamp_limit(None), 10);
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(100)), 100);
        assert_eq!(clamp_limit(Some(10_000)), 100);
    }
}
