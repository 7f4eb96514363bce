//! Activity service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::{
    activity::{
        data::{NewActivityEntry, clamp_limit},
        errors::ActivityServiceError,
        records::ActivityEntry,
        repository::{ActivityRepository, PgActivityRepository},
    },
    users::records::UserUuid,
};

/// [`ActivityService`] backed by Postgres.
pub struct PgActivityService {
    repository: Arc<dyn ActivityRepository>,
}

impl PgActivityService {
    /// Service over the activity log in `pool`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: Arc::new(PgActivityRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(repository: Arc<dyn ActivityRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ActivityService for PgActivityService {
    async fn record(&self, entry: NewActivityEntry) -> Result<ActivityEntry, ActivityServiceError> {
        if entry.entity_type.trim().is_empty() {
            return Err(ActivityServiceError::Validation(
                "entity type is required".to_string(),
            ));
        }

        let recorded = self.repository.append(entry).await?;

        tracing::debug!(
            activity = %recorded.uuid,
            action = %recorded.action,
            entity_type = %recorded.entity_type,
            "activity recorded"
        );

        Ok(recorded)
    }

    async fn list_recent(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<ActivityEntry>, ActivityServiceError> {
        Ok(self.repository.list_recent(clamp_limit(limit)).await?)
    }

    async fn list_for_user(
        &self,
        user: UserUuid,
        limit: Option<u32>,
    ) -> Result<Vec<ActivityEntry>, ActivityServiceError> {
        Ok(self
            .repository
            .list_for_user(user, clamp_limit(limit))
            .await?)
    }
}

/// Audit trail reads and standalone writes.
#[automock]
#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Append an entry for an action performed outside a user mutation, such
    /// as an export or import.
    async fn record(&self, entry: NewActivityEntry) -> Result<ActivityEntry, ActivityServiceError>;

    /// Most recent entries across all users, newest first. `limit` defaults to
    /// 10 and is clamped to `1..=100`.
    async fn list_recent(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<ActivityEntry>, ActivityServiceError>;

    /// Most recent entries performed by `user`, newest first.
    async fn list_for_user(
        &self,
        user: UserUuid,
        limit: Option<u32>,
    ) -> Result<Vec<ActivityEntry>, ActivityServiceError>;
}
