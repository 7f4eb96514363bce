//! Activity Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Row, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    activity::{
        data::NewActivityEntry,
        records::{ActivityAction, ActivityEntry, ActivityUuid},
    },
    users::records::UserUuid,
};

const INSERT_ACTIVITY_ENTRY_SQL: &str = include_str!("sql/insert_activity_entry.sql");
const LIST_RECENT_ACTIVITY_SQL: &str = include_str!("sql/list_recent_activity.sql");
const LIST_ACTIVITY_FOR_USER_SQL: &str = include_str!("sql/list_activity_for_user.sql");

/// Insert `entry` on an existing connection, typically inside the same
/// transaction as the mutation it describes.
pub(crate) async fn insert_entry(
    conn: &mut PgConnection,
    entry: &NewActivityEntry,
) -> Result<ActivityEntry, sqlx::Error> {
    query_as::<Postgres, ActivityEntry>(INSERT_ACTIVITY_ENTRY_SQL)
        .bind(ActivityUuid::new().into_uuid())
        .bind(entry.actor.map(UserUuid::into_uuid))
        .bind(entry.action.as_str())
        .bind(&entry.entity_type)
        .bind(entry.entity_uuid)
        .bind(&entry.description)
        .bind(entry.client_address.as_deref())
        .fetch_one(conn)
        .await
}

#[derive(Debug, Clone)]
pub(crate) struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn append(&self, entry: NewActivityEntry) -> Result<ActivityEntry, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;

        insert_entry(&mut conn, &entry).await
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        query_as::<Postgres, ActivityEntry>(LIST_RECENT_ACTIVITY_SQL)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
    }

    async fn list_for_user(
        &self,
        user: UserUuid,
        limit: u32,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        query_as::<Postgres, ActivityEntry>(LIST_ACTIVITY_FOR_USER_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
    }
}

#[automock]
#[async_trait]
pub(crate) trait ActivityRepository: Send + Sync {
    /// Append a single entry in its own transaction.
    async fn append(&self, entry: NewActivityEntry) -> Result<ActivityEntry, sqlx::Error>;

    /// Most recent entries across all users, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityEntry>, sqlx::Error>;

    /// Most recent entries attributed to `user`, newest first.
    async fn list_for_user(
        &self,
        user: UserUuid,
        limit: u32,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error>;
}

impl<'r> FromRow<'r, PgRow> for ActivityEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let action: String = row.try_get("action")?;

        let action = action
            .parse::<ActivityAction>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "action".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ActivityUuid::from_uuid(row.try_get("uuid")?),
            actor: row
                .try_get::<Option<Uuid>, _>("actor_uuid")?
                .map(UserUuid::from_uuid),
            actor_name: row.try_get("actor_name")?,
            action,
            entity_type: row.try_get("entity_type")?,
            entity_uuid: row.try_get("entity_uuid")?,
            description: row.try_get("description")?,
            client_address: row.try_get("client_address")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
