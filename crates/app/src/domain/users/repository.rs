//! Users Repository
//!
//! Every mutation writes its activity entry inside the same transaction, so a
//! change is never persisted without its audit record.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    auth::PasswordHash,
    domain::{
        activity::{data::NewActivityEntry, repository::insert_entry},
        users::{
            data::{UserFilter, UserInsert, UserUpdate},
            records::{Role, UserRecord, UserUuid},
        },
    },
};

const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const FIND_CREDENTIALS_BY_USER_ID_SQL: &str = include_str!("sql/find_credentials_by_user_id.sql");
const GET_PASSWORD_HASH_SQL: &str = include_str!("sql/get_password_hash.sql");
const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const UPDATE_USER_SQL: &str = include_str!("sql/update_user.sql");
const SET_PASSWORD_HASH_SQL: &str = include_str!("sql/set_password_hash.sql");
const RECORD_LOGIN_SQL: &str = include_str!("sql/record_login.sql");
const DELETE_USER_SQL: &str = include_str!("sql/delete_user.sql");

/// A user together with their stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserCredentials {
    pub user: UserRecord,
    pub password_hash: PasswordHash,
}

#[derive(Debug, Clone)]
pub(crate) struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_USERS_SQL)
            .bind(filter.department)
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_user(&self, user: UserUuid) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_credentials(
        &self,
        user_id: String,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        query_as::<Postgres, UserCredentials>(FIND_CREDENTIALS_BY_USER_ID_SQL)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_password_hash(&self, user: UserUuid) -> Result<Option<PasswordHash>, sqlx::Error> {
        let hash: Option<String> = query_scalar(GET_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(hash.map(PasswordHash::from_stored))
    }

    async fn create_user(
        &self,
        user: UserInsert,
        audit: NewActivityEntry,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let created = query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.user_id)
            .bind(user.password_hash.as_str())
            .bind(&user.name)
            .bind(&user.department)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.phone)
            .bind(&user.position)
            .bind(user.is_active)
            .fetch_one(&mut *tx)
            .await?;

        insert_entry(&mut tx, &audit).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
        audit: NewActivityEntry,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = query_as::<Postgres, UserRecord>(UPDATE_USER_SQL)
            .bind(user.into_uuid())
            .bind(update.name)
            .bind(update.email)
            .bind(update.department)
            .bind(update.role.map(Role::as_str))
            .bind(update.phone)
            .bind(update.position)
            .bind(update.is_active)
            .fetch_optional(&mut *tx)
            .await?;

        if updated.is_none() {
            return Ok(None);
        }

        insert_entry(&mut tx, &audit).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_password_hash(
        &self,
        user: UserUuid,
        password_hash: PasswordHash,
        audit: NewActivityEntry,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let rows_affected = query(SET_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .bind(password_hash.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }

        insert_entry(&mut tx, &audit).await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn record_login(
        &self,
        user: UserUuid,
        at: Timestamp,
        audit: NewActivityEntry,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = query_as::<Postgres, UserRecord>(RECORD_LOGIN_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(at))
            .fetch_optional(&mut *tx)
            .await?;

        if updated.is_none() {
            return Ok(None);
        }

        insert_entry(&mut tx, &audit).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_user(
        &self,
        user: UserUuid,
        audit: NewActivityEntry,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let rows_affected = query(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }

        insert_entry(&mut tx, &audit).await?;

        tx.commit().await?;

        Ok(true)
    }
}

#[automock]
#[async_trait]
pub(crate) trait UsersRepository: Send + Sync {
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<UserRecord>, sqlx::Error>;

    async fn get_user(&self, user: UserUuid) -> Result<Option<UserRecord>, sqlx::Error>;

    /// Look up a user and their password hash by login identifier.
    async fn find_credentials(
        &self,
        user_id: String,
    ) -> Result<Option<UserCredentials>, sqlx::Error>;

    async fn get_password_hash(&self, user: UserUuid) -> Result<Option<PasswordHash>, sqlx::Error>;

    async fn create_user(
        &self,
        user: UserInsert,
        audit: NewActivityEntry,
    ) -> Result<UserRecord, sqlx::Error>;

    /// Returns `None` when no such user exists; nothing is written in that case.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
        audit: NewActivityEntry,
    ) -> Result<Option<UserRecord>, sqlx::Error>;

    /// Returns `false` when no such user exists.
    async fn set_password_hash(
        &self,
        user: UserUuid,
        password_hash: PasswordHash,
        audit: NewActivityEntry,
    ) -> Result<bool, sqlx::Error>;

    /// Stamp the last login time and append the login entry.
    async fn record_login(
        &self,
        user: UserUuid,
        at: Timestamp,
        audit: NewActivityEntry,
    ) -> Result<Option<UserRecord>, sqlx::Error>;

    /// Returns `false` when no such user exists.
    async fn delete_user(
        &self,
        user: UserUuid,
        audit: NewActivityEntry,
    ) -> Result<bool, sqlx::Error>;
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        let role = role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            department: row.try_get("department")?,
            role,
            phone: row.try_get("phone")?,
            position: row.try_get("position")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            last_login_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_login_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserCredentials {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: UserRecord::from_row(row)?,
            password_hash: PasswordHash::from_stored(row.try_get("password_hash")?),
        })
    }
}
