//! Users service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::{
    auth::{hash_password, validate_password},
    domain::{
        activity::{
            data::{Actor, NewActivityEntry},
            records::ActivityAction,
        },
        users::{
            data::{NewUser, UserFilter, UserInsert, UserUpdate},
            errors::UsersServiceError,
            records::{UserRecord, UserUuid},
            repository::{PgUsersRepository, UsersRepository},
        },
    },
};

const USER_ENTITY: &str = "user";

/// [`UsersService`] backed by Postgres.
pub struct PgUsersService {
    repository: Arc<dyn UsersRepository>,
}

impl PgUsersService {
    /// Service over the users table in `pool`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: Arc::new(PgUsersRepository::new(pool)),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repository(repository: Arc<dyn UsersRepository>) -> Self {
        Self { repository }
    }

    /// Create a user without an acting account, for bootstrapping the first
    /// administrator from the command line.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`UsersService::create_user`].
    pub async fn create_initial_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        self.insert_user(None, user).await
    }

    async fn insert_user(
        &self,
        actor: Option<&Actor>,
        user: NewUser,
    ) -> Result<UserRecord, UsersServiceError> {
        require("user ID", &user.user_id)?;
        require("name", &user.name)?;
        require("department", &user.department)?;
        validate_password(&user.password)?;

        let insert = UserInsert {
            uuid: UserUuid::new(),
            user_id: user.user_id.trim().to_string(),
            password_hash: hash_password(&user.password)?,
            name: user.name,
            department: user.department,
            email: user.email,
            role: user.role,
            phone: user.phone,
            position: user.position,
            is_active: user.is_active,
        };

        let audit = match actor {
            Some(actor) => actor.entry(
                ActivityAction::Create,
                USER_ENTITY,
                Some(insert.uuid.into_uuid()),
                format!("{} created user {}", actor.name, insert.user_id),
            ),
            None => NewActivityEntry {
                actor: None,
                action: ActivityAction::Create,
                entity_type: USER_ENTITY.to_string(),
                entity_uuid: Some(insert.uuid.into_uuid()),
                description: format!("user {} created from the command line", insert.user_id),
                client_address: None,
            },
        };

        let created = self.repository.create_user(insert, audit).await?;

        info!(user = %created.uuid, actor = ?actor.map(|actor| actor.uuid), "user created");

        Ok(created)
    }

    async fn existing_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        self.repository
            .get_user(user)
            .await?
            .ok_or(UsersServiceError::NotFound)
    }
}

fn require(field: &str, value: &str) -> Result<(), UsersServiceError> {
    if value.trim().is_empty() {
        return Err(UsersServiceError::Validation(format!("{field} is required")));
    }

    Ok(())
}

fn require_if_present(field: &str, value: Option<&str>) -> Result<(), UsersServiceError> {
    value.map_or(Ok(()), |value| require(field, value))
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<UserRecord>, UsersServiceError> {
        Ok(self.repository.list_users(filter).await?)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        self.existing_user(user).await
    }

    async fn create_user(
        &self,
        actor: Actor,
        user: NewUser,
    ) -> Result<UserRecord, UsersServiceError> {
        self.insert_user(Some(&actor), user).await
    }

    async fn update_user(
        &self,
        actor: Actor,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        require_if_present("name", update.name.as_deref())?;
        require_if_present("department", update.department.as_deref())?;

        let existing = self.existing_user(user).await?;

        if update.is_empty() {
            return Ok(existing);
        }

        let audit = actor.entry(
            ActivityAction::Update,
            USER_ENTITY,
            Some(user.into_uuid()),
            format!("{} updated user {}", actor.name, existing.user_id),
        );

        let updated = self
            .repository
            .update_user(user, update, audit)
            .await?
            .ok_or(UsersServiceError::NotFound)?;

        info!(user = %updated.uuid, actor = %actor.uuid, "user updated");

        Ok(updated)
    }

    async fn reset_password(
        &self,
        actor: Actor,
        user: UserUuid,
        new_password: String,
    ) -> Result<(), UsersServiceError> {
        validate_password(&new_password)?;

        let existing = self.existing_user(user).await?;
        let password_hash = hash_password(&new_password)?;

        let audit = actor.entry(
            ActivityAction::Update,
            USER_ENTITY,
            Some(user.into_uuid()),
            format!("{} reset the password of user {}", actor.name, existing.user_id),
        );

        if !self
            .repository
            .set_password_hash(user, password_hash, audit)
            .await?
        {
            return Err(UsersServiceError::NotFound);
        }

        info!(user = %user, actor = %actor.uuid, "password reset");

        Ok(())
    }

    async fn delete_user(&self, actor: Actor, user: UserUuid) -> Result<(), UsersServiceError> {
        if actor.uuid == user {
            return Err(UsersServiceError::SelfDeletion);
        }

        let existing = self.existing_user(user).await?;

        let audit = actor.entry(
            ActivityAction::Delete,
            USER_ENTITY,
            Some(user.into_uuid()),
            format!("{} deleted user {}", actor.name, existing.user_id),
        );

        if !self.repository.delete_user(user, audit).await? {
            return Err(UsersServiceError::NotFound);
        }

        info!(user = %user, actor = %actor.uuid, "user deleted");

        Ok(())
    }
}

/// Back-office user management.
#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Users matching `filter`, ordered by name.
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Create a user with a hashed password and record who created it.
    async fn create_user(&self, actor: Actor, user: NewUser)
    -> Result<UserRecord, UsersServiceError>;

    /// Apply a partial update. An empty update returns the user unchanged
    /// without writing an activity entry.
    async fn update_user(
        &self,
        actor: Actor,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Replace a user's password without knowing the current one.
    async fn reset_password(
        &self,
        actor: Actor,
        user: UserUuid,
        new_password: String,
    ) -> Result<(), UsersServiceError>;

    /// Delete a user. Their past activity entries are kept with the actor
    /// reference cleared. Deleting one's own account is refused.
    async fn delete_user(&self, actor: Actor, user: UserUuid) -> Result<(), UsersServiceError>;
}
