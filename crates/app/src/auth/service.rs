//! Auth service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    auth::{
        AuthServiceError, TokenIssuer, hash_password, validate_password, verify_password,
        verify_password_or_dummy,
    },
    domain::{
        activity::{
            data::{Actor, NewActivityEntry},
            records::ActivityAction,
            repository::{ActivityRepository, PgActivityRepository},
        },
        users::{
            records::UserRecord,
            repository::{PgUsersRepository, UsersRepository},
        },
    },
};

const USER_ENTITY: &str = "user";

/// Login form data.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub user_id: String,
    pub password: String,
    pub client_address: Option<String>,
}

impl Debug for LoginCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LoginCredentials")
            .field("user_id", &self.user_id)
            .field("client_address", &self.client_address)
            .finish_non_exhaustive()
    }
}

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: UserRecord,
}

/// Self-service password change request.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl Debug for PasswordChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("PasswordChange { .. }")
    }
}

/// [`AuthService`] backed by the Postgres repositories.
pub struct PgAuthService {
    users: Arc<dyn UsersRepository>,
    activity: Arc<dyn ActivityRepository>,
    tokens: TokenIssuer,
}

impl PgAuthService {
    /// Service over the Postgres repositories in `pool`.
    #[must_use]
    pub fn new(pool: PgPool, tokens: TokenIssuer) -> Self {
        Self {
            users: Arc::new(PgUsersRepository::new(pool.clone())),
            activity: Arc::new(PgActivityRepository::new(pool)),
            tokens,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_repositories(
        users: Arc<dyn UsersRepository>,
        activity: Arc<dyn ActivityRepository>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            activity,
            tokens,
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn login(
        &self,
        credentials: LoginCredentials,
        now: Timestamp,
    ) -> Result<LoginOutcome, AuthServiceError> {
        if credentials.user_id.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthServiceError::Validation(
                "user ID and password are required".to_string(),
            ));
        }

        let Some(found) = self
            .users
            .find_credentials(credentials.user_id.trim().to_string())
            .await?
        else {
            verify_password_or_dummy(None, &credentials.password);

            warn!(user_id = %credentials.user_id, "login rejected: unknown user ID");

            return Err(AuthServiceError::BadCredentials);
        };

        if !verify_password(&found.password_hash, &credentials.password) {
            warn!(user = %found.user.uuid, "login rejected: wrong password");

            return Err(AuthServiceError::BadCredentials);
        }

        if !found.user.is_active {
            warn!(user = %found.user.uuid, "login rejected: account disabled");

            return Err(AuthServiceError::AccountDisabled);
        }

        let issued = self.tokens.issue(found.user.uuid, now)?;

        let audit = NewActivityEntry {
            actor: Some(found.user.uuid),
            action: ActivityAction::Login,
            entity_type: USER_ENTITY.to_string(),
            entity_uuid: Some(found.user.uuid.into_uuid()),
            description: format!("{} logged in", found.user.name),
            client_address: credentials.client_address,
        };

        let user = self
            .users
            .record_login(found.user.uuid, now, audit)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        info!(user = %user.uuid, "user logged in");

        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
        now: Timestamp,
    ) -> Result<UserRecord, AuthServiceError> {
        let user_uuid = self.tokens.verify(bearer_token, now)?;

        let user = self
            .users
            .get_user(user_uuid)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        if !user.is_active {
            return Err(AuthServiceError::AccountDisabled);
        }

        Ok(user)
    }

    async fn logout(&self, actor: Actor) -> Result<(), AuthServiceError> {
        let entry = actor.entry(
            ActivityAction::Logout,
            USER_ENTITY,
            Some(actor.uuid.into_uuid()),
            format!("{} logged out", actor.name),
        );

        self.activity.append(entry).await?;

        info!(user = %actor.uuid, "user logged out");

        Ok(())
    }

    async fn change_password(
        &self,
        actor: Actor,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError> {
        if change.current_password.is_empty() || change.new_password.is_empty() {
            return Err(AuthServiceError::Validation(
                "current and new passwords are required".to_string(),
            ));
        }

        let stored = self
            .users
            .get_password_hash(actor.uuid)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        if !verify_password(&stored, &change.current_password) {
            warn!(user = %actor.uuid, "password change rejected: wrong current password");

            return Err(AuthServiceError::BadCredentials);
        }

        validate_password(&change.new_password)?;

        let entry = actor.entry(
            ActivityAction::Update,
            USER_ENTITY,
            Some(actor.uuid.into_uuid()),
            format!("{} changed their password", actor.name),
        );

        if !self
            .users
            .set_password_hash(actor.uuid, hash_password(&change.new_password)?, entry)
            .await?
        {
            return Err(AuthServiceError::UnknownUser);
        }

        info!(user = %actor.uuid, "password changed");

        Ok(())
    }
}

/// Login, bearer authentication and self-service account operations.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials, issue an access token, stamp the last login time
    /// and record the login.
    async fn login(
        &self,
        credentials: LoginCredentials,
        now: Timestamp,
    ) -> Result<LoginOutcome, AuthServiceError>;

    /// Resolve a bearer token into the active user it was issued for.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
        now: Timestamp,
    ) -> Result<UserRecord, AuthServiceError>;

    /// Record a logout. Issued tokens stay valid until they expire.
    async fn logout(&self, actor: Actor) -> Result<(), AuthServiceError>;

    /// Replace the actor's own password after checking the current one.
    async fn change_password(
        &self,
        actor: Actor,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError>;
}
