//! App Context

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenIssuer},
    database,
    domain::{
        activity::{ActivityService, PgActivityService},
        users::{PgUsersService, UsersService},
    },
};

/// Failures while building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Shared services, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub activity: Arc<dyn ActivityService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, tokens: TokenIssuer) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_pool(pool, tokens))
    }

    /// Build application context around an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, tokens: TokenIssuer) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(pool.clone(), tokens)),
            users: Arc::new(PgUsersService::new(pool.clone())),
            activity: Arc::new(PgActivityService::new(pool)),
        }
    }
}
