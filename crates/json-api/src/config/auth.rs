//! Auth Config

use clap::Args;
use gbms_app::auth::{SigningSecret, SigningSecretError, TokenIssuer};
use jiff::SignedDuration;

/// Longest accepted access token lifetime: thirty days.
const MAX_TTL_HOURS: i64 = 24 * 30;

/// Access token settings.
#[derive(Args)]
pub struct AuthConfig {
    /// Secret used to sign access tokens (at least 32 bytes)
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    pub jwt_secret_key: String,

    /// Access token lifetime in hours
    #[arg(long, env = "JWT_ACCESS_TOKEN_TTL_HOURS", default_value_t = 8_i64)]
    pub jwt_access_token_ttl_hours: i64,
}

impl AuthConfig {
    /// Build the token issuer from the configured secret and lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is too short.
    pub fn token_issuer(&self) -> Result<TokenIssuer, SigningSecretError> {
        let secret = SigningSecret::new(self.jwt_secret_key.as_bytes())?;

        Ok(TokenIssuer::new(
            secret,
            SignedDuration::from_hours(self.jwt_access_token_ttl_hours.clamp(1, MAX_TTL_HOURS)),
        ))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_access_token_ttl_hours", &self.jwt_access_token_ttl_hours)
            .finish_non_exhaustive()
    }
}
