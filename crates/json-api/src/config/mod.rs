//! Server configuration module

use std::net::SocketAddr;

use clap::Parser;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// GBMS JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "gbms-json", about = "GBMS back-office JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Access token settings.
    #[command(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn defaults_apply_when_only_required_values_are_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "gbms-json",
            "--database-url",
            "postgres://localhost/gbms",
            "--jwt-secret-key",
            SECRET,
        ])?;

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8698");
        assert_eq!(config.logging.log_level, LevelFilter::INFO);
        assert_eq!(config.auth.jwt_access_token_ttl_hours, 8);
        assert!(matches!(
            config.logging.log_format,
            observability::LogFormat::Compact
        ));

        Ok(())
    }

    #[test]
    fn short_signing_secret_is_rejected_when_building_the_issuer() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "gbms-json",
            "--database-url",
            "postgres://localhost/gbms",
            "--jwt-secret-key",
            "short",
        ])?;

        assert!(config.auth.token_issuer().is_err());

        Ok(())
    }
}
