use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::domains::auth::DEFAULT_ROLES_CLAIM;
use crate::kernel::DEFAULT_HISTORY_TIMEOUT;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// History log database; defaults to `database_url`
    pub history_database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Namespaced claim carrying the caller's roles
    pub roles_claim: String,
    pub history_timeout: Duration,
    pub rate_limit_enabled: bool,
    pub database_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            history_database_url: env::var("HISTORY_DATABASE_URL")
                .unwrap_or_else(|_| database_url.clone()),
            database_url,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "moderation-server".to_string()),
            roles_claim: env::var("ROLES_CLAIM")
                .unwrap_or_else(|_| DEFAULT_ROLES_CLAIM.to_string()),
            history_timeout: history_timeout(env::var("HISTORY_TIMEOUT_MS").ok().as_deref())?,
            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
        })
    }
}

/// `HISTORY_TIMEOUT_MS`, falling back to [`DEFAULT_HISTORY_TIMEOUT`]
fn history_timeout(raw: Option<&str>) -> Result<Duration> {
    match raw {
        None => Ok(DEFAULT_HISTORY_TIMEOUT),
        Some(ms) => ms
            .trim()
            .parse()
            .map(Duration::from_millis)
            .context("HISTORY_TIMEOUT_MS must be a number of milliseconds"),
    }
}
