//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use redator_infra::{DatabaseConfig, JwtConfig, OpenAiConfig};

use crate::sessions::DEFAULT_IDLE_TTL;

#[cfg(feature = "rate-limit")]
use redator_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on in-memory storage.
    pub database: Option<DatabaseConfig>,
    pub openai: OpenAiConfig,
    pub jwt: JwtConfig,
    /// Editing sessions untouched for this long are discarded.
    pub session_idle_ttl: Duration,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            openai: OpenAiConfig::from_env(),
            jwt: JwtConfig::from_env(),
            session_idle_ttl: parse_var("EDITOR_SESSION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_IDLE_TTL),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
