//! Configuration module for the Equiptrack backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback signing secret for local development only.
const DEV_JWT_SECRET: &str = "equiptrack-dev-secret";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign and verify credentials (required in production)
    pub jwt_secret: Option<String>,
    /// How long an issued credential stays valid, in hours
    pub token_ttl_hours: i64,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("EQUIPTRACK_JWT_SECRET").ok();

        let token_ttl_hours = env::var("EQUIPTRACK_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        let db_path = env::var("EQUIPTRACK_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("EQUIPTRACK_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid EQUIPTRACK_BIND_ADDR format");

        let log_level = env::var("EQUIPTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            jwt_secret,
            token_ttl_hours,
            db_path,
            bind_addr,
            log_level,
        }
    }

    /// The signing secret, falling back to the development default.
    pub fn signing_secret(&self) -> &[u8] {
        self.jwt_secret
            .as_deref()
            .unwrap_or(DEV_JWT_SECRET)
            .as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("EQUIPTRACK_JWT_SECRET");
        env::remove_var("EQUIPTRACK_TOKEN_TTL_HOURS");
        env::remove_var("EQUIPTRACK_DB_PATH");
        env::remove_var("EQUIPTRACK_BIND_ADDR");
        env::remove_var("EQUIPTRACK_LOG_LEVEL");

        let config = Config::from_env();

        assert!(config.jwt_secret.is_none());
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.signing_secret(), DEV_JWT_SECRET.as_bytes());
    }
}
