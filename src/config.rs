//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup; a `.env` file is honoured for local
//! development.

use std::env;

/// Largest accepted photo payload: 5 MiB.
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// SQLite database file (":memory:" for an in-memory store)
    pub database_path: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Base of the shareable invitation link; the token is appended as `startapp`
    pub invitation_base_url: String,
    /// Maximum photo payload in bytes
    pub max_photo_bytes: usize,
    /// Populate the database with demo users and duels on startup
    pub seed_demo_data: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            database_path: ":memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            invitation_base_url: "https://max.ru/t272_hakaton_bot".to_string(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            seed_demo_data: false,
        }
    }
}

impl Config {
    /// Config used by tests: in-memory database, default limits.
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let max_photo_bytes = match env::var("MAX_PHOTO_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("MAX_PHOTO_BYTES", raw))?,
            Err(_) => DEFAULT_MAX_PHOTO_BYTES,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "habit_duels.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            invitation_base_url: env::var("INVITATION_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://max.ru/t272_hakaton_bot".to_string()),
            max_photo_bytes,
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
