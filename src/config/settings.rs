//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SESSION_TTL_SECONDS,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub session_ttl_seconds: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            session_ttl_seconds: env::var("SESSION_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
