//! Redis-backed session store.
//!
//! Persists serialized [`SecurityContext`] values under opaque tokens so
//! sessions survive across requests without any process-wide mutable state.
//! Tokens are random UUIDs; keys expire after the configured TTL.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use uuid::Uuid;

use crate::config::{Config, SESSION_KEY_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::security::SecurityContext;

/// Session store wrapper with connection pooling.
#[derive(Clone)]
pub struct SessionStore {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl SessionStore {
    /// Create a new store and connect to Redis.
    ///
    /// # Panics
    /// Panics if Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        let client =
            Client::open(config.redis_url.as_str()).expect("Failed to create Redis client");

        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!("Session store connected");

        Self {
            connection,
            ttl_seconds: config.session_ttl_seconds,
        }
    }

    /// Try to connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            connection,
            ttl_seconds: config.session_ttl_seconds,
        })
    }

    /// Session lifetime in seconds.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Persist a security context under a fresh opaque token.
    pub async fn create(&self, context: &SecurityContext) -> AppResult<String> {
        let token = Uuid::new_v4().to_string();
        self.save(&token, context).await?;
        Ok(token)
    }

    /// Rewrite the context stored under an existing token, refreshing its TTL.
    pub async fn save(&self, token: &str, context: &SecurityContext) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(context)
            .map_err(|e| AppError::internal(format!("Session serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(Self::key(token), json, self.ttl_seconds)
            .await
            .map_err(session_error)?;

        Ok(())
    }

    /// Load the security context for a token, if the session is alive.
    pub async fn load(&self, token: &str) -> AppResult<Option<SecurityContext>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(Self::key(token)).await.map_err(session_error)?;

        match value {
            Some(json) => {
                let context = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Session deserialization error: {}", e))
                })?;
                Ok(Some(context))
            }
            None => Ok(None),
        }
    }

    /// Destroy a session (logout).
    pub async fn destroy(&self, token: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(Self::key(token)).await.map_err(session_error)?;
        Ok(())
    }

    /// Check store connectivity for the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: bool = conn
            .exists(format!("{}ping", SESSION_KEY_PREFIX))
            .await
            .map_err(session_error)?;
        Ok(())
    }

    fn key(token: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, token)
    }
}

fn session_error(e: RedisError) -> AppError {
    AppError::SessionStore(e.to_string())
}
