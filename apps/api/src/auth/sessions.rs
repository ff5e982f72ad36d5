//! Admin session storage.
//!
//! Sessions are opaque bearer tokens mapped to an [`AdminIdentity`] with a TTL.
//! Production uses Redis; tests use the in-memory store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::Client as RedisClient;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::admin::AdminIdentity;

const KEY_PREFIX: &str = "session:";

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, admin: &AdminIdentity, ttl: Duration) -> Result<IssuedSession, AppError>;

    async fn lookup(&self, token: &str) -> Result<Option<AdminIdentity>, AppError>;

    async fn revoke(&self, token: &str) -> Result<(), AppError>;
}

/// Two v4 UUIDs (244 random bits) rendered as 64 hex characters.
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

pub fn session_key(token: &str) -> String {
    format!("{KEY_PREFIX}{token}")
}

fn expiry(ttl: Duration) -> DateTime<Utc> {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(1));
    Utc::now() + ttl
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, admin: &AdminIdentity, ttl: Duration) -> Result<IssuedSession, AppError> {
        let token = generate_token();
        let payload = serde_json::to_string(admin)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode session: {e}")))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(session_key(&token))
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(IssuedSession {
            token,
            expires_at: expiry(ttl),
        })
    }

    async fn lookup(&self, token: &str) -> Result<Option<AdminIdentity>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(session_key(token))
            .query_async(&mut conn)
            .await?;

        match payload {
            None => Ok(None),
            Some(raw) => match serde_json::from_str::<AdminIdentity>(&raw) {
                Ok(identity) => Ok(Some(identity)),
                Err(e) => {
                    tracing::warn!("Discarding unreadable session payload: {e}");
                    Ok(None)
                }
            },
        }
    }

    async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(session_key(token))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Instant;

    use super::*;

    #[derive(Default)]
    pub struct InMemorySessionStore {
        sessions: Mutex<HashMap<String, (AdminIdentity, Instant)>>,
    }

    #[async_trait]
    impl SessionStore for InMemorySessionStore {
        async fn create(
            &self,
            admin: &AdminIdentity,
            ttl: Duration,
        ) -> Result<IssuedSession, AppError> {
            let token = generate_token();
            self.sessions
                .lock()
                .unwrap()
                .insert(token.clone(), (admin.clone(), Instant::now() + ttl));
            Ok(IssuedSession {
                token,
                expires_at: expiry(ttl),
            })
        }

        async fn lookup(&self, token: &str) -> Result<Option<AdminIdentity>, AppError> {
            let mut sessions = self.sessions.lock().unwrap();
            match sessions.get(token) {
                Some((_, deadline)) if *deadline <= Instant::now() => {
                    sessions.remove(token);
                    Ok(None)
                }
                Some((identity, _)) => Ok(Some(identity.clone())),
                None => Ok(None),
            }
        }

        async fn revoke(&self, token: &str) -> Result<(), AppError> {
            self.sessions.lock().unwrap().remove(token);
            Ok(())
        }
    }
}
