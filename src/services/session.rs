//! Session storage: opaque session id bound to a user id, with expiry.
//!
//! The store is injected into `AppState` behind a trait so handlers never
//! reach for process-wide mutable session state. Redis backs deployments;
//! the in-memory store backs tests and single-process development.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;

/// Name of the session cookie issued at login.
pub const SESSION_COOKIE: &str = "pesagem_session";

/// Expiring binding from an opaque session id to a user id.
#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Open a session for the user, returning the opaque session id.
    async fn create(&self, user_id: i64) -> Result<String, AppError>;

    /// Resolve a session id to a user id, if present and not expired.
    async fn get(&self, session_id: &str) -> Result<Option<i64>, AppError>;

    /// Close a session. Closing an unknown id is not an error.
    async fn delete(&self, session_id: &str) -> Result<(), AppError>;
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Redis-backed store. Expiry is enforced by per-key TTLs.
#[derive(Debug)]
pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(redis_url: &str, ttl_secs: u64) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::Internal(format!("Redis client creation failed: {e}")))?;
        Ok(Self { client, ttl_secs })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection failed: {e}")))
    }

    fn key(session_id: &str) -> String {
        format!("session:{session_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: i64) -> Result<String, AppError> {
        let session_id = new_session_id();
        let mut con = self.connection().await?;
        con.set_ex::<_, _, ()>(Self::key(&session_id), user_id, self.ttl_secs)
            .await
            .map_err(|e| AppError::Internal(format!("Redis write failed: {e}")))?;
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<i64>, AppError> {
        let mut con = self.connection().await?;
        let user_id: Option<i64> = con
            .get(Self::key(session_id))
            .await
            .map_err(|e| AppError::Internal(format!("Redis read failed: {e}")))?;
        Ok(user_id)
    }

    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        let mut con = self.connection().await?;
        con.del::<_, ()>(Self::key(session_id))
            .await
            .map_err(|e| AppError::Internal(format!("Redis delete failed: {e}")))?;
        Ok(())
    }
}

/// In-memory store with per-entry deadlines.
///
/// Expired entries are dropped lazily on lookup.
#[derive(Debug)]
pub struct MemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, (i64, Instant)>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i64) -> Result<String, AppError> {
        let session_id = new_session_id();
        let deadline = Instant::now() + self.ttl;
        self.entries
            .write()
            .await
            .insert(session_id.clone(), (user_id, deadline));
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<i64>, AppError> {
        let mut entries = self.entries.write().await;
        match entries.get(session_id) {
            Some(&(user_id, deadline)) if deadline > Instant::now() => Ok(Some(user_id)),
            Some(_) => {
                entries.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let session_id = store.create(42).await.unwrap();
        assert_eq!(store.get(&session_id).await.unwrap(), Some(42));

        store.delete(&session_id).await.unwrap();
        assert_eq!(store.get(&session_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_expires_entries() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let session_id = store.create(7).await.unwrap();
        assert_eq!(store.get(&session_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_session_is_none_and_delete_is_idempotent() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        assert_eq!(store.get("missing").await.unwrap(), None);
        store.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn session_ids_are_unique_and_opaque() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let a = store.create(1).await.unwrap();
        let b = store.create(1).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
