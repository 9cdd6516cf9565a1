//! Verification-code cache with TTL semantics.
//!
//! Codes live under `email:{address}` for five minutes. The production
//! backend is Redis ([`RedisVerificationCache`]); when `REDIS_URL` is not
//! configured, [`MemoryVerificationCache`] keeps codes in-process, which is
//! fine for development and tests but not for multi-instance deployments.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use redis::AsyncCommands;
use tokio::sync::Mutex;

/// Error type for cache failures.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Redis connection or command failure.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// TTL key-value store for verification codes.
///
/// Seam between handlers and the cache backend so tests and
/// Redis-less development runs use the in-memory implementation.
#[async_trait::async_trait]
pub trait VerificationCache: Send + Sync {
    /// Store `value` under `key` with the given time-to-live.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
}

// ---------------------------------------------------------------------------
// Redis backend
// ---------------------------------------------------------------------------

/// Redis-backed cache using a multiplexed connection manager.
pub struct RedisVerificationCache {
    manager: redis::aio::ConnectionManager,
}

impl RedisVerificationCache {
    /// Connect to Redis at `url`. Fails fast on an unreachable server.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait::async_trait]
impl VerificationCache for RedisVerificationCache {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// In-process cache with lazy expiry, for tests and Redis-less development.
#[derive(Default)]
pub struct MemoryVerificationCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryVerificationCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VerificationCache for MemoryVerificationCache {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
