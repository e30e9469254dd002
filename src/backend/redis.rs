//! Redis cache backend implementation.
//!
//! Every trait method issues one Redis command, or one atomic `MULTI`
//! pipeline when a list write also has to refresh the key's expiry.

use super::CacheBackend;
use crate::config::Credential;
use crate::error::{Error, Result};
use crate::key::CacheKeyBuilder;
use deadpool_redis::redis::{self, AsyncCommands, RedisError};
use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use std::time::Duration;

/// Default Redis connection pool size.
/// Override with REDIS_POOL_SIZE environment variable
const DEFAULT_POOL_SIZE: u32 = 16;

const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for Redis backend.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: u32,
    pub pool_size: u32,
    /// Upper bound on waiting for a pooled connection.
    pub connection_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
            database: 0,
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

impl RedisConfig {
    /// Use the client credential as the Redis password.
    pub fn with_credential(mut self, credential: &Credential) -> Self {
        self.password = Some(credential.secret().to_string());
        self
    }

    /// Build Redis connection string.
    pub fn connection_string(&self) -> String {
        if let Some(password) = &self.password {
            let username = self.username.as_deref().unwrap_or("default");
            format!(
                "redis://{}:{}@{}:{}/{}",
                username, password, self.host, self.port, self.database
            )
        } else {
            format!("redis://{}:{}/{}", self.host, self.port, self.database)
        }
    }
}

/// Whole seconds for `EXPIRE`/`SETEX`, never zero.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn command_error(command: &str, storage_key: &str, e: RedisError) -> Error {
    let context = format!("Redis {} failed for key {}: {}", command, storage_key, e);
    match Error::from(e) {
        Error::TypeMismatch(_) => Error::TypeMismatch(context),
        Error::Timeout(_) => Error::Timeout(context),
        _ => Error::BackendError(context),
    }
}

/// Redis backend with connection pooling and async operations.
///
/// Uses deadpool for efficient async resource management and pooling.
///
/// # Example
///
/// ```no_run
/// # use cache_outcome::backend::{RedisBackend, RedisConfig, CacheBackend};
/// # use cache_outcome::config::Credential;
/// # use cache_outcome::error::Result;
/// # async fn example() -> Result<()> {
/// let config = RedisConfig::default().with_credential(&Credential::new("secret"));
/// let backend = RedisBackend::new(config).await?;
///
/// backend.set("sandbox", "key", b"value".to_vec(), None).await?;
/// let value = backend.get("sandbox", "key").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
    connection_timeout: Duration,
}

impl RedisBackend {
    /// Create new Redis backend from configuration.
    ///
    /// # Errors
    /// Returns `Err` if pool creation fails.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let conn_str = config.connection_string();
        let mut cfg = PoolConfig::from_url(conn_str);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size as usize));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::BackendError(format!("Failed to create Redis pool: {}", e)))?;

        info!(
            "Redis backend initialized: {}:{} (db {})",
            config.host, config.port, config.database
        );

        Ok(RedisBackend {
            pool,
            connection_timeout: config.connection_timeout,
        })
    }

    /// Create from connection string directly.
    ///
    /// Pool size is determined by:
    /// 1. `REDIS_POOL_SIZE` environment variable (if set)
    /// 2. `DEFAULT_POOL_SIZE` constant (16)
    ///
    /// # Errors
    /// Returns `Err` if pool creation fails.
    pub async fn from_connection_string(conn_str: &str) -> Result<Self> {
        let pool_size = std::env::var("REDIS_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        let mut cfg = PoolConfig::from_url(conn_str);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(pool_size as usize));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::BackendError(format!("Failed to create Redis pool: {}", e)))?;

        info!(
            "Redis backend initialized from connection string (pool size: {})",
            pool_size
        );

        Ok(RedisBackend {
            pool,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        })
    }

    async fn connection(&self) -> Result<Connection> {
        match tokio::time::timeout(self.connection_timeout, self.pool.get()).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(Error::BackendError(format!(
                "Failed to get Redis connection: {}",
                e
            ))),
            Err(_) => Err(Error::Timeout(format!(
                "No Redis connection available within {:?}",
                self.connection_timeout
            ))),
        }
    }

    /// `RPUSH`/`LPUSH` plus an optional `EXPIRE`, as one transaction.
    /// Returns the list length after the push.
    async fn push_values(
        &self,
        storage_key: &str,
        mut values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
        front: bool,
    ) -> Result<u64> {
        let command = if front {
            // LPUSH inserts one at a time, so reverse to keep batch order.
            values.reverse();
            "LPUSH"
        } else {
            "RPUSH"
        };

        let mut conn = self.connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic().cmd(command).arg(storage_key).arg(values);
        if let Some(d) = ttl {
            pipe.cmd("EXPIRE").arg(storage_key).arg(ttl_secs(d)).ignore();
        }

        let (len,): (u64,) = pipe
            .query_async(&mut *conn)
            .await
            .map_err(|e| command_error(command, storage_key, e))?;

        debug!("Redis {} {} -> len {}", command, storage_key, len);
        Ok(len)
    }

    /// `TYPE` lookup standing in for a list write that sends no elements.
    /// Absent keys and lists pass; anything else is a type mismatch.
    async fn check_list_type(&self, storage_key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        let kind: String = redis::cmd("TYPE")
            .arg(storage_key)
            .query_async(&mut *conn)
            .await
            .map_err(|e| command_error("TYPE", storage_key, e))?;

        match kind.as_str() {
            "none" | "list" => Ok(()),
            other => Err(Error::TypeMismatch(format!(
                "key {} holds a {}, expected a list",
                storage_key, other
            ))),
        }
    }

    async fn pop(&self, storage_key: &str, front: bool) -> Result<Option<Vec<u8>>> {
        let command = if front { "LPOP" } else { "RPOP" };
        let mut conn = self.connection().await?;

        let value: Option<Vec<u8>> = redis::cmd(command)
            .arg(storage_key)
            .query_async(&mut *conn)
            .await
            .map_err(|e| command_error(command, storage_key, e))?;

        if value.is_some() {
            debug!("Redis {} {} -> HIT", command, storage_key);
        } else {
            debug!("Redis {} {} -> MISS", command, storage_key);
        }
        Ok(value)
    }
}

impl CacheBackend for RedisBackend {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let mut conn = self.connection().await?;

        let value: Option<Vec<u8>> = conn
            .get(&storage_key)
            .await
            .map_err(|e| command_error("GET", &storage_key, e))?;

        if value.is_some() {
            debug!("Redis GET {} -> HIT", storage_key);
        } else {
            debug!("Redis GET {} -> MISS", storage_key);
        }

        Ok(value)
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let mut conn = self.connection().await?;

        match ttl {
            Some(duration) => {
                let seconds = ttl_secs(duration);
                conn.set_ex::<_, _, ()>(&storage_key, value, seconds)
                    .await
                    .map_err(|e| command_error("SETEX", &storage_key, e))?;
                debug!("Redis SET {} (TTL: {}s)", storage_key, seconds);
            }
            None => {
                conn.set::<_, _, ()>(&storage_key, value)
                    .await
                    .map_err(|e| command_error("SET", &storage_key, e))?;
                debug!("Redis SET {}", storage_key);
            }
        }

        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&storage_key)
            .await
            .map_err(|e| command_error("DEL", &storage_key, e))?;

        debug!("Redis DELETE {}", storage_key);
        Ok(())
    }

    async fn list_concatenate_back(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        // RPUSH needs at least one element
        if values.is_empty() {
            self.check_list_type(&storage_key).await?;
            debug!("Redis RPUSH {} (empty batch, no-op)", storage_key);
            return Ok(());
        }
        self.push_values(&storage_key, values, ttl, false).await?;
        Ok(())
    }

    async fn list_concatenate_front(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        if values.is_empty() {
            self.check_list_type(&storage_key).await?;
            debug!("Redis LPUSH {} (empty batch, no-op)", storage_key);
            return Ok(());
        }
        self.push_values(&storage_key, values, ttl, true).await?;
        Ok(())
    }

    async fn list_fetch(&self, namespace: &str, key: &str) -> Result<Option<Vec<Vec<u8>>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let mut conn = self.connection().await?;

        let values: Vec<Vec<u8>> = conn
            .lrange(&storage_key, 0, -1)
            .await
            .map_err(|e| command_error("LRANGE", &storage_key, e))?;

        // Redis never stores an empty list, so no elements means no key.
        if values.is_empty() {
            debug!("Redis LRANGE {} -> MISS", storage_key);
            Ok(None)
        } else {
            debug!("Redis LRANGE {} -> HIT ({} values)", storage_key, values.len());
            Ok(Some(values))
        }
    }

    async fn list_push_back(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<u64> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        self.push_values(&storage_key, vec![value], ttl, false).await
    }

    async fn list_push_front(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<u64> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        self.push_values(&storage_key, vec![value], ttl, true).await
    }

    async fn list_pop_back(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        self.pop(&storage_key, false).await
    }

    async fn list_pop_front(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        self.pop(&storage_key, true).await
    }

    async fn list_remove_value(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let mut conn = self.connection().await?;

        // count 0 removes every occurrence; an absent value removes nothing
        let removed: u64 = conn
            .lrem(&storage_key, 0, value)
            .await
            .map_err(|e| command_error("LREM", &storage_key, e))?;

        debug!("Redis LREM {} -> {} removed", storage_key, removed);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection().await?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| Error::BackendError(format!("Redis PING failed: {}", e)))?;

        Ok(pong == "PONG" || pong.contains("PONG"))
    }
}
