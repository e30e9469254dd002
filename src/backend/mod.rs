//! Cache backend implementations.
//!
//! A backend is the remote boundary the client talks to. Each trait method
//! corresponds to exactly one logical call against the service.

use crate::error::Result;
use std::time::Duration;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{RedisBackend, RedisConfig};

/// Trait for cache backend implementations.
///
/// Keys are addressed by `(namespace, key)`; implementations build the
/// storage key with [`CacheKeyBuilder`](crate::key::CacheKeyBuilder) and
/// reject empty parts with `Error::InvalidArgument`.
///
/// List semantics every implementation follows:
/// - an absent list and an empty list are the same thing; a list emptied by
///   a pop or remove disappears
/// - list operations on a scalar key fail with `Error::TypeMismatch`
/// - removing a value that is not in the list is a no-op
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow concurrent access.
/// Backend implementations should use interior mutability or external storage.
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve a scalar value.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found in cache
    /// - `Ok(None)` - Cache miss (key not found or expired)
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs (connection lost, wrong type, etc.)
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a scalar value with optional TTL.
    ///
    /// # Arguments
    /// - `ttl`: Time-to-live. None = no expiry
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<()>;

    /// Remove a key of any type. Deleting an absent key succeeds.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn delete(&self, namespace: &str, key: &str) -> Result<()>;

    /// Append `values` to the end of the list, creating it if needed.
    ///
    /// A `Some(ttl)` resets the list's expiry.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_concatenate_back(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()>;

    /// Prepend `values` to the list, keeping their order: `[g,h,i] ++ list`.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_concatenate_front(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()>;

    /// Read the whole list, front to back. `Ok(None)` if absent.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_fetch(&self, namespace: &str, key: &str) -> Result<Option<Vec<Vec<u8>>>>;

    /// Append one value and return the new list length.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_push_back(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<u64>;

    /// Prepend one value and return the new list length.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_push_front(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<u64>;

    /// Remove and return the last element. `Ok(None)` for an absent list.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_pop_back(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove and return the first element. `Ok(None)` for an absent list.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_pop_front(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove every element equal to `value`.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_remove_value(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()>;

    /// Health check - verify backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
