//! In-memory cache backend (default, thread-safe, async).
//!
//! Uses DashMap for concurrent access with per-key sharding.
//! Holds scalars and lists side by side and handles TTL expiration on access.

use super::CacheBackend;
use crate::error::{Error, Result};
use crate::key::CacheKeyBuilder;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// What a key holds.
enum Stored {
    Scalar(Vec<u8>),
    List(VecDeque<Vec<u8>>),
}

impl Stored {
    fn kind(&self) -> &'static str {
        match self {
            Stored::Scalar(_) => "scalar",
            Stored::List(_) => "list",
        }
    }

    fn byte_len(&self) -> usize {
        match self {
            Stored::Scalar(data) => data.len(),
            Stored::List(list) => list.iter().map(Vec::len).sum(),
        }
    }
}

/// In-memory cache entry with optional expiration.
struct CacheEntry {
    data: Stored,
    expires_at: Option<Instant>,
}

/// Deadline for `ttl` from now. A TTL past the clock's range never expires.
fn deadline(ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|d| Instant::now().checked_add(d))
}

impl CacheEntry {
    fn new(data: Stored, ttl: Option<Duration>) -> Self {
        CacheEntry {
            data,
            expires_at: deadline(ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }

    fn refresh_ttl(&mut self, ttl: Option<Duration>) {
        if ttl.is_some() {
            self.expires_at = deadline(ttl);
        }
    }
}

fn type_mismatch(storage_key: &str, expected: &str, found: &Stored) -> Error {
    Error::TypeMismatch(format!(
        "key {} holds a {}, expected a {}",
        storage_key,
        found.kind(),
        expected
    ))
}

/// Thread-safe async in-memory cache backend.
///
/// No async locks required - operations are non-blocking. Every list
/// mutation runs inside a single map-entry guard, so concurrent pushes and
/// pops on the same key never interleave.
///
/// # Example
///
/// ```no_run
/// use cache_outcome::backend::{InMemoryBackend, CacheBackend};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set("sandbox", "key1", b"value".to_vec(), None).await?;
///     assert!(backend.get("sandbox", "key1").await?.is_some());
///
///     let len = backend
///         .list_push_back("sandbox", "list", b"a".to_vec(), Some(Duration::from_secs(300)))
///         .await?;
///     assert_eq!(len, 1);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, CacheEntry>>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries in cache, expired ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every entry in every namespace.
    pub fn clear(&self) {
        self.store.clear();
        warn!("InMemory CLEAR executed - all namespaces cleared!");
    }

    /// Get memory statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for entry in self.store.iter() {
            stats.total_entries += 1;
            stats.total_bytes += entry.data.byte_len();
            if entry.is_expired() {
                stats.expired_entries += 1;
            }
            if matches!(entry.data, Stored::List(_)) {
                stats.list_entries += 1;
            }
        }
        stats
    }

    fn evict_if_expired(&self, storage_key: &str) {
        self.store.remove_if(storage_key, |_, entry| entry.is_expired());
    }

    /// Run `f` on the live list at `storage_key`, creating an empty one
    /// first if the key is absent or expired.
    fn write_list<R>(
        &self,
        storage_key: &str,
        ttl: Option<Duration>,
        f: impl FnOnce(&mut VecDeque<Vec<u8>>) -> R,
    ) -> Result<R> {
        let mut entry = self
            .store
            .entry(storage_key.to_string())
            .or_insert_with(|| CacheEntry::new(Stored::List(VecDeque::new()), None));

        if entry.is_expired() {
            *entry = CacheEntry::new(Stored::List(VecDeque::new()), None);
        }

        let result = match &mut entry.data {
            Stored::List(list) => f(list),
            other => return Err(type_mismatch(storage_key, "list", other)),
        };
        entry.refresh_ttl(ttl);
        Ok(result)
    }

    /// Run `f` on an existing live list. `Ok(None)` if there is none.
    /// A list left empty by `f` is removed.
    fn modify_list<R>(
        &self,
        storage_key: &str,
        f: impl FnOnce(&mut VecDeque<Vec<u8>>) -> R,
    ) -> Result<Option<R>> {
        let Some(mut entry) = self.store.get_mut(storage_key) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            self.evict_if_expired(storage_key);
            return Ok(None);
        }

        let (result, now_empty) = match &mut entry.data {
            Stored::List(list) => {
                let result = f(&mut *list);
                (result, list.is_empty())
            }
            other => return Err(type_mismatch(storage_key, "list", other)),
        };
        drop(entry);

        if now_empty {
            self.store.remove_if(storage_key, |_, entry| {
                matches!(&entry.data, Stored::List(list) if list.is_empty())
            });
        }

        Ok(Some(result))
    }

    /// Reject a no-op list write against a live scalar.
    fn check_list_type(&self, storage_key: &str) -> Result<()> {
        match self.store.get(storage_key) {
            Some(entry) if !entry.is_expired() => match &entry.data {
                Stored::List(_) => Ok(()),
                other => Err(type_mismatch(storage_key, "list", other)),
            },
            _ => Ok(()),
        }
    }

    fn concatenate(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
        front: bool,
    ) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let count = values.len();

        if values.is_empty() {
            self.check_list_type(&storage_key)?;
            debug!("InMemory LCONCAT {} (empty batch, no-op)", storage_key);
            return Ok(());
        }

        let len = self.write_list(&storage_key, ttl, |list| {
            if front {
                for value in values.into_iter().rev() {
                    list.push_front(value);
                }
            } else {
                list.extend(values);
            }
            list.len()
        })?;

        debug!(
            "InMemory LCONCAT {} {} values at {} -> len {}",
            storage_key,
            count,
            if front { "front" } else { "back" },
            len
        );
        Ok(())
    }

    fn push(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
        front: bool,
    ) -> Result<u64> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let len = self.write_list(&storage_key, ttl, |list| {
            if front {
                list.push_front(value);
            } else {
                list.push_back(value);
            }
            list.len()
        })?;

        debug!("InMemory LPUSH {} -> len {}", storage_key, len);
        Ok(len as u64)
    }

    fn pop(&self, namespace: &str, key: &str, front: bool) -> Result<Option<Vec<u8>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let popped = self
            .modify_list(&storage_key, |list| {
                if front {
                    list.pop_front()
                } else {
                    list.pop_back()
                }
            })?
            .flatten();

        if popped.is_some() {
            debug!("InMemory LPOP {} -> HIT", storage_key);
        } else {
            debug!("InMemory LPOP {} -> MISS", storage_key);
        }
        Ok(popped)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;

        if let Some(entry) = self.store.get(&storage_key) {
            if !entry.is_expired() {
                return match &entry.data {
                    Stored::Scalar(data) => {
                        debug!("InMemory GET {} -> HIT", storage_key);
                        Ok(Some(data.clone()))
                    }
                    other => Err(type_mismatch(&storage_key, "scalar", other)),
                };
            }
        }

        self.evict_if_expired(&storage_key);
        debug!("InMemory GET {} -> MISS", storage_key);
        Ok(None)
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let entry = CacheEntry::new(Stored::Scalar(value), ttl);
        self.store.insert(storage_key.clone(), entry);

        if let Some(d) = ttl {
            debug!("InMemory SET {} (TTL: {:?})", storage_key, d);
        } else {
            debug!("InMemory SET {}", storage_key);
        }

        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        self.store.remove(&storage_key);
        debug!("InMemory DELETE {}", storage_key);
        Ok(())
    }

    async fn list_concatenate_back(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.concatenate(namespace, key, values, ttl, false)
    }

    async fn list_concatenate_front(
        &self,
        namespace: &str,
        key: &str,
        values: Vec<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.concatenate(namespace, key, values, ttl, true)
    }

    async fn list_fetch(&self, namespace: &str, key: &str) -> Result<Option<Vec<Vec<u8>>>> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;

        if let Some(entry) = self.store.get(&storage_key) {
            if !entry.is_expired() {
                return match &entry.data {
                    Stored::List(list) => {
                        debug!("InMemory LFETCH {} -> HIT ({} values)", storage_key, list.len());
                        Ok(Some(list.iter().cloned().collect()))
                    }
                    other => Err(type_mismatch(&storage_key, "list", other)),
                };
            }
        }

        self.evict_if_expired(&storage_key);
        debug!("InMemory LFETCH {} -> MISS", storage_key);
        Ok(None)
    }

    async fn list_push_back(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<u64> {
        self.push(namespace, key, value, ttl, false)
    }

    async fn list_push_front(
        &self,
        namespace: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<u64> {
        self.push(namespace, key, value, ttl, true)
    }

    async fn list_pop_back(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.pop(namespace, key, false)
    }

    async fn list_pop_front(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.pop(namespace, key, true)
    }

    async fn list_remove_value(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let storage_key = CacheKeyBuilder::build(namespace, key)?;
        let removed = self
            .modify_list(&storage_key, |list| {
                let before = list.len();
                list.retain(|item| *item != value);
                before - list.len()
            })?
            .unwrap_or(0);

        debug!("InMemory LREM {} -> {} removed", storage_key, removed);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory backend is always healthy
        Ok(true)
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub list_entries: usize,
    pub expired_entries: usize,
    pub total_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "test";

    fn bytes(values: &[&str]) -> Vec<Vec<u8>> {
        values.iter().map(|v| v.as_bytes().to_vec()).collect()
    }

    #[tokio::test]
    async fn test_inmemory_backend_set_get() {
        let backend = InMemoryBackend::new();

        backend
            .set(NS, "key1", b"value1".to_vec(), None)
            .await
            .expect("Failed to set");

        let result = backend.get(NS, "key1").await.expect("Failed to get");
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_inmemory_backend_miss() {
        let backend = InMemoryBackend::new();

        let result = backend.get(NS, "nonexistent").await.expect("Failed to get");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_namespaces_are_isolated() {
        let backend = InMemoryBackend::new();

        backend
            .set("ns_a", "key", b"a".to_vec(), None)
            .await
            .expect("Failed to set");

        assert!(backend.get("ns_b", "key").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_inmemory_backend_rejects_empty_key() {
        let backend = InMemoryBackend::new();

        let result = backend.get(NS, "").await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_inmemory_backend_ttl_expiration() {
        let backend = InMemoryBackend::new();

        backend
            .set(NS, "key1", b"value1".to_vec(), Some(Duration::from_millis(100)))
            .await
            .expect("Failed to set");

        assert!(backend.get(NS, "key1").await.expect("Failed to get").is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(backend.get(NS, "key1").await.expect("Failed to get").is_none());
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_inmemory_backend_concatenate_order() {
        let backend = InMemoryBackend::new();

        backend
            .list_concatenate_back(NS, "list", bytes(&["a", "b", "c"]), None)
            .await
            .expect("Failed to concatenate");
        backend
            .list_concatenate_front(NS, "list", bytes(&["g", "h", "i"]), None)
            .await
            .expect("Failed to concatenate");

        let list = backend.list_fetch(NS, "list").await.expect("Failed to fetch");
        assert_eq!(list, Some(bytes(&["g", "h", "i", "a", "b", "c"])));
    }

    #[tokio::test]
    async fn test_inmemory_backend_empty_concatenate_creates_nothing() {
        let backend = InMemoryBackend::new();

        backend
            .list_concatenate_back(NS, "list", Vec::new(), None)
            .await
            .expect("Empty concatenate should succeed");

        assert!(backend.is_empty());
        assert_eq!(backend.list_fetch(NS, "list").await.expect("Failed to fetch"), None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_pop_until_empty_removes_list() {
        let backend = InMemoryBackend::new();

        backend
            .list_concatenate_back(NS, "list", bytes(&["a"]), None)
            .await
            .expect("Failed to concatenate");

        let popped = backend.list_pop_front(NS, "list").await.expect("Failed to pop");
        assert_eq!(popped, Some(b"a".to_vec()));

        assert!(backend.is_empty());
        assert_eq!(backend.list_pop_front(NS, "list").await.expect("Failed to pop"), None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_remove_value_removes_all_occurrences() {
        let backend = InMemoryBackend::new();

        backend
            .list_concatenate_back(NS, "list", bytes(&["a", "b", "a", "c"]), None)
            .await
            .expect("Failed to concatenate");
        backend
            .list_remove_value(NS, "list", b"a".to_vec())
            .await
            .expect("Failed to remove");

        let list = backend.list_fetch(NS, "list").await.expect("Failed to fetch");
        assert_eq!(list, Some(bytes(&["b", "c"])));
    }

    #[tokio::test]
    async fn test_inmemory_backend_type_mismatch() {
        let backend = InMemoryBackend::new();

        backend
            .set(NS, "scalar", b"v".to_vec(), None)
            .await
            .expect("Failed to set");
        backend
            .list_push_back(NS, "list", b"v".to_vec(), None)
            .await
            .expect("Failed to push");

        assert!(matches!(
            backend.list_push_back(NS, "scalar", b"x".to_vec(), None).await,
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            backend.list_concatenate_back(NS, "scalar", Vec::new(), None).await,
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            backend.get(NS, "list").await,
            Err(Error::TypeMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_inmemory_backend_list_write_refreshes_ttl() {
        let backend = InMemoryBackend::new();
        let ttl = Some(Duration::from_millis(200));

        backend
            .list_push_back(NS, "list", b"a".to_vec(), ttl)
            .await
            .expect("Failed to push");
        tokio::time::sleep(Duration::from_millis(120)).await;
        backend
            .list_push_back(NS, "list", b"b".to_vec(), ttl)
            .await
            .expect("Failed to push");
        tokio::time::sleep(Duration::from_millis(120)).await;

        let list = backend.list_fetch(NS, "list").await.expect("Failed to fetch");
        assert_eq!(list, Some(bytes(&["a", "b"])));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(backend.list_fetch(NS, "list").await.expect("Failed to fetch"), None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_stats() {
        let backend = InMemoryBackend::new();

        backend
            .set(NS, "key1", b"value_with_data".to_vec(), None)
            .await
            .expect("Failed to set");
        backend
            .list_concatenate_back(NS, "list", bytes(&["ab", "cd"]), None)
            .await
            .expect("Failed to concatenate");

        let stats = backend.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.list_entries, 1);
        assert_eq!(stats.expired_entries, 0);
        assert_eq!(stats.total_bytes, 15 + 4);
    }

    #[tokio::test]
    async fn test_inmemory_backend_clone_shares_store() {
        let backend1 = InMemoryBackend::new();
        backend1
            .set(NS, "key", b"value".to_vec(), None)
            .await
            .expect("Failed to set");

        let backend2 = backend1.clone();
        let value = backend2.get(NS, "key").await.expect("Failed to get");
        assert_eq!(value, Some(b"value".to_vec()));

        backend2.clear();
        assert!(backend1.is_empty());
    }

    #[tokio::test]
    async fn test_inmemory_backend_concurrent_pushes() {
        let backend = InMemoryBackend::new();
        let mut handles = vec![];

        for i in 0..10 {
            let b = backend.clone();
            handles.push(tokio::spawn(async move {
                b.list_push_back(NS, "list", format!("v{}", i).into_bytes(), None)
                    .await
                    .expect("Failed to push")
            }));
        }

        for handle in handles {
            handle.await.expect("Task failed");
        }

        let list = backend
            .list_fetch(NS, "list")
            .await
            .expect("Failed to fetch")
            .expect("List should exist");
        assert_eq!(list.len(), 10);
    }
}
