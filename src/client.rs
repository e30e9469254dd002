//! Cache client - main entry point for cache operations.
//!
//! Each method makes exactly one backend call and turns its result into the
//! operation's response enum. Nothing here returns `Err`: backend failures
//! come back as the `Error` variant, misses as `Miss`.

use crate::backend::CacheBackend;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorDetail};
use crate::key::NAMESPACE_SEPARATOR;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::response::{
    DeleteResponse, GetResponse, ListConcatenateResponse, ListFetchResponse, ListPopResponse,
    ListPushResponse, ListRemoveValueResponse, Outcome, OutcomeKind, SetResponse,
};
use crate::value::CacheValue;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Client for a remote cache.
///
/// Cloning is cheap: the backend shares its connection state and the
/// metrics hook sits behind an `Arc`.
///
/// # Example
///
/// ```
/// use cache_outcome::{CacheClient, ClientConfig, Credential};
/// use cache_outcome::backend::InMemoryBackend;
/// use cache_outcome::response::GetResponse;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> cache_outcome::Result<()> {
/// let config = ClientConfig::new(Credential::new("secret"), "sandbox", Duration::from_secs(300))?;
/// let client = CacheClient::new(InMemoryBackend::new(), config);
///
/// client.set("sandbox", "my_key", "Hello_world").await;
///
/// match client.get("sandbox", "my_key").await {
///     GetResponse::Hit(hit) => assert_eq!(hit.value_string(), "Hello_world"),
///     GetResponse::Miss => unreachable!(),
///     GetResponse::Error(err) => panic!("{}", err),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CacheClient<B: CacheBackend> {
    backend: B,
    config: ClientConfig,
    metrics: Arc<dyn CacheMetrics>,
}

impl<B: CacheBackend> CacheClient<B> {
    /// Create a client over `backend`.
    pub fn new(backend: B, config: ClientConfig) -> Self {
        info!(
            "Cache client ready (namespace: {}, default TTL: {:?})",
            config.namespace, config.default_ttl
        );
        CacheClient {
            backend,
            config,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Namespace from the configuration.
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask the backend whether it is reachable.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be reached.
    pub async fn health_check(&self) -> crate::Result<bool> {
        self.backend.health_check().await
    }

    /// Read a scalar value.
    pub async fn get(&self, namespace: &str, key: &str) -> GetResponse {
        let timer = Instant::now();
        let result = self.backend.get(namespace, key).await;
        let response = GetResponse::from(
            result.map_err(|e| Self::error_detail("GET", namespace, key, e)),
        );
        self.finish("GET", namespace, key, timer, response)
    }

    /// Store a scalar value with the configured default TTL.
    pub async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: impl Into<CacheValue>,
    ) -> SetResponse {
        self.set_with_ttl(namespace, key, value, self.config.default_ttl)
            .await
    }

    /// Store a scalar value with an explicit TTL.
    pub async fn set_with_ttl(
        &self,
        namespace: &str,
        key: &str,
        value: impl Into<CacheValue>,
        ttl: Duration,
    ) -> SetResponse {
        let timer = Instant::now();
        let result = self
            .backend
            .set(namespace, key, value.into().into_bytes(), Some(ttl))
            .await;
        let response = SetResponse::from(
            result.map_err(|e| Self::error_detail("SET", namespace, key, e)),
        );
        self.finish("SET", namespace, key, timer, response)
    }

    /// Remove a key of any type.
    pub async fn delete(&self, namespace: &str, key: &str) -> DeleteResponse {
        let timer = Instant::now();
        let result = self.backend.delete(namespace, key).await;
        let response = DeleteResponse::from(
            result.map_err(|e| Self::error_detail("DELETE", namespace, key, e)),
        );
        self.finish("DELETE", namespace, key, timer, response)
    }

    /// Append a batch to the end of a list. An empty batch is passed
    /// through unchanged.
    pub async fn list_concatenate_back<I, V>(
        &self,
        namespace: &str,
        key: &str,
        values: I,
    ) -> ListConcatenateResponse
    where
        I: IntoIterator<Item = V>,
        V: Into<CacheValue>,
    {
        let timer = Instant::now();
        let result = self
            .backend
            .list_concatenate_back(namespace, key, Self::to_bytes(values), self.list_ttl())
            .await;
        let response = ListConcatenateResponse::from(
            result.map_err(|e| Self::error_detail("LIST_CONCATENATE_BACK", namespace, key, e)),
        );
        self.finish("LIST_CONCATENATE_BACK", namespace, key, timer, response)
    }

    /// Prepend a batch to a list, keeping the batch's order.
    pub async fn list_concatenate_front<I, V>(
        &self,
        namespace: &str,
        key: &str,
        values: I,
    ) -> ListConcatenateResponse
    where
        I: IntoIterator<Item = V>,
        V: Into<CacheValue>,
    {
        let timer = Instant::now();
        let result = self
            .backend
            .list_concatenate_front(namespace, key, Self::to_bytes(values), self.list_ttl())
            .await;
        let response = ListConcatenateResponse::from(
            result.map_err(|e| Self::error_detail("LIST_CONCATENATE_FRONT", namespace, key, e)),
        );
        self.finish("LIST_CONCATENATE_FRONT", namespace, key, timer, response)
    }

    /// Read a whole list.
    pub async fn list_fetch(&self, namespace: &str, key: &str) -> ListFetchResponse {
        let timer = Instant::now();
        let result = self.backend.list_fetch(namespace, key).await;
        let response = ListFetchResponse::from(
            result.map_err(|e| Self::error_detail("LIST_FETCH", namespace, key, e)),
        );
        self.finish("LIST_FETCH", namespace, key, timer, response)
    }

    /// Append one value; the success carries the new length.
    pub async fn list_push_back(
        &self,
        namespace: &str,
        key: &str,
        value: impl Into<CacheValue>,
    ) -> ListPushResponse {
        let timer = Instant::now();
        let result = self
            .backend
            .list_push_back(namespace, key, value.into().into_bytes(), self.list_ttl())
            .await;
        let response = ListPushResponse::from(
            result.map_err(|e| Self::error_detail("LIST_PUSH_BACK", namespace, key, e)),
        );
        self.finish("LIST_PUSH_BACK", namespace, key, timer, response)
    }

    /// Prepend one value; the success carries the new length.
    pub async fn list_push_front(
        &self,
        namespace: &str,
        key: &str,
        value: impl Into<CacheValue>,
    ) -> ListPushResponse {
        let timer = Instant::now();
        let result = self
            .backend
            .list_push_front(namespace, key, value.into().into_bytes(), self.list_ttl())
            .await;
        let response = ListPushResponse::from(
            result.map_err(|e| Self::error_detail("LIST_PUSH_FRONT", namespace, key, e)),
        );
        self.finish("LIST_PUSH_FRONT", namespace, key, timer, response)
    }

    /// Remove and return the last element.
    pub async fn list_pop_back(&self, namespace: &str, key: &str) -> ListPopResponse {
        let timer = Instant::now();
        let result = self.backend.list_pop_back(namespace, key).await;
        let response = ListPopResponse::from(
            result.map_err(|e| Self::error_detail("LIST_POP_BACK", namespace, key, e)),
        );
        self.finish("LIST_POP_BACK", namespace, key, timer, response)
    }

    /// Remove and return the first element.
    pub async fn list_pop_front(&self, namespace: &str, key: &str) -> ListPopResponse {
        let timer = Instant::now();
        let result = self.backend.list_pop_front(namespace, key).await;
        let response = ListPopResponse::from(
            result.map_err(|e| Self::error_detail("LIST_POP_FRONT", namespace, key, e)),
        );
        self.finish("LIST_POP_FRONT", namespace, key, timer, response)
    }

    /// Remove every occurrence of `value`. Absent values are not an error.
    pub async fn list_remove_value(
        &self,
        namespace: &str,
        key: &str,
        value: impl Into<CacheValue>,
    ) -> ListRemoveValueResponse {
        let timer = Instant::now();
        let result = self
            .backend
            .list_remove_value(namespace, key, value.into().into_bytes())
            .await;
        let response = ListRemoveValueResponse::from(
            result.map_err(|e| Self::error_detail("LIST_REMOVE_VALUE", namespace, key, e)),
        );
        self.finish("LIST_REMOVE_VALUE", namespace, key, timer, response)
    }

    /// List writes refresh the collection's expiry to the default TTL.
    fn list_ttl(&self) -> Option<Duration> {
        Some(self.config.default_ttl)
    }

    fn to_bytes<I, V>(values: I) -> Vec<Vec<u8>>
    where
        I: IntoIterator<Item = V>,
        V: Into<CacheValue>,
    {
        values
            .into_iter()
            .map(|v| v.into().into_bytes())
            .collect()
    }

    fn error_detail(operation: &str, namespace: &str, key: &str, cause: Error) -> ErrorDetail {
        ErrorDetail::new(
            format!(
                "{} failed for key '{}' in namespace '{}'",
                operation, key, namespace
            ),
            cause,
        )
    }

    /// Report the outcome to metrics and the log, then hand it back.
    fn finish<R: Outcome + std::fmt::Display>(
        &self,
        operation: &str,
        namespace: &str,
        key: &str,
        timer: Instant,
        response: R,
    ) -> R {
        let elapsed = timer.elapsed();
        let target = format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, key);
        let kind = response.kind();
        let error = response.error().map(ToString::to_string);

        self.metrics
            .record(kind, operation, &target, elapsed, error.as_deref());

        if kind == OutcomeKind::Error {
            warn!("{} {} -> {} in {:?}", operation, target, response, elapsed);
        } else {
            debug!("{} {} -> {} in {:?}", operation, target, kind, elapsed);
        }

        response
    }
}

#[cfg(feature = "redis")]
impl CacheClient<crate::backend::RedisBackend> {
    /// Connect to Redis, authenticating with the configured credential.
    ///
    /// # Errors
    /// Returns `Err` if the connection pool cannot be created.
    pub async fn connect(
        config: ClientConfig,
        redis: crate::backend::RedisConfig,
    ) -> crate::Result<Self> {
        let redis = Self::authenticated(&config, redis);
        let backend = crate::backend::RedisBackend::new(redis).await?;
        Ok(Self::new(backend, config))
    }

    /// The Redis settings `connect` dials, password taken from the credential.
    fn authenticated(
        config: &ClientConfig,
        redis: crate::backend::RedisConfig,
    ) -> crate::backend::RedisConfig {
        redis.with_credential(&config.credential)
    }
}
