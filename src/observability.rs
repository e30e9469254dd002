//! Observability hooks for client operations.
//!
//! The client reports every call to a [`CacheMetrics`] implementation with
//! the operation name, the storage key and how long the backend took.
//!
//! ```ignore
//! use cache_outcome::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, operation: &str, _key: &str, duration: Duration) {
//!         // counter!("cache_hits", "op" => operation).increment(1);
//!         // histogram!("cache_latency").record(duration);
//!     }
//!     // ... implement other methods
//! }
//!
//! // let client = CacheClient::new(backend, config)
//! //     .with_metrics(Arc::new(PrometheusMetrics));
//! ```
//!
//! Unimplemented methods fall back to logging through the `log` crate; see
//! [`LogMetrics`]. [`NoOpMetrics`] discards everything and is the default.

use crate::response::OutcomeKind;
use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a read that found its key.
    fn record_hit(&self, operation: &str, key: &str, duration: Duration) {
        debug!("Cache {} HIT: {} took {:?}", operation, key, duration);
    }

    /// Record a read that found nothing.
    fn record_miss(&self, operation: &str, key: &str, duration: Duration) {
        debug!("Cache {} MISS: {} took {:?}", operation, key, duration);
    }

    /// Record a completed write.
    fn record_success(&self, operation: &str, key: &str, duration: Duration) {
        debug!("Cache {} OK: {} took {:?}", operation, key, duration);
    }

    /// Record an error.
    fn record_error(&self, operation: &str, key: &str, error: &str) {
        warn!("Cache {} ERROR for {}: {}", operation, key, error);
    }

    /// Dispatch on the outcome kind. `error` is only read for `Error`.
    fn record(
        &self,
        kind: OutcomeKind,
        operation: &str,
        key: &str,
        duration: Duration,
        error: Option<&str>,
    ) {
        match kind {
            OutcomeKind::Hit => self.record_hit(operation, key, duration),
            OutcomeKind::Miss => self.record_miss(operation, key, duration),
            OutcomeKind::Success => self.record_success(operation, key, duration),
            OutcomeKind::Error => {
                self.record_error(operation, key, error.unwrap_or("unknown error"))
            }
        }
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _operation: &str, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _operation: &str, _key: &str, _duration: Duration) {}
    fn record_success(&self, _operation: &str, _key: &str, _duration: Duration) {}
    fn record_error(&self, _operation: &str, _key: &str, _error: &str) {}
}

/// Metrics that only log, using the trait's default methods.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl CacheMetrics for LogMetrics {}
