//! Integration tests for cache-outcome
//!
//! These tests drive the public client against the in-memory backend and
//! check the outcome contract end to end.

use cache_outcome::backend::{CacheBackend, InMemoryBackend};
use cache_outcome::response::{
    GetResponse, ListConcatenateResponse, ListFetchResponse, ListPopResponse, ListPushResponse,
    ListRemoveValueResponse,
};
use cache_outcome::{CacheClient, ClientConfig, Credential, Error, Outcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const NS: &str = "integration";
const LIST: &str = "my_list_key";

fn config(ttl: Duration) -> ClientConfig {
    ClientConfig::new(Credential::new("test-secret"), NS, ttl).expect("valid config")
}

fn client() -> CacheClient<InMemoryBackend> {
    CacheClient::new(InMemoryBackend::new(), config(Duration::from_secs(300)))
}

async fn fetch_strings<B: CacheBackend>(client: &CacheClient<B>, key: &str) -> Option<Vec<String>> {
    match client.list_fetch(NS, key).await {
        ListFetchResponse::Hit(hit) => Some(hit.value_list_string()),
        ListFetchResponse::Miss => None,
        ListFetchResponse::Error(err) => panic!("unexpected error: {}", err),
    }
}

async fn seed_abc<B: CacheBackend>(client: &CacheClient<B>) {
    let response = client.list_concatenate_back(NS, LIST, ["a", "b", "c"]).await;
    assert!(response.is_success(), "seeding failed: {}", response);
}

/// Backend that fails every call and counts how often it was invoked.
#[derive(Clone, Default)]
struct FailingBackend {
    calls: Arc<AtomicUsize>,
}

impl FailingBackend {
    fn fail<T>(&self) -> cache_outcome::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::BackendError("connection refused".to_string()))
    }
}

impl CacheBackend for FailingBackend {
    async fn get(&self, _: &str, _: &str) -> cache_outcome::Result<Option<Vec<u8>>> {
        self.fail()
    }
    async fn set(
        &self,
        _: &str,
        _: &str,
        _: Vec<u8>,
        _: Option<Duration>,
    ) -> cache_outcome::Result<()> {
        self.fail()
    }
    async fn delete(&self, _: &str, _: &str) -> cache_outcome::Result<()> {
        self.fail()
    }
    async fn list_concatenate_back(
        &self,
        _: &str,
        _: &str,
        _: Vec<Vec<u8>>,
        _: Option<Duration>,
    ) -> cache_outcome::Result<()> {
        self.fail()
    }
    async fn list_concatenate_front(
        &self,
        _: &str,
        _: &str,
        _: Vec<Vec<u8>>,
        _: Option<Duration>,
    ) -> cache_outcome::Result<()> {
        self.fail()
    }
    async fn list_fetch(&self, _: &str, _: &str) -> cache_outcome::Result<Option<Vec<Vec<u8>>>> {
        self.fail()
    }
    async fn list_push_back(
        &self,
        _: &str,
        _: &str,
        _: Vec<u8>,
        _: Option<Duration>,
    ) -> cache_outcome::Result<u64> {
        self.fail()
    }
    async fn list_push_front(
        &self,
        _: &str,
        _: &str,
        _: Vec<u8>,
        _: Option<Duration>,
    ) -> cache_outcome::Result<u64> {
        self.fail()
    }
    async fn list_pop_back(&self, _: &str, _: &str) -> cache_outcome::Result<Option<Vec<u8>>> {
        self.fail()
    }
    async fn list_pop_front(&self, _: &str, _: &str) -> cache_outcome::Result<Option<Vec<u8>>> {
        self.fail()
    }
    async fn list_remove_value(&self, _: &str, _: &str, _: Vec<u8>) -> cache_outcome::Result<()> {
        self.fail()
    }
}

// =============================================================================
// Scalars
// =============================================================================

#[tokio::test]
async fn test_get_never_written_key_is_miss() {
    let client = client();
    assert_eq!(client.get(NS, "never_written").await, GetResponse::Miss);
}

#[tokio::test]
async fn test_set_then_get_is_hit() {
    let client = client();

    assert!(client.set(NS, "my_key", "Hello_world").await.is_success());

    match client.get(NS, "my_key").await {
        GetResponse::Hit(hit) => assert_eq!(hit.value_string(), "Hello_world"),
        other => panic!("expected hit, got {}", other),
    }
}

#[tokio::test]
async fn test_binary_values_round_trip() {
    let client = client();
    let payload = vec![0u8, 159, 146, 150, 255];

    client.set(NS, "binary", payload.clone()).await;

    match client.get(NS, "binary").await {
        GetResponse::Hit(hit) => assert_eq!(hit.value_bytes(), payload.as_slice()),
        other => panic!("expected hit, got {}", other),
    }
}

#[tokio::test]
async fn test_delete_then_get_and_fetch_are_miss() {
    let client = client();

    client.set(NS, "my_key", "v").await;
    seed_abc(&client).await;

    assert!(client.delete(NS, "my_key").await.is_success());
    assert!(client.delete(NS, LIST).await.is_success());

    assert!(client.get(NS, "my_key").await.is_miss());
    assert!(client.list_fetch(NS, LIST).await.is_miss());
}

#[tokio::test]
async fn test_delete_absent_key_is_success() {
    let client = client();
    assert!(client.delete(NS, "absent").await.is_success());
}

#[tokio::test]
async fn test_default_ttl_expires_scalar() {
    let client = CacheClient::new(InMemoryBackend::new(), config(Duration::from_millis(100)));

    client.set(NS, "short_lived", "v").await;
    assert!(client.get(NS, "short_lived").await.is_hit());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(client.get(NS, "short_lived").await.is_miss());
}

#[tokio::test]
async fn test_ttl_beyond_clock_range_never_expires() {
    let client = CacheClient::new(
        InMemoryBackend::new(),
        config(Duration::from_secs(u64::MAX)),
    );

    assert!(client.set(NS, "forever", "v").await.is_success());
    assert!(client
        .set_with_ttl(NS, "forever_max", "v", Duration::MAX)
        .await
        .is_success());
    assert_eq!(client.list_push_back(NS, LIST, "a").await.list_length(), Some(1));
    assert!(client
        .list_concatenate_front(NS, LIST, ["b"])
        .await
        .is_success());

    assert!(client.get(NS, "forever").await.is_hit());
    assert!(client.get(NS, "forever_max").await.is_hit());
    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["b".into(), "a".into()])
    );
}

// =============================================================================
// Lists
// =============================================================================

#[tokio::test]
async fn test_concatenate_back_preserves_order() {
    let client = client();

    seed_abc(&client).await;

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["a".into(), "b".into(), "c".into()])
    );
}

#[tokio::test]
async fn test_concatenate_front_prepends_batch_in_order() {
    let client = client();

    seed_abc(&client).await;
    let response = client.list_concatenate_front(NS, LIST, ["g", "h", "i"]).await;
    assert_eq!(response, ListConcatenateResponse::Success);

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(
            ["g", "h", "i", "a", "b", "c"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        )
    );
}

#[tokio::test]
async fn test_concatenate_sequence_from_sandbox() {
    let client = client();

    seed_abc(&client).await;
    client.list_concatenate_back(NS, LIST, ["d", "e", "f"]).await;
    client.list_concatenate_front(NS, LIST, ["g", "h", "i"]).await;

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(
            ["g", "h", "i", "a", "b", "c", "d", "e", "f"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        )
    );
}

#[tokio::test]
async fn test_concatenate_empty_batch_is_forwarded() {
    let client = client();

    let empty: [&str; 0] = [];
    let response = client.list_concatenate_back(NS, LIST, empty).await;
    assert!(response.is_success());
    assert!(client.list_fetch(NS, LIST).await.is_miss());
}

#[tokio::test]
async fn test_push_back_returns_new_length() {
    let client = client();

    seed_abc(&client).await;

    match client.list_push_back(NS, LIST, "d").await {
        ListPushResponse::Success(success) => assert_eq!(success.list_length(), 4),
        ListPushResponse::Error(err) => panic!("unexpected error: {}", err),
    }

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["a".into(), "b".into(), "c".into(), "d".into()])
    );
}

#[tokio::test]
async fn test_push_front_then_back() {
    let client = client();

    seed_abc(&client).await;
    assert_eq!(client.list_push_back(NS, LIST, "d").await.list_length(), Some(4));
    assert_eq!(client.list_push_front(NS, LIST, "e").await.list_length(), Some(5));

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(
            ["e", "a", "b", "c", "d"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        )
    );
}

#[tokio::test]
async fn test_pop_back_returns_last_element() {
    let client = client();

    seed_abc(&client).await;

    match client.list_pop_back(NS, LIST).await {
        ListPopResponse::Hit(hit) => assert_eq!(hit.value_string(), "c"),
        other => panic!("expected hit, got {}", other),
    }

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["a".into(), "b".into()])
    );
}

#[tokio::test]
async fn test_pop_front_and_back_leave_middle() {
    let client = client();

    seed_abc(&client).await;
    assert!(client.list_pop_back(NS, LIST).await.is_hit());
    match client.list_pop_front(NS, LIST).await {
        ListPopResponse::Hit(hit) => assert_eq!(hit.value_string(), "a"),
        other => panic!("expected hit, got {}", other),
    }

    assert_eq!(fetch_strings(&client, LIST).await, Some(vec!["b".into()]));
}

#[tokio::test]
async fn test_pop_empty_or_absent_list_is_miss() {
    let client = client();

    assert_eq!(client.list_pop_back(NS, LIST).await, ListPopResponse::Miss);

    client.list_push_back(NS, LIST, "only").await;
    assert!(client.list_pop_front(NS, LIST).await.is_hit());

    assert_eq!(client.list_pop_back(NS, LIST).await, ListPopResponse::Miss);
    assert_eq!(client.list_pop_front(NS, LIST).await, ListPopResponse::Miss);
    assert!(client.list_fetch(NS, LIST).await.is_miss());
}

#[tokio::test]
async fn test_remove_value_removes_element() {
    let client = client();

    seed_abc(&client).await;

    assert_eq!(
        client.list_remove_value(NS, LIST, "b").await,
        ListRemoveValueResponse::Success
    );
    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["a".into(), "c".into()])
    );
}

#[tokio::test]
async fn test_remove_absent_value_is_success_without_change() {
    let client = client();

    seed_abc(&client).await;

    assert!(client.list_remove_value(NS, LIST, "z").await.is_success());
    assert!(client
        .list_remove_value(NS, "absent_list", "z")
        .await
        .is_success());
    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["a".into(), "b".into(), "c".into()])
    );
}

#[tokio::test]
async fn test_list_write_refreshes_ttl() {
    let client = CacheClient::new(InMemoryBackend::new(), config(Duration::from_millis(200)));

    client.list_push_back(NS, LIST, "a").await;
    tokio::time::sleep(Duration::from_millis(120)).await;
    client.list_push_back(NS, LIST, "b").await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(
        fetch_strings(&client, LIST).await,
        Some(vec!["a".into(), "b".into()])
    );

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(client.list_fetch(NS, LIST).await.is_miss());
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_list_op_on_scalar_is_type_mismatch_error() {
    let client = client();

    client.set(NS, "scalar", "v").await;

    let response = client.list_push_back(NS, "scalar", "x").await;
    let detail = response.error().expect("expected error");
    assert!(matches!(detail.cause(), Error::TypeMismatch(_)));

    assert!(client.list_fetch(NS, "scalar").await.is_error());
    assert!(client.list_pop_back(NS, "scalar").await.is_error());

    seed_abc(&client).await;
    assert!(client.get(NS, LIST).await.is_error());
}

#[tokio::test]
async fn test_empty_key_is_invalid_argument() {
    let client = client();

    let response = client.set(NS, "", "v").await;
    assert!(matches!(
        response.error().map(|e| e.cause()),
        Some(Error::InvalidArgument(_))
    ));

    assert!(client.list_fetch("", LIST).await.is_error());
}

#[tokio::test]
async fn test_every_error_has_message_and_backend_called_once() {
    let backend = FailingBackend::default();
    let calls = backend.calls.clone();
    let client = CacheClient::new(backend, config(Duration::from_secs(300)));

    let messages: Vec<String> = vec![
        client.get(NS, "k").await.error().map(|e| e.message().to_string()),
        client.set(NS, "k", "v").await.error().map(|e| e.message().to_string()),
        client.delete(NS, "k").await.error().map(|e| e.message().to_string()),
        client
            .list_concatenate_back(NS, LIST, ["a"])
            .await
            .error()
            .map(|e| e.message().to_string()),
        client
            .list_concatenate_front(NS, LIST, ["a"])
            .await
            .error()
            .map(|e| e.message().to_string()),
        client.list_fetch(NS, LIST).await.error().map(|e| e.message().to_string()),
        client
            .list_push_back(NS, LIST, "a")
            .await
            .error()
            .map(|e| e.message().to_string()),
        client
            .list_push_front(NS, LIST, "a")
            .await
            .error()
            .map(|e| e.message().to_string()),
        client.list_pop_back(NS, LIST).await.error().map(|e| e.message().to_string()),
        client.list_pop_front(NS, LIST).await.error().map(|e| e.message().to_string()),
        client
            .list_remove_value(NS, LIST, "a")
            .await
            .error()
            .map(|e| e.message().to_string()),
    ]
    .into_iter()
    .map(|m| m.expect("every call should produce an error"))
    .collect();

    assert_eq!(calls.load(Ordering::SeqCst), messages.len());
    assert!(messages.iter().all(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_error_detail_keeps_cause() {
    let client = CacheClient::new(FailingBackend::default(), config(Duration::from_secs(300)));

    match client.get(NS, "k").await {
        GetResponse::Error(err) => {
            assert_eq!(
                err.cause(),
                &Error::BackendError("connection refused".to_string())
            );
            assert!(err.to_string().contains("connection refused"));
        }
        other => panic!("expected error, got {}", other),
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pushes_are_all_counted() {
    let client = client();

    let pushes = (0..50).map(|i| {
        let client = client.clone();
        async move { client.list_push_back(NS, LIST, format!("v{}", i)).await }
    });
    let responses = futures::future::join_all(pushes).await;

    assert!(responses.iter().all(|r| r.is_success()));
    let mut lengths: Vec<u64> = responses.iter().filter_map(|r| r.list_length()).collect();
    lengths.sort_unstable();
    assert_eq!(lengths, (1..=50).collect::<Vec<u64>>());

    match client.list_fetch(NS, LIST).await {
        ListFetchResponse::Hit(hit) => assert_eq!(hit.len(), 50),
        other => panic!("expected hit, got {}", other),
    }
}

#[tokio::test]
async fn test_independent_keys_do_not_interfere() {
    let client = client();

    let writes = (0..10).map(|i| {
        let client = client.clone();
        async move { client.set(NS, &format!("key_{}", i), format!("value_{}", i)).await }
    });
    futures::future::join_all(writes).await;

    for i in 0..10 {
        match client.get(NS, &format!("key_{}", i)).await {
            GetResponse::Hit(hit) => assert_eq!(hit.value_string(), format!("value_{}", i)),
            other => panic!("expected hit, got {}", other),
        }
    }
}
