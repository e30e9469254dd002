//! Walk through every operation against a sandbox namespace.
//!
//! ```bash
//! CACHE_API_KEY=dev cargo run --example sandbox
//! # against Redis
//! CACHE_API_KEY=dev REDIS_HOST=localhost cargo run --example sandbox --features redis
//! ```

use cache_outcome::backend::{CacheBackend, InMemoryBackend};
use cache_outcome::observability::LogMetrics;
use cache_outcome::response::{
    GetResponse, ListFetchResponse, ListPopResponse, ListPushResponse, ListRemoveValueResponse,
};
use cache_outcome::{CacheClient, ClientConfig, Result};
use std::sync::Arc;

const MY_KEY: &str = "my_key";
const MY_LIST_KEY: &str = "my_list_key";

async fn print_list<B: CacheBackend>(client: &CacheClient<B>, ns: &str) {
    match client.list_fetch(ns, MY_LIST_KEY).await {
        ListFetchResponse::Hit(hit) => {
            println!("   {:?}", hit.value_list_string());
        }
        ListFetchResponse::Miss => println!("   list {} not found", MY_LIST_KEY),
        ListFetchResponse::Error(err) => eprintln!("   error: {}", err),
    }
}

async fn scalar_example<B: CacheBackend>(client: &CacheClient<B>, ns: &str) {
    println!("1. Set and get a scalar:");
    client.set(ns, MY_KEY, "Hello_world").await;

    let response = client.get(ns, MY_KEY).await;
    match &response {
        GetResponse::Hit(hit) => {
            println!("   {}", response);
            println!("   value: {}", hit.value_string());
        }
        GetResponse::Miss => println!("   {}", response),
        GetResponse::Error(err) => eprintln!("   error: {}", err),
    }

    client.delete(ns, MY_KEY).await;
    println!();
}

async fn concatenate_example<B: CacheBackend>(client: &CacheClient<B>, ns: &str) {
    println!("2. Concatenate to both ends of a list:");
    client
        .list_concatenate_back(ns, MY_LIST_KEY, ["a", "b", "c"])
        .await;
    client
        .list_concatenate_back(ns, MY_LIST_KEY, ["d", "e", "f"])
        .await;
    client
        .list_concatenate_front(ns, MY_LIST_KEY, ["g", "h", "i"])
        .await;

    print_list(client, ns).await;
    client.delete(ns, MY_LIST_KEY).await;
    println!();
}

async fn pop_example<B: CacheBackend>(client: &CacheClient<B>, ns: &str) {
    println!("3. Pop from both ends of a list:");
    client
        .list_concatenate_back(ns, MY_LIST_KEY, ["a", "b", "c"])
        .await;

    if let ListPopResponse::Hit(hit) = client.list_pop_back(ns, MY_LIST_KEY).await {
        println!("   removed from back: {}", hit.value_string());
    }
    if let ListPopResponse::Hit(hit) = client.list_pop_front(ns, MY_LIST_KEY).await {
        println!("   removed from front: {}", hit.value_string());
    }

    print_list(client, ns).await;
    client.delete(ns, MY_LIST_KEY).await;
    println!();
}

async fn push_example<B: CacheBackend>(client: &CacheClient<B>, ns: &str) {
    println!("4. Push to both ends of a list:");
    client
        .list_concatenate_back(ns, MY_LIST_KEY, ["a", "b", "c"])
        .await;

    if let ListPushResponse::Success(success) = client.list_push_back(ns, MY_LIST_KEY, "d").await
    {
        println!("   list length: {}", success.list_length());
    }
    if let ListPushResponse::Success(success) = client.list_push_front(ns, MY_LIST_KEY, "e").await
    {
        println!("   list length: {}", success.list_length());
    }

    print_list(client, ns).await;
    client.delete(ns, MY_LIST_KEY).await;
    println!();
}

async fn remove_example<B: CacheBackend>(client: &CacheClient<B>, ns: &str) {
    println!("5. Remove a value from a list:");
    client
        .list_concatenate_back(ns, MY_LIST_KEY, ["a", "b", "c"])
        .await;

    let response = client.list_remove_value(ns, MY_LIST_KEY, "b").await;
    if let ListRemoveValueResponse::Success = response {
        println!("   {}", response);
    }

    print_list(client, ns).await;
    client.delete(ns, MY_LIST_KEY).await;
    println!();
}

async fn run<B: CacheBackend>(client: CacheClient<B>) {
    let ns = client.namespace().to_string();

    scalar_example(&client, &ns).await;
    concatenate_example(&client, &ns).await;
    pop_example(&client, &ns).await;
    push_example(&client, &ns).await;
    remove_example(&client, &ns).await;
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    // A missing credential stops the demo here, before any cache call.
    let config = ClientConfig::from_env()?;

    println!("\n=== cache-outcome sandbox ({}) ===\n", config.namespace);

    #[cfg(feature = "redis")]
    {
        if let Ok(host) = std::env::var("REDIS_HOST") {
            let redis = cache_outcome::backend::RedisConfig {
                host,
                port: std::env::var("REDIS_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(6379),
                ..Default::default()
            };
            // CACHE_API_KEY doubles as the Redis password.
            let client = CacheClient::connect(config, redis)
                .await?
                .with_metrics(Arc::new(LogMetrics));
            run(client).await;
            println!("=== Sandbox Complete ===\n");
            return Ok(());
        }
    }

    let client =
        CacheClient::new(InMemoryBackend::new(), config).with_metrics(Arc::new(LogMetrics));
    run(client).await;

    println!("=== Sandbox Complete ===\n");
    Ok(())
}
