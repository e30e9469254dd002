//! # cache-outcome
//!
//! Typed, exhaustively matched outcomes for scalar and list operations
//! against a remote cache.
//!
//! ## Features
//!
//! - **Closed outcomes:** every call returns an enum (`Hit`/`Miss`/`Error` for
//!   reads, `Success`/`Error` for writes); the compiler enforces handling
//! - **Misses are not errors:** absence is a variant, faults carry an
//!   [`ErrorDetail`] with a message and the underlying cause
//! - **Backend Agnostic:** in-memory (default) and Redis backends behind the
//!   [`CacheBackend`] trait
//! - **Explicit configuration:** credential, namespace and default TTL are
//!   passed in through [`ClientConfig`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use cache_outcome::{CacheClient, ClientConfig, backend::InMemoryBackend};
//! use cache_outcome::response::ListFetchResponse;
//!
//! let config = ClientConfig::from_env()?;
//! let client = CacheClient::new(InMemoryBackend::new(), config);
//! let ns = client.namespace().to_string();
//!
//! client.list_concatenate_back(&ns, "my_list_key", ["a", "b", "c"]).await;
//!
//! match client.list_fetch(&ns, "my_list_key").await {
//!     ListFetchResponse::Hit(hit) => println!("{:?}", hit.value_list_string()),
//!     ListFetchResponse::Miss => println!("no list"),
//!     ListFetchResponse::Error(err) => eprintln!("{}", err),
//! }
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod observability;
pub mod response;
pub mod value;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use client::CacheClient;
pub use config::{ClientConfig, Credential};
pub use error::{Error, ErrorDetail, Result};
pub use response::{Outcome, OutcomeKind};
pub use value::CacheValue;

/// Release number, checked against the `VERSION` file at build time.
pub const VERSION: &str = env!("CACHE_OUTCOME_RELEASE");
