//! Client configuration.
//!
//! Everything the client needs is passed in explicitly through
//! [`ClientConfig`]; nothing is read from globals after construction.
//!
//! ```
//! use cache_outcome::config::{ClientConfig, Credential};
//! use std::time::Duration;
//!
//! let config = ClientConfig::new(
//!     Credential::new("secret"),
//!     "sandbox",
//!     Duration::from_secs(300),
//! )?;
//! assert_eq!(config.namespace, "sandbox");
//! # Ok::<(), cache_outcome::Error>(())
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the authentication secret.
pub const CREDENTIAL_ENV_VAR: &str = "CACHE_API_KEY";

/// Environment variable overriding the namespace.
pub const NAMESPACE_ENV_VAR: &str = "CACHE_NAMESPACE";

/// Environment variable overriding the default TTL, in seconds.
pub const DEFAULT_TTL_ENV_VAR: &str = "CACHE_DEFAULT_TTL_SECONDS";

pub const DEFAULT_NAMESPACE: &str = "sandbox";

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Authentication secret for the remote cache.
///
/// The secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Credential(secret.into())
    }

    /// Read the secret from an environment variable.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the variable is unset or blank.
    pub fn from_env_var(name: &str) -> Result<Self> {
        match std::env::var(name) {
            Ok(secret) if !secret.trim().is_empty() => Ok(Credential(secret)),
            Ok(_) => Err(Error::ConfigError(format!(
                "environment variable {} is empty",
                name
            ))),
            Err(e) => Err(Error::ConfigError(format!(
                "environment variable {} not available: {}",
                name, e
            ))),
        }
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Configuration for [`CacheClient`](crate::CacheClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Authentication secret.
    pub credential: Credential,

    /// Logical cache the demo and helpers operate on.
    pub namespace: String,

    /// TTL applied to `set` and to list writes.
    pub default_ttl: Duration,
}

/// On-disk shape of [`ClientConfig`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
    credential: Option<String>,
    namespace: String,
    default_ttl_seconds: Option<u64>,
}

impl ClientConfig {
    /// Build and validate a configuration.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for an empty namespace or a zero TTL.
    pub fn new(
        credential: Credential,
        namespace: impl Into<String>,
        default_ttl: Duration,
    ) -> Result<Self> {
        let config = ClientConfig {
            credential,
            namespace: namespace.into(),
            default_ttl,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    ///
    /// - `CACHE_API_KEY` (required)
    /// - `CACHE_NAMESPACE` (default `"sandbox"`)
    /// - `CACHE_DEFAULT_TTL_SECONDS` (default 300)
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the credential is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        let credential = Credential::from_env_var(CREDENTIAL_ENV_VAR)?;
        let namespace =
            std::env::var(NAMESPACE_ENV_VAR).unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let default_ttl = match std::env::var(DEFAULT_TTL_ENV_VAR) {
            Ok(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                Error::ConfigError(format!("{} is not a number: {}", DEFAULT_TTL_ENV_VAR, e))
            })?),
            Err(_) => DEFAULT_TTL,
        };

        Self::new(credential, namespace, default_ttl)
    }

    /// Parse a JSON configuration document.
    ///
    /// ```json
    /// { "credential": "secret", "namespace": "sandbox", "default_ttl_seconds": 300 }
    /// ```
    ///
    /// A missing `credential` is read from `CACHE_API_KEY`; a missing
    /// `default_ttl_seconds` means 300.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for malformed JSON, unknown fields, or a
    /// configuration that fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawClientConfig = serde_json::from_str(json)?;
        let credential = match raw.credential {
            Some(secret) => Credential::new(secret),
            None => Credential::from_env_var(CREDENTIAL_ENV_VAR)?,
        };
        let default_ttl = raw
            .default_ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        Self::new(credential, raw.namespace, default_ttl)
    }

    /// Check invariants.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.credential.secret().trim().is_empty() {
            return Err(Error::ConfigError("credential must not be empty".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(Error::ConfigError("namespace must not be empty".to_string()));
        }
        if self.default_ttl.is_zero() {
            return Err(Error::ConfigError(
                "default TTL must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
