//! Namespaced cache key construction.

use crate::error::{Error, Result};

/// Separator between namespace and key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Builder for backend storage keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Build the storage key `"{namespace}:{key}"`.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if the namespace or key is empty.
    pub fn build(namespace: &str, key: &str) -> Result<String> {
        if namespace.is_empty() {
            return Err(Error::InvalidArgument(
                "namespace must not be empty".to_string(),
            ));
        }
        if key.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "key must not be empty (namespace: {})",
                namespace
            )));
        }
        Ok(format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_builder() {
        let key = CacheKeyBuilder::build("sandbox", "my_key").unwrap();
        assert_eq!(key, "sandbox:my_key");
    }

    #[test]
    fn test_cache_key_builder_rejects_empty_parts() {
        assert!(matches!(
            CacheKeyBuilder::build("", "my_key"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            CacheKeyBuilder::build("sandbox", ""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cache_key_builder_keeps_inner_separators() {
        let key = CacheKeyBuilder::build("sandbox", "user:123:profile").unwrap();
        assert_eq!(key, "sandbox:user:123:profile");
    }
}
