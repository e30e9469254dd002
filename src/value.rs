//! String-or-bytes payloads.

use std::borrow::Cow;
use std::fmt;

/// A value stored in or read from the cache.
///
/// The boundary only deals in bytes; strings are stored as their UTF-8
/// encoding. Read accessors decide how to interpret the bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CacheValue(Vec<u8>);

impl CacheValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        CacheValue(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// UTF-8 view, replacing invalid sequences with U+FFFD.
    pub fn as_string(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Strict UTF-8 view.
    pub fn try_as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue(s.as_bytes().to_vec())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue(s.into_bytes())
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(bytes: Vec<u8>) -> Self {
        CacheValue(bytes)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(bytes: &[u8]) -> Self {
        CacheValue(bytes.to_vec())
    }
}

impl From<CacheValue> for Vec<u8> {
    fn from(value: CacheValue) -> Self {
        value.0
    }
}

impl PartialEq<str> for CacheValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for CacheValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}
