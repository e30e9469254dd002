//! Error types for cache operations.
//!
//! [`Error`] is what a [`CacheBackend`](crate::backend::CacheBackend) reports
//! when a call fails. The client never hands it back as `Err`; it is wrapped
//! in an [`ErrorDetail`] and returned inside the `Error` variant of the
//! operation's response enum.

use std::fmt;

/// Result type for backend and configuration calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of the cache boundary and of client configuration.
///
/// A cache miss is deliberately absent: misses are first-class response
/// variants, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend storage or transport error (Redis, network, etc).
    ///
    /// Common causes:
    /// - Connection lost or refused
    /// - Backend protocol error
    /// - Service-reported fault
    BackendError(String),

    /// The request was malformed and rejected before touching any data.
    ///
    /// Raised for an empty namespace or an empty key.
    InvalidArgument(String),

    /// A list operation was issued against a scalar key, or the reverse.
    ///
    /// Redis reports this as `WRONGTYPE`.
    TypeMismatch(String),

    /// The boundary did not answer within its configured timeout.
    Timeout(String),

    /// Configuration error while building a client or backend.
    ///
    /// Common causes:
    /// - Credential environment variable not set
    /// - Empty namespace
    /// - Zero default TTL
    /// - Malformed JSON config
    ///
    /// **Recovery:** Fix configuration and restart.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::TypeMismatch(msg) => write!(f, "Type mismatch: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Error payload carried by every response enum's `Error` variant.
///
/// Pairs a human-readable description of the failed call with the
/// underlying [`Error`] the backend reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    message: String,
    cause: Error,
}

impl ErrorDetail {
    /// Wrap a backend error. An empty message falls back to the cause's text
    /// so [`message`](Self::message) is never empty.
    pub fn new(message: impl Into<String>, cause: Error) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = cause.to_string();
        }
        ErrorDetail { message, cause }
    }

    /// Human-readable description of the failed operation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error reported by the backend.
    pub fn cause(&self) -> &Error {
        &self.cause
    }

    pub fn into_cause(self) -> Error {
        self.cause
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.cause)
    }
}

impl std::error::Error for ErrorDetail {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ConfigError(format!("Invalid JSON config: {}", e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::TimedOut {
            Error::Timeout(e.to_string())
        } else {
            Error::BackendError(e.to_string())
        }
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<deadpool_redis::redis::RedisError> for Error {
    fn from(e: deadpool_redis::redis::RedisError) -> Self {
        if e.code() == Some("WRONGTYPE") {
            Error::TypeMismatch(format!("Redis error: {}", e))
        } else if e.is_timeout() {
            Error::Timeout(format!("Redis error: {}", e))
        } else {
            Error::BackendError(format!("Redis error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TypeMismatch("list op on scalar".to_string());
        assert_eq!(err.to_string(), "Type mismatch: list op on scalar");
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "test error".into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn test_error_from_io_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(matches!(Error::from(io), Error::Timeout(_)));
    }

    #[test]
    fn test_error_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(parse), Error::ConfigError(_)));
    }

    #[test]
    fn test_error_detail_message_never_empty() {
        let detail = ErrorDetail::new("   ", Error::BackendError("down".to_string()));
        assert_eq!(detail.message(), "Backend error: down");

        let detail = ErrorDetail::new("GET failed", Error::Timeout("5s".to_string()));
        assert_eq!(detail.message(), "GET failed");
        assert_eq!(detail.to_string(), "GET failed: Timeout: 5s");
        assert_eq!(detail.cause(), &Error::Timeout("5s".to_string()));
    }
}
