//! Outcomes of scalar get, set and delete.

use super::{truncate_for_display, Outcome, OutcomeKind};
use crate::error::ErrorDetail;
use crate::value::CacheValue;
use std::borrow::Cow;
use std::fmt;

/// Payload of a successful [`GetResponse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetHit {
    value: CacheValue,
}

impl GetHit {
    pub fn value(&self) -> &CacheValue {
        &self.value
    }

    /// The value decoded as UTF-8 (lossy).
    pub fn value_string(&self) -> Cow<'_, str> {
        self.value.as_string()
    }

    pub fn value_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    pub fn into_value(self) -> CacheValue {
        self.value
    }
}

/// Outcome of a scalar get.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GetResponse {
    /// The key exists.
    Hit(GetHit),
    /// The key is absent or expired.
    Miss,
    Error(ErrorDetail),
}

impl GetResponse {
    pub fn is_hit(&self) -> bool {
        matches!(self, GetResponse::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, GetResponse::Miss)
    }

    /// The value, if this is a hit.
    pub fn value(&self) -> Option<&CacheValue> {
        match self {
            GetResponse::Hit(hit) => Some(hit.value()),
            _ => None,
        }
    }
}

impl From<Result<Option<Vec<u8>>, ErrorDetail>> for GetResponse {
    fn from(result: Result<Option<Vec<u8>>, ErrorDetail>) -> Self {
        match result {
            Ok(Some(bytes)) => GetResponse::Hit(GetHit {
                value: CacheValue::new(bytes),
            }),
            Ok(None) => GetResponse::Miss,
            Err(detail) => GetResponse::Error(detail),
        }
    }
}

impl Outcome for GetResponse {
    fn kind(&self) -> OutcomeKind {
        match self {
            GetResponse::Hit(_) => OutcomeKind::Hit,
            GetResponse::Miss => OutcomeKind::Miss,
            GetResponse::Error(_) => OutcomeKind::Error,
        }
    }

    fn error(&self) -> Option<&ErrorDetail> {
        match self {
            GetResponse::Error(detail) => Some(detail),
            _ => None,
        }
    }
}

impl fmt::Display for GetResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GetResponse::Hit(hit) => {
                write!(f, "Hit: {}", truncate_for_display(&hit.value_string()))
            }
            GetResponse::Miss => f.write_str("Miss"),
            GetResponse::Error(detail) => write!(f, "Error: {}", detail),
        }
    }
}

/// Outcome of a scalar set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetResponse {
    Success,
    Error(ErrorDetail),
}

/// Outcome of a delete. Deleting an absent key is a success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteResponse {
    Success,
    Error(ErrorDetail),
}

macro_rules! success_or_error {
    ($name:ident) => {
        impl $name {
            pub fn is_success(&self) -> bool {
                matches!(self, $name::Success)
            }
        }

        impl From<Result<(), ErrorDetail>> for $name {
            fn from(result: Result<(), ErrorDetail>) -> Self {
                match result {
                    Ok(()) => $name::Success,
                    Err(detail) => $name::Error(detail),
                }
            }
        }

        impl Outcome for $name {
            fn kind(&self) -> OutcomeKind {
                match self {
                    $name::Success => OutcomeKind::Success,
                    $name::Error(_) => OutcomeKind::Error,
                }
            }

            fn error(&self) -> Option<&ErrorDetail> {
                match self {
                    $name::Success => None,
                    $name::Error(detail) => Some(detail),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $name::Success => f.write_str("Success"),
                    $name::Error(detail) => write!(f, "Error: {}", detail),
                }
            }
        }
    };
}

pub(crate) use success_or_error;

success_or_error!(SetResponse);
success_or_error!(DeleteResponse);
