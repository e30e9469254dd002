//! Outcomes of list operations.

use super::scalar::success_or_error;
use super::{truncate_for_display, Outcome, OutcomeKind};
use crate::error::ErrorDetail;
use crate::value::CacheValue;
use std::borrow::Cow;
use std::fmt;

/// Payload of a successful [`ListFetchResponse`]: the list, front to back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFetchHit {
    values: Vec<CacheValue>,
}

impl ListFetchHit {
    pub fn values(&self) -> &[CacheValue] {
        &self.values
    }

    /// Every element decoded as UTF-8 (lossy).
    pub fn value_list_string(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| v.as_string().into_owned())
            .collect()
    }

    pub fn value_list_bytes(&self) -> Vec<&[u8]> {
        self.values.iter().map(CacheValue::as_bytes).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<CacheValue> {
        self.values
    }
}

/// Outcome of a list fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListFetchResponse {
    Hit(ListFetchHit),
    /// No list is stored under the key.
    Miss,
    Error(ErrorDetail),
}

impl ListFetchResponse {
    pub fn is_hit(&self) -> bool {
        matches!(self, ListFetchResponse::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, ListFetchResponse::Miss)
    }

    /// The elements, if this is a hit.
    pub fn values(&self) -> Option<&[CacheValue]> {
        match self {
            ListFetchResponse::Hit(hit) => Some(hit.values()),
            _ => None,
        }
    }
}

impl From<Result<Option<Vec<Vec<u8>>>, ErrorDetail>> for ListFetchResponse {
    fn from(result: Result<Option<Vec<Vec<u8>>>, ErrorDetail>) -> Self {
        match result {
            Ok(Some(values)) => ListFetchResponse::Hit(ListFetchHit {
                values: values.into_iter().map(CacheValue::new).collect(),
            }),
            Ok(None) => ListFetchResponse::Miss,
            Err(detail) => ListFetchResponse::Error(detail),
        }
    }
}

impl Outcome for ListFetchResponse {
    fn kind(&self) -> OutcomeKind {
        match self {
            ListFetchResponse::Hit(_) => OutcomeKind::Hit,
            ListFetchResponse::Miss => OutcomeKind::Miss,
            ListFetchResponse::Error(_) => OutcomeKind::Error,
        }
    }

    fn error(&self) -> Option<&ErrorDetail> {
        match self {
            ListFetchResponse::Error(detail) => Some(detail),
            _ => None,
        }
    }
}

impl fmt::Display for ListFetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListFetchResponse::Hit(hit) => {
                let rendered = hit.value_list_string().join(", ");
                write!(f, "Hit: [{}]", truncate_for_display(&rendered))
            }
            ListFetchResponse::Miss => f.write_str("Miss"),
            ListFetchResponse::Error(detail) => write!(f, "Error: {}", detail),
        }
    }
}

/// Payload of a successful [`ListPushResponse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListPushSuccess {
    list_length: u64,
}

impl ListPushSuccess {
    /// Length of the list after the push.
    pub fn list_length(&self) -> u64 {
        self.list_length
    }
}

/// Outcome of a push to the front or back of a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListPushResponse {
    Success(ListPushSuccess),
    Error(ErrorDetail),
}

impl ListPushResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ListPushResponse::Success(_))
    }

    pub fn list_length(&self) -> Option<u64> {
        match self {
            ListPushResponse::Success(success) => Some(success.list_length()),
            ListPushResponse::Error(_) => None,
        }
    }
}

impl From<Result<u64, ErrorDetail>> for ListPushResponse {
    fn from(result: Result<u64, ErrorDetail>) -> Self {
        match result {
            Ok(list_length) => ListPushResponse::Success(ListPushSuccess { list_length }),
            Err(detail) => ListPushResponse::Error(detail),
        }
    }
}

impl Outcome for ListPushResponse {
    fn kind(&self) -> OutcomeKind {
        match self {
            ListPushResponse::Success(_) => OutcomeKind::Success,
            ListPushResponse::Error(_) => OutcomeKind::Error,
        }
    }

    fn error(&self) -> Option<&ErrorDetail> {
        match self {
            ListPushResponse::Success(_) => None,
            ListPushResponse::Error(detail) => Some(detail),
        }
    }
}

impl fmt::Display for ListPushResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListPushResponse::Success(success) => {
                write!(f, "Success: list length {}", success.list_length)
            }
            ListPushResponse::Error(detail) => write!(f, "Error: {}", detail),
        }
    }
}

/// Payload of a successful [`ListPopResponse`]: the removed element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListPopHit {
    value: CacheValue,
}

impl ListPopHit {
    pub fn value(&self) -> &CacheValue {
        &self.value
    }

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

/// Outcome of a pop from the front or back of a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListPopResponse {
    Hit(ListPopHit),
    /// The list is absent or empty.
    Miss,
    Error(ErrorDetail),
}

impl ListPopResponse {
    pub fn is_hit(&self) -> bool {
        matches!(self, ListPopResponse::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, ListPopResponse::Miss)
    }

    pub fn value(&self) -> Option<&CacheValue> {
        match self {
            ListPopResponse::Hit(hit) => Some(hit.value()),
            _ => None,
        }
    }
}

impl From<Result<Option<Vec<u8>>, ErrorDetail>> for ListPopResponse {
    fn from(result: Result<Option<Vec<u8>>, ErrorDetail>) -> Self {
        match result {
            Ok(Some(bytes)) => ListPopResponse::Hit(ListPopHit {
                value: CacheValue::new(bytes),
            }),
            Ok(None) => ListPopResponse::Miss,
            Err(detail) => ListPopResponse::Error(detail),
        }
    }
}

impl Outcome for ListPopResponse {
    fn kind(&self) -> OutcomeKind {
        match self {
            ListPopResponse::Hit(_) => OutcomeKind::Hit,
            ListPopResponse::Miss => OutcomeKind::Miss,
            ListPopResponse::Error(_) => OutcomeKind::Error,
        }
    }

    fn error(&self) -> Option<&ErrorDetail> {
        match self {
            ListPopResponse::Error(detail) => Some(detail),
            _ => None,
        }
    }
}

impl fmt::Display for ListPopResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListPopResponse::Hit(hit) => {
                write!(f, "Hit: {}", truncate_for_display(&hit.value_string()))
            }
            ListPopResponse::Miss => f.write_str("Miss"),
            ListPopResponse::Error(detail) => write!(f, "Error: {}", detail),
        }
    }
}

/// Outcome of concatenating a batch onto the front or back of a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListConcatenateResponse {
    Success,
    Error(ErrorDetail),
}

/// Outcome of removing a value from a list.
///
/// Removing a value that is not present is still a success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListRemoveValueResponse {
    Success,
    Error(ErrorDetail),
}

success_or_error!(ListConcatenateResponse);
success_or_error!(ListRemoveValueResponse);
