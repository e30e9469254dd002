//! Typed outcomes of cache operations.
//!
//! Every client call returns exactly one of the enums below. Reads resolve
//! to `Hit`, `Miss` or `Error`; writes resolve to `Success` or `Error`.
//! Payload accessors live on the variant structs ([`GetHit`],
//! [`ListFetchHit`], [`ListPushSuccess`], [`ListPopHit`]), so the only way
//! to reach a value is to match the variant that carries it:
//!
//! ```
//! use cache_outcome::response::GetResponse;
//!
//! fn show(response: GetResponse) -> String {
//!     match response {
//!         GetResponse::Hit(hit) => hit.value_string().into_owned(),
//!         GetResponse::Miss => "<miss>".to_string(),
//!         GetResponse::Error(err) => format!("<error: {}>", err.message()),
//!     }
//! }
//! ```
//!
//! A miss is never an error. `Error` variants are produced only when the
//! backend reports a failure, and always carry an [`ErrorDetail`].

mod list;
mod scalar;

pub use list::{
    ListConcatenateResponse, ListFetchHit, ListFetchResponse, ListPopHit, ListPopResponse,
    ListPushResponse, ListPushSuccess, ListRemoveValueResponse,
};
pub use scalar::{DeleteResponse, GetHit, GetResponse, SetResponse};

use crate::error::ErrorDetail;

/// Coarse classification shared by all response enums.
///
/// Handy for metrics and logging where the payload does not matter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Hit,
    Miss,
    Success,
    Error,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Hit => "hit",
            OutcomeKind::Miss => "miss",
            OutcomeKind::Success => "success",
            OutcomeKind::Error => "error",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour common to every response enum.
pub trait Outcome {
    /// Which variant is active.
    fn kind(&self) -> OutcomeKind;

    /// The error payload, if this is the `Error` variant.
    fn error(&self) -> Option<&ErrorDetail>;

    fn is_error(&self) -> bool {
        self.kind() == OutcomeKind::Error
    }
}

/// Longest value rendered by `Display` before it is elided.
pub(crate) const DISPLAY_TRUNCATE_AT: usize = 32;

/// Render a value for `Display`, cut at a char boundary with `...`.
pub(crate) fn truncate_for_display(text: &str) -> String {
    match text.char_indices().nth(DISPLAY_TRUNCATE_AT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
