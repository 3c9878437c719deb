//! Error types for the Tapestry API client.
//!
//! # Design
//! "The resource does not exist" is not an error here: read paths return
//! [`Lookup::NotFound`](crate::Lookup) so callers branch on a tag instead of
//! matching error strings. Everything that is a genuine failure lands in
//! `ApiError`, split by where it happened: building the request, moving
//! bytes, the caller giving up, the server refusing, or decoding the reply.

use std::fmt;

use thiserror::Error;

/// Longest response body kept in [`ApiError::Http`].
const BODY_SNIPPET_LIMIT: usize = 512;

/// Errors returned by `TapestryClient` build, parse and call methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (DNS, connect, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The caller cancelled the call or its deadline elapsed.
    #[error("request cancelled: {0}")]
    Cancelled(CancelReason),

    /// The server answered with a status the operation does not accept.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// Why a call was abandoned before a usable response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's [`CancelToken`](crate::CancelToken) fired.
    Cancelled,
    /// The caller's deadline elapsed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "cancelled by caller"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

impl ApiError {
    /// Build an [`ApiError::Http`] keeping at most a bounded prefix of `body`.
    pub fn http(status: u16, body: &str) -> Self {
        ApiError::Http {
            status,
            body: snippet(body),
        }
    }

    /// True when the call was abandoned by the caller rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled(_))
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LIMIT {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept_whole() {
        let err = ApiError::http(500, "boom");
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn long_bodies_are_truncated_on_a_char_boundary() {
        let body = "é".repeat(BODY_SNIPPET_LIMIT);
        let ApiError::Http { body: kept, .. } = ApiError::http(502, &body) else {
            panic!("expected Http variant");
        };
        assert!(kept.ends_with("..."));
        assert!(kept.len() <= BODY_SNIPPET_LIMIT + 3);
    }

    #[test]
    fn cancellation_is_distinguishable() {
        assert!(ApiError::Cancelled(CancelReason::DeadlineExceeded).is_cancelled());
        assert!(!ApiError::Transport("connection refused".into()).is_cancelled());
        assert_eq!(
            ApiError::Cancelled(CancelReason::Cancelled).to_string(),
            "request cancelled: cancelled by caller"
        );
    }
}
