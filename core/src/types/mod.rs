//! Wire DTOs for the Tapestry social-graph API.
//!
//! # Design
//! These are plain value records; the client keeps no copies between calls.
//! Field names follow the service's JSON (camelCase, except `created_at`).
//! Every timestamp field is a [`UnixTimestamp`](crate::UnixTimestamp), so
//! both wire shapes decode without per-field attributes. Optional text the
//! service sometimes omits defaults to empty rather than failing the decode.

mod comment;
mod content;
mod profile;

pub use comment::*;
pub use content::*;
pub use profile::*;

use serde::{Deserialize, Serialize};

/// Server-side confirmation policy declared on mutating calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Execution {
    /// Accept as soon as the write is queued.
    FastUnconfirmed,
    /// Return once the write is signed.
    QuickSignature,
    /// Return once the write is confirmed and indexed.
    #[default]
    ConfirmedAndParsed,
}

impl Execution {
    pub fn as_str(self) -> &'static str {
        match self {
            Execution::FastUnconfirmed => "FAST_UNCONFIRMED",
            Execution::QuickSignature => "QUICK_SIGNATURE",
            Execution::ConfirmedAndParsed => "CONFIRMED_AND_PARSED",
        }
    }
}

impl std::str::FromStr for Execution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAST_UNCONFIRMED" => Ok(Execution::FastUnconfirmed),
            "QUICK_SIGNATURE" => Ok(Execution::QuickSignature),
            "CONFIRMED_AND_PARSED" => Ok(Execution::ConfirmedAndParsed),
            other => Err(format!("unknown execution mode: {other}")),
        }
    }
}

/// One caller-supplied key/value pair on content or a comment.
///
/// Passed through opaquely and in order; duplicate keys are not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Aggregates the server recomputes after likes and comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialCounts {
    pub like_count: u64,
    pub comment_count: u64,
}

/// The requesting profile's relationship to an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestingProfileSocialInfo {
    pub has_liked: bool,
}
