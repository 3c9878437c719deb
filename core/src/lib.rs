//! Synchronous client for the Tapestry social-graph API.
//!
//! # Overview
//! Profiles, content, comments, likes and follow edges live on a remote
//! HTTP/JSON service keyed by an API key. This crate builds the requests,
//! sends them through a [`Transport`], and decodes the responses into typed
//! records. Timestamps arrive as either a plain integer or a `{low, high}`
//! pair; [`UnixTimestamp`] accepts both.
//!
//! # Design
//! - Every operation is split into `build_*` (produces an [`HttpRequest`])
//!   and `parse_*` (consumes an [`HttpResponse`]), so the I/O boundary is
//!   explicit and both halves can be tested without a network.
//! - The convenience methods on [`TapestryClient`] join the halves through a
//!   [`Transport`]; the default is a pooled ureq agent.
//! - Reads by id return [`Lookup`], keeping "not found" out of the error type.
//! - [`CallContext`] carries a deadline and a cancel flag checked before the
//!   request goes out and again once the response is back.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod query;
pub mod timestamp;
pub mod transport;
pub mod types;

pub use client::TapestryClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, CancelReason};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use lookup::Lookup;
pub use query::{CommentsQuery, ContentsOption, ContentsQuery, RepliesQuery, SortDirection};
pub use timestamp::UnixTimestamp;
pub use transport::{CallContext, CancelToken, Transport, UreqTransport};
pub use types::*;
