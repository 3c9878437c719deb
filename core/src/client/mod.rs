//! Request builders, response parsers, and the calls that join them.
//!
//! # Design
//! `TapestryClient` holds only immutable configuration and a transport, so
//! one instance can serve any number of concurrent callers. Each operation
//! comes in three forms:
//!
//! - `build_*` produces an [`HttpRequest`] without touching the network.
//! - `parse_*` interprets an [`HttpResponse`]: status first, then body.
//! - the bare operation name runs build, one transport round trip, and parse.
//!
//! Read-by-id parsers return [`Lookup`] so "absent" never has to be told
//! apart from a failure by inspecting an error.

mod comments;
mod contents;
mod followers;
mod likes;
mod profiles;

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, CancelReason};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::lookup::Lookup;
use crate::query::QueryString;
use crate::transport::{CallContext, Transport, UreqTransport};
use crate::types::Execution;

/// Client for the Tapestry social-graph API.
#[derive(Debug, Clone)]
pub struct TapestryClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl TapestryClient<UreqTransport> {
    /// A client using a pooled ureq agent bounded by `config.timeout`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self { config, transport }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        ClientConfig::from_env().map(Self::new)
    }
}

impl<T> TapestryClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A copy of this client that declares `execution` on mutating calls.
    pub fn with_execution(&self, execution: Execution) -> Self
    where
        T: Clone,
    {
        Self {
            config: self.config.clone().with_execution(execution),
            transport: self.transport.clone(),
        }
    }

    fn execution(&self) -> Execution {
        self.config.execution
    }

    fn query(&self) -> QueryString {
        QueryString::new(&self.config.api_key)
    }

    /// `{base_url}{path}?{query}`; `query` must already start with the key.
    fn url(&self, path: &str, query: &str) -> String {
        format!("{}{path}?{query}", self.config.base_url)
    }

    /// `{base_url}{path}?apiKey=...`
    fn endpoint(&self, path: &str) -> String {
        self.url(path, &self.query().encode())
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.endpoint(path))
    }
}

impl<T: Transport> TapestryClient<T> {
    /// Execute one request, honoring the caller's context on both sides of
    /// the round trip.
    fn send(&self, ctx: &CallContext, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.redacted_url().to_string();

        if let Err(err) = ctx.check() {
            warn!(method, %path, error = %err, "call abandoned before sending");
            return Err(err);
        }

        debug!(method, %path, "sending request");
        let response = self.transport.execute(ctx, request).inspect_err(|err| {
            warn!(method, %path, error = %err, "request failed");
        })?;

        if ctx.is_cancelled() {
            warn!(method, %path, "call cancelled while in flight; discarding response");
            return Err(ApiError::Cancelled(CancelReason::Cancelled));
        }

        debug!(method, %path, status = response.status, "received response");
        Ok(response)
    }
}

/// Percent-encode a value used as a path segment.
fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Fail unless the response carries one of the `accepted` statuses.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    warn!(status = response.status, "unexpected response status");
    Err(ApiError::http(response.status, &response.body))
}

fn decode<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Status 200 decoded into `D`, anything else an error.
fn parse_ok<D: DeserializeOwned>(response: HttpResponse) -> Result<D, ApiError> {
    check_status(&response, &[200])?;
    decode(&response)
}

/// Shared read-by-id interpretation: any of `absent` statuses, or a body
/// whose `record` object has no id or an empty one, means not found.
///
/// The id is checked before `D` is decoded, so a zero-value record that
/// lacks other required fields still reads as absent.
fn parse_lookup<D: DeserializeOwned>(
    response: HttpResponse,
    absent: &[u16],
    record: &str,
) -> Result<Lookup<D>, ApiError> {
    if absent.contains(&response.status) {
        info!(status = response.status, "resource not found");
        return Ok(Lookup::NotFound);
    }
    let body: serde_json::Value = parse_ok(response)?;
    let id = body.get(record).and_then(|r| r.get("id")).and_then(|id| id.as_str());
    if id.map_or(true, str::is_empty) {
        info!(record, "response carried an empty record; treating as not found");
        return Ok(Lookup::NotFound);
    }
    serde_json::from_value(body)
        .map(Lookup::Found)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}
