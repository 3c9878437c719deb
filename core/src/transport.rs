//! Executing requests: the transport seam and the caller's call context.
//!
//! # Design
//! The client never retries and never sleeps. Each call carries a
//! [`CallContext`] owned by the caller: an optional deadline and an optional
//! [`CancelToken`]. The remaining time before the deadline is handed to the
//! transport as its per-request timeout, so a slow server surfaces as
//! `ApiError::Cancelled(DeadlineExceeded)` rather than a generic transport
//! failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{ApiError, CancelReason};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Shared flag a caller flips to abandon in-flight calls.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call deadline and cancellation, supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl CallContext {
    /// A context with no deadline that can never be cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub fn deadline_elapsed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fail if the caller has already given up on this call.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled(CancelReason::Cancelled));
        }
        if self.deadline_elapsed() {
            return Err(ApiError::Cancelled(CancelReason::DeadlineExceeded));
        }
        Ok(())
    }
}

/// Performs one HTTP round trip.
///
/// Implementations return every status as data; interpreting it is the
/// parse step's job. A timeout caused by `ctx`'s deadline must be reported
/// as `ApiError::Cancelled(CancelReason::DeadlineExceeded)`.
pub trait Transport: Send + Sync {
    fn execute(&self, ctx: &CallContext, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, ctx: &CallContext, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(ctx, request)
    }
}

/// Blocking transport backed by a pooled `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    /// `timeout` bounds every request, on top of any per-call deadline.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    /// The timeout to hand to ureq, and whether the caller's deadline is
    /// the binding bound.
    fn effective_timeout(&self, ctx: &CallContext) -> (Option<Duration>, bool) {
        match (self.timeout, ctx.remaining()) {
            (Some(own), Some(left)) if left <= own => (Some(left), true),
            (Some(own), Some(_)) => (Some(own), false),
            (None, Some(left)) => (Some(left), true),
            (own, None) => (own, false),
        }
    }

    fn send(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        match (method, body) {
            (HttpMethod::Get, _) => prepare(self.agent.get(&url), &headers, timeout).call(),
            (HttpMethod::Delete, None) => prepare(self.agent.delete(&url), &headers, timeout).call(),
            (HttpMethod::Delete, Some(body)) => {
                prepare(self.agent.delete(&url).force_send_body(), &headers, timeout)
                    .send(body.as_bytes())
            }
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(&url), &headers, timeout).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => prepare(self.agent.post(&url), &headers, timeout).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                prepare(self.agent.put(&url), &headers, timeout).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => prepare(self.agent.put(&url), &headers, timeout).send_empty(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

fn prepare<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match timeout {
        Some(timeout) => builder.config().timeout_global(Some(timeout)).build(),
        None => builder,
    }
}

impl Transport for UreqTransport {
    fn execute(&self, ctx: &CallContext, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let (timeout, deadline_bound) = self.effective_timeout(ctx);
        let map_err = |err: ureq::Error| match err {
            ureq::Error::Timeout(_) if deadline_bound || ctx.deadline_elapsed() => {
                ApiError::Cancelled(CancelReason::DeadlineExceeded)
            }
            other => ApiError::Transport(other.to_string()),
        };

        let mut response = self.send(request, timeout).map_err(map_err)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string().map_err(map_err)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
