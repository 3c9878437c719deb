//! HTTP request and response values for the build/parse split.
//!
//! # Design
//! Requests and responses are plain owned data. `TapestryClient::build_*`
//! produces an `HttpRequest`, a [`Transport`](crate::Transport) (or any host
//! code) performs the round trip, and `TapestryClient::parse_*` consumes the
//! `HttpResponse`. Nothing in this module touches the network.

use serde::Serialize;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the query string, API key included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub(crate) fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach `payload` as a JSON body.
    pub(crate) fn json<T: Serialize>(mut self, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        Ok(self)
    }

    /// The URL without its query string, safe to log.
    pub fn redacted_url(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
