use serde::Serialize;

use super::{check_status, TapestryClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{CallContext, Transport};
use crate::types::Execution;

/// A directed follow edge, start follows end.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FollowBody<'a> {
    start_id: &'a str,
    end_id: &'a str,
    execution: Execution,
}

impl<T> TapestryClient<T> {
    fn follow_request(&self, path: &str, start_id: &str, end_id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, path).json(&FollowBody {
            start_id,
            end_id,
            execution: self.execution(),
        })
    }

    pub fn build_follow(&self, start_id: &str, end_id: &str) -> Result<HttpRequest, ApiError> {
        self.follow_request("/followers/add", start_id, end_id)
    }

    pub fn build_unfollow(&self, start_id: &str, end_id: &str) -> Result<HttpRequest, ApiError> {
        self.follow_request("/followers/remove", start_id, end_id)
    }

    /// Shared by follow and unfollow.
    pub fn parse_follow_edge(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200])
    }
}

impl<T: Transport> TapestryClient<T> {
    /// Make `start_id` follow `end_id`.
    pub fn follow(&self, ctx: &CallContext, start_id: &str, end_id: &str) -> Result<(), ApiError> {
        let response = self.send(ctx, self.build_follow(start_id, end_id)?)?;
        self.parse_follow_edge(response)
    }

    pub fn unfollow(&self, ctx: &CallContext, start_id: &str, end_id: &str) -> Result<(), ApiError> {
        let response = self.send(ctx, self.build_unfollow(start_id, end_id)?)?;
        self.parse_follow_edge(response)
    }
}
