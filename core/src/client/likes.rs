use serde::Serialize;

use super::{check_status, segment, TapestryClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{CallContext, Transport};
use crate::types::{Execution, Profile};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeBody<'a> {
    start_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution: Option<Execution>,
}

impl<T> TapestryClient<T> {
    fn like_request(&self, method: HttpMethod, target_id: &str, liker: &Profile) -> HttpRequest {
        let mut query = self.query();
        query.push("username", &liker.username);
        let path = format!("/likes/{}", segment(target_id));
        HttpRequest::new(method, self.url(&path, &query.encode()))
    }

    /// `target_id` may name content or a comment.
    pub fn build_like(&self, target_id: &str, liker: &Profile) -> Result<HttpRequest, ApiError> {
        self.like_request(HttpMethod::Post, target_id, liker).json(&LikeBody {
            start_id: &liker.id,
            execution: Some(self.execution()),
        })
    }

    pub fn parse_like(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200])
    }

    pub fn build_unlike(&self, target_id: &str, liker: &Profile) -> Result<HttpRequest, ApiError> {
        self.like_request(HttpMethod::Delete, target_id, liker).json(&LikeBody {
            start_id: &liker.id,
            execution: None,
        })
    }

    pub fn parse_unlike(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200])
    }
}

impl<T: Transport> TapestryClient<T> {
    /// Add the liker → target edge. The effect shows up only through the
    /// target's `like_count`.
    pub fn like(&self, ctx: &CallContext, target_id: &str, liker: &Profile) -> Result<(), ApiError> {
        let response = self.send(ctx, self.build_like(target_id, liker)?)?;
        self.parse_like(response)
    }

    pub fn unlike(&self, ctx: &CallContext, target_id: &str, liker: &Profile) -> Result<(), ApiError> {
        let response = self.send(ctx, self.build_unlike(target_id, liker)?)?;
        self.parse_unlike(response)
    }
}
