use serde::Serialize;
use tracing::info;

use super::contents::PropertiesBody;
use super::{check_status, decode, parse_lookup, parse_ok, segment, TapestryClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::lookup::Lookup;
use crate::query::{CommentsQuery, RepliesQuery};
use crate::transport::{CallContext, Transport};
use crate::types::{Comment, CommentDetails, CommentsPage, CreateComment, Execution, Property};

#[derive(Serialize)]
struct CreateCommentBody<'a> {
    #[serde(flatten)]
    params: &'a CreateComment,
    execution: Execution,
}

impl<T> TapestryClient<T> {
    pub fn build_create_comment(&self, params: &CreateComment) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, "/comments")
            .json(&CreateCommentBody {
                params,
                execution: self.execution(),
            })
    }

    pub fn parse_create_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        parse_ok(response)
    }

    pub fn build_get_comment(&self, id: &str, requesting_profile_id: Option<&str>) -> HttpRequest {
        let mut query = self.query();
        query.push_opt("requestingProfileId", requesting_profile_id.as_ref());
        let path = format!("/comments/{}", segment(id));
        HttpRequest::new(HttpMethod::Get, self.url(&path, &query.encode()))
    }

    pub fn parse_get_comment(&self, response: HttpResponse) -> Result<Lookup<CommentDetails>, ApiError> {
        parse_lookup(response, &[404], "comment")
    }

    pub fn build_update_comment(&self, id: &str, properties: &[Property]) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Put, &format!("/comments/{}", segment(id)))
            .json(&PropertiesBody {
                properties,
                execution: self.execution(),
            })
    }

    pub fn parse_update_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        parse_ok(response)
    }

    pub fn build_delete_comment(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/comments/{}", segment(id)))
    }

    pub fn parse_delete_comment(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    pub fn build_list_comments(&self, query: &CommentsQuery) -> HttpRequest {
        let url = self.url("/comments", &query.encode(&self.config.api_key));
        HttpRequest::new(HttpMethod::Get, url)
    }

    /// A 404 here means nothing matched the filters: an empty page.
    pub fn parse_list_comments(&self, response: HttpResponse) -> Result<CommentsPage, ApiError> {
        if response.status == 404 {
            info!("no comments matched; returning an empty page");
            return Ok(CommentsPage::default());
        }
        check_status(&response, &[200])?;
        decode(&response)
    }

    pub fn build_list_comment_replies(&self, parent_id: &str, query: &RepliesQuery) -> HttpRequest {
        let path = format!("/comments/{}/replies", segment(parent_id));
        HttpRequest::new(HttpMethod::Get, self.url(&path, &query.encode(&self.config.api_key)))
    }

    pub fn parse_list_comment_replies(&self, response: HttpResponse) -> Result<CommentsPage, ApiError> {
        parse_ok(response)
    }
}

impl<T: Transport> TapestryClient<T> {
    /// Create a comment, or a reply when `params.parent_comment_id` is set.
    pub fn create_comment(&self, ctx: &CallContext, params: &CreateComment) -> Result<Comment, ApiError> {
        let response = self.send(ctx, self.build_create_comment(params)?)?;
        self.parse_create_comment(response)
    }

    pub fn get_comment(
        &self,
        ctx: &CallContext,
        id: &str,
        requesting_profile_id: Option<&str>,
    ) -> Result<Lookup<CommentDetails>, ApiError> {
        let response = self.send(ctx, self.build_get_comment(id, requesting_profile_id))?;
        self.parse_get_comment(response)
    }

    pub fn update_comment(&self, ctx: &CallContext, id: &str, properties: &[Property]) -> Result<Comment, ApiError> {
        let response = self.send(ctx, self.build_update_comment(id, properties)?)?;
        self.parse_update_comment(response)
    }

    pub fn delete_comment(&self, ctx: &CallContext, id: &str) -> Result<(), ApiError> {
        let response = self.send(ctx, self.build_delete_comment(id))?;
        self.parse_delete_comment(response)
    }

    pub fn list_comments(&self, ctx: &CallContext, query: &CommentsQuery) -> Result<CommentsPage, ApiError> {
        let response = self.send(ctx, self.build_list_comments(query))?;
        self.parse_list_comments(response)
    }

    /// Direct replies to `parent_id` only, not the rest of the thread.
    pub fn list_comment_replies(
        &self,
        ctx: &CallContext,
        parent_id: &str,
        query: &RepliesQuery,
    ) -> Result<CommentsPage, ApiError> {
        let response = self.send(ctx, self.build_list_comment_replies(parent_id, query))?;
        self.parse_list_comment_replies(response)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn build_create_comment_top_level() {
        let params = CreateComment::new("post-1", "alice", "first!");
        let req = client().build_create_comment(&params).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/comments?apiKey=test-key"));
        let body = body_json(&req);
        assert_eq!(body["contentId"], "post-1");
        assert_eq!(body["profileId"], "alice");
        assert_eq!(body["text"], "first!");
        assert_eq!(body["properties"], serde_json::json!([]));
        assert_eq!(body["execution"], "CONFIRMED_AND_PARSED");
        assert!(body.get("commentId").is_none());
    }

    #[test]
    fn build_create_comment_reply_sends_parent() {
        let params = CreateComment::new("post-1", "alice", "re")
            .reply_to("c-1")
            .property("test", "reply");
        let body = body_json(&client().build_create_comment(&params).unwrap());
        assert_eq!(body["commentId"], "c-1");
        assert_eq!(body["properties"][0]["value"], "reply");
    }

    #[test]
    fn parse_create_comment_error_keeps_body() {
        let err = client()
            .parse_create_comment(HttpResponse::new(400, r#"{"error":"text required"}"#))
            .unwrap_err();
        assert!(err.to_string().contains("text required"));
    }

    #[test]
    fn build_get_comment_with_and_without_requester() {
        let c = client();
        assert_eq!(
            c.build_get_comment("c-1", None).url,
            format!("{BASE_URL}/comments/c-1?apiKey=test-key")
        );
        assert_eq!(
            c.build_get_comment("c-1", Some("alice")).url,
            format!("{BASE_URL}/comments/c-1?apiKey=test-key&requestingProfileId=alice")
        );
    }

    #[test]
    fn parse_get_comment_found() {
        let body = r#"{"comment":{"namespace":"app","created_at":1234567890,"text":"hello","id":"c-1"},
            "author":{"id":"alice","username":"alice"},
            "socialCounts":{"likeCount":1},
            "requestingProfileSocialInfo":{"hasLiked":true}}"#;
        let details = client()
            .parse_get_comment(HttpResponse::new(200, body))
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(details.comment.id, "c-1");
        assert_eq!(details.comment.created_at.value(), 1_234_567_890);
        assert_eq!(details.author.username, "alice");
        assert_eq!(details.social_counts.like_count, 1);
        assert!(details.requesting_profile_social_info.has_liked);
    }

    #[test]
    fn parse_get_comment_not_found() {
        let lookup = client().parse_get_comment(HttpResponse::new(404, "")).unwrap();
        assert!(lookup.is_not_found());
    }

    #[test]
    fn parse_get_comment_zero_value_record_is_not_found() {
        for body in [r#"{"comment":{"id":""}}"#, r#"{"comment":{}}"#, "{}"] {
            let lookup = client().parse_get_comment(HttpResponse::new(200, body)).unwrap();
            assert!(lookup.is_not_found(), "{body}");
        }
    }

    #[test]
    fn parse_comment_with_split_timestamp() {
        let body = r#"{"namespace":"test","created_at":{"low":-188638304,"high":402},"text":"hello","id":"456"}"#;
        let comment = client().parse_update_comment(HttpResponse::new(200, body)).unwrap();
        assert_eq!(comment.created_at.value(), 1_730_683_181_984);
    }

    #[test]
    fn build_list_comments_fixed_order() {
        let query = CommentsQuery::for_content("post-1")
            .requesting_profile_id("alice")
            .pagination(1, 10);
        assert_eq!(
            client().build_list_comments(&query).url,
            format!("{BASE_URL}/comments?apiKey=test-key&contentId=post-1&requestingProfileId=alice&page=1&pageSize=10")
        );
    }

    #[test]
    fn parse_list_comments_not_found_is_empty() {
        let page = client().parse_list_comments(HttpResponse::new(404, "")).unwrap();
        assert!(page.comments.is_empty());
    }

    #[test]
    fn build_list_replies_targets_parent() {
        let query = RepliesQuery::default().pagination(1, 10);
        assert_eq!(
            client().build_list_comment_replies("c-1", &query).url,
            format!("{BASE_URL}/comments/c-1/replies?apiKey=test-key&page=1&pageSize=10")
        );
    }

    #[test]
    fn build_delete_comment_has_no_body() {
        let req = client().build_delete_comment("c-1");
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }
}
