use serde::Serialize;

use super::{check_status, parse_lookup, parse_ok, segment, TapestryClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::lookup::Lookup;
use crate::query::ContentsQuery;
use crate::transport::{CallContext, Transport};
use crate::types::{
    BatchReadResult, Content, ContentDetails, ContentsPage, Execution, FindOrCreateContent, Property,
};

#[derive(Serialize)]
struct FindOrCreateContentBody<'a> {
    #[serde(flatten)]
    params: &'a FindOrCreateContent,
    execution: Execution,
}

#[derive(Serialize)]
pub(super) struct PropertiesBody<'a> {
    pub(super) properties: &'a [Property],
    pub(super) execution: Execution,
}

impl<T> TapestryClient<T> {
    pub fn build_find_or_create_content(&self, params: &FindOrCreateContent) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, "/contents/findOrCreate")
            .json(&FindOrCreateContentBody {
                params,
                execution: self.execution(),
            })
    }

    pub fn parse_find_or_create_content(&self, response: HttpResponse) -> Result<Content, ApiError> {
        parse_ok(response)
    }

    pub fn build_get_content(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/contents/{}", segment(id)))
    }

    /// 404 and 401 both mean "not found": the service answers 401 for
    /// content the key cannot see, without saying whether it exists.
    pub fn parse_get_content(&self, response: HttpResponse) -> Result<Lookup<ContentDetails>, ApiError> {
        parse_lookup(response, &[404, 401], "content")
    }

    /// Replaces the whole property list; properties not sent are dropped.
    pub fn build_update_content(&self, id: &str, properties: &[Property]) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Put, &format!("/contents/{}", segment(id)))
            .json(&PropertiesBody {
                properties,
                execution: self.execution(),
            })
    }

    pub fn parse_update_content(&self, response: HttpResponse) -> Result<Content, ApiError> {
        parse_ok(response)
    }

    pub fn build_delete_content(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/contents/{}", segment(id)))
    }

    pub fn parse_delete_content(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    pub fn build_list_contents(&self, query: &ContentsQuery) -> HttpRequest {
        let url = self.url("/contents/", &query.encode(&self.config.api_key));
        HttpRequest::new(HttpMethod::Get, url)
    }

    pub fn parse_list_contents(&self, response: HttpResponse) -> Result<ContentsPage, ApiError> {
        parse_ok(response)
    }

    pub fn build_batch_read_contents<S: AsRef<str>>(&self, ids: &[S]) -> Result<HttpRequest, ApiError> {
        let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
        self.request(HttpMethod::Post, "/contents/batch/read").json(&ids)
    }

    pub fn parse_batch_read_contents(&self, response: HttpResponse) -> Result<BatchReadResult, ApiError> {
        parse_ok(response)
    }
}

impl<T: Transport> TapestryClient<T> {
    /// Return the content with the caller-chosen id, creating it on first use.
    pub fn find_or_create_content(
        &self,
        ctx: &CallContext,
        params: &FindOrCreateContent,
    ) -> Result<Content, ApiError> {
        let response = self.send(ctx, self.build_find_or_create_content(params)?)?;
        self.parse_find_or_create_content(response)
    }

    pub fn get_content(&self, ctx: &CallContext, id: &str) -> Result<Lookup<ContentDetails>, ApiError> {
        let response = self.send(ctx, self.build_get_content(id))?;
        self.parse_get_content(response)
    }

    pub fn update_content(&self, ctx: &CallContext, id: &str, properties: &[Property]) -> Result<Content, ApiError> {
        let response = self.send(ctx, self.build_update_content(id, properties)?)?;
        self.parse_update_content(response)
    }

    pub fn delete_content(&self, ctx: &CallContext, id: &str) -> Result<(), ApiError> {
        let response = self.send(ctx, self.build_delete_content(id))?;
        self.parse_delete_content(response)
    }

    pub fn list_contents(&self, ctx: &CallContext, query: &ContentsQuery) -> Result<ContentsPage, ApiError> {
        let response = self.send(ctx, self.build_list_contents(query))?;
        self.parse_list_contents(response)
    }

    /// Read many ids at once. Missing ids land in `failed` instead of
    /// failing the call.
    pub fn batch_read_contents<S: AsRef<str>>(
        &self,
        ctx: &CallContext,
        ids: &[S],
    ) -> Result<BatchReadResult, ApiError> {
        let response = self.send(ctx, self.build_batch_read_contents(ids)?)?;
        self.parse_batch_read_contents(response)
    }
}
