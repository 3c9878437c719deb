use serde::Serialize;

use super::{parse_lookup, parse_ok, segment, TapestryClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::lookup::Lookup;
use crate::transport::{CallContext, Transport};
use crate::types::{
    Execution, FindOrCreateProfile, Profile, ProfileList, ProfileResponse, SuggestedProfiles,
    UpdateProfile,
};

#[derive(Serialize)]
struct FindOrCreateProfileBody<'a> {
    #[serde(flatten)]
    params: &'a FindOrCreateProfile,
    execution: Execution,
    blockchain: &'a str,
}

#[derive(Serialize)]
struct UpdateProfileBody<'a> {
    #[serde(flatten)]
    params: &'a UpdateProfile,
    execution: Execution,
}

impl<T> TapestryClient<T> {
    pub fn build_find_or_create_profile(&self, params: &FindOrCreateProfile) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, "/profiles/findOrCreate")
            .json(&FindOrCreateProfileBody {
                params,
                execution: self.execution(),
                blockchain: &self.config.blockchain,
            })
    }

    pub fn parse_find_or_create_profile(&self, response: HttpResponse) -> Result<ProfileResponse, ApiError> {
        parse_ok(response)
    }

    pub fn build_get_profile(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/profiles/{}", segment(id)))
    }

    pub fn parse_get_profile(&self, response: HttpResponse) -> Result<Lookup<ProfileResponse>, ApiError> {
        parse_lookup(response, &[404], "profile")
    }

    pub fn build_update_profile(&self, id: &str, params: &UpdateProfile) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Put, &format!("/profiles/{}", segment(id)))
            .json(&UpdateProfileBody {
                params,
                execution: self.execution(),
            })
    }

    pub fn parse_update_profile(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        parse_ok(response)
    }

    pub fn build_get_followers(&self, profile_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/profiles/{}/followers", segment(profile_id)))
    }

    pub fn build_get_following(&self, profile_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/profiles/{}/following", segment(profile_id)))
    }

    /// Profiles that `requestor_id` follows and that also follow `profile_id`.
    pub fn build_get_following_who_follow(&self, profile_id: &str, requestor_id: &str) -> HttpRequest {
        let mut query = self.query();
        query.push("requestorId", requestor_id);
        let path = format!("/profiles/{}/following-who-follow", segment(profile_id));
        HttpRequest::new(HttpMethod::Get, self.url(&path, &query.encode()))
    }

    /// Shared by followers, following and following-who-follow.
    pub fn parse_profile_list(&self, response: HttpResponse) -> Result<ProfileList, ApiError> {
        parse_ok(response)
    }

    pub fn build_get_suggested_profiles(&self, wallet_address: &str, own_app_only: bool) -> HttpRequest {
        let mut query = self.query();
        query.push("ownAppOnly", own_app_only);
        let path = format!("/profiles/suggested/{}", segment(wallet_address));
        HttpRequest::new(HttpMethod::Get, self.url(&path, &query.encode()))
    }

    pub fn parse_suggested_profiles(&self, response: HttpResponse) -> Result<SuggestedProfiles, ApiError> {
        parse_ok(response)
    }
}

impl<T: Transport> TapestryClient<T> {
    /// Return the profile owned by `params.wallet_address`, creating it on
    /// first use. Repeating the call returns the same profile.
    pub fn find_or_create_profile(
        &self,
        ctx: &CallContext,
        params: &FindOrCreateProfile,
    ) -> Result<ProfileResponse, ApiError> {
        let response = self.send(ctx, self.build_find_or_create_profile(params)?)?;
        self.parse_find_or_create_profile(response)
    }

    pub fn get_profile(&self, ctx: &CallContext, id: &str) -> Result<Lookup<ProfileResponse>, ApiError> {
        let response = self.send(ctx, self.build_get_profile(id))?;
        self.parse_get_profile(response)
    }

    pub fn update_profile(&self, ctx: &CallContext, id: &str, params: &UpdateProfile) -> Result<Profile, ApiError> {
        let response = self.send(ctx, self.build_update_profile(id, params)?)?;
        self.parse_update_profile(response)
    }

    pub fn get_followers(&self, ctx: &CallContext, profile_id: &str) -> Result<ProfileList, ApiError> {
        let response = self.send(ctx, self.build_get_followers(profile_id))?;
        self.parse_profile_list(response)
    }

    pub fn get_following(&self, ctx: &CallContext, profile_id: &str) -> Result<ProfileList, ApiError> {
        let response = self.send(ctx, self.build_get_following(profile_id))?;
        self.parse_profile_list(response)
    }

    pub fn get_following_who_follow(
        &self,
        ctx: &CallContext,
        profile_id: &str,
        requestor_id: &str,
    ) -> Result<ProfileList, ApiError> {
        let response = self.send(ctx, self.build_get_following_who_follow(profile_id, requestor_id))?;
        self.parse_profile_list(response)
    }

    pub fn get_suggested_profiles(
        &self,
        ctx: &CallContext,
        wallet_address: &str,
        own_app_only: bool,
    ) -> Result<SuggestedProfiles, ApiError> {
        let response = self.send(ctx, self.build_get_suggested_profiles(wallet_address, own_app_only))?;
        self.parse_suggested_profiles(response)
    }
}
