//! JSON shapes spoken by the mock service.

use serde::{Deserialize, Serialize};

/// A timestamp in one of the two shapes the real service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Stamp {
    Plain(i64),
    /// Upper and lower 32-bit words, both signed.
    Split { low: i32, high: i32, unsigned: bool },
}

impl Stamp {
    pub fn split(millis: i64) -> Self {
        Stamp::Split {
            low: millis as i32,
            high: (millis >> 32) as i32,
            unsigned: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Execution {
    FastUnconfirmed,
    QuickSignature,
    ConfirmedAndParsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

// --- request bodies ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOrCreateProfile {
    pub wallet_address: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub id: Option<String>,
    pub execution: Option<Execution>,
    pub blockchain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub execution: Option<Execution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOrCreateContent {
    pub profile_id: String,
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    pub execution: Option<Execution>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProperties {
    #[serde(default)]
    pub properties: Vec<Property>,
    pub execution: Option<Execution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub content_id: String,
    pub profile_id: String,
    pub text: String,
    /// Parent comment, making this a reply.
    pub comment_id: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    pub execution: Option<Execution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeEdge {
    pub start_id: String,
    pub execution: Option<Execution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    pub start_id: String,
    pub end_id: String,
    pub execution: Option<Execution>,
}

// --- query strings ---

#[derive(Debug, Default, Deserialize)]
pub struct KeyParam {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsParams {
    pub order_by_field: Option<String>,
    pub order_by_direction: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub profile_id: Option<String>,
    pub requesting_profile_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsParams {
    pub content_id: Option<String>,
    pub comment_id: Option<String>,
    pub profile_id: Option<String>,
    pub requesting_profile_id: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepliesParams {
    pub requesting_profile_id: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterParam {
    pub requesting_profile_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestorParam {
    pub requestor_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedParams {
    #[serde(default)]
    pub own_app_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct LikeParams {
    pub username: Option<String>,
}

// --- response bodies ---

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub namespace: &'static str,
    pub id: String,
    pub blockchain: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEnvelope {
    pub profile: Profile,
    pub wallet_address: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileDetails {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: Stamp,
}

#[derive(Debug, Serialize)]
pub struct ProfileList {
    pub profiles: Vec<ProfileDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub name: &'static str,
    pub readable_name: &'static str,
    #[serde(rename = "faviconURL")]
    pub favicon_url: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Wallet {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub namespaces: Vec<Namespace>,
    pub profile: ProfileDetails,
    pub wallet: Wallet,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub namespace: &'static str,
    pub id: String,
    pub description: String,
    pub title: String,
    pub created_at: Stamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialCounts {
    pub like_count: u64,
    pub comment_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialInfo {
    pub has_liked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub content: Content,
    pub social_counts: SocialCounts,
}

#[derive(Debug, Serialize)]
pub struct AuthorProfile {
    pub id: String,
    pub username: String,
    pub bio: String,
    pub image: String,
    pub created_at: Stamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentListItem {
    pub author_profile: AuthorProfile,
    pub content: Content,
    pub social_counts: SocialCounts,
    pub requesting_profile_social_info: SocialInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsPage {
    pub contents: Vec<ContentListItem>,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BatchRead {
    pub successful: Vec<ContentDetails>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Serialize)]
pub struct Comment {
    pub namespace: &'static str,
    pub created_at: Stamp,
    pub text: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct Author {
    pub namespace: &'static str,
    pub id: String,
    pub username: String,
    pub bio: String,
    pub image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: Author,
    pub social_counts: SocialCounts,
    pub requesting_profile_social_info: SocialInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPage {
    pub comments: Vec<CommentDetails>,
    pub page: usize,
    pub page_size: usize,
}
