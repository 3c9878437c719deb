use serde::{Deserialize, Serialize};

use super::{Property, RequestingProfileSocialInfo, SocialCounts};
use crate::timestamp::UnixTimestamp;

/// A content item. Title and description are derived by the service from
/// the `title` and `description` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub namespace: String,
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub title: String,
    pub created_at: UnixTimestamp,
}

/// Content plus its aggregates, from read-by-id and batch-read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub content: Content,
    #[serde(default)]
    pub social_counts: SocialCounts,
}

/// Author snapshot embedded in content list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    pub created_at: UnixTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentListItem {
    pub author_profile: AuthorProfile,
    pub content: Content,
    #[serde(default)]
    pub social_counts: SocialCounts,
    #[serde(default)]
    pub requesting_profile_social_info: RequestingProfileSocialInfo,
}

/// One page of `GET /contents/`, with the page echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentsPage {
    #[serde(default)]
    pub contents: Vec<ContentListItem>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

/// An id the batch read could not resolve, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

/// Per-id partition of a batch read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReadResult {
    #[serde(default)]
    pub successful: Vec<ContentDetails>,
    #[serde(default)]
    pub failed: Vec<BatchFailure>,
}

impl BatchReadResult {
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.id.as_str()).collect()
    }
}

/// Natural key and properties for `POST /contents/findOrCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOrCreateContent {
    pub profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub properties: Vec<Property>,
}

impl FindOrCreateContent {
    pub fn new(profile_id: impl Into<String>, id: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            profile_id: profile_id.into(),
            id: Some(id.into()),
            properties,
        }
    }
}
