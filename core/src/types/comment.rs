use serde::{Deserialize, Serialize};

use super::{Property, RequestingProfileSocialInfo, SocialCounts};
use crate::timestamp::UnixTimestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub namespace: String,
    pub created_at: UnixTimestamp,
    #[serde(default)]
    pub text: String,
    pub id: String,
}

/// Author snapshot embedded in comment details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub namespace: String,
    pub id: String,
    pub username: String,
    pub bio: String,
    pub image: String,
}

/// A comment with its author, likes and the requester's relation to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetails {
    pub comment: Comment,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub social_counts: SocialCounts,
    #[serde(default)]
    pub requesting_profile_social_info: RequestingProfileSocialInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPage {
    #[serde(default)]
    pub comments: Vec<CommentDetails>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl CommentsPage {
    pub fn ids(&self) -> Vec<&str> {
        self.comments.iter().map(|c| c.comment.id.as_str()).collect()
    }
}

/// Input for `POST /comments`. A `parent_comment_id` makes it a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub content_id: String,
    pub profile_id: String,
    pub text: String,
    #[serde(rename = "commentId", skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl CreateComment {
    pub fn new(
        content_id: impl Into<String>,
        profile_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            profile_id: profile_id.into(),
            text: text.into(),
            parent_comment_id: None,
            properties: Vec::new(),
        }
    }

    pub fn reply_to(mut self, parent_comment_id: impl Into<String>) -> Self {
        self.parent_comment_id = Some(parent_comment_id.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::new(key, value));
        self
    }
}
