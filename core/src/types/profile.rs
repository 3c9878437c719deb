use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timestamp::UnixTimestamp;

/// A profile as returned by find-or-create and read-by-id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub namespace: String,
    pub id: String,
    #[serde(default)]
    pub blockchain: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: Profile,
    #[serde(default)]
    pub wallet_address: String,
}

/// Natural key and creation attributes for `POST /profiles/findOrCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOrCreateProfile {
    pub wallet_address: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Requested profile id; the service assigns one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FindOrCreateProfile {
    pub fn new(wallet_address: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            username: username.into(),
            bio: None,
            image: None,
            id: None,
        }
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Replacement attributes for `PUT /profiles/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A profile as it appears inside follower and suggestion lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: UnixTimestamp,
}

/// Followers, following, and following-who-follow results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileList {
    #[serde(default)]
    pub profiles: Vec<ProfileDetails>,
}

impl ProfileList {
    pub fn ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNamespace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable_name: Option<String>,
    #[serde(rename = "faviconURL", default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedProfile {
    #[serde(default)]
    pub namespaces: Vec<ProfileNamespace>,
    pub profile: ProfileDetails,
    pub wallet: Wallet,
}

/// Suggestions keyed the way the service keys them.
pub type SuggestedProfiles = BTreeMap<String, SuggestedProfile>;
