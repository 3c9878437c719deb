//! Query-string construction for list endpoints.
//!
//! # Design
//! List endpoints accept a wide cross-product of optional filters. Each query
//! type is a plain struct of `Option` fields: `None` means "do not send".
//! Callers set only what they care about, either through chained setters or
//! by applying a sequence of [`ContentsOption`] values, where a later option
//! touching the same field overwrites an earlier one. Encoding walks the
//! fields in a fixed order, so the output does not depend on the order the
//! caller configured them in. The API key is always the first parameter.

use serde::{Deserialize, Serialize};

/// Ordered `name=value` pairs with the API key first.
#[derive(Debug, Clone)]
pub(crate) struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    pub(crate) fn new(api_key: &str) -> Self {
        Self {
            pairs: vec![("apiKey", api_key.to_string())],
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: impl ToString) -> &mut Self {
        self.pairs.push((name, value.to_string()));
        self
    }

    /// Append `name` only when `value` is set and non-empty.
    pub(crate) fn push_opt<T: ToString>(&mut self, name: &'static str, value: Option<&T>) -> &mut Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.pairs.push((name, value));
            }
        }
        self
    }

    pub(crate) fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Sort direction for ordered list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configuration step for [`ContentsQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentsOption {
    OrderBy { field: String, direction: SortDirection },
    Pagination { page: u32, page_size: u32 },
    ProfileId(String),
    RequestingProfileId(String),
}

impl ContentsOption {
    pub fn order_by(field: impl Into<String>, direction: SortDirection) -> Self {
        ContentsOption::OrderBy {
            field: field.into(),
            direction,
        }
    }

    pub fn pagination(page: u32, page_size: u32) -> Self {
        ContentsOption::Pagination { page, page_size }
    }

    pub fn profile_id(id: impl Into<String>) -> Self {
        ContentsOption::ProfileId(id.into())
    }

    pub fn requesting_profile_id(id: impl Into<String>) -> Self {
        ContentsOption::RequestingProfileId(id.into())
    }
}

/// Filters, ordering and pagination for `GET /contents/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentsQuery {
    pub order_by_field: Option<String>,
    pub order_by_direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub profile_id: Option<String>,
    pub requesting_profile_id: Option<String>,
}

impl ContentsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply options in sequence; later options win.
    pub fn from_options<I: IntoIterator<Item = ContentsOption>>(options: I) -> Self {
        options.into_iter().fold(Self::default(), Self::apply)
    }

    pub fn apply(mut self, option: ContentsOption) -> Self {
        match option {
            ContentsOption::OrderBy { field, direction } => {
                self.order_by_field = Some(field);
                self.order_by_direction = Some(direction);
            }
            ContentsOption::Pagination { page, page_size } => {
                self.page = Some(page);
                self.page_size = Some(page_size);
            }
            ContentsOption::ProfileId(id) => self.profile_id = Some(id),
            ContentsOption::RequestingProfileId(id) => self.requesting_profile_id = Some(id),
        }
        self
    }

    pub fn order_by(self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.apply(ContentsOption::order_by(field, direction))
    }

    pub fn pagination(self, page: u32, page_size: u32) -> Self {
        self.apply(ContentsOption::pagination(page, page_size))
    }

    pub fn profile_id(self, id: impl Into<String>) -> Self {
        self.apply(ContentsOption::profile_id(id))
    }

    pub fn requesting_profile_id(self, id: impl Into<String>) -> Self {
        self.apply(ContentsOption::requesting_profile_id(id))
    }

    pub fn encode(&self, api_key: &str) -> String {
        let mut query = QueryString::new(api_key);
        query
            .push_opt("orderByField", self.order_by_field.as_ref())
            .push_opt("orderByDirection", self.order_by_direction.as_ref())
            .push_opt("page", self.page.filter(|p| *p > 0).as_ref())
            .push_opt("pageSize", self.page_size.filter(|p| *p > 0).as_ref())
            .push_opt("profileId", self.profile_id.as_ref())
            .push_opt("requestingProfileId", self.requesting_profile_id.as_ref());
        query.encode()
    }
}

impl FromIterator<ContentsOption> for ContentsQuery {
    fn from_iter<I: IntoIterator<Item = ContentsOption>>(iter: I) -> Self {
        Self::from_options(iter)
    }
}

/// Filters and pagination for the flat `GET /comments` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentsQuery {
    pub content_id: Option<String>,
    pub comment_id: Option<String>,
    pub profile_id: Option<String>,
    pub requesting_profile_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl CommentsQuery {
    pub fn for_content(content_id: impl Into<String>) -> Self {
        Self {
            content_id: Some(content_id.into()),
            ..Self::default()
        }
    }

    /// Narrow the list to direct replies of `comment_id`.
    pub fn comment_id(mut self, comment_id: impl Into<String>) -> Self {
        self.comment_id = Some(comment_id.into());
        self
    }

    /// Only comments written by `profile_id`.
    pub fn profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.profile_id = Some(profile_id.into());
        self
    }

    pub fn requesting_profile_id(mut self, id: impl Into<String>) -> Self {
        self.requesting_profile_id = Some(id.into());
        self
    }

    pub fn pagination(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn encode(&self, api_key: &str) -> String {
        let mut query = QueryString::new(api_key);
        query
            .push_opt("contentId", self.content_id.as_ref())
            .push_opt("commentId", self.comment_id.as_ref())
            .push_opt("profileId", self.profile_id.as_ref())
            .push_opt("requestingProfileId", self.requesting_profile_id.as_ref())
            .push_opt("page", self.page.filter(|p| *p > 0).as_ref())
            .push_opt("pageSize", self.page_size.filter(|p| *p > 0).as_ref());
        query.encode()
    }
}

/// Pagination for `GET /comments/{id}/replies`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepliesQuery {
    pub requesting_profile_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl RepliesQuery {
    pub fn requesting_profile_id(mut self, id: impl Into<String>) -> Self {
        self.requesting_profile_id = Some(id.into());
        self
    }

    pub fn pagination(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn encode(&self, api_key: &str) -> String {
        let mut query = QueryString::new(api_key);
        query
            .push_opt("requestingProfileId", self.requesting_profile_id.as_ref())
            .push_opt("page", self.page.filter(|p| *p > 0).as_ref())
            .push_opt("pageSize", self.page_size.filter(|p| *p > 0).as_ref());
        query.encode()
    }
}
