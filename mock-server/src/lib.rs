//! In-memory stand-in for the Tapestry social-graph service.
//!
//! Implements enough of the remote API to drive the client end to end:
//! idempotent find-or-create, social counts, comment threads, follow edges
//! and batch reads. Every request must carry the configured `apiKey` query
//! parameter. Timestamps alternate between the plain and the split
//! `{low, high}` shapes from one rendered value to the next.

pub mod wire;

mod store;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use store::{CommentRecord, ContentRecord, ProfileRecord, Store};
use wire::*;

pub const NAMESPACE: &str = "mock";
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub struct AppState {
    api_key: String,
    store: RwLock<Store>,
    rendered: AtomicU64,
}

type Shared = Arc<AppState>;

impl AppState {
    fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            store: RwLock::new(Store::default()),
            rendered: AtomicU64::new(0),
        }
    }

    fn stamp(&self, millis: i64) -> Stamp {
        if self.rendered.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
            Stamp::Plain(millis)
        } else {
            Stamp::split(millis)
        }
    }

    fn envelope(&self, p: &ProfileRecord) -> ProfileEnvelope {
        ProfileEnvelope {
            profile: profile(p),
            wallet_address: p.wallet_address.clone(),
        }
    }

    fn profile_details(&self, p: &ProfileRecord) -> ProfileDetails {
        ProfileDetails {
            id: p.id.clone(),
            username: p.username.clone(),
            bio: p.bio.clone(),
            image: p.image.clone(),
            created_at: self.stamp(p.created_at),
        }
    }

    fn content(&self, c: &ContentRecord) -> Content {
        Content {
            namespace: NAMESPACE,
            id: c.id.clone(),
            description: c.property("description"),
            title: c.property("title"),
            created_at: self.stamp(c.created_at),
        }
    }

    fn content_details(&self, store: &Store, c: &ContentRecord) -> ContentDetails {
        ContentDetails {
            content: self.content(c),
            social_counts: SocialCounts {
                like_count: store.like_count(&c.id),
                comment_count: store.comment_count(&c.id),
            },
        }
    }

    fn content_list_item(
        &self,
        store: &Store,
        c: &ContentRecord,
        author: &ProfileRecord,
        requester: Option<&str>,
    ) -> ContentListItem {
        let details = self.content_details(store, c);
        ContentListItem {
            author_profile: AuthorProfile {
                id: author.id.clone(),
                username: author.username.clone(),
                bio: author.bio.clone().unwrap_or_default(),
                image: author.image.clone().unwrap_or_default(),
                created_at: self.stamp(author.created_at),
            },
            content: details.content,
            social_counts: details.social_counts,
            requesting_profile_social_info: SocialInfo {
                has_liked: store.has_liked(&c.id, requester),
            },
        }
    }

    fn comment(&self, c: &CommentRecord) -> Comment {
        Comment {
            namespace: NAMESPACE,
            created_at: self.stamp(c.created_at),
            text: c.text.clone(),
            id: c.id.clone(),
        }
    }

    fn comment_details(&self, store: &Store, c: &CommentRecord, requester: Option<&str>) -> CommentDetails {
        let author = store.profiles.get(&c.profile_id);
        CommentDetails {
            comment: self.comment(c),
            author: Author {
                namespace: NAMESPACE,
                id: c.profile_id.clone(),
                username: author.map(|a| a.username.clone()).unwrap_or_default(),
                bio: author.and_then(|a| a.bio.clone()).unwrap_or_default(),
                image: author.and_then(|a| a.image.clone()).unwrap_or_default(),
            },
            social_counts: SocialCounts {
                like_count: store.like_count(&c.id),
                comment_count: store.reply_count(&c.id),
            },
            requesting_profile_social_info: SocialInfo {
                has_liked: store.has_liked(&c.id, requester),
            },
        }
    }

    fn comments_page<'a, I>(
        &self,
        store: &Store,
        matching: I,
        requester: Option<&str>,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> CommentsPage
    where
        I: Iterator<Item = &'a CommentRecord>,
    {
        let mut matching: Vec<&CommentRecord> = matching.collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let (matching, page, page_size) = paginate(matching, page, page_size);
        CommentsPage {
            comments: matching
                .into_iter()
                .map(|c| self.comment_details(store, c, requester))
                .collect(),
            page,
            page_size,
        }
    }
}

fn profile(p: &ProfileRecord) -> Profile {
    Profile {
        namespace: NAMESPACE,
        id: p.id.clone(),
        blockchain: p.blockchain.clone(),
        username: p.username.clone(),
    }
}

/// 1-based page of `items`; zero or absent values fall back to defaults.
fn paginate<T>(items: Vec<T>, page: Option<usize>, page_size: Option<usize>) -> (Vec<T>, usize, usize) {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let page_size = page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();
    (items, page, page_size)
}

/// An error response: status plus `{"error": message}`.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{what} not found"),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

type Reply<T> = Result<Json<T>, Failure>;

pub fn app(api_key: &str) -> Router {
    let state: Shared = Arc::new(AppState::new(api_key));
    Router::new()
        .route("/profiles/findOrCreate", post(find_or_create_profile))
        .route("/profiles/suggested/{address}", get(suggested_profiles))
        .route("/profiles/{id}", get(get_profile).put(update_profile))
        .route("/profiles/{id}/followers", get(followers))
        .route("/profiles/{id}/following", get(following))
        .route("/profiles/{id}/following-who-follow", get(following_who_follow))
        .route("/contents", get(list_contents))
        .route("/contents/", get(list_contents))
        .route("/contents/findOrCreate", post(find_or_create_content))
        .route("/contents/batch/read", post(batch_read_contents))
        .route(
            "/contents/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
        .route("/comments", get(list_comments).post(create_comment))
        .route(
            "/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route("/comments/{id}/replies", get(list_replies))
        .route("/likes/{id}", post(like).delete(unlike))
        .route("/followers/add", post(follow))
        .route("/followers/remove", post(unfollow))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn require_api_key(
    State(state): State<Shared>,
    Query(key): Query<KeyParam>,
    request: Request,
    next: Next,
) -> Response {
    if key.api_key.as_deref() != Some(state.api_key.as_str()) {
        warn!(path = %request.uri().path(), "rejected request with a bad api key");
        let failure = Failure {
            status: StatusCode::UNAUTHORIZED,
            message: "invalid api key".into(),
        };
        return failure.into_response();
    }
    next.run(request).await
}

// --- profiles ---

async fn find_or_create_profile(
    State(state): State<Shared>,
    Json(input): Json<FindOrCreateProfile>,
) -> Reply<ProfileEnvelope> {
    if input.username.is_empty() {
        return Err(Failure::bad_request("username is required"));
    }
    let mut store = state.store.write().await;
    let id = input.id.unwrap_or_else(|| input.username.clone());
    if let Some(existing) = store.profiles.get(&id) {
        debug!(%id, "profile already exists");
        return Ok(Json(state.envelope(existing)));
    }

    let record = ProfileRecord {
        id: id.clone(),
        username: input.username,
        wallet_address: input.wallet_address,
        blockchain: input.blockchain.unwrap_or_else(|| "SOLANA".into()),
        bio: input.bio,
        image: input.image,
        created_at: store.tick(),
    };
    info!(%id, execution = ?input.execution, "created profile");
    let envelope = state.envelope(&record);
    store.profiles.insert(id, record);
    Ok(Json(envelope))
}

async fn get_profile(State(state): State<Shared>, Path(id): Path<String>) -> Reply<ProfileEnvelope> {
    let store = state.store.read().await;
    store
        .profiles
        .get(&id)
        .map(|p| Json(state.envelope(p)))
        .ok_or_else(|| Failure::not_found("Profile"))
}

async fn update_profile(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProfile>,
) -> Reply<Profile> {
    if input.username.is_empty() {
        return Err(Failure::bad_request("username is required"));
    }
    let mut store = state.store.write().await;
    let record = store
        .profiles
        .get_mut(&id)
        .ok_or_else(|| Failure::not_found("Profile"))?;
    record.username = input.username;
    if input.bio.is_some() {
        record.bio = input.bio;
    }
    if input.image.is_some() {
        record.image = input.image;
    }
    debug!(%id, execution = ?input.execution, "updated profile");
    Ok(Json(profile(record)))
}

async fn followers(State(state): State<Shared>, Path(id): Path<String>) -> Reply<ProfileList> {
    let store = state.store.read().await;
    if !store.profiles.contains_key(&id) {
        return Err(Failure::not_found("Profile"));
    }
    let profiles = store
        .followers(&id)
        .into_iter()
        .map(|p| state.profile_details(p))
        .collect();
    Ok(Json(ProfileList { profiles }))
}

async fn following(State(state): State<Shared>, Path(id): Path<String>) -> Reply<ProfileList> {
    let store = state.store.read().await;
    if !store.profiles.contains_key(&id) {
        return Err(Failure::not_found("Profile"));
    }
    let profiles = store
        .following(&id)
        .into_iter()
        .map(|p| state.profile_details(p))
        .collect();
    Ok(Json(ProfileList { profiles }))
}

/// Profiles the requestor follows that also follow `id`.
async fn following_who_follow(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(params): Query<RequestorParam>,
) -> Reply<ProfileList> {
    let store = state.store.read().await;
    if !store.profiles.contains_key(&id) {
        return Err(Failure::not_found("Profile"));
    }
    let followers: BTreeSet<&str> = store.followers(&id).iter().map(|p| p.id.as_str()).collect();
    let profiles = store
        .following(&params.requestor_id)
        .into_iter()
        .filter(|p| followers.contains(p.id.as_str()))
        .map(|p| state.profile_details(p))
        .collect();
    Ok(Json(ProfileList { profiles }))
}

/// Every profile the wallet's profiles do not already follow.
async fn suggested_profiles(
    State(state): State<Shared>,
    Path(address): Path<String>,
    Query(params): Query<SuggestedParams>,
) -> Json<BTreeMap<String, Suggestion>> {
    let store = state.store.read().await;
    let owned: BTreeSet<&str> = store
        .profiles
        .values()
        .filter(|p| p.wallet_address == address)
        .map(|p| p.id.as_str())
        .collect();
    debug!(%address, own_app_only = params.own_app_only, owned = owned.len(), "suggesting profiles");
    if owned.is_empty() {
        return Json(BTreeMap::new());
    }

    let followed: BTreeSet<&str> = store
        .follows
        .iter()
        .filter(|(start, _)| owned.contains(start.as_str()))
        .map(|(_, end)| end.as_str())
        .collect();
    let suggestions = store
        .profiles
        .values()
        .filter(|p| !owned.contains(p.id.as_str()) && !followed.contains(p.id.as_str()))
        .map(|p| {
            let suggestion = Suggestion {
                namespaces: vec![Namespace {
                    name: NAMESPACE,
                    readable_name: "Mock",
                    favicon_url: "https://mock.invalid/favicon.ico",
                }],
                profile: state.profile_details(p),
                wallet: Wallet {
                    address: p.wallet_address.clone(),
                },
            };
            (p.id.clone(), suggestion)
        })
        .collect();
    Json(suggestions)
}

// --- contents ---

async fn find_or_create_content(
    State(state): State<Shared>,
    Json(input): Json<FindOrCreateContent>,
) -> Reply<Content> {
    let mut store = state.store.write().await;
    if !store.profiles.contains_key(&input.profile_id) {
        return Err(Failure::not_found("Profile"));
    }
    let id = input.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    if let Some(existing) = store.contents.get(&id) {
        debug!(%id, "content already exists");
        return Ok(Json(state.content(existing)));
    }

    let record = ContentRecord {
        id: id.clone(),
        profile_id: input.profile_id,
        properties: input.properties,
        created_at: store.tick(),
    };
    info!(%id, execution = ?input.execution, "created content");
    let content = state.content(&record);
    store.contents.insert(id, record);
    Ok(Json(content))
}

async fn get_content(State(state): State<Shared>, Path(id): Path<String>) -> Reply<ContentDetails> {
    let store = state.store.read().await;
    let record = store
        .contents
        .get(&id)
        .ok_or_else(|| Failure::not_found("Content"))?;
    Ok(Json(state.content_details(&store, record)))
}

async fn update_content(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProperties>,
) -> Reply<Content> {
    let mut store = state.store.write().await;
    let record = store
        .contents
        .get_mut(&id)
        .ok_or_else(|| Failure::not_found("Content"))?;
    record.properties = input.properties;
    debug!(%id, execution = ?input.execution, "replaced content properties");
    Ok(Json(state.content(record)))
}

async fn delete_content(State(state): State<Shared>, Path(id): Path<String>) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    if store.remove_content(&id) {
        info!(%id, "deleted content");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Failure::not_found("Content"))
    }
}

async fn list_contents(
    State(state): State<Shared>,
    Query(params): Query<ContentsParams>,
) -> Reply<ContentsPage> {
    let store = state.store.read().await;
    let mut matching: Vec<&ContentRecord> = store
        .contents
        .values()
        .filter(|c| params.profile_id.as_ref().is_none_or(|p| *p == c.profile_id))
        .collect();

    match params.order_by_field.as_deref().unwrap_or("created_at") {
        "created_at" => matching.sort_by_key(|c| (c.created_at, c.id.clone())),
        "id" => matching.sort_by(|a, b| a.id.cmp(&b.id)),
        "title" => matching.sort_by_key(|c| c.property("title")),
        other => return Err(Failure::bad_request(format!("cannot order by {other}"))),
    }
    match params.order_by_direction.as_deref() {
        None | Some("DESC") => matching.reverse(),
        Some("ASC") => {}
        Some(other) => return Err(Failure::bad_request(format!("unknown direction {other}"))),
    }

    let (matching, page, page_size) = paginate(matching, params.page, params.page_size);
    let requester = params.requesting_profile_id.as_deref();
    let contents = matching
        .into_iter()
        .filter_map(|c| {
            let author = store.profiles.get(&c.profile_id)?;
            Some(state.content_list_item(&store, c, author, requester))
        })
        .collect();
    Ok(Json(ContentsPage {
        contents,
        page,
        page_size,
    }))
}

async fn batch_read_contents(State(state): State<Shared>, Json(ids): Json<Vec<String>>) -> Json<BatchRead> {
    let store = state.store.read().await;
    let mut result = BatchRead {
        successful: Vec::new(),
        failed: Vec::new(),
    };
    for id in ids {
        match store.contents.get(&id) {
            Some(record) => result.successful.push(state.content_details(&store, record)),
            None => result.failed.push(BatchFailure {
                id,
                error: "Content not found".into(),
            }),
        }
    }
    Json(result)
}

// --- comments ---

async fn create_comment(State(state): State<Shared>, Json(input): Json<CreateComment>) -> Reply<Comment> {
    let mut store = state.store.write().await;
    if !store.contents.contains_key(&input.content_id) {
        return Err(Failure::not_found("Content"));
    }
    if !store.profiles.contains_key(&input.profile_id) {
        return Err(Failure::not_found("Profile"));
    }
    if let Some(parent) = &input.comment_id {
        let parent = store
            .comments
            .get(parent)
            .ok_or_else(|| Failure::not_found("Parent comment"))?;
        if parent.content_id != input.content_id {
            return Err(Failure::bad_request("parent comment belongs to other content"));
        }
    }

    let record = CommentRecord {
        id: Uuid::new_v4().to_string(),
        content_id: input.content_id,
        profile_id: input.profile_id,
        parent_id: input.comment_id,
        text: input.text,
        properties: input.properties,
        created_at: store.tick(),
    };
    info!(id = %record.id, parent = ?record.parent_id, execution = ?input.execution, "created comment");
    let comment = state.comment(&record);
    store.comments.insert(record.id.clone(), record);
    Ok(Json(comment))
}

async fn get_comment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(params): Query<RequesterParam>,
) -> Reply<CommentDetails> {
    let store = state.store.read().await;
    let record = store
        .comments
        .get(&id)
        .ok_or_else(|| Failure::not_found("Comment"))?;
    Ok(Json(state.comment_details(
        &store,
        record,
        params.requesting_profile_id.as_deref(),
    )))
}

async fn update_comment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProperties>,
) -> Reply<Comment> {
    let mut store = state.store.write().await;
    let record = store
        .comments
        .get_mut(&id)
        .ok_or_else(|| Failure::not_found("Comment"))?;
    record.properties = input.properties;
    debug!(%id, execution = ?input.execution, "replaced comment properties");
    Ok(Json(state.comment(record)))
}

async fn delete_comment(State(state): State<Shared>, Path(id): Path<String>) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    if store.remove_comment(&id) {
        info!(%id, "deleted comment");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Failure::not_found("Comment"))
    }
}

/// Flat list. `commentId` narrows the result to that comment's direct replies.
async fn list_comments(
    State(state): State<Shared>,
    Query(params): Query<CommentsParams>,
) -> Reply<CommentsPage> {
    let store = state.store.read().await;
    if let Some(content_id) = &params.content_id {
        if !store.contents.contains_key(content_id) {
            return Err(Failure::not_found("Content"));
        }
    }
    let matching = store.comments.values().filter(|c| {
        params.content_id.as_ref().is_none_or(|id| *id == c.content_id)
            && params.comment_id.as_ref().is_none_or(|id| c.parent_id.as_ref() == Some(id))
            && params.profile_id.as_ref().is_none_or(|id| *id == c.profile_id)
    });
    Ok(Json(state.comments_page(
        &store,
        matching,
        params.requesting_profile_id.as_deref(),
        params.page,
        params.page_size,
    )))
}

async fn list_replies(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(params): Query<RepliesParams>,
) -> Reply<CommentsPage> {
    let store = state.store.read().await;
    if !store.comments.contains_key(&id) {
        return Err(Failure::not_found("Comment"));
    }
    let matching = store
        .comments
        .values()
        .filter(|c| c.parent_id.as_deref() == Some(id.as_str()));
    Ok(Json(state.comments_page(
        &store,
        matching,
        params.requesting_profile_id.as_deref(),
        params.page,
        params.page_size,
    )))
}

// --- likes ---

async fn like(
    State(state): State<Shared>,
    Path(target): Path<String>,
    Query(params): Query<LikeParams>,
    Json(input): Json<LikeEdge>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    if !store.likeable(&target) {
        return Err(Failure::not_found("Target"));
    }
    if !store.profiles.contains_key(&input.start_id) {
        return Err(Failure::not_found("Profile"));
    }
    info!(%target, liker = %input.start_id, username = ?params.username, execution = ?input.execution, "like");
    store.likes.insert((target, input.start_id));
    Ok(StatusCode::OK)
}

async fn unlike(
    State(state): State<Shared>,
    Path(target): Path<String>,
    Query(params): Query<LikeParams>,
    Json(input): Json<LikeEdge>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    if !store.likeable(&target) {
        return Err(Failure::not_found("Target"));
    }
    info!(%target, liker = %input.start_id, username = ?params.username, "unlike");
    store.likes.remove(&(target, input.start_id));
    Ok(StatusCode::OK)
}

// --- follows ---

async fn follow(State(state): State<Shared>, Json(input): Json<FollowEdge>) -> Result<StatusCode, Failure> {
    if input.start_id == input.end_id {
        return Err(Failure::bad_request("a profile cannot follow itself"));
    }
    let mut store = state.store.write().await;
    for id in [&input.start_id, &input.end_id] {
        if !store.profiles.contains_key(id) {
            return Err(Failure::not_found("Profile"));
        }
    }
    info!(start = %input.start_id, end = %input.end_id, execution = ?input.execution, "follow");
    store.follows.insert((input.start_id, input.end_id));
    Ok(StatusCode::OK)
}

async fn unfollow(State(state): State<Shared>, Json(input): Json<FollowEdge>) -> StatusCode {
    let mut store = state.store.write().await;
    info!(start = %input.start_id, end = %input.end_id, execution = ?input.execution, "unfollow");
    store.follows.remove(&(input.start_id, input.end_id));
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_timestamps_alternate_shapes() {
        let state = AppState::new("k");
        assert_eq!(state.stamp(7), Stamp::Plain(7));
        assert_eq!(state.stamp(7), Stamp::split(7));
        assert_eq!(state.stamp(7), Stamp::Plain(7));
    }

    #[test]
    fn paginate_is_one_based() {
        let (items, page, size) = paginate((1..=25).collect(), Some(3), Some(10));
        assert_eq!(items, vec![21, 22, 23, 24, 25]);
        assert_eq!((page, size), (3, 10));
    }

    #[test]
    fn paginate_defaults_zero_and_absent() {
        let (items, page, size) = paginate((1..=25).collect::<Vec<_>>(), Some(0), None);
        assert_eq!(items.len(), DEFAULT_PAGE_SIZE);
        assert_eq!((page, size), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn paginate_far_past_the_end_is_empty() {
        let (items, page, size) = paginate((1..=25).collect::<Vec<_>>(), Some(usize::MAX), Some(usize::MAX));
        assert!(items.is_empty());
        assert_eq!((page, size), (usize::MAX, usize::MAX));
    }

    #[test]
    fn failure_renders_error_body() {
        let response = Failure::not_found("Content").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
