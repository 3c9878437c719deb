//! End-to-end tests against the mock service over real HTTP.
//!
//! # Design
//! Each test starts its own mock server on a random port, so state never
//! leaks between tests, then drives the client through `UreqTransport`.
//! This validates request building and response parsing against an actual
//! server, including both timestamp shapes the server alternates between.

use std::time::Duration;

use tapestry_core::{
    ApiError, CallContext, CancelReason, CancelToken, ClientConfig, CommentsQuery, ContentsOption,
    ContentsQuery, CreateComment, Execution, FindOrCreateContent, FindOrCreateProfile, Lookup,
    Profile, Property, RepliesQuery, SortDirection, TapestryClient, UpdateProfile,
};

const API_KEY: &str = "test-key";

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, API_KEY).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client() -> TapestryClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    TapestryClient::new(ClientConfig::new(&start_server(), API_KEY).with_timeout(Duration::from_secs(10)))
}

fn ctx() -> CallContext {
    CallContext::background()
}

fn profile(client: &TapestryClient, name: &str) -> Profile {
    client
        .find_or_create_profile(&ctx(), &FindOrCreateProfile::new(format!("wallet-{name}"), name))
        .unwrap()
        .profile
}

fn content(client: &TapestryClient, author: &str, id: &str) -> String {
    let params = FindOrCreateContent::new(author, id, vec![Property::new("title", id)]);
    client.find_or_create_content(&ctx(), &params).unwrap().id
}

#[test]
fn profile_lifecycle() {
    let client = client();
    let params = FindOrCreateProfile::new("97QsK6DF", "alice").bio("hello");

    let first = client.find_or_create_profile(&ctx(), &params).unwrap();
    let second = client.find_or_create_profile(&ctx(), &params).unwrap();
    assert_eq!(first.profile.id, second.profile.id, "find-or-create is idempotent");
    assert_eq!(first.profile.blockchain, "SOLANA");
    assert_eq!(first.wallet_address, "97QsK6DF");

    let fetched = client.get_profile(&ctx(), &first.profile.id).unwrap();
    assert_eq!(fetched, Lookup::Found(first.clone()));

    let updated = client
        .update_profile(
            &ctx(),
            &first.profile.id,
            &UpdateProfile {
                username: "alice2".into(),
                bio: None,
                image: None,
            },
        )
        .unwrap();
    assert_eq!(updated.username, "alice2");

    assert!(client.get_profile(&ctx(), "ghost").unwrap().is_not_found());
}

#[test]
fn follow_graph() {
    let client = client();
    let alice = profile(&client, "alice");
    let bob = profile(&client, "bob");
    let carol = profile(&client, "carol");

    client.follow(&ctx(), &alice.id, &carol.id).unwrap();
    client.follow(&ctx(), &carol.id, &bob.id).unwrap();
    client.follow(&ctx(), &bob.id, &alice.id).unwrap();

    let followers = client.get_followers(&ctx(), &carol.id).unwrap();
    assert_eq!(followers.ids(), vec!["alice"]);
    let following = client.get_following(&ctx(), &carol.id).unwrap();
    assert_eq!(following.ids(), vec!["bob"]);

    // alice follows carol, and carol follows bob.
    let mutual = client.get_following_who_follow(&ctx(), &bob.id, &alice.id).unwrap();
    assert_eq!(mutual.ids(), vec!["carol"]);

    let suggested = client.get_suggested_profiles(&ctx(), "wallet-alice", true).unwrap();
    assert_eq!(suggested.keys().collect::<Vec<_>>(), vec!["bob"]);

    client.unfollow(&ctx(), &alice.id, &carol.id).unwrap();
    assert!(client.get_followers(&ctx(), &carol.id).unwrap().profiles.is_empty());
}

#[test]
fn content_lifecycle() {
    let client = client();
    let alice = profile(&client, "alice");
    let params = FindOrCreateContent::new(&alice.id, "post-1", vec![Property::new("title", "Hello")]);

    let first = client.find_or_create_content(&ctx(), &params).unwrap();
    let second = client.find_or_create_content(&ctx(), &params).unwrap();
    assert_eq!(first, second, "both timestamp shapes decode to the same value");
    assert_eq!(first.title, "Hello");

    let Lookup::Found(details) = client.get_content(&ctx(), "post-1").unwrap() else {
        panic!("expected content");
    };
    assert_eq!(details.content.created_at, first.created_at);
    assert_eq!(details.social_counts.like_count, 0);

    let updated = client
        .update_content(&ctx(), "post-1", &[Property::new("description", "World")])
        .unwrap();
    assert_eq!(updated.description, "World");
    assert_eq!(updated.title, "", "update replaces the property list");

    client.delete_content(&ctx(), "post-1").unwrap();
    assert!(client.get_content(&ctx(), "post-1").unwrap().is_not_found());

    let err = client.delete_content(&ctx(), "post-1").unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}

#[test]
fn list_contents_with_options() {
    let client = client();
    let alice = profile(&client, "alice");
    let bob = profile(&client, "bob");
    for id in ["a", "b", "c"] {
        content(&client, &alice.id, id);
    }
    content(&client, &bob.id, "d");

    let query = ContentsQuery::from_options([
        ContentsOption::pagination(1, 10),
        ContentsOption::order_by("id", SortDirection::Asc),
        ContentsOption::profile_id(&alice.id),
    ]);
    let page = client.list_contents(&ctx(), &query).unwrap();
    let ids: Vec<&str> = page.contents.iter().map(|c| c.content.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!((page.page, page.page_size), (1, 10));

    client.like(&ctx(), "b", &bob).unwrap();
    let query = ContentsQuery::new()
        .order_by("created_at", SortDirection::Desc)
        .pagination(1, 2)
        .requesting_profile_id(&bob.id);
    let page = client.list_contents(&ctx(), &query).unwrap();
    assert_eq!(page.contents.len(), 2);
    assert_eq!(page.contents[0].content.id, "d");
    assert_eq!(page.contents[0].author_profile.id, bob.id);
    assert!(page.contents[1].content.id == "c" && !page.contents[1].requesting_profile_social_info.has_liked);
}

#[test]
fn batch_read_partitions_failures() {
    let client = client();
    let alice = profile(&client, "alice");
    for id in ["a", "b", "c"] {
        content(&client, &alice.id, id);
    }

    let result = client
        .batch_read_contents(&ctx(), &["a", "b", "c", "missing"])
        .unwrap();
    assert_eq!(result.successful.len(), 3);
    assert_eq!(result.failed_ids(), vec!["missing"]);
}

#[test]
fn comment_threads() {
    let client = client();
    let alice = profile(&client, "alice");
    let bob = profile(&client, "bob");
    let post = content(&client, &alice.id, "post");

    let top = client
        .create_comment(&ctx(), &CreateComment::new(&post, &alice.id, "first"))
        .unwrap();
    let unrelated = client
        .create_comment(&ctx(), &CreateComment::new(&post, &bob.id, "second"))
        .unwrap();
    let reply = client
        .create_comment(
            &ctx(),
            &CreateComment::new(&post, &bob.id, "re: first")
                .reply_to(&top.id)
                .property("kind", "reply"),
        )
        .unwrap();

    let replies = client
        .list_comment_replies(&ctx(), &top.id, &RepliesQuery::default().pagination(1, 10))
        .unwrap();
    assert_eq!(replies.ids(), vec![reply.id.as_str()]);

    let filtered = client
        .list_comments(&ctx(), &CommentsQuery::for_content(&post).comment_id(&top.id))
        .unwrap();
    assert_eq!(filtered.ids(), vec![reply.id.as_str()]);

    let flat = client
        .list_comments(&ctx(), &CommentsQuery::for_content(&post).pagination(1, 10))
        .unwrap();
    assert_eq!(flat.comments.len(), 3);
    assert!(flat.ids().contains(&unrelated.id.as_str()));

    let by_bob = client
        .list_comments(&ctx(), &CommentsQuery::for_content(&post).profile_id(&bob.id))
        .unwrap();
    assert_eq!(by_bob.comments.len(), 2);

    let Lookup::Found(details) = client.get_comment(&ctx(), &top.id, Some(bob.id.as_str())).unwrap() else {
        panic!("expected comment");
    };
    assert_eq!(details.comment.text, "first");
    assert_eq!(details.author.username, "alice");
    assert_eq!(details.social_counts.comment_count, 1);

    let Lookup::Found(post_details) = client.get_content(&ctx(), &post).unwrap() else {
        panic!("expected content");
    };
    assert_eq!(post_details.social_counts.comment_count, 3);

    client
        .update_comment(&ctx(), &reply.id, &[Property::new("kind", "edited")])
        .unwrap();
    client.delete_comment(&ctx(), &top.id).unwrap();
    assert!(client.get_comment(&ctx(), &top.id, None).unwrap().is_not_found());
    assert!(client.get_comment(&ctx(), &reply.id, None).unwrap().is_not_found());
}

#[test]
fn comments_for_unknown_content_are_an_empty_page() {
    let client = client();
    let page = client
        .list_comments(&ctx(), &CommentsQuery::for_content("ghost"))
        .unwrap();
    assert!(page.comments.is_empty());
}

#[test]
fn like_then_unlike_restores_counts() {
    let client = client().with_execution(Execution::FastUnconfirmed);
    let alice = profile(&client, "alice");
    let bob = profile(&client, "bob");
    let post = content(&client, &alice.id, "post");
    let comment = client
        .create_comment(&ctx(), &CreateComment::new(&post, &alice.id, "like me"))
        .unwrap();

    let likes = |id: &str| match client.get_content(&ctx(), id).unwrap() {
        Lookup::Found(d) => d.social_counts.like_count,
        Lookup::NotFound => panic!("content vanished"),
    };
    let before = likes(&post);

    client.like(&ctx(), &post, &bob).unwrap();
    assert_eq!(likes(&post), before + 1);
    client.unlike(&ctx(), &post, &bob).unwrap();
    assert_eq!(likes(&post), before);

    client.like(&ctx(), &comment.id, &bob).unwrap();
    let Lookup::Found(details) = client.get_comment(&ctx(), &comment.id, Some(bob.id.as_str())).unwrap() else {
        panic!("expected comment");
    };
    assert_eq!(details.social_counts.like_count, 1);
    assert!(details.requesting_profile_social_info.has_liked);

    let err = client.like(&ctx(), "ghost", &bob).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}

#[test]
fn wrong_api_key_surfaces_unauthorized() {
    let base_url = start_server();
    let client = TapestryClient::new(ClientConfig::new(&base_url, "wrong"));

    let err = client.get_profile(&ctx(), "alice").unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }), "{err}");

    // Content reads fold 401 into not-found.
    assert!(client.get_content(&ctx(), "post").unwrap().is_not_found());
}

#[test]
fn cancelled_calls_never_reach_the_server() {
    let client = client();
    let token = CancelToken::new();
    token.cancel();

    let err = client
        .get_profile(&CallContext::background().with_cancel_token(token), "alice")
        .unwrap_err();
    assert!(matches!(err, ApiError::Cancelled(CancelReason::Cancelled)));

    let err = client
        .get_profile(&CallContext::background().with_timeout(Duration::ZERO), "alice")
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn connection_refused_is_a_transport_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = TapestryClient::new(ClientConfig::new(&format!("http://{addr}"), API_KEY));

    let err = client.get_profile(&ctx(), "alice").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");
}

/// Listen on a random port, accept connections, and never answer.
fn start_silent_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

#[test]
fn caller_deadline_on_a_silent_server_is_deadline_exceeded() {
    let client = TapestryClient::new(ClientConfig::new(&start_silent_server(), API_KEY));
    let ctx = CallContext::background().with_timeout(Duration::from_millis(300));

    let err = client.get_profile(&ctx, "alice").unwrap_err();
    assert!(matches!(err, ApiError::Cancelled(CancelReason::DeadlineExceeded)), "{err}");
}

#[test]
fn client_timeout_on_a_silent_server_is_a_transport_error() {
    let config = ClientConfig::new(&start_silent_server(), API_KEY).with_timeout(Duration::from_millis(300));
    let client = TapestryClient::new(config);

    let err = client.get_profile(&ctx(), "alice").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");
}
