//! Integration tests for the reference backend driven through the
//! `Interpreter` trait.

use blog_effects::backend::{LatencyProfile, ReferenceBackend};
use blog_effects::domain::{CacheKey, Email, Payload, Post, PostId, PostUpdate, User, UserId};
use blog_effects::interpreter::Interpreter;
use rstest::{fixture, rstest};

#[fixture]
fn backend() -> ReferenceBackend {
    ReferenceBackend::with_latency(LatencyProfile::zero())
}

#[fixture]
fn john() -> User {
    User::new(1, "john@example.com")
}

// =============================================================================
// Cache
// =============================================================================

#[rstest]
#[case("1", "[]")]
#[case("42", "[{\"id\":1}]")]
#[case("", "")]
#[tokio::test]
async fn cache_get_returns_last_put(
    backend: ReferenceBackend,
    #[case] key: &str,
    #[case] value: &str,
) {
    let key = CacheKey::new(key);

    let stored = backend.cache_put(&key, value.to_owned()).run_async().await;
    let read = backend.cache_get(&key).run_async().await;

    assert!(stored);
    assert_eq!(read.as_deref(), Some(value));
}

#[rstest]
#[tokio::test]
async fn cache_miss_is_none(backend: ReferenceBackend) {
    assert_eq!(backend.cache_get(&CacheKey::new("1")).run_async().await, None);
}

#[rstest]
#[tokio::test]
async fn cache_delete_then_get_misses(backend: ReferenceBackend) {
    let key = CacheKey::new("1");
    backend.cache_put(&key, "v".to_owned()).run_async().await;

    assert!(backend.cache_delete(&key).run_async().await);
    assert_eq!(backend.cache_get(&key).run_async().await, None);
    assert!(!backend.cache_delete(&key).run_async().await);
}

// =============================================================================
// Database
// =============================================================================

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
#[tokio::test]
async fn created_id_is_one_past_existing(
    backend: ReferenceBackend,
    john: User,
    #[case] existing: u64,
) {
    let backend = backend.with_posts(
        (1..=existing).map(|id| Post::new(john.clone(), "seed", "").stored_as(PostId::new(id))),
    );

    let stored = backend
        .db_create_post(Post::new(john.clone(), "new", "body"))
        .run_async()
        .await;

    assert_eq!(stored.id, PostId::new(existing + 1));
    assert_eq!(stored.title, "new");
    let listed = backend.db_list_posts(john.id).run_async().await;
    assert_eq!(listed.len() as u64, existing + 1);
    assert_eq!(listed.last(), Some(&stored));
}

#[rstest]
#[tokio::test]
async fn listing_unknown_user_is_empty(backend: ReferenceBackend) {
    assert!(backend.db_list_posts(UserId::new(77)).run_async().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn update_of_missing_post_leaves_database_unchanged(backend: ReferenceBackend, john: User) {
    let backend =
        backend.with_posts([Post::new(john.clone(), "Cool post", "body").stored_as(PostId::new(1))]);
    let before = backend.snapshot();

    let result = backend
        .db_update_post(PostId::new(999), PostUpdate::for_author(john).with_title("x"))
        .run_async()
        .await;

    assert_eq!(result, None);
    assert_eq!(backend.snapshot(), before);
}

#[rstest]
#[tokio::test]
async fn update_replaces_given_fields_and_keeps_id_and_author(backend: ReferenceBackend, john: User) {
    let backend =
        backend.with_posts([Post::new(john.clone(), "Cool post", "body").stored_as(PostId::new(1))]);

    let updated = backend
        .db_update_post(PostId::new(1), PostUpdate::for_author(john.clone()).with_body("edited"))
        .run_async()
        .await
        .expect("post 1 exists");

    assert_eq!(updated.id, PostId::new(1));
    assert_eq!(updated.author, john);
    assert_eq!(updated.title, "Cool post");
    assert_eq!(updated.body, "edited");
    assert_eq!(backend.db_list_posts(john.id).run_async().await, vec![updated]);
}

// =============================================================================
// Network
// =============================================================================

#[rstest]
#[tokio::test]
async fn send_is_recorded_in_outbox(backend: ReferenceBackend, john: User) {
    let post = Post::new(john, "t", "b").stored_as(PostId::new(1));
    let payload = Payload::posts(std::slice::from_ref(&post));

    backend
        .net_send(payload.clone(), &Email::new("review@example.com"))
        .run_async()
        .await;

    let outbox = backend.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].recipient.as_str(), "review@example.com");
    assert_eq!(outbox[0].payload, payload);
    assert_eq!(outbox[0].payload.len(), 1);
}

// =============================================================================
// Latency
// =============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn configured_latency_is_applied(john: User) {
    let latency = LatencyProfile {
        list_posts: std::time::Duration::from_millis(20),
        ..LatencyProfile::zero()
    };
    let backend = ReferenceBackend::with_latency(latency);
    let start = tokio::time::Instant::now();

    backend.db_list_posts(john.id).run_async().await;
    backend
        .db_create_post(Post::new(john, "t", "b"))
        .run_async()
        .await;

    let elapsed = start.elapsed();
    assert!(elapsed >= std::time::Duration::from_millis(20));
    assert!(elapsed < std::time::Duration::from_millis(300));
}

// =============================================================================
// Dispatch
// =============================================================================

#[cfg(feature = "free")]
mod dispatch {
    use super::*;
    use blog_effects::free::{self, Operation};
    use blog_effects::interpreter::{OperationTag, RecordingSink, Traced};

    fn one_of_each() -> Vec<Operation> {
        let john = User::new(1, "john@example.com");
        vec![
            Operation::CacheGet {
                key: CacheKey::new("1"),
            },
            Operation::CachePut {
                key: CacheKey::new("1"),
                value: "[]".to_owned(),
            },
            Operation::CacheDelete {
                key: CacheKey::new("1"),
            },
            Operation::DbListPosts { user_id: john.id },
            Operation::DbCreatePost {
                post: Post::new(john.clone(), "t", "b"),
            },
            Operation::DbUpdatePost {
                post_id: PostId::new(1),
                update: PostUpdate::for_author(john.clone()).with_title("u"),
            },
            Operation::NetSend {
                payload: Payload::posts(&[]),
                recipient: john.email,
            },
        ]
    }

    #[rstest]
    #[tokio::test]
    async fn every_operation_reaches_exactly_its_handler(backend: ReferenceBackend) {
        for operation in one_of_each() {
            let sink = RecordingSink::new();
            let traced = Traced::new(backend.clone(), sink.clone());
            let expected = operation.trace_record();

            free::dispatch(&traced, operation).run_async().await;

            assert_eq!(sink.records(), vec![expected]);
        }
    }

    #[rstest]
    fn every_tag_is_covered() {
        let tags: Vec<_> = one_of_each().iter().map(Operation::tag).collect();

        assert_eq!(tags, OperationTag::ALL.to_vec());
    }
}
