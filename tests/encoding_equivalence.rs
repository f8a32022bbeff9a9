//! The free and tagless-final encodings must be indistinguishable from the
//! backend's point of view: same operations, same arguments, same order,
//! same final state.

use blog_effects::backend::{BackendSnapshot, LatencyProfile, ReferenceBackend};
use blog_effects::domain::{Post, PostId, PostUpdate, StoredPost, User, UserId};
use blog_effects::free;
use blog_effects::interpreter::{RecordingSink, TraceRecord, Traced};
use blog_effects::tagless;
use proptest::prelude::*;
use rstest::rstest;

#[derive(Debug, Clone)]
enum Step {
    Review(u64),
    Publish { author: u64, title: String },
    Revise { author: u64, post_id: u64, title: String },
}

#[derive(Debug, PartialEq)]
struct Observation {
    results: Vec<Option<StoredPost>>,
    trace: Vec<TraceRecord>,
    state: BackendSnapshot,
}

fn user(id: u64) -> User {
    User::new(id, format!("user{id}@example.com"))
}

fn seeded_backend() -> ReferenceBackend {
    ReferenceBackend::with_latency(LatencyProfile::zero()).with_posts([
        Post::new(user(1), "Cool post", "This post is really cool").stored_as(PostId::new(1)),
        Post::new(user(2), "Hello", "World").stored_as(PostId::new(1)),
    ])
}

async fn run_free(steps: &[Step]) -> Observation {
    let backend = seeded_backend();
    let sink = RecordingSink::new();
    let interpreter = Traced::new(backend.clone(), sink.clone());
    let mut results = Vec::new();

    for step in steps.iter().cloned() {
        let result = match step {
            Step::Review(user_id) => {
                let program = free::workflows::review_posts(UserId::new(user_id));
                free::run(program, &interpreter)
                    .run_async()
                    .await
                    .map(|()| None)
            }
            Step::Publish { author, title } => {
                let program = free::workflows::publish_post(Post::new(user(author), title, "body"));
                free::run(program, &interpreter)
                    .run_async()
                    .await
                    .map(|()| None)
            }
            Step::Revise {
                author,
                post_id,
                title,
            } => {
                let update = PostUpdate::for_author(user(author)).with_title(title);
                let program = free::workflows::revise_post(PostId::new(post_id), update);
                free::run(program, &interpreter).run_async().await
            }
        };
        results.push(result.expect("well-typed program"));
    }

    Observation {
        results,
        trace: sink.records(),
        state: backend.snapshot(),
    }
}

async fn run_tagless(steps: &[Step]) -> Observation {
    let backend = seeded_backend();
    let sink = RecordingSink::new();
    let interpreter = Traced::new(backend.clone(), sink.clone());
    let mut results = Vec::new();

    for step in steps.iter().cloned() {
        let result = match step {
            Step::Review(user_id) => {
                tagless::workflows::review_posts(&interpreter, UserId::new(user_id))
                    .run_async()
                    .await;
                None
            }
            Step::Publish { author, title } => {
                let post = Post::new(user(author), title, "body");
                tagless::workflows::publish_post(&interpreter, post)
                    .run_async()
                    .await;
                None
            }
            Step::Revise {
                author,
                post_id,
                title,
            } => {
                let update = PostUpdate::for_author(user(author)).with_title(title);
                tagless::workflows::revise_post(&interpreter, PostId::new(post_id), update)
                    .run_async()
                    .await
            }
        };
        results.push(result);
    }

    Observation {
        results,
        trace: sink.records(),
        state: backend.snapshot(),
    }
}

fn observe_both(steps: &[Step]) -> (Observation, Observation) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    (
        runtime.block_on(run_free(steps)),
        runtime.block_on(run_tagless(steps)),
    )
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u64..=3).prop_map(Step::Review),
        (1u64..=3, "[a-z]{1,6}").prop_map(|(author, title)| Step::Publish { author, title }),
        (1u64..=3, 1u64..=4, "[a-z]{1,6}").prop_map(|(author, post_id, title)| Step::Revise {
            author,
            post_id,
            title
        }),
    ]
}

#[rstest]
fn demo_sequence_is_identical() {
    let steps = [
        Step::Review(1),
        Step::Review(1),
        Step::Publish {
            author: 1,
            title: "Cool post".to_owned(),
        },
        Step::Revise {
            author: 1,
            post_id: 1,
            title: "Cooler post".to_owned(),
        },
        Step::Revise {
            author: 1,
            post_id: 999,
            title: "missing".to_owned(),
        },
    ];

    let (by_free, by_tagless) = observe_both(&steps);

    assert_eq!(by_free, by_tagless);
    assert_eq!(by_free.state.outbox.len(), 3);
    assert!(by_free.results[3].is_some());
    assert!(by_free.results[4].is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_encodings_agree(steps in prop::collection::vec(arb_step(), 0..12)) {
        let (by_free, by_tagless) = observe_both(&steps);

        prop_assert_eq!(by_free, by_tagless);
    }
}
