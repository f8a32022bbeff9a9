//! Demo driver: runs the three blog workflows with each encoding.
//!
//! Each encoding gets its own backend seeded with one user and one post, and
//! every operation is logged through `tracing` as it executes.

use blog_effects::backend::{LatencyProfile, ReferenceBackend};
use blog_effects::config::AppConfig;
use blog_effects::control::InterpretError;
use blog_effects::domain::{Post, PostId, PostUpdate, StoredPost, User};
use blog_effects::free;
use blog_effects::interpreter::Traced;
use blog_effects::tagless;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "info,blog_effects=debug";

#[tokio::main]
async fn main() -> Result<(), InterpretError> {
    let config = AppConfig::from_env();

    let filter = config
        .as_ref()
        .ok()
        .and_then(|config| config.log_filter.clone())
        .map_or_else(
            || {
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
            },
            tracing_subscriber::EnvFilter::new,
        );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match config {
        Ok(config) => {
            tracing::info!(latency = ?config.latency, "Configuration loaded");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load configuration from environment: {e}");
            tracing::info!("Using default configuration");
            AppConfig::default()
        }
    };

    let john = User::new(1, "john@example.com");
    let cool_post = Post::new(john.clone(), "Cool post", "This post is really cool");

    tracing::info!("== Free monad encoding ==");
    let backend = seeded_backend(config.latency, cool_post.clone().stored_as(PostId::new(1)));
    run_free(&Traced::logged(backend), &john, &cool_post).await?;

    tracing::info!("== Tagless final encoding ==");
    let backend = seeded_backend(config.latency, cool_post.clone().stored_as(PostId::new(1)));
    run_tagless(&Traced::logged(backend), &john, &cool_post).await;

    Ok(())
}

fn seeded_backend(latency: LatencyProfile, post: StoredPost) -> ReferenceBackend {
    ReferenceBackend::with_latency(latency).with_posts([post])
}

async fn run_free(
    interpreter: &Traced<ReferenceBackend>,
    john: &User,
    cool_post: &Post,
) -> Result<(), InterpretError> {
    tracing::info!("review_posts: first run");
    free::run(free::workflows::review_posts(john.id), interpreter)
        .run_async()
        .await?;

    tracing::info!("review_posts: second run");
    free::run(free::workflows::review_posts(john.id), interpreter)
        .run_async()
        .await?;

    tracing::info!("publish_post");
    free::run(free::workflows::publish_post(cool_post.clone()), interpreter)
        .run_async()
        .await?;

    tracing::info!("revise_post");
    let revised = free::run(
        free::workflows::revise_post(PostId::new(1), PostUpdate::from(cool_post.clone())),
        interpreter,
    )
    .run_async()
    .await?;
    tracing::info!(found = revised.is_some(), "revise_post finished");

    Ok(())
}

async fn run_tagless(interpreter: &Traced<ReferenceBackend>, john: &User, cool_post: &Post) {
    tracing::info!("review_posts: first run");
    tagless::workflows::review_posts(interpreter, john.id)
        .run_async()
        .await;

    tracing::info!("review_posts: second run");
    tagless::workflows::review_posts(interpreter, john.id)
        .run_async()
        .await;

    tracing::info!("publish_post");
    tagless::workflows::publish_post(interpreter, cool_post.clone())
        .run_async()
        .await;

    tracing::info!("revise_post");
    let revised = tagless::workflows::revise_post(
        interpreter,
        PostId::new(1),
        PostUpdate::from(cool_post.clone()),
    )
    .run_async()
    .await;
    tracing::info!(found = revised.is_some(), "revise_post finished");
}
