//! In-memory reference backend.
//!
//! [`ReferenceBackend`] implements [`Interpreter`] over an in-memory cache, an
//! in-memory post database and a simulated network. Database and network
//! handlers wait a configurable [`LatencyProfile`] after doing their work;
//! the cache answers immediately.
//!
//! Clones share all state, so the same backend can be handed to several
//! interpreters (or a `Traced` wrapper) and inspected afterwards.

mod cache;
mod database;
mod network;

pub use cache::InMemoryCache;
pub use database::InMemoryDatabase;
pub use network::{Delivery, SimulatedNetwork};

use crate::domain::{CacheKey, Email, Payload, Post, PostId, PostUpdate, StoredPost, UserId};
use crate::effect::AsyncIO;
use crate::interpreter::Interpreter;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

// =============================================================================
// LatencyProfile
// =============================================================================

/// Simulated latency of each slow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Listing a user's posts.
    pub list_posts: Duration,
    /// Creating a post.
    pub create_post: Duration,
    /// Updating an existing post. Misses never wait.
    pub update_post: Duration,
    /// Sending a payload.
    pub send: Duration,
}

impl LatencyProfile {
    /// No latency at all.
    pub const fn zero() -> Self {
        Self {
            list_posts: Duration::ZERO,
            create_post: Duration::ZERO,
            update_post: Duration::ZERO,
            send: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            list_posts: Duration::from_millis(500),
            create_post: Duration::from_millis(300),
            update_post: Duration::from_millis(750),
            send: Duration::from_millis(1000),
        }
    }
}

// =============================================================================
// ReferenceBackend
// =============================================================================

/// Observable backend state, for comparing runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSnapshot {
    /// Every cache entry.
    pub cache: HashMap<CacheKey, String>,
    /// Every author's posts in id order.
    pub posts: BTreeMap<UserId, Vec<StoredPost>>,
    /// Every delivery, oldest first.
    pub outbox: Vec<Delivery>,
}

/// Cache, database and network behind one [`Interpreter`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceBackend {
    cache: InMemoryCache,
    database: InMemoryDatabase,
    network: SimulatedNetwork,
    latency: LatencyProfile,
}

impl ReferenceBackend {
    /// An empty backend with the default latencies.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty backend with the given latencies.
    pub fn with_latency(latency: LatencyProfile) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Seeds the database with already stored posts.
    #[must_use]
    pub fn with_posts(self, posts: impl IntoIterator<Item = StoredPost>) -> Self {
        for post in posts {
            self.database.insert(post);
        }
        self
    }

    /// The latencies in effect.
    pub const fn latency(&self) -> LatencyProfile {
        self.latency
    }

    /// The cache.
    pub const fn cache(&self) -> &InMemoryCache {
        &self.cache
    }

    /// The post database.
    pub const fn database(&self) -> &InMemoryDatabase {
        &self.database
    }

    /// The simulated network.
    pub const fn network(&self) -> &SimulatedNetwork {
        &self.network
    }

    /// Copy of every cache entry.
    pub fn cache_snapshot(&self) -> HashMap<CacheKey, String> {
        self.cache.snapshot()
    }

    /// Every delivery so far.
    pub fn outbox(&self) -> Vec<Delivery> {
        self.network.outbox()
    }

    /// Copy of all observable state.
    pub fn snapshot(&self) -> BackendSnapshot {
        BackendSnapshot {
            cache: self.cache.snapshot(),
            posts: self.database.snapshot(),
            outbox: self.network.outbox(),
        }
    }
}

impl Interpreter for ReferenceBackend {
    fn cache_get(&self, key: &CacheKey) -> AsyncIO<Option<String>> {
        let cache = self.cache.clone();
        let key = key.clone();
        AsyncIO::from_fn(move || {
            let value = cache.get(&key);
            tracing::debug!(%key, hit = value.is_some(), "cache get");
            value
        })
    }

    fn cache_put(&self, key: &CacheKey, value: String) -> AsyncIO<bool> {
        let cache = self.cache.clone();
        let key = key.clone();
        AsyncIO::from_fn(move || {
            tracing::debug!(%key, bytes = value.len(), "cache put");
            cache.put(key, value)
        })
    }

    fn cache_delete(&self, key: &CacheKey) -> AsyncIO<bool> {
        let cache = self.cache.clone();
        let key = key.clone();
        AsyncIO::from_fn(move || {
            let existed = cache.delete(&key);
            tracing::debug!(%key, existed, "cache delete");
            existed
        })
    }

    fn db_list_posts(&self, user_id: UserId) -> AsyncIO<Vec<StoredPost>> {
        let database = self.database.clone();
        let latency = self.latency.list_posts;
        AsyncIO::from_fn(move || {
            let posts = database.list(user_id);
            tracing::debug!(%user_id, count = posts.len(), "db list posts");
            posts
        })
        .flat_map(move |posts| AsyncIO::pure(posts).after(latency))
    }

    fn db_create_post(&self, post: Post) -> AsyncIO<StoredPost> {
        let database = self.database.clone();
        let latency = self.latency.create_post;
        AsyncIO::from_fn(move || {
            let stored = database.create(post);
            tracing::debug!(user_id = %stored.author.id, post_id = %stored.id, "db create post");
            stored
        })
        .flat_map(move |stored| AsyncIO::pure(stored).after(latency))
    }

    fn db_update_post(&self, post_id: PostId, update: PostUpdate) -> AsyncIO<Option<StoredPost>> {
        let database = self.database.clone();
        let latency = self.latency.update_post;
        AsyncIO::from_fn(move || {
            let updated = database.update(post_id, &update);
            tracing::debug!(
                user_id = %update.author.id,
                %post_id,
                found = updated.is_some(),
                "db update post"
            );
            updated
        })
        .flat_map(move |updated| {
            let wait = if updated.is_some() {
                latency
            } else {
                Duration::ZERO
            };
            AsyncIO::pure(updated).after(wait)
        })
    }

    fn net_send(&self, payload: Payload, recipient: &Email) -> AsyncIO<()> {
        let network = self.network.clone();
        let recipient = recipient.clone();
        let latency = self.latency.send;
        AsyncIO::from_fn(move || {
            tracing::debug!(%recipient, items = payload.len(), "net send");
            network.send(payload, recipient);
        })
        .flat_map(move |()| AsyncIO::pure(()).after(latency))
    }
}

static_assertions::assert_impl_all!(ReferenceBackend: Send, Sync, Clone);
