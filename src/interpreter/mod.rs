//! The capability surface shared by both encodings.
//!
//! [`Interpreter`] lists one handler per operation kind. The free encoding's
//! driver dispatches each `Operation` to exactly one of these handlers, and the
//! tagless-final workflows call them directly, so one implementation serves
//! both.
//!
//! Handlers return [`AsyncIO`] and must not do anything until that action is
//! run. Wrappers such as [`Traced`] rely on this to observe operations in the
//! order they execute rather than the order they were built.

mod traced;

pub use traced::{LogSink, RecordingSink, TraceRecord, TraceSink, Traced};

use crate::domain::{CacheKey, Email, Payload, Post, PostId, PostUpdate, StoredPost, UserId};
use crate::effect::AsyncIO;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Interpreter
// =============================================================================

/// Handlers for the cache, database and network operations.
pub trait Interpreter: Clone + Send + Sync + 'static {
    /// Looks up a cache entry. `None` is a miss.
    fn cache_get(&self, key: &CacheKey) -> AsyncIO<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn cache_put(&self, key: &CacheKey, value: String) -> AsyncIO<bool>;

    /// Removes an entry; yields whether it existed.
    fn cache_delete(&self, key: &CacheKey) -> AsyncIO<bool>;

    /// All stored posts of a user, ordered by id. Unknown users have none.
    fn db_list_posts(&self, user_id: UserId) -> AsyncIO<Vec<StoredPost>>;

    /// Persists a new post and yields it with its assigned id.
    fn db_create_post(&self, post: Post) -> AsyncIO<StoredPost>;

    /// Merges `update` into the author's post `post_id`, if it exists.
    fn db_update_post(&self, post_id: PostId, update: PostUpdate) -> AsyncIO<Option<StoredPost>>;

    /// Delivers `payload` to `recipient`.
    fn net_send(&self, payload: Payload, recipient: &Email) -> AsyncIO<()>;
}

// =============================================================================
// OperationTag
// =============================================================================

/// Names an operation kind independently of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationTag {
    /// Cache lookup.
    CacheGet,
    /// Cache write.
    CachePut,
    /// Cache removal.
    CacheDelete,
    /// Post listing.
    DbListPosts,
    /// Post creation.
    DbCreatePost,
    /// Post update.
    DbUpdatePost,
    /// Network delivery.
    NetSend,
}

impl OperationTag {
    /// Every operation kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::CacheGet,
        Self::CachePut,
        Self::CacheDelete,
        Self::DbListPosts,
        Self::DbCreatePost,
        Self::DbUpdatePost,
        Self::NetSend,
    ];

    /// The kind's name as it appears in traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CacheGet => "CacheGet",
            Self::CachePut => "CachePut",
            Self::CacheDelete => "CacheDelete",
            Self::DbListPosts => "DbListPosts",
            Self::DbCreatePost => "DbCreatePost",
            Self::DbUpdatePost => "DbUpdatePost",
            Self::NetSend => "NetSend",
        }
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
