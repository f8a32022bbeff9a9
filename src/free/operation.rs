use crate::control::Freer;
use crate::domain::{CacheKey, Email, Payload, Post, PostId, PostUpdate, UserId};
use crate::interpreter::{OperationTag, TraceRecord};
use serde_json::Value;

/// One requested effect, with its arguments.
///
/// The continuation that consumes the effect's result is not part of the
/// operation; it lives in the [`Program`] node carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Look up `key`. Yields `Option<String>`.
    CacheGet {
        /// Entry to read.
        key: CacheKey,
    },
    /// Store `value` under `key`. Yields `bool`.
    CachePut {
        /// Entry to write.
        key: CacheKey,
        /// Serialized value.
        value: String,
    },
    /// Remove `key`. Yields `bool`.
    CacheDelete {
        /// Entry to remove.
        key: CacheKey,
    },
    /// List a user's posts. Yields `Vec<StoredPost>`.
    DbListPosts {
        /// Whose posts.
        user_id: UserId,
    },
    /// Persist a post. Yields `StoredPost`.
    DbCreatePost {
        /// The draft to store.
        post: Post,
    },
    /// Merge an update into a stored post. Yields `Option<StoredPost>`.
    DbUpdatePost {
        /// Target post within the update author's collection.
        post_id: PostId,
        /// Fields to replace.
        update: PostUpdate,
    },
    /// Deliver a payload. Yields `()`.
    NetSend {
        /// What to send.
        payload: Payload,
        /// Where to send it.
        recipient: Email,
    },
}

impl Operation {
    /// The operation's kind.
    pub const fn tag(&self) -> OperationTag {
        match self {
            Self::CacheGet { .. } => OperationTag::CacheGet,
            Self::CachePut { .. } => OperationTag::CachePut,
            Self::CacheDelete { .. } => OperationTag::CacheDelete,
            Self::DbListPosts { .. } => OperationTag::DbListPosts,
            Self::DbCreatePost { .. } => OperationTag::DbCreatePost,
            Self::DbUpdatePost { .. } => OperationTag::DbUpdatePost,
            Self::NetSend { .. } => OperationTag::NetSend,
        }
    }

    /// The arguments as JSON, exactly as a `Traced` interpreter records them.
    pub fn arguments(&self) -> Value {
        self.trace_record().arguments
    }

    /// Kind and arguments together.
    pub fn trace_record(&self) -> TraceRecord {
        match self {
            Self::CacheGet { key } => TraceRecord::cache_get(key),
            Self::CachePut { key, value } => TraceRecord::cache_put(key, value),
            Self::CacheDelete { key } => TraceRecord::cache_delete(key),
            Self::DbListPosts { user_id } => TraceRecord::db_list_posts(*user_id),
            Self::DbCreatePost { post } => TraceRecord::db_create_post(post),
            Self::DbUpdatePost { post_id, update } => TraceRecord::db_update_post(*post_id, update),
            Self::NetSend { payload, recipient } => TraceRecord::net_send(payload, recipient),
        }
    }
}

/// A blog workflow described as data.
pub type Program<A> = Freer<Operation, A>;
