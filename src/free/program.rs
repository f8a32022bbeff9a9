//! Smart constructors: one single-operation program per operation kind, plus
//! the post-level helpers the workflows are written with.
//!
//! None of these perform anything; they only describe.

use super::{Operation, Program};
use crate::domain::cached_posts::{read_entry, write_entry};
use crate::domain::{CacheKey, Email, Payload, Post, PostId, PostUpdate, StoredPost, UserId};

/// Reads a cache entry.
pub fn cache_get(key: CacheKey) -> Program<Option<String>> {
    Program::lift(Operation::CacheGet { key })
}

/// Writes a cache entry.
pub fn cache_put(key: CacheKey, value: String) -> Program<bool> {
    Program::lift(Operation::CachePut { key, value })
}

/// Removes a cache entry.
pub fn cache_delete(key: CacheKey) -> Program<bool> {
    Program::lift(Operation::CacheDelete { key })
}

/// Lists a user's posts.
pub fn db_list_posts(user_id: UserId) -> Program<Vec<StoredPost>> {
    Program::lift(Operation::DbListPosts { user_id })
}

/// Stores a new post.
pub fn db_create_post(post: Post) -> Program<StoredPost> {
    Program::lift(Operation::DbCreatePost { post })
}

/// Updates a stored post.
pub fn db_update_post(post_id: PostId, update: PostUpdate) -> Program<Option<StoredPost>> {
    Program::lift(Operation::DbUpdatePost { post_id, update })
}

/// Sends a payload.
pub fn net_send(payload: Payload, recipient: Email) -> Program<()> {
    Program::lift(Operation::NetSend { payload, recipient })
}

// =============================================================================
// Post-level helpers
// =============================================================================

/// A user's cached post list. Misses and undecodable entries are `None`.
pub fn cache_get_posts(user_id: UserId) -> Program<Option<Vec<StoredPost>>> {
    cache_get(CacheKey::for_user(user_id))
        .map(move |entry| entry.and_then(|raw| read_entry(user_id, &raw)))
}

/// Caches a user's post list. A list that cannot be encoded is not written
/// and yields `false`.
pub fn cache_store_posts(user_id: UserId, posts: &[StoredPost]) -> Program<bool> {
    match write_entry(user_id, posts) {
        Some(raw) => cache_put(CacheKey::for_user(user_id), raw),
        None => Program::pure(false),
    }
}

/// Drops a user's cached post list.
pub fn cache_invalidate(user_id: UserId) -> Program<bool> {
    cache_delete(CacheKey::for_user(user_id))
}

/// Sends a post list.
pub fn net_send_posts(posts: &[StoredPost], recipient: &Email) -> Program<()> {
    net_send(Payload::posts(posts), recipient.clone())
}
