//! The cache entry format: a user's post list as a JSON array.
//!
//! Entries are advisory. One that cannot be decoded is treated as a miss,
//! and a list that cannot be encoded is simply not cached.

use thiserror::Error;

use super::{StoredPost, UserId};

/// Error converting between a post list and its cache entry.
#[derive(Debug, Error)]
pub enum CacheEntryError {
    /// The post list could not be serialized.
    #[error("cache entry encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
    /// The entry is not a JSON array of stored posts.
    #[error("cache entry is not a post list: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serializes a post list into a cache entry.
///
/// # Errors
///
/// Returns [`CacheEntryError::Encode`] if serialization fails.
pub fn encode_posts(posts: &[StoredPost]) -> Result<String, CacheEntryError> {
    serde_json::to_string(posts).map_err(CacheEntryError::Encode)
}

/// Parses a cache entry back into a post list.
///
/// # Errors
///
/// Returns [`CacheEntryError::Decode`] if `raw` is not a JSON array of posts.
pub fn decode_posts(raw: &str) -> Result<Vec<StoredPost>, CacheEntryError> {
    serde_json::from_str(raw).map_err(CacheEntryError::Decode)
}

pub(crate) fn read_entry(user_id: UserId, raw: &str) -> Option<Vec<StoredPost>> {
    decode_posts(raw)
        .inspect_err(|error| {
            tracing::warn!(%user_id, %error, "ignoring undecodable cache entry");
        })
        .ok()
}

pub(crate) fn write_entry(user_id: UserId, posts: &[StoredPost]) -> Option<String> {
    encode_posts(posts)
        .inspect_err(|error| {
            tracing::warn!(%user_id, %error, "not caching posts");
        })
        .ok()
}
