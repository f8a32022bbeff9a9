//! Tagless-final encoding.
//!
//! Workflows are generic functions over any [`Interpreter`]: they call its
//! handlers directly and sequence the resulting [`AsyncIO`] actions. Nothing
//! runs until the returned action is run, and the interpreter is fixed when
//! the workflow is built.
//!
//! ```rust
//! use blog_effects::backend::{LatencyProfile, ReferenceBackend};
//! use blog_effects::domain::{Post, User};
//! use blog_effects::tagless;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//!
//! let backend = ReferenceBackend::with_latency(LatencyProfile::zero());
//! let john = User::new(1, "john@example.com");
//! let action = tagless::workflows::publish_post(&backend, Post::new(john, "Hello", "World"));
//!
//! runtime.block_on(action.run_async());
//! assert_eq!(backend.outbox().len(), 1);
//! ```

pub mod workflows;

use crate::domain::cached_posts::{read_entry, write_entry};
use crate::domain::{CacheKey, Email, Payload, StoredPost, UserId};
use crate::effect::AsyncIO;
use crate::interpreter::Interpreter;

/// A user's cached post list. Misses and undecodable entries are `None`.
pub fn cache_get_posts<I: Interpreter>(
    interpreter: &I,
    user_id: UserId,
) -> AsyncIO<Option<Vec<StoredPost>>> {
    interpreter
        .cache_get(&CacheKey::for_user(user_id))
        .fmap(move |entry| entry.and_then(|raw| read_entry(user_id, &raw)))
}

/// Caches a user's post list. A list that cannot be encoded is not written
/// and yields `false`.
pub fn cache_store_posts<I: Interpreter>(
    interpreter: &I,
    user_id: UserId,
    posts: &[StoredPost],
) -> AsyncIO<bool> {
    match write_entry(user_id, posts) {
        Some(raw) => interpreter.cache_put(&CacheKey::for_user(user_id), raw),
        None => AsyncIO::pure(false),
    }
}

/// Drops a user's cached post list.
pub fn cache_invalidate<I: Interpreter>(interpreter: &I, user_id: UserId) -> AsyncIO<bool> {
    interpreter.cache_delete(&CacheKey::for_user(user_id))
}

/// Sends a post list.
pub fn net_send_posts<I: Interpreter>(
    interpreter: &I,
    posts: &[StoredPost],
    recipient: &Email,
) -> AsyncIO<()> {
    interpreter.net_send(Payload::posts(posts), recipient)
}
