//! Domain data: users, posts and network payloads.
//!
//! Users and draft posts are supplied by callers. Stored posts are produced
//! and mutated only by a database handler. Cache keys are derived from user
//! ids so that a user's cached post list can be found and invalidated.

pub mod cached_posts;
mod payload;
mod post;
mod user;

pub use cached_posts::CacheEntryError;
pub use payload::{Payload, PayloadError};
pub use post::{Post, PostId, PostUpdate, StoredPost};
pub use user::{CacheKey, Email, User, UserId};
