//! The three blog workflows over any interpreter.

use super::{cache_get_posts, cache_invalidate, cache_store_posts, net_send_posts};
use crate::chain;
use crate::domain::{Email, Post, PostId, PostUpdate, StoredPost, UserId};
use crate::effect::AsyncIO;
use crate::interpreter::Interpreter;
use crate::workflow::{REVIEW_RECIPIENT, top_posts};

/// Sends a user's posts to the review address, serving them from the cache
/// when possible and filling the cache on a miss.
pub fn review_posts<I: Interpreter>(interpreter: &I, user_id: UserId) -> AsyncIO<()> {
    let interpreter = interpreter.clone();
    chain! {
        cached <= cache_get_posts(&interpreter, user_id);
        posts <= match cached {
            Some(posts) => AsyncIO::pure(posts),
            None => load_and_cache_posts(&interpreter, user_id),
        };
        net_send_posts(&interpreter, &posts, &Email::new(REVIEW_RECIPIENT))
    }
}

fn load_and_cache_posts<I: Interpreter>(interpreter: &I, user_id: UserId) -> AsyncIO<Vec<StoredPost>> {
    let interpreter = interpreter.clone();
    chain! {
        posts <= interpreter.db_list_posts(user_id);
        _ <= cache_store_posts(&interpreter, user_id, &posts);
        AsyncIO::pure(posts)
    }
}

/// Stores `post`, then mails its author their first posts.
pub fn publish_post<I: Interpreter>(interpreter: &I, post: Post) -> AsyncIO<()> {
    let interpreter = interpreter.clone();
    let author = post.author.clone();
    chain! {
        _ <= interpreter.db_create_post(post);
        posts <= interpreter.db_list_posts(author.id);
        let top = top_posts(posts);
        net_send_posts(&interpreter, &top, &author.email)
    }
}

/// Applies `update` to a stored post and drops its author's cached list.
///
/// A missing post yields `None` and leaves the cache alone.
pub fn revise_post<I: Interpreter>(
    interpreter: &I,
    post_id: PostId,
    update: PostUpdate,
) -> AsyncIO<Option<StoredPost>> {
    let invalidator = interpreter.clone();
    interpreter
        .db_update_post(post_id, update)
        .flat_map(move |updated| match updated {
            Some(post) => cache_invalidate(&invalidator, post.author.id).fmap(move |_| Some(post)),
            None => AsyncIO::pure(None),
        })
}
