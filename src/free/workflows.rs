//! The three blog workflows as free programs.

use super::{
    Program, cache_get_posts, cache_invalidate, cache_store_posts, db_create_post, db_list_posts,
    db_update_post, net_send_posts,
};
use crate::chain;
use crate::domain::{Email, Post, PostId, PostUpdate, StoredPost, UserId};
use crate::workflow::{REVIEW_RECIPIENT, top_posts};

/// Sends a user's posts to the review address, serving them from the cache
/// when possible and filling the cache on a miss.
pub fn review_posts(user_id: UserId) -> Program<()> {
    chain! {
        cached <= cache_get_posts(user_id);
        posts <= match cached {
            Some(posts) => Program::pure(posts),
            None => load_and_cache_posts(user_id),
        };
        net_send_posts(&posts, &Email::new(REVIEW_RECIPIENT))
    }
}

fn load_and_cache_posts(user_id: UserId) -> Program<Vec<StoredPost>> {
    chain! {
        posts <= db_list_posts(user_id);
        _ <= cache_store_posts(user_id, &posts);
        Program::pure(posts)
    }
}

/// Stores `post`, then mails its author their first posts.
pub fn publish_post(post: Post) -> Program<()> {
    let author = post.author.clone();
    chain! {
        _ <= db_create_post(post);
        posts <= db_list_posts(author.id);
        let top = top_posts(posts);
        net_send_posts(&top, &author.email)
    }
}

/// Applies `update` to a stored post and drops its author's cached list.
///
/// A missing post yields `None` and leaves the cache alone.
pub fn revise_post(post_id: PostId, update: PostUpdate) -> Program<Option<StoredPost>> {
    db_update_post(post_id, update).flat_map(|updated| match updated {
        Some(post) => cache_invalidate(post.author.id).map(move |_| Some(post)),
        None => Program::pure(None),
    })
}
