//! Parameters shared by both encodings of the workflows.

use crate::domain::StoredPost;

/// Where reviewed post lists are sent.
pub const REVIEW_RECIPIENT: &str = "review@example.com";

/// How many posts an author is sent after publishing.
pub const TOP_POSTS: usize = 3;

/// The first [`TOP_POSTS`] posts, in the order given.
pub fn top_posts(mut posts: Vec<StoredPost>) -> Vec<StoredPost> {
    posts.truncate(TOP_POSTS);
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Post, PostId, User};
    use rstest::rstest;

    fn posts(count: u64) -> Vec<StoredPost> {
        let author = User::new(1, "john@example.com");
        (1..=count)
            .map(|id| Post::new(author.clone(), "t", "b").stored_as(PostId::new(id)))
            .collect()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(3, 3)]
    #[case(5, 3)]
    fn keeps_at_most_three(#[case] total: u64, #[case] expected: usize) {
        assert_eq!(top_posts(posts(total)).len(), expected);
    }

    #[rstest]
    fn keeps_leading_posts() {
        let ids: Vec<_> = top_posts(posts(5)).into_iter().map(|post| post.id).collect();

        assert_eq!(ids, vec![PostId::new(1), PostId::new(2), PostId::new(3)]);
    }
}
