//! Posts before and after persistence, and partial updates to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::User;

/// Identifier assigned to a post by the database.
///
/// Unique within the author's collection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    /// Wraps a raw post id.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Author of the post.
    pub author: User,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
}

impl Post {
    /// Creates a post draft.
    pub fn new(author: User, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Attaches a database id, producing the stored form.
    #[must_use]
    pub fn stored_as(self, id: PostId) -> StoredPost {
        StoredPost {
            id,
            author: self.author,
            title: self.title,
            body: self.body,
        }
    }
}

/// A post as held by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPost {
    /// Database-assigned id.
    pub id: PostId,
    /// Author of the post.
    pub author: User,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
}

/// A partial change to a stored post.
///
/// `author` locates the collection the post lives in; it is never written to
/// the stored post. Only the fields that are `Some` are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    /// Author whose collection holds the target post.
    pub author: User,
    /// Replacement title, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostUpdate {
    /// An update that changes nothing yet.
    #[must_use]
    pub const fn for_author(author: User) -> Self {
        Self {
            author,
            title: None,
            body: None,
        }
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Merges the present fields onto `existing`.
    #[must_use]
    pub fn apply_to(&self, existing: &StoredPost) -> StoredPost {
        StoredPost {
            id: existing.id,
            author: existing.author.clone(),
            title: self.title.clone().unwrap_or_else(|| existing.title.clone()),
            body: self.body.clone().unwrap_or_else(|| existing.body.clone()),
        }
    }
}

impl From<Post> for PostUpdate {
    /// A full-replacement update carrying every field of `post`.
    fn from(post: Post) -> Self {
        Self {
            author: post.author,
            title: Some(post.title),
            body: Some(post.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn stored() -> StoredPost {
        Post::new(User::new(1, "a@x.com"), "Title", "Body").stored_as(PostId::new(3))
    }

    #[rstest]
    fn stored_as_keeps_fields(stored: StoredPost) {
        assert_eq!(stored.id, PostId::new(3));
        assert_eq!(stored.title, "Title");
        assert_eq!(stored.body, "Body");
        assert_eq!(stored.author, User::new(1, "a@x.com"));
    }

    #[rstest]
    fn empty_update_changes_nothing(stored: StoredPost) {
        let update = PostUpdate::for_author(stored.author.clone());

        assert_eq!(update.apply_to(&stored), stored);
    }

    #[rstest]
    fn title_only_update_keeps_body(stored: StoredPost) {
        let update = PostUpdate::for_author(stored.author.clone()).with_title("New");
        let updated = update.apply_to(&stored);

        assert_eq!(updated.title, "New");
        assert_eq!(updated.body, "Body");
        assert_eq!(updated.id, stored.id);
    }

    #[rstest]
    fn update_never_rewrites_author(stored: StoredPost) {
        let update = PostUpdate::for_author(User::new(1, "other@x.com")).with_body("B2");
        let updated = update.apply_to(&stored);

        assert_eq!(updated.author.email.as_str(), "a@x.com");
        assert_eq!(updated.body, "B2");
    }

    #[rstest]
    fn update_from_post_sets_every_field() {
        let update = PostUpdate::from(Post::new(User::new(2, "b@x.com"), "T", "B"));

        assert_eq!(update.title.as_deref(), Some("T"));
        assert_eq!(update.body.as_deref(), Some("B"));
        assert_eq!(update.author.id.value(), 2);
    }

    #[rstest]
    fn stored_post_json_round_trips(stored: StoredPost) {
        let json = serde_json::to_string(&vec![stored.clone()]).expect("serializes");
        let decoded: Vec<StoredPost> = serde_json::from_str(&json).expect("deserializes");

        assert_eq!(decoded, vec![stored]);
    }

    #[rstest]
    fn post_id_next_increments() {
        assert_eq!(PostId::new(1).next(), PostId::new(2));
    }
}
