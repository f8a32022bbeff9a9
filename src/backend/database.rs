use crate::domain::{Post, PostId, PostUpdate, StoredPost, UserId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

type PostTable = BTreeMap<PostId, StoredPost>;

/// Posts partitioned by author. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<HashMap<UserId, PostTable>>>,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `post` as-is, replacing any post with the same author and id.
    pub fn insert(&self, post: StoredPost) {
        self.tables
            .write()
            .entry(post.author.id)
            .or_default()
            .insert(post.id, post);
    }

    /// A user's posts in id order; empty for unknown users.
    pub fn list(&self, user_id: UserId) -> Vec<StoredPost> {
        self.tables
            .read()
            .get(&user_id)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Stores a new post under the next id of its author's table.
    ///
    /// Ids start at 1 and are one past the largest id the author has.
    pub fn create(&self, post: Post) -> StoredPost {
        let mut tables = self.tables.write();
        let table = tables.entry(post.author.id).or_default();
        let id = table
            .keys()
            .next_back()
            .map_or(PostId::new(1), |last| last.next());
        let stored = post.stored_as(id);
        table.insert(id, stored.clone());
        stored
    }

    /// Merges `update` into the post `post_id` of `update.author`.
    ///
    /// Yields `None`, changing nothing, if no such post exists.
    pub fn update(&self, post_id: PostId, update: &PostUpdate) -> Option<StoredPost> {
        let mut tables = self.tables.write();
        let existing = tables.get_mut(&update.author.id)?.get_mut(&post_id)?;
        *existing = update.apply_to(existing);
        Some(existing.clone())
    }

    /// Every author's posts, keyed by author, in id order.
    pub fn snapshot(&self) -> BTreeMap<UserId, Vec<StoredPost>> {
        self.tables
            .read()
            .iter()
            .map(|(user_id, table)| (*user_id, table.values().cloned().collect()))
            .collect()
    }
}
