//! Post repository over the transactional store
//!
//! The backing document has a single top-level key, `posts`, mapping post
//! id to post:
//!
//! ```json
//! {"posts": {"<id>": {"id": "<id>", "title": "...", ...}}}
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::config::StoreConfig;
use super::database::Database;
use super::errors::{StoreError, StoreResult};
use crate::post::{Post, PostAttributes, PostPatch};

/// Root document of a post store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTable {
    #[serde(default)]
    pub posts: BTreeMap<String, Post>,
}

/// Transactional store of posts keyed by id.
pub struct PostStore {
    db: Database<PostTable>,
}

impl PostStore {
    /// Opens (or creates) an unseeded store.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Self::open_seeded(config, Vec::new())
    }

    /// Opens (or creates) a store and inserts `seed` keyed by post id.
    ///
    /// The table is committed in its own transaction before any seed row is
    /// written, so seeding an existing file only ever adds or replaces rows.
    ///
    /// # Errors
    ///
    /// `BLOG_INVALID_RECORD` if a seed post has an empty id or title; the
    /// seeding transaction is aborted as a whole.
    pub fn open_seeded<I>(config: StoreConfig, seed: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = Post>,
    {
        let db = Database::<PostTable>::open(config)?;

        // Materializes {"posts": {}} on a fresh file
        db.write(|_table| Ok(()))?;

        let seed: Vec<Post> = seed.into_iter().collect();
        if !seed.is_empty() {
            let count = seed.len();
            db.write(|table| {
                for post in seed {
                    post.check().map_err(StoreError::invalid_record)?;
                    table.posts.insert(post.id().to_owned(), post);
                }
                Ok(())
            })?;
            info!(count, "STORE_SEEDED");
        }

        Ok(Self { db })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        self.db.path()
    }

    /// Every stored post, in ascending id order.
    pub fn all(&self) -> Vec<Post> {
        self.db.read(|table| table.posts.values().cloned().collect())
    }

    /// The post stored under `id`, or `None`.
    pub fn find(&self, id: &str) -> Option<Post> {
        self.db.read(|table| table.posts.get(id).cloned())
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.db.read(|table| table.posts.len())
    }

    /// True when no post is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a new post under a freshly generated id and returns it.
    pub fn create(&self, attrs: PostAttributes, created_at: DateTime<Utc>) -> StoreResult<Post> {
        let post = Post::new(Uuid::new_v4().to_string(), attrs, created_at);
        post.check().map_err(StoreError::invalid_record)?;

        self.db.write(|table| {
            table.posts.insert(post.id().to_owned(), post.clone());
            Ok(())
        })?;

        info!(post_id = post.id(), "POST_CREATED");
        Ok(post)
    }

    /// Lays `patch` over the post stored under `id` and returns the result.
    ///
    /// Read, merge and write happen in one transaction. A patch that sets a
    /// new id moves the row to that key. An empty patch only looks the post
    /// up and opens no write transaction.
    ///
    /// # Errors
    ///
    /// - `BLOG_RECORD_NOT_FOUND` if no post is stored under `id`
    /// - `BLOG_INVALID_RECORD` if the merged post breaks an invariant or its
    ///   new id is already taken
    pub fn update(&self, id: &str, patch: PostPatch) -> StoreResult<Post> {
        if patch.is_empty() {
            return self.find(id).ok_or_else(|| StoreError::record_not_found(id));
        }

        let merged = self.db.write(|table| {
            let current = table
                .posts
                .get(id)
                .ok_or_else(|| StoreError::record_not_found(id))?;
            let merged = current.merge(&patch);
            merged.check().map_err(StoreError::invalid_record)?;

            if merged.id() != id {
                if table.posts.contains_key(merged.id()) {
                    return Err(StoreError::invalid_record(format!(
                        "cannot move post '{}' to id '{}': id already taken",
                        id,
                        merged.id()
                    )));
                }
                table.posts.remove(id);
            }

            table.posts.insert(merged.id().to_owned(), merged.clone());
            Ok(merged)
        })?;

        info!(post_id = merged.id(), "POST_UPDATED");
        Ok(merged)
    }

    /// Removes the post stored under `id`. Returns whether a post was removed;
    /// removing an absent id is not an error.
    pub fn destroy(&self, id: &str) -> StoreResult<bool> {
        let removed = self.db.write(|table| Ok(table.posts.remove(id).is_some()))?;
        info!(post_id = id, removed, "POST_DESTROYED");
        Ok(removed)
    }

    /// Consumes the handle and logs `STORE_CLOSE`. Nothing is buffered, so
    /// there is nothing to flush: every committed transaction is already on
    /// disk and dropping the store is equivalent.
    pub fn close(self) {
        info!(path = %self.db.path().display(), "STORE_CLOSE");
    }
}
