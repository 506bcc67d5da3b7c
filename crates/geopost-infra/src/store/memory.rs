//! In-memory store - used as fallback when PostgreSQL is not configured
//! and by tests. Data is lost on process restart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use geopost_core::domain::{BoundingBox, Post};
use geopost_core::error::StoreError;
use geopost_core::ports::{PostStore, PostStream};

pub struct MemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    accounts: RwLock<HashSet<String>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            accounts: RwLock::new(HashSet::new()),
        }
    }

    /// Mark a subject id as registered.
    pub async fn register_account(&self, subject_id: impl Into<String>) {
        self.accounts.write().await.insert(subject_id.into());
    }
}

impl Default for MemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, post: Post) -> Result<Uuid, StoreError> {
        let id = post.id;
        self.posts.write().await.insert(id, post);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, StoreError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn scan_all<'a>(&'a self) -> Result<PostStream<'a>, StoreError> {
        // Snapshot under the read lock; the cursor itself never holds it.
        let snapshot: Vec<Post> = self.posts.read().await.values().cloned().collect();
        Ok(futures::stream::iter(snapshot.into_iter().map(Ok::<Post, StoreError>)).boxed())
    }

    async fn query_bounding_box(&self, bounds: BoundingBox) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .filter(|p| bounds.contains(p.coordinates()))
            .map(|p| p.id)
            .collect())
    }

    async fn account_exists(&self, subject_id: &str) -> Result<bool, StoreError> {
        Ok(self.accounts.read().await.contains(subject_id))
    }
}
