use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::domain::{BoundingBox, Post};
use crate::error::StoreError;

/// Lazy cursor over stored posts; store faults surface per item.
pub type PostStream<'a> = BoxStream<'a, Result<Post, StoreError>>;

/// Document-store port for posts and registered accounts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a post and return its id. Ids are allocated at
    /// construction and collision-free; an existing record is never
    /// overwritten.
    async fn create(&self, post: Post) -> Result<Uuid, StoreError>;

    /// Point lookup; absence is `None`, not an error.
    async fn get(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    /// All posts by one author, in unspecified order. Empty is a valid
    /// result.
    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, StoreError>;

    /// Stream the whole collection without materializing it at once.
    /// Used only by the exact proximity strategy.
    async fn scan_all<'a>(&'a self) -> Result<PostStream<'a>, StoreError>;

    /// Ids of posts whose coordinates fall inside the closed box.
    async fn query_bounding_box(&self, bounds: BoundingBox) -> Result<Vec<Uuid>, StoreError>;

    /// Whether the subject id belongs to a registered account.
    /// Absence is the answer, not an error.
    async fn account_exists(&self, subject_id: &str) -> Result<bool, StoreError>;
}
