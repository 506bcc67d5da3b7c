//! PostgreSQL store adapter.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DbConn, EntityTrait, QueryFilter,
    QuerySelect,
};
use uuid::Uuid;

use geopost_core::domain::{BoundingBox, Post};
use geopost_core::error::StoreError;
use geopost_core::ports::{PostStore, PostStream};

use super::entity::account::Entity as AccountEntity;
use super::entity::post::{self, Entity as PostEntity};

/// Configuration for the post database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// PostgreSQL-backed `PostStore`.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Connect with pooled options.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let db = Database::connect(opts)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        tracing::info!(pool = config.max_connections, "post database connected");

        Ok(Self::new(db))
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn create(&self, post: Post) -> Result<Uuid, StoreError> {
        let id = post.id;
        tracing::debug!(author_id = %post.author_id, title = %post.title, "storing post");

        let active: post::ActiveModel = post.into();
        active
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        tracing::debug!(post_id = %id, "reading post");
        let found = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(found.map(Into::into))
    }

    async fn list_by_author(&self, author_id: &str) -> Result<Vec<Post>, StoreError> {
        let rows = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .all(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn scan_all<'a>(&'a self) -> Result<PostStream<'a>, StoreError> {
        let rows = PostEntity::find()
            .stream(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows
            .map(|row| {
                row.map(Post::from)
                    .map_err(|e| StoreError::Query(e.to_string()))
            })
            .boxed())
    }

    async fn query_bounding_box(&self, bounds: BoundingBox) -> Result<Vec<Uuid>, StoreError> {
        let ids = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::Longitude.gte(bounds.min_lon))
            .filter(post::Column::Longitude.lte(bounds.max_lon))
            .filter(post::Column::Latitude.gte(bounds.min_lat))
            .filter(post::Column::Latitude.lte(bounds.max_lat))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(ids)
    }

    async fn account_exists(&self, subject_id: &str) -> Result<bool, StoreError> {
        let found = AccountEntity::find_by_id(subject_id.to_owned())
            .one(&self.db)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(found.is_some())
    }
}
