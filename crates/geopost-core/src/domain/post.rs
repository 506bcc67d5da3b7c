use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::Coordinates;

/// Post entity - a short message pinned to a geographic coordinate.
///
/// A post is never mutated after creation; the service has no update or
/// delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Subject id of the author as issued by the identity provider.
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub longitude: f64,
    pub latitude: f64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a freshly allocated id.
    pub fn new(
        author_id: String,
        title: String,
        content: String,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            longitude,
            latitude,
            created_at: Utc::now(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }
}
