//! Proximity query engine.
//!
//! Two interchangeable strategies answer "which posts lie within radius
//! R of a point". [`ExactGeodesic`] streams the whole collection and
//! filters on great-circle distance; [`BoundingBoxQuery`] pushes an
//! indexable rectangle predicate into the store and applies no distance
//! refinement at all. The trade-off is exactness versus a full scan per
//! query.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use uuid::Uuid;

use crate::domain::{BoundingBox, Coordinates, Post, haversine_meters};
use crate::error::DomainError;
use crate::ports::PostStore;

/// Result of a proximity query. The exact strategy yields full records,
/// the bounding-box strategy only the matching identifiers.
#[derive(Debug, Clone)]
pub enum ProximityMatches {
    Records(Vec<Post>),
    Ids(Vec<Uuid>),
}

#[async_trait]
pub trait ProximityStrategy: Send + Sync {
    async fn find_within_radius(
        &self,
        store: &dyn PostStore,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<ProximityMatches, DomainError>;
}

/// Strategy A: stream every stored post and keep those whose geodesic
/// distance to the reference point is within the radius.
///
/// O(n) scan and O(n) distance computations per query - correct, but it
/// requires the store to stream the full collection on every request.
pub struct ExactGeodesic;

#[async_trait]
impl ProximityStrategy for ExactGeodesic {
    async fn find_within_radius(
        &self,
        store: &dyn PostStore,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<ProximityMatches, DomainError> {
        let radius_m = radius_km * 1000.0;

        let mut posts = store.scan_all().await?;
        let mut matches = Vec::new();
        while let Some(post) = posts.try_next().await? {
            if haversine_meters(center, post.coordinates()) <= radius_m {
                matches.push(post);
            }
        }

        if matches.is_empty() {
            return Err(DomainError::NoneNearby {
                radius_km,
                longitude: center.longitude,
                latitude: center.latitude,
            });
        }

        Ok(ProximityMatches::Records(matches))
    }
}

/// Strategy B: convert the radius to a degree span and delegate a
/// four-sided range query to the store.
///
/// Matches form a square rather than a disc: a post just beyond the
/// radius near a box corner may be included, and the ids come back
/// without distance refinement. Filtering happens inside the store's
/// indexable range predicate instead of in this process.
pub struct BoundingBoxQuery;

#[async_trait]
impl ProximityStrategy for BoundingBoxQuery {
    async fn find_within_radius(
        &self,
        store: &dyn PostStore,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<ProximityMatches, DomainError> {
        let ids = store
            .query_bounding_box(BoundingBox::around(center, radius_km))
            .await?;

        if ids.is_empty() {
            return Err(DomainError::NoneNearby {
                radius_km,
                longitude: center.longitude,
                latitude: center.latitude,
            });
        }

        Ok(ProximityMatches::Ids(ids))
    }
}

/// Which strategy the service runs with; a deployment-time choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Exact,
    BoundingBox,
}

impl StrategyKind {
    pub fn build(self) -> Arc<dyn ProximityStrategy> {
        match self {
            StrategyKind::Exact => Arc::new(ExactGeodesic),
            StrategyKind::BoundingBox => Arc::new(BoundingBoxQuery),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(StrategyKind::Exact),
            "bounding-box" => Ok(StrategyKind::BoundingBox),
            other => Err(format!("unknown proximity strategy '{other}'")),
        }
    }
}
