//! Dynamic point index over continuous 2-D space, backed by an R*-tree.

use crate::AgentId;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use std::{error::Error, fmt};

/// One indexed point: an agent id at a position.
#[derive(Clone, Debug, PartialEq)]
pub struct PointEntity {
    pub id: AgentId,
    pub position: [f64; 2],
}

impl RTreeObject for PointEntity {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for PointEntity {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// A relocate was requested for an entity not present at the given
    /// position. Indicates programmer misuse; the index has no recovery.
    MissingEntity { id: AgentId },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::MissingEntity { id } => {
                write!(f, "agent {id} is not present in the spatial index")
            }
        }
    }
}

impl Error for IndexError {}

/// Radius-query index over point entities.
///
/// Queries are seam-blind: distances are raw Euclidean, so no entity is
/// found across the toroidal boundary. May return the querying entity
/// itself; self-exclusion is the caller's responsibility.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    tree: RTree<PointEntity>,
}

impl SpatialIndex {
    /// Build from all entities at once via bulk_load (O(n log n)).
    pub fn bulk_load(entities: Vec<PointEntity>) -> Self {
        Self {
            tree: RTree::bulk_load(entities),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn insert(&mut self, id: AgentId, position: [f64; 2]) {
        self.tree.insert(PointEntity { id, position });
    }

    /// Move one entity from `from` to `to` without touching any other entry.
    pub fn relocate(&mut self, id: AgentId, from: [f64; 2], to: [f64; 2]) -> Result<(), IndexError> {
        self.tree
            .remove(&PointEntity { id, position: from })
            .ok_or(IndexError::MissingEntity { id })?;
        self.tree.insert(PointEntity { id, position: to });
        Ok(())
    }

    /// Ids of all entities within `radius` of `center`.
    ///
    /// Uses an AABB envelope query then filters by squared Euclidean
    /// distance.
    pub fn query_radius(&self, center: [f64; 2], radius: f64) -> Vec<AgentId> {
        let envelope = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        let r_sq = radius * radius;

        self.tree
            .locate_in_envelope(&envelope)
            .filter(|entity| entity.distance_2(&center) <= r_sq)
            .map(|entity| entity.id)
            .collect()
    }
}
