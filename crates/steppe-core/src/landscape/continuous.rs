//! Continuous-space landscape with movement, backed by the dynamic index.

use super::{LandscapeError, Link};
use crate::spatial::{PointEntity, SpatialIndex};
use crate::AgentId;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::f64::consts::PI;

/// Bound on re-draws when a wrapped move still lands out of bounds
/// (possible when `step_length` exceeds the world size). Exhausting it is
/// an invariant violation, not something to retry forever.
const MAX_MOVE_RETRIES: u32 = 8;

/// `n` agents over `[0, size)²` interacting within a `sight` radius.
///
/// Positions start on an implicit lattice and mutate only through
/// [`move_randomly`](ContinuousLandscape::move_randomly); ids never change.
#[derive(Clone, Debug)]
pub struct ContinuousLandscape {
    size: f64,
    sight: f64,
    positions: Vec<[f64; 2]>,
    index: SpatialIndex,
}

impl ContinuousLandscape {
    pub fn new(size: f64, sight: f64, n_agents: usize) -> Self {
        let positions = Self::lattice_layout(size, n_agents);
        let entities = positions
            .iter()
            .enumerate()
            .map(|(i, &position)| PointEntity {
                id: AgentId(i as u32),
                position,
            })
            .collect();
        Self {
            size,
            sight,
            positions,
            index: SpatialIndex::bulk_load(entities),
        }
    }

    /// Initial placement: a `ceil(sqrt(n))`-per-side lattice scaled into
    /// `[0, size)`, filled row by row.
    fn lattice_layout(size: f64, n_agents: usize) -> Vec<[f64; 2]> {
        let side = (n_agents as f64).sqrt().ceil().max(1.0);
        let spacing = size / side;
        let side = side as usize;
        (0..n_agents)
            .map(|i| {
                let col = i % side;
                let row = i / side;
                [col as f64 * spacing, row as f64 * spacing]
            })
            .collect()
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn sight(&self) -> f64 {
        self.sight
    }

    pub fn agent_count(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, id: AgentId) -> Option<[f64; 2]> {
        self.positions.get(id.index()).copied()
    }

    /// All agents within the sight radius of `id`, excluding `id` itself.
    pub fn neighbors_in_sight(&self, id: AgentId) -> Result<Vec<AgentId>, LandscapeError> {
        let center = self
            .position(id)
            .ok_or(LandscapeError::UnknownAgent { id })?;
        Ok(self
            .index
            .query_radius(center, self.sight)
            .into_iter()
            .filter(|&other| other != id)
            .collect())
    }

    /// Uniform choice among the agents in sight; `Ok(None)` when nobody is.
    pub fn random_neighbor(
        &self,
        id: AgentId,
        rng: &mut ChaCha12Rng,
    ) -> Result<Option<AgentId>, LandscapeError> {
        let candidates = self.neighbors_in_sight(id)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(Some(candidates[rng.random_range(0..candidates.len())]))
    }

    /// Displace `id` by `step_length` in a uniformly random direction,
    /// wrapping each axis independently. A wrapped coordinate that is still
    /// outside `[0, size)` discards the draw and retries with a fresh
    /// direction, up to [`MAX_MOVE_RETRIES`].
    pub fn move_randomly(
        &mut self,
        id: AgentId,
        step_length: f64,
        rng: &mut ChaCha12Rng,
    ) -> Result<(), LandscapeError> {
        let from = self
            .position(id)
            .ok_or(LandscapeError::UnknownAgent { id })?;

        for _ in 0..MAX_MOVE_RETRIES {
            let theta = rng.random::<f64>() * 2.0 * PI;
            let candidate = [
                Self::wrap(from[0] + step_length * theta.cos(), self.size),
                Self::wrap(from[1] + step_length * theta.sin(), self.size),
            ];
            if !self.in_bounds(candidate) {
                continue;
            }
            self.index.relocate(id, from, candidate)?;
            self.positions[id.index()] = candidate;
            return Ok(());
        }
        Err(LandscapeError::MoveOutOfBounds {
            id,
            retries: MAX_MOVE_RETRIES,
        })
    }

    // Single re-entry per axis: a coordinate that exits one edge comes back
    // on the opposite one.
    fn wrap(coordinate: f64, size: f64) -> f64 {
        if coordinate < 0.0 {
            coordinate + size
        } else if coordinate > size {
            coordinate - size
        } else {
            coordinate
        }
    }

    fn in_bounds(&self, position: [f64; 2]) -> bool {
        position
            .iter()
            .all(|&c| (0.0..self.size).contains(&c) && c.is_finite())
    }

    /// One directed link per sight-radius neighbor with a differing id.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for id in 0..self.positions.len() {
            let source = AgentId(id as u32);
            for target in self.index.query_radius(self.positions[id], self.sight) {
                if target != source {
                    links.push(Link { source, target });
                }
            }
        }
        links
    }
}
