//! The spatial container and neighbor-resolution authority for a run.

pub mod continuous;
pub mod grid;

pub use continuous::ContinuousLandscape;
pub use grid::GridLandscape;

use crate::config::{ConfigError, LandscapeConfig};
use crate::AgentId;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// One directed adjacency edge in a network snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: AgentId,
    pub target: AgentId,
}

/// Point-in-time view of the landscape as a graph: the ordered user agent
/// handles plus the directed adjacency derived from current spatial
/// relationships. Self-links are excluded.
#[derive(Debug, Serialize)]
pub struct NetworkSnapshot<'a, A> {
    pub nodes: &'a [A],
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandscapeError {
    /// An operation named an id outside `[0, N)`.
    UnknownAgent { id: AgentId },
    /// A move was requested on a landscape kind without movement.
    MovementUnsupported,
    /// A move's post-wrap position stayed out of bounds past the retry
    /// budget. The spatial model would be inconsistent if this were
    /// accepted, so the run must stop.
    MoveOutOfBounds { id: AgentId, retries: u32 },
    Index(crate::spatial::IndexError),
}

impl fmt::Display for LandscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandscapeError::UnknownAgent { id } => {
                write!(f, "agent {id} is not placed on this landscape")
            }
            LandscapeError::MovementUnsupported => {
                write!(f, "this landscape kind does not support movement")
            }
            LandscapeError::MoveOutOfBounds { id, retries } => write!(
                f,
                "move of agent {id} stayed out of bounds after {retries} retries"
            ),
            LandscapeError::Index(e) => write!(f, "{e}"),
        }
    }
}

impl Error for LandscapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LandscapeError::Index(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::spatial::IndexError> for LandscapeError {
    fn from(err: crate::spatial::IndexError) -> Self {
        LandscapeError::Index(err)
    }
}

/// Closed variant over the two landscape kinds.
///
/// Both kinds place their full agent population at construction; only
/// positions mutate afterwards. All coordinate arithmetic wraps toroidally.
#[derive(Clone, Debug)]
pub enum Landscape {
    Grid(GridLandscape),
    Continuous(ContinuousLandscape),
}

impl Landscape {
    pub fn new(config: &LandscapeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(match *config {
            LandscapeConfig::Grid { size } => Landscape::Grid(GridLandscape::new(size)),
            LandscapeConfig::Continuous {
                size,
                sight,
                n_agents,
            } => Landscape::Continuous(ContinuousLandscape::new(size, sight, n_agents)),
        })
    }

    /// Number of placed agents; ids are exactly `[0, agent_count)`.
    pub fn agent_count(&self) -> usize {
        match self {
            Landscape::Grid(g) => g.agent_count(),
            Landscape::Continuous(c) => c.agent_count(),
        }
    }

    pub fn contains(&self, id: AgentId) -> bool {
        id.index() < self.agent_count()
    }

    /// Current position of an agent. Grid cells report their integer
    /// coordinates as floats.
    pub fn position(&self, id: AgentId) -> Option<[f64; 2]> {
        match self {
            Landscape::Grid(g) => g.cell_of(id).map(|(x, y)| [x as f64, y as f64]),
            Landscape::Continuous(c) => c.position(id),
        }
    }

    /// Pick a random neighbor of `id`.
    ///
    /// `Ok(None)` is a normal outcome (empty sight radius, or a degenerate
    /// grid where every direction resolves to the agent itself), not an
    /// error.
    pub fn random_neighbor(
        &self,
        id: AgentId,
        rng: &mut ChaCha12Rng,
    ) -> Result<Option<AgentId>, LandscapeError> {
        match self {
            Landscape::Grid(g) => g.random_neighbor(id, rng),
            Landscape::Continuous(c) => c.random_neighbor(id, rng),
        }
    }

    /// Displace `id` by `step_length` in a uniformly random direction,
    /// wrapping toroidally. Fails on the grid kind, which has no movement.
    pub fn move_randomly(
        &mut self,
        id: AgentId,
        step_length: f64,
        rng: &mut ChaCha12Rng,
    ) -> Result<(), LandscapeError> {
        match self {
            Landscape::Grid(_) => Err(LandscapeError::MovementUnsupported),
            Landscape::Continuous(c) => c.move_randomly(id, step_length, rng),
        }
    }

    /// Directed adjacency under the current spatial relationships, one link
    /// per neighbor with a differing id.
    pub fn links(&self) -> Vec<Link> {
        match self {
            Landscape::Grid(g) => g.links(),
            Landscape::Continuous(c) => c.links(),
        }
    }

    /// Build a network snapshot pairing the caller-owned ordered handles
    /// with the current adjacency.
    pub fn snapshot<'a, A>(&self, nodes: &'a [A]) -> NetworkSnapshot<'a, A> {
        NetworkSnapshot {
            nodes,
            links: self.links(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        assert!(Landscape::new(&LandscapeConfig::Grid { size: 0 }).is_err());
        assert!(Landscape::new(&LandscapeConfig::Continuous {
            size: -1.0,
            sight: 1.0,
            n_agents: 4,
        })
        .is_err());
    }

    #[test]
    fn contains_covers_exactly_the_id_range() {
        let land = Landscape::new(&LandscapeConfig::Grid { size: 3 }).unwrap();
        assert_eq!(land.agent_count(), 9);
        for id in 0..9 {
            assert!(land.contains(AgentId(id)));
        }
        assert!(!land.contains(AgentId(9)));
    }

    #[test]
    fn grid_rejects_movement() {
        use rand::SeedableRng;
        let mut land = Landscape::new(&LandscapeConfig::Grid { size: 2 }).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert_eq!(
            land.move_randomly(AgentId(0), 1.0, &mut rng),
            Err(LandscapeError::MovementUnsupported)
        );
    }

    #[test]
    fn snapshot_serializes_in_journal_format() {
        let land = Landscape::new(&LandscapeConfig::Grid { size: 2 }).unwrap();
        let nodes = vec![0u8, 1, 2, 3];
        let snap = land.snapshot(&nodes);
        let json: serde_json::Value = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["nodes"], serde_json::json!([0, 1, 2, 3]));
        assert!(json["links"]
            .as_array()
            .unwrap()
            .iter()
            .all(|l| l["source"] != l["target"]));
    }
}
