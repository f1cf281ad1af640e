//! Discrete-time agent-based-modeling kernel.
//!
//! The engine owns spatial placement, neighbor discovery, and the stepping
//! protocol; user models plug in per-agent behavior through the [`Model`]
//! and [`Agent`] traits. Two landscape kinds are provided: a fixed grid with
//! no movement and a continuous space backed by a dynamic spatial index.

pub mod config;
pub mod journal;
pub mod landscape;
pub mod report;
pub mod sim;
pub mod spatial;

pub use config::{ConfigError, LandscapeConfig, SimConfig};
pub use journal::Journal;
pub use landscape::{Landscape, LandscapeError, Link, NetworkSnapshot};
pub use report::{ColumnSpec, ColumnValue, TableWriter};
pub use sim::{ActContext, Agent, EngineError, Model, Simulation, Stats};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense agent identifier, assigned once per landscape instance.
///
/// Ids form the contiguous range `[0, N)` and double as indices into every
/// per-agent collection (slots, user handles); they are stable across moves
/// and never reused while the landscape exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
