use std::{error::Error, fmt};

/// Which landscape backs the simulation, with its shape parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum LandscapeConfig {
    /// `size × size` grid, one agent per cell, no movement.
    Grid { size: usize },
    /// `n_agents` agents over `[0, size)²` with radius-`sight` interaction.
    Continuous {
        size: f64,
        sight: f64,
        n_agents: usize,
    },
}

/// Construction-time simulation parameters.
///
/// Everything the original system kept in process-wide flags is explicit
/// here; the seed feeds a simulation-scoped `ChaCha12Rng`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub seed: u64,
    pub landscape: LandscapeConfig,
    /// When true, `Simulation::step` appends one network snapshot per step
    /// to the attached journal.
    pub journaled: bool,
}

impl SimConfig {
    pub fn new(seed: u64, landscape: LandscapeConfig) -> Self {
        Self {
            seed,
            landscape,
            journaled: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.landscape.validate()
    }
}

impl LandscapeConfig {
    /// Number of agents this configuration will place.
    pub fn agent_count(&self) -> usize {
        match self {
            LandscapeConfig::Grid { size } => size * size,
            LandscapeConfig::Continuous { n_agents, .. } => *n_agents,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            LandscapeConfig::Grid { size } => {
                if size == 0 {
                    return Err(ConfigError::EmptyLandscape);
                }
            }
            LandscapeConfig::Continuous {
                size,
                sight,
                n_agents,
            } => {
                if n_agents == 0 {
                    return Err(ConfigError::EmptyLandscape);
                }
                if !size.is_finite() || size <= 0.0 {
                    return Err(ConfigError::InvalidParameter {
                        name: "size",
                        value: size,
                    });
                }
                if !sight.is_finite() || sight < 0.0 {
                    return Err(ConfigError::InvalidParameter {
                        name: "sight",
                        value: sight,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    EmptyLandscape,
    InvalidParameter { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyLandscape => {
                write!(f, "landscape must place at least one agent")
            }
            ConfigError::InvalidParameter { name, value } => {
                write!(f, "{name} ({value}) is out of range")
            }
        }
    }
}

impl Error for ConfigError {}
