//! Simulation driver: wires a user model to a landscape and owns the step
//! loop.

use crate::config::{ConfigError, SimConfig};
use crate::journal::Journal;
use crate::landscape::{Landscape, LandscapeError};
use crate::report::ColumnSpec;
use crate::AgentId;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use std::{error::Error, fmt};

/// Monotonic run counters: total agent activations and completed steps.
/// Reset only at simulation construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub events: u64,
    pub steps: u64,
}

/// A user-supplied model: global per-step behavior plus the per-slot agent
/// factory.
pub trait Model {
    type Agent: Agent;

    /// Called once, before the landscape population triggers
    /// [`create_agent`](Model::create_agent) for every slot.
    fn init(&mut self, landscape: &Landscape, rng: &mut ChaCha12Rng);

    /// Global once-per-step hook, invoked before any agent activates.
    fn landscape_action(&mut self, landscape: &Landscape, agents: &[Self::Agent]);

    /// Factory producing the user handle for one spatial slot. Invoked in
    /// id order during initialization, exactly once per slot.
    fn create_agent(
        &mut self,
        id: AgentId,
        landscape: &Landscape,
        rng: &mut ChaCha12Rng,
    ) -> Self::Agent;

    /// Columns the tabular logger should print for this model. Hidden
    /// columns are declared but skipped in output.
    fn columns() -> Vec<ColumnSpec<Self>>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Per-agent behavior, bound 1:1 to a spatial slot.
///
/// `Serialize` is required because agents are the nodes of journaled
/// network snapshots.
pub trait Agent: Sized + Serialize {
    /// One activation. Side effects are limited to the agent's own state
    /// and the landscape/agent operations exposed by `ctx`.
    fn act(&mut self, ctx: &mut ActContext<'_, Self>);
}

/// Capabilities handed to an agent for one activation.
///
/// Built on split borrows: the acting agent is borrowed apart from the
/// rest of the population, so it can read or mutate other agents while
/// mutating itself and the landscape.
pub struct ActContext<'a, A> {
    id: AgentId,
    landscape: &'a mut Landscape,
    before: &'a mut [A],
    after: &'a mut [A],
    rng: &'a mut ChaCha12Rng,
}

impl<'a, A> ActContext<'a, A> {
    /// Identifier of the acting agent.
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn landscape(&self) -> &Landscape {
        self.landscape
    }

    pub fn rng(&mut self) -> &mut ChaCha12Rng {
        self.rng
    }

    /// Another agent's handle; `None` for the acting agent's own id or an
    /// id outside the population.
    pub fn agent(&self, id: AgentId) -> Option<&A> {
        let idx = id.index();
        if idx < self.before.len() {
            Some(&self.before[idx])
        } else {
            // idx == before.len() is the acting agent itself.
            idx.checked_sub(self.before.len() + 1)
                .and_then(|i| self.after.get(i))
        }
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut A> {
        let idx = id.index();
        if idx < self.before.len() {
            Some(&mut self.before[idx])
        } else {
            idx.checked_sub(self.before.len() + 1)
                .and_then(|i| self.after.get_mut(i))
        }
    }

    /// Pick a random neighbor of the acting agent. `Ok(None)` means nobody
    /// is in reach this step, a normal outcome.
    pub fn random_neighbor(&mut self) -> Result<Option<AgentId>, LandscapeError> {
        self.landscape.random_neighbor(self.id, self.rng)
    }

    /// Move the acting agent by `step_length` in a random direction.
    pub fn move_randomly(&mut self, step_length: f64) -> Result<(), LandscapeError> {
        self.landscape.move_randomly(self.id, step_length, self.rng)
    }
}

#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    /// `init` was called on an already-initialized simulation.
    AlreadyInitialized,
    /// `step` was called before `init`.
    NotInitialized,
    Landscape(LandscapeError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(e) => write!(f, "{e}"),
            EngineError::AlreadyInitialized => {
                write!(f, "simulation is already initialized")
            }
            EngineError::NotInitialized => {
                write!(f, "simulation must be initialized before stepping")
            }
            EngineError::Landscape(e) => write!(f, "{e}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Config(e) => Some(e),
            EngineError::Landscape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

impl From<LandscapeError> for EngineError {
    fn from(err: LandscapeError) -> Self {
        EngineError::Landscape(err)
    }
}

/// Discrete-time simulation over one landscape and one model.
///
/// Execution is single-threaded and strictly sequential: within a step the
/// agents activate one at a time in a freshly drawn random permutation, so
/// an activation may observe effects of agents already activated in the
/// same step.
pub struct Simulation<M: Model> {
    model: M,
    landscape: Landscape,
    agents: Vec<M::Agent>,
    rng: ChaCha12Rng,
    stats: Stats,
    journaled: bool,
    journal: Option<Journal>,
    initialized: bool,
}

impl<M: Model> Simulation<M> {
    pub fn new(model: M, config: &SimConfig) -> Result<Self, EngineError> {
        let landscape = Landscape::new(&config.landscape)?;
        Ok(Self {
            model,
            landscape,
            agents: Vec::new(),
            rng: ChaCha12Rng::seed_from_u64(config.seed),
            stats: Stats::default(),
            journaled: config.journaled,
            journal: None,
            initialized: false,
        })
    }

    /// Attach the journal sink snapshots are appended to. Only consulted
    /// when the configuration enables journaling.
    pub fn set_journal(&mut self, journal: Journal) {
        self.journal = Some(journal);
    }

    /// Initialize the run: the model receives the landscape reference
    /// first, then the population is created through the model's agent
    /// factory, one handle per slot in id order. Exactly once per run.
    pub fn init(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }
        self.model.init(&self.landscape, &mut self.rng);

        let count = self.landscape.agent_count();
        self.agents.reserve_exact(count);
        for i in 0..count {
            let agent = self
                .model
                .create_agent(AgentId(i as u32), &self.landscape, &mut self.rng);
            self.agents.push(agent);
        }
        self.initialized = true;
        tracing::debug!(agents = count, "simulation initialized");
        Ok(())
    }

    /// Run one discrete step: the model's global hook, then every agent
    /// exactly once in a random permutation, then counters and an optional
    /// journal snapshot.
    pub fn step(&mut self) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        self.model.landscape_action(&self.landscape, &self.agents);

        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.shuffle(&mut self.rng);

        for idx in order {
            let (before, rest) = self.agents.split_at_mut(idx);
            let (agent, after) = rest
                .split_first_mut()
                .expect("permutation index within population");
            let mut ctx = ActContext {
                id: AgentId(idx as u32),
                landscape: &mut self.landscape,
                before,
                after,
                rng: &mut self.rng,
            };
            agent.act(&mut ctx);
        }

        self.stats.events += self.agents.len() as u64;
        self.stats.steps += 1;

        if self.journaled {
            if let Some(journal) = self.journal.as_mut() {
                let snapshot = self.landscape.snapshot(&self.agents);
                // The journal is an observability side channel; a failed
                // write must not abort the run.
                if let Err(e) = journal.append(&snapshot) {
                    tracing::warn!(step = self.stats.steps, error = %e, "journal write failed");
                }
            }
        }
        Ok(())
    }

    /// Flush and close the journal. Idempotent; call once at the end of a
    /// run.
    pub fn stop(&mut self) -> Result<(), std::io::Error> {
        if let Some(journal) = self.journal.take() {
            journal.finish()?;
        }
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn agents(&self) -> &[M::Agent] {
        &self.agents
    }

    /// The exact handle created for `id`, or `None` outside `[0, N)`.
    pub fn agent(&self, id: AgentId) -> Option<&M::Agent> {
        self.agents.get(id.index())
    }
}
