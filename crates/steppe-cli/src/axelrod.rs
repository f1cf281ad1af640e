//! Axelrod cultural-diffusion model.
//!
//! Each agent carries a feature vector of cultural traits. On activation it
//! may relocate (moving landscape only), then interacts with one random
//! neighbor: with probability equal to their cultural similarity it adopts
//! one differing trait. The model-level hook recounts distinct cultures.

use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use std::collections::HashSet;
use steppe_core::{ActContext, Agent, AgentId, ColumnSpec, ColumnValue, Landscape, Model};

#[derive(Clone, Debug, Serialize)]
pub struct AxelrodAgent {
    pub features: Vec<u8>,
    #[serde(skip)]
    prob_veloc: f64,
    #[serde(skip)]
    step_length: f64,
}

/// Shared-trait fraction between two feature vectors.
fn similarity(a: &[u8], b: &[u8]) -> f64 {
    let shared = a.iter().zip(b).filter(|(x, y)| x == y).count();
    shared as f64 / a.len() as f64
}

impl Agent for AxelrodAgent {
    fn act(&mut self, ctx: &mut ActContext<'_, Self>) {
        if self.prob_veloc > 0.0 && ctx.rng().random::<f64>() <= self.prob_veloc {
            ctx.move_randomly(self.step_length)
                .expect("move within retry budget");
        }

        let Some(neighbor) = ctx.random_neighbor().expect("acting agent is placed") else {
            // Nobody in sight this step.
            return;
        };
        let other = ctx
            .agent(neighbor)
            .expect("neighbor is a distinct placed agent")
            .features
            .clone();

        let sim = similarity(&self.features, &other);
        if sim >= 0.99 {
            return;
        }
        if ctx.rng().random::<f64>() <= sim {
            if let Some(i) = self.features.iter().zip(&other).position(|(a, b)| a != b) {
                self.features[i] = other[i];
            }
        }
    }
}

pub struct Axelrod {
    /// Number of distinct cultures, recomputed once per step.
    pub cultures: usize,
    pub traits: u8,
    pub features: usize,
    pub prob_veloc: f64,
    pub step_length: f64,
}

impl Axelrod {
    pub fn new(traits: u8, features: usize, prob_veloc: f64, step_length: f64) -> Self {
        Self {
            cultures: 0,
            traits,
            features,
            prob_veloc,
            step_length,
        }
    }

    fn count_cultures(agents: &[AxelrodAgent]) -> usize {
        agents
            .iter()
            .map(|a| a.features.as_slice())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl Model for Axelrod {
    type Agent = AxelrodAgent;

    fn init(&mut self, _landscape: &Landscape, _rng: &mut ChaCha12Rng) {}

    fn landscape_action(&mut self, _landscape: &Landscape, agents: &[AxelrodAgent]) {
        self.cultures = Self::count_cultures(agents);
    }

    fn create_agent(
        &mut self,
        _id: AgentId,
        _landscape: &Landscape,
        rng: &mut ChaCha12Rng,
    ) -> AxelrodAgent {
        let features = (0..self.features)
            .map(|_| rng.random_range(0..self.traits))
            .collect();
        AxelrodAgent {
            features,
            prob_veloc: self.prob_veloc,
            step_length: self.step_length,
        }
    }

    fn columns() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::visible("cultures", |m: &Axelrod| ColumnValue::Int(m.cultures as i64)),
            ColumnSpec::hidden("traits", |m: &Axelrod| ColumnValue::Int(m.traits as i64)),
            ColumnSpec::hidden("features", |m: &Axelrod| {
                ColumnValue::Int(m.features as i64)
            }),
            ColumnSpec::hidden("pveloc", |m: &Axelrod| ColumnValue::Float(m.prob_veloc)),
            ColumnSpec::hidden("steplength", |m: &Axelrod| {
                ColumnValue::Float(m.step_length)
            }),
        ]
    }
}
