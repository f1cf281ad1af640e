//! Driver-level scenarios: landscape/model wiring, journaling, and the
//! counter guarantees.

use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use steppe_core::{
    ActContext, Agent, AgentId, Journal, Landscape, LandscapeConfig, Model, SimConfig, Simulation,
};

#[derive(Serialize)]
struct Drifter {
    id: u32,
    interactions: usize,
}

impl Agent for Drifter {
    fn act(&mut self, ctx: &mut ActContext<'_, Self>) {
        if matches!(ctx.landscape(), Landscape::Continuous(_)) {
            ctx.move_randomly(0.2).expect("move within retry budget");
        }
        if let Some(neighbor) = ctx.random_neighbor().expect("id is placed") {
            assert_ne!(neighbor, ctx.id());
            self.interactions += 1;
        }
    }
}

struct DrifterModel;

impl Model for DrifterModel {
    type Agent = Drifter;

    fn init(&mut self, _landscape: &Landscape, _rng: &mut ChaCha12Rng) {}

    fn landscape_action(&mut self, _landscape: &Landscape, _agents: &[Drifter]) {}

    fn create_agent(
        &mut self,
        id: AgentId,
        _landscape: &Landscape,
        _rng: &mut ChaCha12Rng,
    ) -> Drifter {
        Drifter {
            id: id.0,
            interactions: 0,
        }
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn grid_two_by_two_scenario() {
    let config = SimConfig::new(42, LandscapeConfig::Grid { size: 2 });
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.init().unwrap();

    // Row-major ids: the handle for id 2 is the index-2 agent.
    assert_eq!(sim.agent(AgentId(2)).unwrap().id, 2);
    assert!(sim.agent(AgentId(4)).is_none());

    // Each agent on the 2x2 torus has exactly two distinct non-self
    // neighbors, so the dump carries 8 directed links.
    let links = sim.landscape().links();
    assert_eq!(links.len(), 8);
    assert!(links.iter().all(|l| l.source != l.target));
}

#[test]
fn lone_continuous_agent_never_finds_a_neighbor() {
    let config = SimConfig::new(
        7,
        LandscapeConfig::Continuous {
            size: 10.0,
            sight: 0.01,
            n_agents: 1,
        },
    );
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.init().unwrap();
    for _ in 0..50 {
        sim.step().unwrap();
    }
    assert_eq!(sim.agent(AgentId(0)).unwrap().interactions, 0);
}

#[test]
fn counters_track_steps_and_activations() {
    let config = SimConfig::new(
        3,
        LandscapeConfig::Continuous {
            size: 10.0,
            sight: 1.0,
            n_agents: 30,
        },
    );
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.init().unwrap();
    for _ in 0..100 {
        sim.step().unwrap();
    }
    assert_eq!(sim.stats().steps, 100);
    assert_eq!(sim.stats().events, 100 * 30);
}

#[test]
fn continuous_positions_stay_in_bounds_across_a_run() {
    let config = SimConfig::new(
        99,
        LandscapeConfig::Continuous {
            size: 5.0,
            sight: 0.5,
            n_agents: 40,
        },
    );
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.init().unwrap();
    for _ in 0..200 {
        sim.step().unwrap();
        for id in 0..40u32 {
            let pos = sim.landscape().position(AgentId(id)).unwrap();
            assert!((0.0..5.0).contains(&pos[0]), "{pos:?}");
            assert!((0.0..5.0).contains(&pos[1]), "{pos:?}");
        }
    }
}

#[test]
fn journal_records_one_parseable_snapshot_per_step() {
    let mut config = SimConfig::new(
        5,
        LandscapeConfig::Continuous {
            size: 4.0,
            sight: 3.0,
            n_agents: 9,
        },
    );
    config.journaled = true;

    let buf = SharedBuf::default();
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.set_journal(Journal::new(Box::new(buf.clone())));
    sim.init().unwrap();
    for _ in 0..4 {
        sim.step().unwrap();
    }
    sim.stop().unwrap();

    let written = buf.0.lock().unwrap().clone();
    let text = String::from_utf8(written).unwrap();
    let lines: Vec<&str> = text.trim_end().split('\n').collect();
    assert_eq!(lines.len(), 4);
    for line in lines {
        let snapshot: Value = serde_json::from_str(line).unwrap();
        assert_eq!(snapshot["nodes"].as_array().unwrap().len(), 9);
        for link in snapshot["links"].as_array().unwrap() {
            assert_ne!(link["source"], link["target"]);
        }
    }
}

#[test]
fn journal_failure_does_not_abort_the_run() {
    struct Broken;
    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink gone"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut config = SimConfig::new(5, LandscapeConfig::Grid { size: 3 });
    config.journaled = true;
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.set_journal(Journal::new(Box::new(Broken)));
    sim.init().unwrap();
    for _ in 0..10 {
        sim.step().unwrap();
    }
    assert_eq!(sim.stats().steps, 10);
}

#[test]
fn stop_is_safe_without_a_journal_and_idempotent() {
    let config = SimConfig::new(1, LandscapeConfig::Grid { size: 2 });
    let mut sim = Simulation::new(DrifterModel, &config).unwrap();
    sim.init().unwrap();
    sim.step().unwrap();
    sim.stop().unwrap();
    sim.stop().unwrap();
}
