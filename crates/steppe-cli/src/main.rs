mod axelrod;
mod output;

use anyhow::Result;
use axelrod::Axelrod;
use clap::{Args, Parser, Subcommand};
use output::RunOutput;
use rand::Rng;
use steppe_core::{LandscapeConfig, Model, SimConfig, Simulation, TableWriter};
use tracing::info;

/// Axelrod cultural-diffusion runs on steppe landscapes.
#[derive(Parser)]
#[command(name = "steppe")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CommonArgs {
    /// Number of cultural traits per feature.
    #[arg(long, default_value_t = 5)]
    traits: u8,

    /// Number of cultural features.
    #[arg(long, default_value_t = 5)]
    features: usize,

    /// Number of simulation steps.
    #[arg(long, default_value_t = 200)]
    runs: usize,

    /// RNG seed; random per run when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Journal all simulation states (one network snapshot per step).
    #[arg(long)]
    journal: bool,

    /// Output directory for run artifacts.
    #[arg(long, default_value = "out")]
    out: String,

    /// Id of the run; random if not provided.
    #[arg(long)]
    run_id: Option<String>,

    /// Write the aggregated table log to a file instead of stdout.
    #[arg(long)]
    log_to_file: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Static model: one agent per cell of a fixed grid, no movement.
    Grid {
        /// Width/height of the landscape.
        #[arg(long, default_value_t = 10)]
        size: usize,
    },
    /// Moving model: agents drift through continuous space.
    Moving {
        /// Width/height of the landscape.
        #[arg(long, default_value_t = 10.0)]
        size: f64,

        /// Number of agents to simulate.
        #[arg(long, default_value_t = 100)]
        agents: usize,

        /// Radius in which agents can interact.
        #[arg(long, default_value_t = 1.0)]
        sight: f64,

        /// Maximal distance an agent can travel per step.
        #[arg(long, default_value_t = 0.1)]
        steplength: f64,

        /// Probability that an agent moves.
        #[arg(long, default_value_t = 0.05)]
        pveloc: f64,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let (landscape, model) = match cli.command {
        Command::Grid { size } => (
            LandscapeConfig::Grid { size },
            Axelrod::new(cli.common.traits, cli.common.features, 0.0, 0.0),
        ),
        Command::Moving {
            size,
            agents,
            sight,
            steplength,
            pveloc,
        } => (
            LandscapeConfig::Continuous {
                size,
                sight,
                n_agents: agents,
            },
            Axelrod::new(cli.common.traits, cli.common.features, pveloc, steplength),
        ),
    };
    run(cli.common, landscape, model)
}

fn run(args: CommonArgs, landscape: LandscapeConfig, model: Axelrod) -> Result<()> {
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut config = SimConfig::new(seed, landscape);
    config.journaled = args.journal;

    let run_output = RunOutput::prepare(&args.out, args.run_id)?;
    info!(
        run_id = %run_output.run_id,
        seed,
        agents = config.landscape.agent_count(),
        "starting run"
    );

    let mut sim = Simulation::new(model, &config)?;
    if args.journal {
        sim.set_journal(run_output.open_journal()?);
    }
    sim.init()?;

    let mut table = TableWriter::new(run_output.open_log(args.log_to_file)?);
    let columns = Axelrod::columns();

    for _ in 0..args.runs {
        sim.step()?;
        table.write_row(&sim.stats(), sim.model(), &columns)?;
        if sim.model().cultures == 1 {
            info!(steps = sim.stats().steps, "culture converged");
            break;
        }
    }
    sim.stop()?;
    info!(
        steps = sim.stats().steps,
        events = sim.stats().events,
        cultures = sim.model().cultures,
        "run finished"
    );
    Ok(())
}
