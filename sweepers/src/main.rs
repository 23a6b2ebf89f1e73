//! Headless smart sweepers: evolves minesweeping vehicles
//! without drawing them, reporting each generation's scores.
mod controller;
mod params;
mod sweeper;
mod world;

use controller::Controller;
use params::SimulationParameters;

use sweepnet::logging::{EvolutionLogger, ReportingLevel};
use sweepnet::parameters::{ParameterFile, Parameters};
use sweepnet_nn::random::RngSource;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sweepers")]
#[command(version)]
#[command(about = "Evolves neural-network minesweepers with a genetic algorithm")]
struct Args {
    /// Parameter file of `key value` lines
    #[arg(default_value = "params.ini")]
    params: PathBuf,

    /// Number of generations to evolve
    #[arg(short, long, default_value = "100")]
    generations: usize,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print each generation's log as a JSON line
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let file = ParameterFile::load(&args.params)?;
    let parameters = Parameters::from_file(&file)
        .with_context(|| format!("invalid parameters in {}", args.params.display()))?;
    let simulation = SimulationParameters::from_file(&file, &parameters.network)
        .with_context(|| format!("invalid simulation parameters in {}", args.params.display()))?;

    let (evolution_rng, world_rng) = match args.seed {
        Some(seed) => {
            info!("using seed {}", seed);
            (RngSource::seeded(seed), RngSource::seeded(seed.wrapping_add(1)))
        }
        None => (RngSource::from_entropy(), RngSource::from_entropy()),
    };
    let mut controller = Controller::new(parameters, simulation, evolution_rng, world_rng)?;
    let mut logger = EvolutionLogger::new(if args.json {
        ReportingLevel::Champion
    } else {
        ReportingLevel::NoGenomes
    });

    for _ in 0..args.generations {
        controller.run_generation()?;
        if let Some(log) = logger.log(controller.algorithm()) {
            if args.json {
                println!("{}", serde_json::to_string(log)?);
            }
        }
    }

    let best = controller
        .algorithm()
        .fitness_history()
        .iter()
        .map(|record| record.best)
        .max()
        .unwrap_or(0);
    info!(
        "evolved {} generations, best fitness reached {}",
        controller.algorithm().generation(),
        best
    );
    Ok(())
}
