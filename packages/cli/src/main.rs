use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quayside_twin::domain::tracing::{shared_tracer, EventSink};
use quayside_twin::{run_scenario, ScenarioConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Quayside terminal simulator
#[derive(Parser)]
#[command(name = "quayside")]
#[command(about = "Discrete-event simulation of a container terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print its summary as JSON
    Run {
        /// Scenario file; the built-in two-vessel scenario when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the run horizon
        #[arg(long)]
        until: Option<f64>,
        /// Write every port event to this file as JSON
        #[arg(long)]
        events: Option<PathBuf>,
        /// Write final yard stack heights to this file as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Print the built-in scenario as JSON
    DefaultConfig,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            seed,
            until,
            events,
            snapshot,
        } => run(config.as_deref(), seed, until, events.as_deref(), snapshot.as_deref()),
        Commands::DefaultConfig => {
            println!("{}", ScenarioConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn run(
    config_path: Option<&Path>,
    seed: Option<u64>,
    until: Option<f64>,
    events_path: Option<&Path>,
    snapshot_path: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if until.is_some() {
        config.until = until;
    }

    let tracer = shared_tracer();
    let mut sinks: Vec<Box<dyn EventSink>> = Vec::new();
    if events_path.is_some() {
        sinks.push(Box::new(tracer.clone()));
    }

    let run = run_scenario(&config, sinks).context("running scenario")?;
    println!("{}", serde_json::to_string_pretty(&run.outcome)?);

    if let Some(path) = events_path {
        let tracer = tracer.lock();
        if tracer.dropped() > 0 {
            tracing::warn!(dropped = tracer.dropped(), "event buffer overflowed");
        }
        write_json(path, &tracer.export())?;
        info!(events = tracer.len(), path = %path.display(), "events written");
    }
    if let Some(path) = snapshot_path {
        write_json(path, &run.snapshot())?;
        info!(path = %path.display(), "yard snapshot written");
    }
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
