//! Playoff odds CLI
//!
//! Folds a season's games into Elo ratings, seeds the bracket and writes
//! Monte Carlo playoff odds as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use playoff_core::{run_pipeline, EngineConfig, LoggingConfig, SeasonData};

#[derive(Parser)]
#[command(name = "playoff-odds")]
#[command(version = "0.1.0")]
#[command(about = "Elo ratings and Monte Carlo playoff odds", long_about = None)]
struct Cli {
    /// Season JSON (teams, games, optional standings)
    #[arg(short, long)]
    input: PathBuf,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config directory (default.toml, PLAYOFF_ENV overrides)
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    /// Season year (default: from input, else inferred from today)
    #[arg(long)]
    season: Option<i32>,

    /// Number of Monte Carlo simulations
    #[arg(long)]
    sims: Option<u64>,

    /// Elo K-factor
    #[arg(long)]
    k_factor: Option<f64>,

    /// Home-court Elo adjustment
    #[arg(long)]
    home_adv: Option<f64>,

    /// Monte Carlo RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Draw a fresh seed instead of the configured one
    #[arg(long, conflicts_with = "seed")]
    random_seed: bool,
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},playoff_core={}", logging.level, logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::load_from(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    init_logging(&config.logging);

    if let Some(sims) = cli.sims {
        config.simulation.trials = sims;
    }
    if let Some(k) = cli.k_factor {
        config.model.k_factor = k;
    }
    if let Some(adv) = cli.home_adv {
        config.model.home_court_adv = adv;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if cli.random_seed {
        config.simulation.seed = None;
    }

    let mut data = SeasonData::from_json_file(&cli.input)
        .with_context(|| format!("reading season data from {}", cli.input.display()))?;
    if cli.season.is_some() {
        data.season = cli.season;
    }

    let output = run_pipeline(&data, &config).context("running playoff odds pipeline")?;
    let json = serde_json::to_string_pretty(&output)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Wrote playoff odds");
        }
        None => println!("{json}"),
    }

    Ok(())
}
