#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for inspecting Arclune battle tuning.

mod report;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use arclune_core::ArcluneConfig;
use arclune_system_fury::FuryEngine;
use arclune_system_zone_index::ZoneIndex;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Inspect the Arclune board layout and fury tuning.
#[derive(Debug, Parser)]
#[command(name = "arclune", version, about)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the board with each cell's zone code.
    Zones {
        /// Print packed numeric codes instead of labels.
        #[arg(long)]
        numeric: bool,
    },
    /// Print resolved fury ceiling, caps and ultimate cost for a unit.
    Fury {
        /// Unit identifier used for per-unit overrides.
        #[arg(short, long, default_value = "default")]
        unit: String,
    },
}

/// Entry point for the Arclune command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let output = match cli.command {
        Commands::Zones { numeric } => report::render_zones(&ZoneIndex::new(config.grid), numeric),
        Commands::Fury { unit } => report::render_fury(&FuryEngine::new(config.fury), &unit),
    };
    print!("{output}");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ArcluneConfig> {
    let Some(path) = path else {
        return Ok(ArcluneConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    let config = ArcluneConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}
