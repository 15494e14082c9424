//! # Encounter Room Entry Point
//!
//! Loads a request, populates a room and prints a JSON summary of the result.

use clap::Parser;
use encounter_room::{
    Catalog, EncounterConfig, EncounterRequest, EncounterService, EntityId, MonsterGroup, Room,
    RoomResult,
};
use serde::Serialize;
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::{error, info};

#[cfg(not(feature = "dev-tools"))]
use log::{error, info};

/// Command line arguments for the encounter room generator.
#[derive(Parser, Debug)]
#[command(name = "encounter_room")]
#[command(about = "Populate a tabletop RPG encounter room")]
#[command(version)]
struct Args {
    /// Encounter request (JSON)
    #[arg(short, long)]
    request: PathBuf,

    /// Monster and item catalog (JSON); the built-in starter catalog if omitted
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Service configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// JSON document printed on success.
#[derive(Serialize)]
struct Summary<'a> {
    room_id: EntityId,
    xp_budget: u32,
    adjusted_xp: u32,
    monster_groups: &'a [MonsterGroup],
    displaced: &'a [EntityId],
    failed: Vec<String>,
    room: &'a Room,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting encounter_room v{}", encounter_room::VERSION);

    if let Err(err) = run(&args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> RoomResult<()> {
    let mut config = match &args.config {
        Some(path) => EncounterConfig::load(path)?,
        None => EncounterConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::starter(),
    };
    let request = EncounterRequest::load(&args.request)?;

    info!("Generating encounter with seed: {}", config.seed);
    let mut service = EncounterService::new(config, catalog);
    let (room_id, report) = service.generate(&request)?;
    let room = service.room(room_id)?;

    let summary = Summary {
        room_id,
        xp_budget: report.xp_budget,
        adjusted_xp: report.adjusted_xp,
        monster_groups: &report.monster_groups,
        displaced: &report.batch.displaced,
        failed: report
            .batch
            .failed
            .iter()
            .map(|(id, err)| format!("{}: {}", id, err))
            .collect(),
        room,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Initializes logging based on the provided log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .target(env_logger::Target::Stderr)
            .init();
    }
}
