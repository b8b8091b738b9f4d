//! Opens a world from a TOML config, pre-generates the region around its
//! spawn point and logs what came out.
//!
//! ```text
//! chunk_survey [config.toml]
//! RUST_LOG=veldt_world=debug chunk_survey world.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use veldt_procedural::block::block_type_name;
use veldt_world::{pregenerate, RegionStats, World, WorldConfig, WorldResult};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}

fn run(config_path: Option<PathBuf>) -> WorldResult<()> {
    let config = match config_path {
        Some(path) => WorldConfig::from_file(&path)?,
        None => WorldConfig::default(),
    };
    let world = World::from_config(&config)?;

    let spawn = world.spawn_point();
    let ground = world.get_block(spawn.x, spawn.y - 1, spawn.z);
    tracing::info!(
        x = spawn.x,
        y = spawn.y,
        z = spawn.z,
        ground = block_type_name(ground.block_type()).unwrap_or("unnamed"),
        "spawn point"
    );

    let chunks = pregenerate(&world, spawn.chunk(), config.pregen_radius, config.workers);
    let stats = RegionStats::from_chunks(&chunks);
    tracing::info!(
        chunks = stats.chunks,
        sections = stats.sections,
        kib = stats.bytes / 1024,
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    match run(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "chunk survey failed");
            ExitCode::FAILURE
        }
    }
}
