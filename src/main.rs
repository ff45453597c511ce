use clap::Parser;
use env_logger::Env;
use log::info;

use country_tiles::cli::Args;
use country_tiles::pipeline;
use country_tiles::Result;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== Country Tiles ===");
    info!("Raster: {}", args.raster.display());
    info!("Boundaries: {}", args.boundaries.display());
    info!("Tile size: {} px", args.tile_size);

    let summary = pipeline::run(&args.pipeline_config())?;

    for path in &summary.mosaics {
        info!("  {}", path.display());
    }

    info!("=== Done! ===");
    Ok(())
}
