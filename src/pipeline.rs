use crate::boundaries::{intersected_countries, load_boundaries};
use crate::context::ProcessingContext;
use crate::crs;
use crate::error::Result;
use crate::gtiff;
use crate::io;
use crate::layout::OutputLayout;
use crate::mosaic;
use crate::scheduler;
use log::{debug, info};
use std::path::PathBuf;

/// Everything one run needs, usually built from the command line
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub raster: PathBuf,
    pub boundaries: PathBuf,
    pub tile_size: usize,
    pub temp_dir: PathBuf,
    pub result_dir: PathBuf,
    pub code_field: String,
    pub name_field: String,
    pub compression: String,
    pub block_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Codes of the countries overlapping the raster, in boundary file order
    pub countries: Vec<String>,
    pub windows: usize,
    pub tiles: usize,
    pub mosaics: Vec<PathBuf>,
}

/// Clip, reclassify and mosaic the raster for every country it overlaps.
///
/// The source raster is closed before mosaicking starts. The first error
/// stops the run; temporary tiles written so far are left on disk.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    gtiff::validate_compression(&config.compression)?;
    gtiff::validate_block_size(config.block_size)?;

    let (dataset, metadata) = io::open_raster(&config.raster)?;
    let boundaries = load_boundaries(&config.boundaries, &config.code_field, &config.name_field)?;

    let crs_match = crs::compare_projections(&metadata.projection, boundaries.projection.as_deref());
    debug!("CRS check: {:?}", crs_match);

    let countries = intersected_countries(&metadata.bounds(), &boundaries);
    info!("Countries intersecting the raster: {:?}", countries);

    let layout = OutputLayout::new(&config.temp_dir, &config.result_dir);
    let ctx = ProcessingContext::new(&metadata, layout, &config.compression, config.block_size);

    let schedule = scheduler::process_windows(
        &ctx,
        &dataset,
        &metadata,
        &boundaries,
        &countries,
        config.tile_size,
    )?;
    drop(dataset);

    let mut mosaicked: Vec<&str> = Vec::new();
    let mut mosaics = Vec::new();
    for code in &countries {
        let name = boundaries.find(code)?.name.as_str();
        // Two codes sharing a name share a temp folder
        if mosaicked.contains(&name) {
            debug!("{} already mosaicked", name);
            continue;
        }
        mosaicked.push(name);

        if let Some(path) = mosaic::mosaic_country(&ctx, name)? {
            mosaics.push(path);
        }
    }

    let summary = RunSummary {
        countries,
        windows: schedule.windows,
        tiles: schedule.tiles,
        mosaics,
    };
    info!(
        "Processed {} windows, wrote {} tiles and {} country rasters",
        summary.windows,
        summary.tiles,
        summary.mosaics.len()
    );

    Ok(summary)
}
