use crate::gtiff::{DEFAULT_BLOCK_SIZE, DEFAULT_COMPRESSION};
use crate::pipeline::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "country-tiles")]
#[command(about = "Clip a canopy-height raster to country boundaries and write one reclassified GeoTIFF per country")]
#[command(version)]
pub struct Args {
    /// Source raster (canopy height in metres)
    #[arg(long, value_name = "FILE")]
    pub raster: PathBuf,

    /// Country boundaries (any GDAL vector format, first layer is used)
    #[arg(long, value_name = "FILE")]
    pub boundaries: PathBuf,

    /// Window edge in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 25000)]
    pub tile_size: usize,

    /// Folder for the per-window temporary tiles
    #[arg(long, value_name = "DIR", default_value = "temp")]
    pub temp_dir: PathBuf,

    /// Folder for the final per-country rasters
    #[arg(long, value_name = "DIR", default_value = "result")]
    pub result_dir: PathBuf,

    /// Boundary attribute holding the country code
    #[arg(long, value_name = "FIELD", default_value = "WB_A3")]
    pub code_field: String,

    /// Boundary attribute holding the country name
    #[arg(long, value_name = "FIELD", default_value = "WB_NAME")]
    pub name_field: String,

    /// Compression: DEFLATE, LZW, ZSTD, or NONE
    #[arg(long, value_name = "TYPE", default_value = DEFAULT_COMPRESSION)]
    pub compression: String,

    /// Internal GeoTIFF block size (multiple of 16)
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            raster: self.raster.clone(),
            boundaries: self.boundaries.clone(),
            tile_size: self.tile_size,
            temp_dir: self.temp_dir.clone(),
            result_dir: self.result_dir.clone(),
            code_field: self.code_field.clone(),
            name_field: self.name_field.clone(),
            compression: self.compression.clone(),
            block_size: self.block_size,
        }
    }
}
