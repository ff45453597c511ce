use crate::error::{CountryTilesError, Result};
use gdal::{Dataset, Metadata};
use log::debug;

pub const DEFAULT_COMPRESSION: &str = "LZW";
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Codecs accepted by `--compression`, spelled as GDAL's `COMPRESS` option
const COMPRESSIONS: [&str; 4] = ["LZW", "DEFLATE", "ZSTD", "NONE"];

pub fn validate_compression(compression: &str) -> Result<()> {
    if COMPRESSIONS.contains(&compression) {
        Ok(())
    } else {
        Err(CountryTilesError::InvalidCompression(compression.to_string()))
    }
}

/// GeoTIFF internal tiles must be a positive multiple of 16 pixels
pub fn validate_block_size(block_size: usize) -> Result<()> {
    match block_size {
        0 => Err(CountryTilesError::InvalidBlockSize(block_size)),
        n if n % 16 != 0 => Err(CountryTilesError::InvalidBlockSize(block_size)),
        _ => Ok(()),
    }
}

/// Creation options shared by temporary tiles and country rasters
pub fn create_dataset_options(compression: &str, block_size: usize) -> Vec<String> {
    let mut options = vec![
        "TILED=YES".to_string(),
        format!("BLOCKXSIZE={}", block_size),
        format!("BLOCKYSIZE={}", block_size),
        "BIGTIFF=IF_SAFER".to_string(),
    ];
    if compression != "NONE" {
        options.insert(0, format!("COMPRESS={}", compression));
    }
    options
}

/// True when the dataset is stored in square internal blocks rather than
/// full-width strips
pub fn is_tiled(dataset: &Dataset) -> Result<bool> {
    let (width, _height) = dataset.raster_size();
    let (block_x, block_y) = dataset.rasterband(1)?.block_size();

    // Strips always span the full width; tiles are multiples of 16
    let tiled = block_x != width || (block_x == block_y && block_x % 16 == 0);
    debug!("Block layout {}x{} on width {}: tiled={}", block_x, block_y, width, tiled);
    Ok(tiled)
}

/// Compression recorded on a written GeoTIFF, if any
pub fn compression(dataset: &Dataset) -> Option<String> {
    dataset.metadata_item("COMPRESSION", "IMAGE_STRUCTURE")
}
