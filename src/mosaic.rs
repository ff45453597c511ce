use crate::context::ProcessingContext;
use crate::error::{CountryTilesError, Result};
use crate::geotransform::GeoTransform;
use crate::gtiff;
use crate::io;
use crate::reclass::NODATA;
use gdal::Dataset;
use log::{debug, info, warn};
use ndarray::{Array2, Zip};
use std::path::{Path, PathBuf};

/// Placement of one temporary tile, read without its pixels
#[derive(Debug, Clone)]
pub struct TileFootprint {
    pub path: PathBuf,
    pub geotransform: GeoTransform,
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub projection: String,
}

impl TileFootprint {
    pub fn read(path: &Path) -> Result<Self> {
        // Dropped before returning, so only one tile is open at a time
        let dataset = Dataset::open(path)?;
        let metadata = io::extract_metadata_from_dataset(&dataset)?;

        Ok(Self {
            path: path.to_path_buf(),
            geotransform: metadata.geotransform,
            width: metadata.width,
            height: metadata.height,
            band_count: metadata.band_count,
            projection: metadata.projection,
        })
    }
}

/// Output grid covering every tile, with each tile's pixel offset in it
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicPlan {
    pub geotransform: GeoTransform,
    pub width: usize,
    pub height: usize,
    pub offsets: Vec<(usize, usize)>,
}

fn mismatch(tile: &TileFootprint) -> CountryTilesError {
    CountryTilesError::MismatchedTileGrid(tile.path.display().to_string())
}

/// Lay all tiles out on the pixel grid of the first one
pub fn plan_mosaic(tiles: &[TileFootprint]) -> Result<MosaicPlan> {
    let Some(reference) = tiles.first() else {
        return Err(CountryTilesError::InvalidDimensions(0, 0));
    };
    let inverse = reference.geotransform.invert()?;

    let mut origins = Vec::with_capacity(tiles.len());
    for tile in tiles {
        if !tile.geotransform.same_resolution(&reference.geotransform)
            || tile.band_count != reference.band_count
        {
            return Err(mismatch(tile));
        }

        let [x, _, _, y, _, _] = tile.geotransform.coefficients();
        let (col, row) = inverse.apply(x, y);
        let (col_rounded, row_rounded) = (col.round(), row.round());
        if (col - col_rounded).abs() > 1e-6 || (row - row_rounded).abs() > 1e-6 {
            return Err(mismatch(tile));
        }
        origins.push((col_rounded as i64, row_rounded as i64));
    }

    let min_col = origins.iter().map(|o| o.0).min().unwrap_or_default();
    let min_row = origins.iter().map(|o| o.1).min().unwrap_or_default();
    let max_col = origins
        .iter()
        .zip(tiles)
        .map(|(o, t)| o.0 + t.width as i64)
        .max()
        .unwrap_or_default();
    let max_row = origins
        .iter()
        .zip(tiles)
        .map(|(o, t)| o.1 + t.height as i64)
        .max()
        .unwrap_or_default();

    Ok(MosaicPlan {
        geotransform: reference.geotransform.shifted(min_col as f64, min_row as f64),
        width: (max_col - min_col) as usize,
        height: (max_row - min_row) as usize,
        offsets: origins
            .iter()
            .map(|&(col, row)| ((col - min_col) as usize, (row - min_row) as usize))
            .collect(),
    })
}

/// Copy the valid pixels of `src` over `dst`; nodata in `src` leaves `dst` as is
pub fn paint(dst: &mut Array2<u8>, src: &Array2<u8>) {
    Zip::from(dst).and(src).for_each(|d, &s| {
        if s != NODATA {
            *d = s;
        }
    });
}

/// Merge every temporary tile of a country into `<result>/<name>/<name>.tif`.
///
/// Tiles are painted in file-name order and later tiles win where they
/// overlap. A country without tiles writes nothing and returns `None`.
pub fn mosaic_country(ctx: &ProcessingContext, country_name: &str) -> Result<Option<PathBuf>> {
    let tile_paths = ctx.layout.list_tiles(country_name)?;
    if tile_paths.is_empty() {
        info!("No tiles for {}, nothing to mosaic", country_name);
        return Ok(None);
    }

    let footprints = tile_paths
        .iter()
        .map(|path| TileFootprint::read(path))
        .collect::<Result<Vec<_>>>()?;
    let plan = plan_mosaic(&footprints)?;

    // The last opened tile supplies the shared metadata
    let template = &footprints[footprints.len() - 1];
    let band_count = template.band_count;

    info!(
        "Mosaicking {} tiles of {} into {}x{} pixels",
        footprints.len(),
        country_name,
        plan.width,
        plan.height
    );

    let output_path = ctx.layout.result_path(country_name)?;
    let mut output = io::create_output_dataset(
        &output_path,
        plan.width,
        plan.height,
        band_count,
        &ctx.creation_options,
    )?;
    output.set_geo_transform(&plan.geotransform.coefficients())?;
    output.set_projection(&template.projection)?;

    for band_index in 1..=band_count {
        let mut band = output.rasterband(band_index)?;
        band.set_no_data_value(Some(f64::from(NODATA)))?;
        band.fill(f64::from(NODATA), None)?;
    }

    for (footprint, &offset) in footprints.iter().zip(&plan.offsets) {
        debug!("Painting {} at {:?}", footprint.path.display(), offset);
        let tile = Dataset::open(&footprint.path)?;
        let size = (footprint.width, footprint.height);

        for band_index in 1..=band_count {
            let src = io::read_band_region(&tile, band_index, (0, 0), size)?;
            let mut dst = io::read_band_region(&output, band_index, offset, size)?;
            paint(&mut dst, &src);
            io::write_band_region(&mut output, band_index, offset, &dst)?;
        }
    }

    if !gtiff::is_tiled(&output)? {
        warn!("{} was written without internal tiling", output_path.display());
    }

    info!("Wrote {}", output_path.display());
    Ok(Some(output_path))
}
