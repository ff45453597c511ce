use crate::boundaries::Country;
use crate::context::ProcessingContext;
use crate::error::Result;
use crate::geotransform::GeoTransform;
use crate::io;
use crate::mask::geometry_mask;
use crate::reclass::{reclassify, EXCLUDE_SENTINEL};
use geo::{BooleanOps, MultiPolygon, Rect};
use log::{debug, info, warn};
use ndarray::{Array2, Array3, Axis, Zip};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ClippedTile {
    pub path: PathBuf,
    /// Pixels per band that fell outside the country
    pub masked_pixels: usize,
}

/// Part of the country inside the window, all parts kept
pub fn clip_geometry(country: &Country, window_bounds: &Rect<f64>) -> MultiPolygon<f64> {
    let window = MultiPolygon::new(vec![window_bounds.to_polygon()]);
    country.geometry.intersection(&window)
}

/// Replace every masked pixel of every band with the exclusion sentinel
pub fn apply_mask(window_data: &Array3<u16>, mask: &Array2<bool>) -> Array3<u16> {
    let mut clipped = window_data.clone();
    for band in clipped.axis_iter_mut(Axis(0)) {
        Zip::from(band).and(mask).for_each(|value, &outside| {
            if outside {
                *value = EXCLUDE_SENTINEL;
            }
        });
    }
    clipped
}

/// Mask one window to one country, reclassify it and write the temporary tile
/// `<temp>/<country name>/output_<x>_<y>.tif`.
pub fn clip_and_save_by_country(
    ctx: &ProcessingContext,
    window_transform: &GeoTransform,
    country: &Country,
    window_data: &Array3<u16>,
    window_bounds: &Rect<f64>,
    origin: (usize, usize),
) -> Result<ClippedTile> {
    let clipped_geometry = clip_geometry(country, window_bounds);
    if clipped_geometry.0.is_empty() {
        warn!(
            "{} only touches window ({}, {}), writing a fully masked tile",
            country.code, origin.0, origin.1
        );
    }

    let (_, rows, cols) = window_data.dim();
    let mask = geometry_mask(&clipped_geometry, (rows, cols), window_transform)?;
    let masked_pixels = mask.iter().filter(|&&outside| outside).count();
    debug!(
        "{}: {} of {} pixels outside the boundary",
        country.code,
        masked_pixels,
        rows * cols
    );

    let classes = reclassify(&apply_mask(window_data, &mask));

    let path = ctx.layout.tile_path(&country.name, origin.0, origin.1)?;
    io::write_u8_raster(
        &path,
        &classes,
        window_transform,
        &ctx.projection,
        &ctx.creation_options,
    )?;
    info!("{}", path.display());

    Ok(ClippedTile { path, masked_pixels })
}
