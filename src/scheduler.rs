use crate::boundaries::{BoundaryCollection, Country};
use crate::clip;
use crate::context::ProcessingContext;
use crate::error::Result;
use crate::io::{self, RasterMetadata};
use crate::tiling::TileGrid;
use gdal::Dataset;
use log::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub windows: usize,
    pub tiles: usize,
}

/// Walk the source raster window by window and write a temporary tile for
/// every (window, country) pair that overlaps. Only one window is held in
/// memory at a time; the first failure aborts the walk.
pub fn process_windows(
    ctx: &ProcessingContext,
    dataset: &Dataset,
    metadata: &RasterMetadata,
    boundaries: &BoundaryCollection,
    intersected: &[String],
    tile_size: usize,
) -> Result<ScheduleSummary> {
    let grid = TileGrid::new(metadata.width, metadata.height, tile_size)?;
    let countries = intersected
        .iter()
        .map(|code| boundaries.find(code))
        .collect::<Result<Vec<&Country>>>()?;

    let mut summary = ScheduleSummary::default();

    for ((x, y), window) in grid.iter() {
        info!(
            "Processing window x={} y={} (origin {}, {})",
            x, y, window.x_offset, window.y_offset
        );
        summary.windows += 1;

        let window_transform = ctx.geotransform.window_transform(window.x_offset, window.y_offset);
        let window_bounds = window_transform.bounds(window.width, window.height);

        let overlapping: Vec<&Country> = countries
            .iter()
            .copied()
            .filter(|country| {
                let hit = country.intersects_bounds(&window_bounds);
                if !hit {
                    debug!("{} does not overlap window ({}, {})", country.code, x, y);
                }
                hit
            })
            .collect();
        if overlapping.is_empty() {
            continue;
        }

        let window_data = io::read_window(dataset, &window, metadata.band_count)?;
        for country in overlapping {
            clip::clip_and_save_by_country(
                ctx,
                &window_transform,
                country,
                &window_data,
                &window_bounds,
                (window.x_offset, window.y_offset),
            )?;
            summary.tiles += 1;
        }
    }

    info!("Processed {} windows, wrote {} tiles", summary.windows, summary.tiles);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::OutputLayout;
    use gdal::raster::Buffer;
    use gdal::DriverManager;
    use geo::{polygon, MultiPolygon};
    use std::path::Path;

    fn square(code: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Country {
        Country {
            code: code.to_string(),
            name: format!("{}-land", code),
            geometry: MultiPolygon::new(vec![polygon![
                (x: min_x, y: min_y),
                (x: max_x, y: min_y),
                (x: max_x, y: max_y),
                (x: min_x, y: max_y),
            ]]),
        }
    }

    fn write_source(path: &Path, size: usize) -> (Dataset, RasterMetadata) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver.create_with_band_type::<u8, _>(path, size, size, 1).unwrap();
        dataset
            .set_geo_transform(&[0.0, 1.0, 0.0, size as f64, 0.0, -1.0])
            .unwrap();
        let mut buffer = Buffer::new((size, size), vec![10u8; size * size]);
        dataset
            .rasterband(1)
            .unwrap()
            .write((0, 0), (size, size), &mut buffer)
            .unwrap();
        drop(dataset);

        io::open_raster(path).unwrap()
    }

    #[test]
    fn test_tiles_only_for_overlapping_windows() {
        let dir = tempfile::tempdir().unwrap();
        let (dataset, metadata) = write_source(&dir.path().join("source.tif"), 40);
        let layout = OutputLayout::new(dir.path().join("temp"), dir.path().join("result"));
        let ctx = ProcessingContext::new(&metadata, layout.clone(), "LZW", 256);

        // West country covers x in [0, 10], east country x in [30, 40]
        let boundaries = BoundaryCollection::new(vec![
            square("WST", 0.0, 0.0, 10.0, 40.0),
            square("EST", 30.0, 0.0, 40.0, 40.0),
        ]);
        let intersected = vec!["WST".to_string(), "EST".to_string()];

        let summary = process_windows(&ctx, &dataset, &metadata, &boundaries, &intersected, 20).unwrap();

        // x: 0, 20; y: 0, 10, 20 -> 6 windows, each overlapping exactly one country
        assert_eq!(summary.windows, 6);
        assert_eq!(summary.tiles, 6);
        assert_eq!(layout.list_tiles("WST-land").unwrap().len(), 3);
        assert_eq!(layout.list_tiles("EST-land").unwrap().len(), 3);
        assert!(layout.temp_folder("WST-land").join("output_0_10.tif").is_file());
        assert!(layout.temp_folder("EST-land").join("output_20_20.tif").is_file());
    }

    #[test]
    fn test_unknown_code_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (dataset, metadata) = write_source(&dir.path().join("source.tif"), 10);
        let layout = OutputLayout::new(dir.path().join("temp"), dir.path().join("result"));
        let ctx = ProcessingContext {
            projection: String::new(),
            geotransform: metadata.geotransform,
            layout,
            creation_options: Vec::new(),
        };

        let boundaries = BoundaryCollection::new(vec![]);
        let result = process_windows(&ctx, &dataset, &metadata, &boundaries, &["XXX".to_string()], 10);
        assert!(result.is_err());
    }
}
