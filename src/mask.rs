use crate::error::Result;
use crate::geotransform::GeoTransform;
use gdal::raster::rasterize;
use gdal::vector::ToGdal;
use gdal::DriverManager;
use geo::MultiPolygon;
use log::debug;
use ndarray::Array2;

const OUTSIDE: u8 = 1;
const INSIDE: u8 = 0;

/// Build a mask over a `(rows, cols)` pixel block positioned by `transform`.
///
/// The geometry is burned into an in-memory raster by GDAL's rasterizer,
/// so a pixel is inside when its centre falls inside the geometry and
/// holes are honoured. The returned mask is `true` for pixels OUTSIDE the
/// geometry.
pub fn geometry_mask(
    geometry: &MultiPolygon<f64>,
    shape: (usize, usize),
    transform: &GeoTransform,
) -> Result<Array2<bool>> {
    let (rows, cols) = shape;
    if geometry.0.is_empty() {
        return Ok(Array2::from_elem((rows, cols), true));
    }

    debug!(
        "Rasterizing {} polygon(s) over {}x{} pixels",
        geometry.0.len(),
        cols,
        rows
    );

    let driver = DriverManager::get_driver_by_name("MEM")?;
    let mut dataset = driver.create_with_band_type::<u8, _>("", cols, rows, 1)?;
    dataset.set_geo_transform(&transform.coefficients())?;
    dataset.rasterband(1)?.fill(f64::from(OUTSIDE), None)?;

    let burn = geometry.to_gdal()?;
    rasterize(&mut dataset, &[1], &[burn], &[f64::from(INSIDE)], None)?;

    let buffer = dataset
        .rasterband(1)?
        .read_as::<u8>((0, 0), (cols, rows), (cols, rows), None)?;
    let values: Vec<u8> = buffer.into_iter().collect();

    Ok(Array2::from_shape_vec((rows, cols), values)?.mapv(|value| value != INSIDE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    fn unit_transform() -> GeoTransform {
        // 1x1 pixels, top left at (0, 10), north up
        GeoTransform::new([0.0, 1.0, 0.0, 10.0, 0.0, -1.0])
    }

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        polygon![
            (x: min_x, y: min_y),
            (x: max_x, y: min_y),
            (x: max_x, y: max_y),
            (x: min_x, y: max_y),
            (x: min_x, y: min_y),
        ]
    }

    #[test]
    fn test_polygon_covering_everything() {
        let geom = MultiPolygon::new(vec![rect(-5.0, -5.0, 20.0, 20.0)]);
        let mask = geometry_mask(&geom, (10, 10), &unit_transform()).unwrap();
        assert!(mask.iter().all(|&outside| !outside));
    }

    #[test]
    fn test_disjoint_polygon() {
        let geom = MultiPolygon::new(vec![rect(50.0, 50.0, 60.0, 60.0)]);
        let mask = geometry_mask(&geom, (10, 10), &unit_transform()).unwrap();
        assert!(mask.iter().all(|&outside| outside));
    }

    #[test]
    fn test_empty_geometry_masks_everything() {
        let geom: MultiPolygon<f64> = MultiPolygon::new(vec![]);
        let mask = geometry_mask(&geom, (4, 4), &unit_transform()).unwrap();
        assert!(mask.iter().all(|&outside| outside));
    }

    #[test]
    fn test_left_half() {
        let geom = MultiPolygon::new(vec![rect(0.0, 0.0, 5.0, 10.0)]);
        let mask = geometry_mask(&geom, (10, 10), &unit_transform()).unwrap();
        for ((_, col), &outside) in mask.indexed_iter() {
            assert_eq!(outside, col >= 5, "col {}", col);
        }
    }

    #[test]
    fn test_hole_is_outside() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let hole = rect(3.0, 3.0, 7.0, 7.0);
        let geom = MultiPolygon::new(vec![Polygon::new(
            outer.exterior().clone(),
            vec![hole.exterior().clone()],
        )]);
        let mask = geometry_mask(&geom, (10, 10), &unit_transform()).unwrap();

        // Row 5 is y = 4.5, inside the hole for columns 3..7
        assert!(!mask[[5, 0]]);
        assert!(mask[[5, 3]]);
        assert!(mask[[5, 6]]);
        assert!(!mask[[5, 7]]);
        assert!(!mask[[0, 5]]);
    }

    #[test]
    fn test_multiple_parts() {
        let geom = MultiPolygon::new(vec![rect(0.0, 0.0, 2.0, 10.0), rect(8.0, 0.0, 10.0, 10.0)]);
        let mask = geometry_mask(&geom, (10, 10), &unit_transform()).unwrap();
        let row: Vec<bool> = mask.row(4).to_vec();
        assert_eq!(
            row,
            vec![false, false, true, true, true, true, true, true, false, false]
        );
    }

    #[test]
    fn test_triangle_uses_pixel_centres() {
        // Hypotenuse x + (10 - y) = 4.5 keeps every centre off the edge
        let geom = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 10.0),
            (x: 4.5, y: 10.0),
            (x: 0.0, y: 5.5),
            (x: 0.0, y: 10.0),
        ]]);
        let mask = geometry_mask(&geom, (4, 4), &unit_transform()).unwrap();
        let inside: Vec<usize> = mask.rows().into_iter().map(|r| r.iter().filter(|&&o| !o).count()).collect();
        assert_eq!(inside, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_window_transform_offsets_mask() {
        // Same left-half country seen through a window starting at column 3
        let geom = MultiPolygon::new(vec![rect(0.0, 0.0, 5.0, 10.0)]);
        let transform = unit_transform().window_transform(3, 0);
        let mask = geometry_mask(&geom, (10, 4), &transform).unwrap();
        for ((_, col), &outside) in mask.indexed_iter() {
            assert_eq!(outside, col >= 2, "col {}", col);
        }
    }
}
