use crate::error::{CountryTilesError, Result};
use geo::{coord, Rect};

/// Affine pixel-to-geographic transform in GDAL coefficient order:
/// [top left x, pixel width, row rotation, top left y, column rotation, pixel height].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Geographic position of a (fractional) pixel coordinate.
    /// Pixel (0, 0) is the top left corner of the raster.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let gt = &self.0;
        let x = gt[0] + gt[1] * col + gt[2] * row;
        let y = gt[3] + gt[4] * col + gt[5] * row;
        (x, y)
    }

    /// Same grid with the origin moved to pixel (col, row)
    pub fn shifted(&self, col: f64, row: f64) -> GeoTransform {
        let (x, y) = self.apply(col, row);
        let gt = &self.0;
        GeoTransform([x, gt[1], gt[2], y, gt[4], gt[5]])
    }

    /// Transform of a window whose top left pixel is (col, row)
    pub fn window_transform(&self, col: usize, row: usize) -> GeoTransform {
        self.shifted(col as f64, row as f64)
    }

    /// Axis aligned bounding box of a `width` x `height` pixel block
    pub fn bounds(&self, width: usize, height: usize) -> Rect<f64> {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(width as f64, 0.0),
            self.apply(0.0, height as f64),
            self.apply(width as f64, height as f64),
        ];

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
    }

    /// Geographic-to-pixel transform
    pub fn invert(&self) -> Result<GeoTransform> {
        let gt = &self.0;

        if gt[2] == 0.0 && gt[4] == 0.0 && gt[1] != 0.0 && gt[5] != 0.0 {
            return Ok(GeoTransform([
                -gt[0] / gt[1],
                1.0 / gt[1],
                0.0,
                -gt[3] / gt[5],
                0.0,
                1.0 / gt[5],
            ]));
        }

        let det = gt[1] * gt[5] - gt[2] * gt[4];
        let magnitude = gt[1].abs().max(gt[2].abs()).max(gt[4].abs()).max(gt[5].abs());
        if det.abs() <= 1e-10 * magnitude * magnitude {
            return Err(CountryTilesError::NonInvertibleTransform(self.0));
        }

        let inv_det = 1.0 / det;
        Ok(GeoTransform([
            (gt[2] * gt[3] - gt[0] * gt[5]) * inv_det,
            gt[5] * inv_det,
            -gt[2] * inv_det,
            (-gt[1] * gt[3] + gt[0] * gt[4]) * inv_det,
            -gt[4] * inv_det,
            gt[1] * inv_det,
        ]))
    }

    /// True when both transforms share pixel size and rotation
    pub fn same_resolution(&self, other: &GeoTransform) -> bool {
        const EPS: f64 = 1e-9;
        [1, 2, 4, 5]
            .iter()
            .all(|&i| (self.0[i] - other.0[i]).abs() <= EPS * self.0[i].abs().max(1.0))
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(transform: GeoTransform) -> [f64; 6] {
        transform.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_up() -> GeoTransform {
        GeoTransform::new([100.0, 10.0, 0.0, 500.0, 0.0, -10.0])
    }

    #[test]
    fn test_window_transform_shifts_origin() {
        let wt = north_up().window_transform(5, 2);
        assert_eq!(wt.coefficients(), [150.0, 10.0, 0.0, 480.0, 0.0, -10.0]);
    }

    #[test]
    fn test_bounds_north_up() {
        let b = north_up().bounds(4, 3);
        assert_eq!(b.min().x, 100.0);
        assert_eq!(b.max().x, 140.0);
        assert_eq!(b.min().y, 470.0);
        assert_eq!(b.max().y, 500.0);
    }

    #[test]
    fn test_invert_round_trip() {
        let gt = GeoTransform::new([10.0, 2.0, 0.5, 20.0, 0.25, -2.0]);
        let inv = gt.invert().unwrap();
        let (x, y) = gt.apply(3.0, 7.0);
        let (col, row) = inv.apply(x, y);
        assert!((col - 3.0).abs() < 1e-9);
        assert!((row - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_invert_degenerate() {
        let gt = GeoTransform::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(gt.invert().is_err());
    }

    #[test]
    fn test_same_resolution() {
        let a = north_up();
        let b = a.window_transform(100, 100);
        assert!(a.same_resolution(&b));
        let c = GeoTransform::new([100.0, 20.0, 0.0, 500.0, 0.0, -20.0]);
        assert!(!a.same_resolution(&c));
    }
}
