use ndarray::{Array, Dimension};

/// Nodata value of every written raster.
pub const NODATA: u8 = 255;

/// Value written over pixels that fall outside a country before reclassification.
pub const EXCLUDE_SENTINEL: u16 = 103;

#[derive(Debug, Clone, Copy)]
enum Bound {
    Inclusive(u16),
    Exclusive(u16),
    Unbounded,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    low: Bound,
    high: Bound,
    class: u8,
}

impl Rule {
    const fn new(low: Bound, high: Bound, class: u8) -> Self {
        Self { low, high, class }
    }

    fn matches(&self, value: u16) -> bool {
        let above = match self.low {
            Bound::Inclusive(low) => value >= low,
            Bound::Exclusive(low) => value > low,
            Bound::Unbounded => true,
        };
        let below = match self.high {
            Bound::Inclusive(high) => value <= high,
            Bound::Exclusive(high) => value < high,
            Bound::Unbounded => true,
        };
        above && below
    }
}

// Evaluated top to bottom against the current value, so a later rule sees
// the class written by an earlier one.
const RULES: [Rule; 9] = [
    Rule::new(Bound::Inclusive(0), Bound::Inclusive(0), 0),
    Rule::new(Bound::Inclusive(1), Bound::Exclusive(3), 1),
    Rule::new(Bound::Inclusive(3), Bound::Exclusive(8), 2),
    Rule::new(Bound::Inclusive(8), Bound::Exclusive(24), 3),
    Rule::new(Bound::Inclusive(24), Bound::Exclusive(36), 4),
    Rule::new(Bound::Inclusive(36), Bound::Inclusive(60), 5),
    Rule::new(Bound::Exclusive(60), Bound::Exclusive(101), NODATA),
    Rule::new(Bound::Inclusive(101), Bound::Inclusive(102), 0),
    Rule::new(Bound::Inclusive(EXCLUDE_SENTINEL), Bound::Unbounded, NODATA),
];

/// Map a raw canopy height to its ordinal class
pub fn reclassify_value(raw: u16) -> u8 {
    let value = RULES.iter().fold(raw, |current, rule| {
        if rule.matches(current) {
            u16::from(rule.class)
        } else {
            current
        }
    });

    // Every u16 is covered by the table, so this only guards the cast.
    u8::try_from(value).unwrap_or(NODATA)
}

/// Reclassify an array of any shape element-wise
pub fn reclassify<D: Dimension>(values: &Array<u16, D>) -> Array<u8, D> {
    values.mapv(reclassify_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array3};

    #[test]
    fn test_reclassify_documented_values() {
        assert_eq!(reclassify_value(0), 0);
        assert_eq!(reclassify_value(2), 1);
        assert_eq!(reclassify_value(7), 2);
        assert_eq!(reclassify_value(8), 3);
        assert_eq!(reclassify_value(35), 4);
        assert_eq!(reclassify_value(60), 5);
        assert_eq!(reclassify_value(61), 255);
        assert_eq!(reclassify_value(100), 255);
        assert_eq!(reclassify_value(101), 0);
        assert_eq!(reclassify_value(102), 0);
        assert_eq!(reclassify_value(103), 255);
    }

    #[test]
    fn test_reclassify_range_edges() {
        assert_eq!(reclassify_value(1), 1);
        assert_eq!(reclassify_value(3), 2);
        assert_eq!(reclassify_value(23), 3);
        assert_eq!(reclassify_value(24), 4);
        assert_eq!(reclassify_value(36), 5);
        assert_eq!(reclassify_value(255), 255);
        assert_eq!(reclassify_value(u16::MAX), 255);
    }

    #[test]
    fn test_reclassify_output_is_closed_set() {
        let allowed = [0u8, 1, 2, 3, 4, 5, 255];
        for v in 0..=300u16 {
            let class = reclassify_value(v);
            assert!(allowed.contains(&class), "{} -> {}", v, class);
        }
    }

    #[test]
    fn test_sentinel_maps_to_nodata() {
        assert_eq!(reclassify_value(EXCLUDE_SENTINEL), NODATA);
    }

    #[test]
    fn test_reclassify_array_keeps_shape() {
        let data = arr2(&[[0u16, 5, 12], [30, 50, 103]]);
        let classes = reclassify(&data);
        assert_eq!(classes, arr2(&[[0u8, 2, 3], [4, 5, 255]]));

        let cube = Array3::<u16>::from_elem((2, 3, 4), 40);
        let out = reclassify(&cube);
        assert_eq!(out.dim(), (2, 3, 4));
        assert!(out.iter().all(|&v| v == 5));
    }
}
