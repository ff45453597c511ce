use gdal::spatial_ref::SpatialRef;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrsMatch {
    Same,
    Different,
    Unknown, // One of the two could not be parsed or is missing
}

fn parse(label: &str, wkt: &str) -> Option<SpatialRef> {
    match SpatialRef::from_wkt(wkt) {
        Ok(srs) => Some(srs),
        Err(e) => {
            info!("Could not parse {} CRS: {}", label, e);
            None
        }
    }
}

/// Compare the raster CRS with the boundary layer CRS.
///
/// Nothing is reprojected; a mismatch only produces a warning because the
/// boundaries are used in raster coordinates as-is.
pub fn compare_projections(raster_wkt: &str, boundaries_wkt: Option<&str>) -> CrsMatch {
    let Some(boundaries_wkt) = boundaries_wkt else {
        warn!("Boundary layer has no CRS, assuming it matches the raster");
        return CrsMatch::Unknown;
    };

    let (Some(raster), Some(boundaries)) = (parse("raster", raster_wkt), parse("boundary", boundaries_wkt)) else {
        return CrsMatch::Unknown;
    };

    if raster == boundaries {
        info!("Raster and boundaries share the same CRS");
        CrsMatch::Same
    } else {
        warn!(
            "Raster CRS and boundary CRS differ; boundaries are NOT reprojected (raster: {}, boundaries: {})",
            raster.name().unwrap_or_default(),
            boundaries.name().unwrap_or_default()
        );
        CrsMatch::Different
    }
}
