use crate::geotransform::GeoTransform;
use crate::gtiff;
use crate::io::RasterMetadata;
use crate::layout::OutputLayout;

/// Shared state of one run, handed explicitly to every stage
#[derive(Debug, Clone)]
pub struct ProcessingContext {
    /// CRS of the source raster (WKT), copied onto every output
    pub projection: String,
    pub geotransform: GeoTransform,
    pub layout: OutputLayout,
    pub creation_options: Vec<String>,
}

impl ProcessingContext {
    pub fn new(metadata: &RasterMetadata, layout: OutputLayout, compression: &str, block_size: usize) -> Self {
        Self {
            projection: metadata.projection.clone(),
            geotransform: metadata.geotransform,
            layout,
            creation_options: gtiff::create_dataset_options(compression, block_size),
        }
    }
}
