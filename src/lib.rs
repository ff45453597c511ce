// Library exports for testing and reuse

pub mod boundaries;
pub mod cli;
pub mod clip;
pub mod context;
pub mod crs;
pub mod error;
pub mod geotransform;
pub mod gtiff;
pub mod io;
pub mod layout;
pub mod mask;
pub mod mosaic;
pub mod pipeline;
pub mod reclass;
pub mod scheduler;
pub mod tiling;

// Re-export commonly used types
pub use boundaries::{intersected_countries, load_boundaries, BoundaryCollection, Country};
pub use error::{CountryTilesError, Result};
pub use geotransform::GeoTransform;
pub use pipeline::{run, PipelineConfig, RunSummary};
pub use reclass::{reclassify, reclassify_value};
pub use tiling::{TileGrid, Window};
