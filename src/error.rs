use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountryTilesError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Invalid tile size: {0} (must be positive)")]
    InvalidTileSize(usize),

    #[error("Input raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Raster has no bands: {0}")]
    NoBands(String),

    #[error("Geotransform is not invertible: {0:?}")]
    NonInvertibleTransform([f64; 6]),

    #[error("Field '{field}' not found on feature {feature}")]
    MissingField { field: String, feature: u64 },

    #[error("Country '{0}' has no geometry")]
    MissingGeometry(String),

    #[error("Country '{0}' has a non-polygonal geometry ({1})")]
    UnsupportedGeometry(String, String),

    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    #[error("Tile {0} does not share the pixel grid of the other tiles")]
    MismatchedTileGrid(String),

    #[error("Invalid compression type: {0}")]
    InvalidCompression(String),

    #[error("Invalid block size: {0} (must be multiple of 16)")]
    InvalidBlockSize(usize),
}

pub type Result<T> = std::result::Result<T, CountryTilesError>;
