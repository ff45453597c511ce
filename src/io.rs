use crate::error::{CountryTilesError, Result};
use crate::geotransform::GeoTransform;
use crate::reclass::NODATA;
use crate::tiling::Window;
use gdal::cpl::CslStringList;
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager, Metadata};
use geo::Rect;
use log::{debug, info};
use ndarray::{Array2, Array3, Axis};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RasterMetadata {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geotransform: GeoTransform,
    pub projection: String,
    pub nodata: Option<f64>,
}

impl RasterMetadata {
    pub fn bounds(&self) -> Rect<f64> {
        self.geotransform.bounds(self.width, self.height)
    }
}

/// Extract metadata from a dataset without reading any pixels
pub fn extract_metadata_from_dataset(dataset: &Dataset) -> Result<RasterMetadata> {
    let (width, height) = dataset.raster_size();
    if width == 0 || height == 0 {
        return Err(CountryTilesError::InvalidDimensions(width, height));
    }

    let band_count = dataset.raster_count() as usize;
    if band_count == 0 {
        return Err(CountryTilesError::NoBands(dataset.description()?));
    }

    let nodata = dataset.rasterband(1)?.no_data_value();
    let geotransform = GeoTransform::from(dataset.geo_transform()?);

    Ok(RasterMetadata {
        width,
        height,
        band_count,
        geotransform,
        projection: dataset.projection(),
        nodata,
    })
}

/// Open a raster for windowed reading
pub fn open_raster(path: &Path) -> Result<(Dataset, RasterMetadata)> {
    info!("Opening raster: {}", path.display());
    let dataset = Dataset::open(path)?;
    let metadata = extract_metadata_from_dataset(&dataset)?;

    debug!(
        "Raster {}x{} with {} band(s), {:?}",
        metadata.width, metadata.height, metadata.band_count, metadata.geotransform
    );
    match metadata.nodata {
        Some(nodata) => info!("Source nodata {} is reclassified like any other value", nodata),
        None => debug!("Source raster has no nodata value"),
    }

    Ok((dataset, metadata))
}

/// Read all bands of a window as a (band, row, column) array
pub fn read_window(dataset: &Dataset, window: &Window, band_count: usize) -> Result<Array3<u16>> {
    debug!(
        "Reading window: offset=({},{}), size=({},{})",
        window.x_offset, window.y_offset, window.width, window.height
    );

    let mut values: Vec<u16> = Vec::with_capacity(band_count * window.width * window.height);
    for band_index in 1..=band_count {
        let rasterband = dataset.rasterband(band_index)?;
        let buffer = rasterband.read_as::<u16>(
            (window.x_offset as isize, window.y_offset as isize),
            (window.width, window.height),
            (window.width, window.height),
            None,
        )?;
        values.extend(buffer.into_iter());
    }

    Ok(Array3::from_shape_vec((band_count, window.height, window.width), values)?)
}

/// Create an empty u8 GeoTIFF with the given creation options
pub fn create_output_dataset(
    path: &Path,
    width: usize,
    height: usize,
    band_count: usize,
    options: &[String],
) -> Result<Dataset> {
    debug!("Creating output dataset: {}", path.display());

    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let dataset = if options.is_empty() {
        driver.create_with_band_type::<u8, _>(path, width, height, band_count)?
    } else {
        let mut gdal_options = CslStringList::new();
        for opt in options {
            gdal_options.add_string(opt)?;
        }

        driver.create_with_band_type_with_options::<u8, _>(path, width, height, band_count, &gdal_options)?
    };

    Ok(dataset)
}

/// Write a (band, row, column) u8 array as a georeferenced GeoTIFF with nodata 255
pub fn write_u8_raster(
    path: &Path,
    data: &Array3<u8>,
    geotransform: &GeoTransform,
    projection: &str,
    options: &[String],
) -> Result<()> {
    let (band_count, height, width) = data.dim();
    let mut dataset = create_output_dataset(path, width, height, band_count, options)?;

    dataset.set_geo_transform(&geotransform.coefficients())?;
    dataset.set_projection(projection)?;

    for (i, band_data) in data.axis_iter(Axis(0)).enumerate() {
        let mut raster_band = dataset.rasterband(i + 1)?;
        raster_band.set_no_data_value(Some(f64::from(NODATA)))?;

        let mut buffer = Buffer::new((width, height), band_data.iter().copied().collect());
        raster_band.write((0, 0), (width, height), &mut buffer)?;
    }

    debug!("Wrote {} band(s) of {}x{} to {}", band_count, width, height, path.display());
    Ok(())
}

/// Read a rectangular region of one band
pub fn read_band_region(
    dataset: &Dataset,
    band_index: usize,
    offset: (usize, usize),
    size: (usize, usize),
) -> Result<Array2<u8>> {
    let rasterband = dataset.rasterband(band_index)?;
    let buffer = rasterband.read_as::<u8>((offset.0 as isize, offset.1 as isize), size, size, None)?;

    let data_vec: Vec<u8> = buffer.into_iter().collect();
    Ok(Array2::from_shape_vec((size.1, size.0), data_vec)?)
}

/// Write a region of one band at the given pixel offset
pub fn write_band_region(
    dataset: &mut Dataset,
    band_index: usize,
    offset: (usize, usize),
    data: &Array2<u8>,
) -> Result<()> {
    let mut raster_band = dataset.rasterband(band_index)?;

    let (rows, cols) = data.dim();
    let mut buffer = Buffer::new((cols, rows), data.iter().copied().collect());
    raster_band.write((offset.0 as isize, offset.1 as isize), (cols, rows), &mut buffer)?;

    debug!(
        "Wrote region to band {} at ({},{}) size {}x{}",
        band_index, offset.0, offset.1, cols, rows
    );

    Ok(())
}
