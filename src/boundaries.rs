use crate::error::{CountryTilesError, Result};
use gdal::vector::{Feature, LayerAccess};
use gdal::Dataset;
use geo::{Geometry, Intersects, MultiPolygon, Rect};
use log::{debug, info};
use std::path::Path;

/// One boundary record: unique short code, display name and outline
#[derive(Debug, Clone)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

impl Country {
    pub fn intersects_bounds(&self, bounds: &Rect<f64>) -> bool {
        self.geometry.intersects(&bounds.to_polygon())
    }
}

/// All boundary records of a vector layer, in layer order
#[derive(Debug, Clone, Default)]
pub struct BoundaryCollection {
    pub countries: Vec<Country>,
    /// WKT of the layer's spatial reference, if it has one
    pub projection: Option<String>,
}

impl BoundaryCollection {
    pub fn new(countries: Vec<Country>) -> Self {
        Self {
            countries,
            projection: None,
        }
    }

    pub fn find(&self, code: &str) -> Result<&Country> {
        self.countries
            .iter()
            .find(|country| country.code == code)
            .ok_or_else(|| CountryTilesError::UnknownCountry(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

fn string_field(feature: &Feature, field: &str) -> Result<String> {
    feature
        .field_index(field)
        .and_then(|idx| feature.field_as_string(idx))
        .ok()
        .flatten()
        .ok_or_else(|| CountryTilesError::MissingField {
            field: field.to_string(),
            feature: feature.fid().unwrap_or_default(),
        })
}

fn to_multipolygon(code: &str, geometry: Geometry<f64>) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        Geometry::GeometryCollection(collection) => {
            let mut polygons = Vec::new();
            for part in collection {
                polygons.extend(to_multipolygon(code, part)?);
            }
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(CountryTilesError::UnsupportedGeometry(
            code.to_string(),
            geometry_kind(&other).to_string(),
        )),
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Read every feature of the first layer of a vector dataset
pub fn load_boundaries(path: &Path, code_field: &str, name_field: &str) -> Result<BoundaryCollection> {
    info!("Opening boundaries: {}", path.display());
    let dataset = Dataset::open(path)?;
    let mut layer = dataset.layer(0)?;

    let projection = layer.spatial_ref().and_then(|srs| srs.to_wkt().ok());

    let mut countries = Vec::new();
    for feature in layer.features() {
        let code = string_field(&feature, code_field)?;
        let name = string_field(&feature, name_field)?;

        let geometry = feature
            .geometry()
            .ok_or_else(|| CountryTilesError::MissingGeometry(code.clone()))?
            .to_geo()?;
        let geometry = to_multipolygon(&code, geometry)?;

        debug!("Loaded boundary {} ({}) with {} part(s)", code, name, geometry.0.len());
        countries.push(Country { code, name, geometry });
    }

    info!("Loaded {} boundaries", countries.len());
    Ok(BoundaryCollection {
        countries,
        projection,
    })
}

/// Codes of the countries whose outline touches `raster_bounds`, in collection order
pub fn intersected_countries(raster_bounds: &Rect<f64>, countries: &BoundaryCollection) -> Vec<String> {
    countries
        .countries
        .iter()
        .filter(|country| country.intersects_bounds(raster_bounds))
        .map(|country| country.code.clone())
        .collect()
}
