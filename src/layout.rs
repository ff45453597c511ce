use crate::error::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Where per-tile temporaries and final per-country rasters live:
/// `<temp_root>/<country>/output_<x>_<y>.tif` and `<result_root>/<country>/<country>.tif`
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub temp_root: PathBuf,
    pub result_root: PathBuf,
}

/// Create `<root>/<country_name>` if it does not exist yet
pub fn create_country_folder(root: &Path, country_name: &str) -> Result<PathBuf> {
    let folder = root.join(country_name);
    if !folder.exists() {
        debug!("Creating folder {}", folder.display());
    }
    fs::create_dir_all(&folder)?;
    Ok(folder)
}

impl OutputLayout {
    pub fn new(temp_root: impl Into<PathBuf>, result_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
            result_root: result_root.into(),
        }
    }

    pub fn temp_folder(&self, country_name: &str) -> PathBuf {
        self.temp_root.join(country_name)
    }

    /// Path of the temporary tile for a window origin, creating the country folder
    pub fn tile_path(&self, country_name: &str, x: usize, y: usize) -> Result<PathBuf> {
        let folder = create_country_folder(&self.temp_root, country_name)?;
        Ok(folder.join(format!("output_{}_{}.tif", x, y)))
    }

    /// Path of the final country raster, creating the country folder
    pub fn result_path(&self, country_name: &str) -> Result<PathBuf> {
        let folder = create_country_folder(&self.result_root, country_name)?;
        Ok(folder.join(format!("{}.tif", country_name)))
    }

    /// Temporary tiles of a country in file-name order; a missing folder has none
    pub fn list_tiles(&self, country_name: &str) -> Result<Vec<PathBuf>> {
        let folder = self.temp_folder(country_name);
        if !folder.is_dir() {
            return Ok(Vec::new());
        }

        let mut tiles = Vec::new();
        for entry in fs::read_dir(&folder)? {
            let path = entry?.path();
            let is_tif = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tif"));
            if path.is_file() && is_tif {
                tiles.push(path);
            }
        }
        tiles.sort();

        Ok(tiles)
    }
}
