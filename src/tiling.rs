use crate::error::{CountryTilesError, Result};
use log::{debug, warn};

/// A rectangle in pixel space of the source raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x_offset: usize,
    pub y_offset: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(x_offset: usize, y_offset: usize, width: usize, height: usize) -> Self {
        Self {
            x_offset,
            y_offset,
            width,
            height,
        }
    }

    pub fn x_max(&self) -> usize {
        self.x_offset + self.width
    }

    pub fn y_max(&self) -> usize {
        self.y_offset + self.height
    }
}

/// Fixed-size window layout over a raster.
///
/// Columns advance by a full tile, rows by half a tile. Windows that would
/// run past the trailing edge are shifted back so they end on the edge.
#[derive(Debug, Clone)]
pub struct TileGrid {
    raster_width: usize,
    raster_height: usize,
    tile_size: usize,
    tile_width: usize,
    tile_height: usize,
}

impl TileGrid {
    pub fn new(raster_width: usize, raster_height: usize, tile_size: usize) -> Result<Self> {
        if tile_size == 0 {
            return Err(CountryTilesError::InvalidTileSize(tile_size));
        }
        if raster_width == 0 || raster_height == 0 {
            return Err(CountryTilesError::InvalidDimensions(raster_width, raster_height));
        }

        let tile_width = tile_size.min(raster_width);
        let tile_height = tile_size.min(raster_height);
        if tile_width != tile_size || tile_height != tile_size {
            warn!(
                "Tile size {} exceeds raster size {}x{}, using {}x{} windows",
                tile_size, raster_width, raster_height, tile_width, tile_height
            );
        }

        debug!(
            "TileGrid: {}x{} raster, tile_size={}, x_step={}, y_step={}",
            raster_width,
            raster_height,
            tile_size,
            tile_size,
            (tile_size / 2).max(1)
        );

        Ok(Self {
            raster_width,
            raster_height,
            tile_size,
            tile_width,
            tile_height,
        })
    }

    pub fn x_step(&self) -> usize {
        self.tile_size
    }

    pub fn y_step(&self) -> usize {
        (self.tile_size / 2).max(1)
    }

    /// Origin clamped so the window stays inside the raster
    pub fn clamp(&self, x: usize, y: usize) -> (usize, usize) {
        (
            x.min(self.raster_width - self.tile_width),
            y.min(self.raster_height - self.tile_height),
        )
    }

    pub fn window_at(&self, x: usize, y: usize) -> Window {
        let (corrected_x, corrected_y) = self.clamp(x, y);
        Window::new(corrected_x, corrected_y, self.tile_width, self.tile_height)
    }

    pub fn iter(&self) -> WindowIterator<'_> {
        WindowIterator::new(self)
    }
}

/// Walks the grid column-major (outer x, inner y), yielding the unclamped
/// step origin and the clamped window. A window identical to the one just
/// yielded is skipped.
pub struct WindowIterator<'a> {
    grid: &'a TileGrid,
    x: usize,
    y: usize,
    previous: Option<Window>,
}

impl<'a> WindowIterator<'a> {
    fn new(grid: &'a TileGrid) -> Self {
        Self {
            grid,
            x: 0,
            y: 0,
            previous: None,
        }
    }
}

impl Iterator for WindowIterator<'_> {
    type Item = ((usize, usize), Window);

    fn next(&mut self) -> Option<Self::Item> {
        while self.x < self.grid.raster_width {
            if self.y >= self.grid.raster_height {
                self.y = 0;
                self.x += self.grid.x_step();
                continue;
            }

            let step = (self.x, self.y);
            let window = self.grid.window_at(self.x, self.y);
            self.y += self.grid.y_step();

            if self.previous == Some(window) {
                debug!("Window at step {:?} repeats the previous window, skipping", step);
                continue;
            }

            self.previous = Some(window);
            return Some((step, window));
        }

        None
    }
}
