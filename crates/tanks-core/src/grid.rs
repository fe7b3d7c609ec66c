//! TileGrid: a row-major grid of optional tile references.

use serde::{Deserialize, Serialize};

use crate::types::TileRef;

/// Grid of optional tiles, row-major (top-to-bottom, left-to-right).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<TileRef>>,
}

impl TileGrid {
    /// Grid with every cell empty.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::filled(width, height, None)
    }

    /// Grid with every cell set to `tile`.
    pub fn filled(width: u32, height: u32, tile: Option<TileRef>) -> Self {
        Self {
            width,
            height,
            cells: vec![tile; width as usize * height as usize],
        }
    }

    /// Build a grid from row-major cells. Returns `None` if the cell count
    /// does not match the dimensions.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Option<TileRef>>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Tile at integer coordinates; `None` if empty or out of bounds.
    pub fn get(&self, x: i64, y: i64) -> Option<TileRef> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Set a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i64, y: i64, tile: Option<TileRef>) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    /// Iterate over `(x, y, tile)` for every non-empty cell.
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32, TileRef)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|tile| (i as u32 % width, i as u32 / width, tile))
        })
    }

    pub fn cells(&self) -> &[Option<TileRef>] {
        &self.cells
    }
}
