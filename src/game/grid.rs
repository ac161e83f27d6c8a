use std::collections::HashMap;

use crate::{
    error::{GameError, GameResult},
    models::{Coord, GridSnapshot, TileEntity, TileId, TileState},
};

/// Default horizontal radius: columns run from -5 to 5
pub const DEFAULT_RADIUS_X: u32 = 5;
/// Default vertical radius: rows run from -4 to 4
pub const DEFAULT_RADIUS_Y: u32 = 4;

/// Largest radius a grid accepts on either axis
pub const MAX_RADIUS: u32 = 64;

/// Shift a table coordinate so the center of a grid with these radii is `(0, 0)`
pub fn to_logical(coord: Coord, radius_x: i32, radius_y: i32) -> (i32, i32) {
    (coord.x - radius_x, coord.y - radius_y)
}

/// Occupancy table plus the arena of live tiles.
///
/// Cells are stored row-major (`y * width + x`) with `y = 0` at the floor. The grid is
/// the only owner of tiles: every tile in the arena is referenced by exactly one cell
/// and its stored position is that cell.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    radius_x: i32,
    radius_y: i32,
    cells: Vec<Option<TileId>>,
    tiles: HashMap<TileId, TileEntity>,
    next_id: u64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS_X, DEFAULT_RADIUS_Y)
    }
}

impl Grid {
    /// Create an empty grid of `(2 * radius_x + 1) x (2 * radius_y + 1)` cells.
    /// Radii are clamped to [`MAX_RADIUS`].
    pub fn new(radius_x: u32, radius_y: u32) -> Self {
        let radius_x = radius_x.min(MAX_RADIUS);
        let radius_y = radius_y.min(MAX_RADIUS);
        let width = (radius_x * 2 + 1) as usize;
        let height = (radius_y * 2 + 1) as usize;
        Self {
            width,
            height,
            radius_x: radius_x as i32,
            radius_y: radius_y as i32,
            cells: vec![None; width * height],
            tiles: HashMap::new(),
            next_id: 1,
        }
    }

    /// Create an empty grid with explicit dimensions. Even sizes round the radius down.
    pub fn with_size(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            radius_x: ((width - 1) / 2) as i32,
            radius_y: ((height - 1) / 2) as i32,
            cells: vec![None; width * height],
            tiles: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row index of the spawn row
    pub fn top_row(&self) -> i32 {
        self.height as i32 - 1
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Tile referenced by the cell, `None` for empty or out-of-range cells
    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileId> {
        self.index(x, y).and_then(|idx| self.cells[idx])
    }

    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        matches!(self.index(x, y), Some(idx) if self.cells[idx].is_none())
    }

    pub fn tile(&self, id: TileId) -> Option<&TileEntity> {
        self.tiles.get(&id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut TileEntity> {
        self.tiles.get_mut(&id)
    }

    pub fn entity_at(&self, coord: Coord) -> Option<&TileEntity> {
        self.tile_at(coord.x, coord.y).and_then(|id| self.tiles.get(&id))
    }

    pub fn letter_at(&self, coord: Coord) -> Option<char> {
        self.entity_at(coord).map(|tile| tile.letter)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TileEntity> {
        self.tiles.values()
    }

    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut TileEntity> {
        self.tiles.values_mut()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles of one column from the floor up
    pub fn column_tiles(&self, x: i32) -> Vec<TileId> {
        (0..self.height as i32)
            .filter_map(|y| self.tile_at(x, y))
            .collect()
    }

    /// Create a new `Falling` tile in the top row of `column`
    pub fn spawn(&mut self, letter: char, column: i32) -> GameResult<TileId> {
        let top = self.top_row();
        self.insert(letter, Coord::new(column, top), TileState::Falling)
    }

    /// Create a tile directly at `coord` in the given state
    pub fn insert(&mut self, letter: char, coord: Coord, state: TileState) -> GameResult<TileId> {
        let idx = self
            .index(coord.x, coord.y)
            .ok_or(GameError::OutOfBounds {
                x: coord.x,
                y: coord.y,
            })?;
        if self.cells[idx].is_some() {
            return Err(GameError::CellOccupied {
                x: coord.x,
                y: coord.y,
            });
        }

        let id = TileId(self.next_id);
        self.next_id += 1;

        let mut tile = TileEntity::new(id, letter, coord);
        tile.state = state;
        self.tiles.insert(id, tile);
        self.cells[idx] = Some(id);

        debug_assert!(self.is_consistent());
        Ok(id)
    }

    /// Move `tile` to `(x, y)`.
    ///
    /// Re-placing a tile at the cell it already holds succeeds without changes.
    pub fn place(&mut self, tile: TileId, x: i32, y: i32) -> GameResult<()> {
        let idx = self.index(x, y).ok_or(GameError::OutOfBounds { x, y })?;
        match self.cells[idx] {
            Some(existing) if existing == tile => return Ok(()),
            Some(_) => return Err(GameError::CellOccupied { x, y }),
            None => {}
        }

        let entity = self.tiles.get_mut(&tile).ok_or(GameError::UnknownTile(tile))?;
        let old = entity.pos;
        entity.pos = Coord::new(x, y);

        if let Some(old_idx) = self.index(old.x, old.y) {
            if self.cells[old_idx] == Some(tile) {
                self.cells[old_idx] = None;
            }
        }
        self.cells[idx] = Some(tile);

        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Clear the cell and destroy the tile that was there
    pub fn remove(&mut self, x: i32, y: i32) -> Option<TileId> {
        let idx = self.index(x, y)?;
        let id = self.cells[idx].take()?;
        self.tiles.remove(&id);

        debug_assert!(self.is_consistent());
        Some(id)
    }

    /// Bounds check in the centered coordinate system `[-rx, rx] x [-ry, ry]`
    pub fn is_inside_logical_bounds(&self, lx: i32, ly: i32) -> bool {
        lx >= -self.radius_x && lx <= self.radius_x && ly >= -self.radius_y && ly <= self.radius_y
    }

    /// Table coordinate to centered coordinate
    pub fn to_logical(&self, coord: Coord) -> (i32, i32) {
        to_logical(coord, self.radius_x, self.radius_y)
    }

    /// Centered coordinate to table coordinate
    pub fn from_logical(&self, lx: i32, ly: i32) -> Coord {
        Coord::new(lx + self.radius_x, ly + self.radius_y)
    }

    pub fn is_column_full(&self, x: i32) -> bool {
        if x < 0 || x >= self.width as i32 {
            return false;
        }
        (0..self.height as i32).all(|y| self.tile_at(x, y).is_some())
    }

    pub fn is_column_empty(&self, x: i32) -> bool {
        (0..self.height as i32).all(|y| self.tile_at(x, y).is_none())
    }

    /// Whether any tile in the column is falling or being shifted down
    pub fn is_column_in_motion(&self, x: i32) -> bool {
        (0..self.height as i32)
            .filter_map(|y| self.tile_at(x, y))
            .filter_map(|id| self.tiles.get(&id))
            .any(|tile| tile.is_in_motion())
    }

    /// Check cell/tile bidirectional consistency across the whole grid
    pub fn is_consistent(&self) -> bool {
        let mut referenced = 0;
        for (idx, cell) in self.cells.iter().enumerate() {
            let Some(id) = cell else { continue };
            referenced += 1;
            let Some(tile) = self.tiles.get(id) else {
                return false;
            };
            let x = (idx % self.width) as i32;
            let y = (idx / self.width) as i32;
            if tile.pos != Coord::new(x, y) || tile.id != *id {
                return false;
            }
        }
        referenced == self.tiles.len()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let rows = (0..self.height as i32)
            .rev()
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| self.letter_at(Coord::new(x, y)).unwrap_or('.'))
                    .collect()
            })
            .collect();

        GridSnapshot {
            width: self.width,
            height: self.height,
            rows,
        }
    }
}
