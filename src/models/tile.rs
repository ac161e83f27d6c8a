use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle of a live tile. The grid's arena maps it to a [`TileEntity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell in table space: `x` in `[0, width)`, `y` in `[0, height)`, `y = 0` is the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 8-directional adjacency: `max(|dx|, |dy|) == 1`.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy) == 1
    }

    pub fn below(&self) -> Coord {
        Coord::new(self.x, self.y - 1)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Motion state of a tile. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    /// Freshly spawned, dropping toward its first landing
    Falling,
    /// Settled tile being shifted down because something below it was removed
    ColumnFalling,
    /// Resting on the floor or another tile
    Settled,
}

/// Per-cell simulation state of one letter tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileEntity {
    pub id: TileId,
    pub letter: char,
    pub pos: Coord,
    pub state: TileState,
    /// Time accumulated since this tile last stepped
    pub fall_timer: Duration,
}

impl TileEntity {
    pub fn new(id: TileId, letter: char, pos: Coord) -> Self {
        Self {
            id,
            letter: letter.to_ascii_uppercase(),
            pos,
            state: TileState::Falling,
            fall_timer: Duration::ZERO,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.state == TileState::Falling
    }

    pub fn is_column_falling(&self) -> bool {
        self.state == TileState::ColumnFalling
    }

    pub fn is_in_motion(&self) -> bool {
        self.state != TileState::Settled
    }
}
