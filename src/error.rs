use thiserror::Error;

use crate::models::TileId;

/// Expected, locally recoverable failures of the game core.
///
/// None of these are fatal: callers turn them into no-ops or into the
/// clear-selection path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("position ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("cell ({x}, {y}) is occupied by another tile")]
    CellOccupied { x: i32, y: i32 },

    #[error("cell ({x}, {y}) holds no tile")]
    EmptyCell { x: i32, y: i32 },

    #[error("tile {0} does not exist")]
    UnknownTile(TileId),

    #[error("({x}, {y}) is not adjacent to the last selected tile")]
    NotAdjacent { x: i32, y: i32 },

    #[error("({x}, {y}) is already selected")]
    AlreadySelected { x: i32, y: i32 },

    #[error("'{0}' is not a valid word")]
    InvalidWord(String),

    #[error("nothing to submit")]
    NothingToSubmit,

    #[error("selected tiles moved before the word was submitted")]
    StaleSelection,
}

pub type GameResult<T> = Result<T, GameError>;
