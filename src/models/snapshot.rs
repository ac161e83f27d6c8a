use serde::{Deserialize, Serialize};

/// Immutable picture of the grid, safe to hand to other threads or to log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    /// Rows from the top of the grid down, `.` marks an empty cell
    pub rows: Vec<String>,
}

impl GridSnapshot {
    /// Letter at table coordinates (`y = 0` is the bottom row)
    pub fn letter_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = &self.rows[self.height - 1 - y];
        row.chars().nth(x).filter(|c| *c != '.')
    }

    /// The whole board as one string, rows separated by `/`
    pub fn board(&self) -> String {
        self.rows.join("/")
    }
}

/// Point-in-time view of a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub grid: GridSnapshot,
    pub score: u64,
    pub current_word: String,
    pub words_played: u32,
    pub interactions: u32,
}
