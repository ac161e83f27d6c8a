use serde::{Deserialize, Serialize};

/// Normalized pointer events fed into a session.
///
/// Coordinates are table coordinates with `y = 0` at the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    TileTapped { x: i32, y: i32 },
    TileDragEnter { x: i32, y: i32 },
    TileReleased,
    Cancelled,
    /// Keyboard enter or the play-word button
    Submit,
}

impl InputEvent {
    /// Parse one line of the JSON-lines input stream. Blank lines yield `None`.
    pub fn parse_line(line: &str) -> serde_json::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some)
    }
}
