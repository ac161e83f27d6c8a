//! Contracts between the game core and the things around it: whatever draws the
//! board, whatever records analytics, and whatever knows which words exist.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Coord, TileId};

/// Receives visual updates. Every method defaults to doing nothing.
pub trait Presenter {
    fn highlight(&mut self, _coord: Coord) {}
    fn unhighlight(&mut self, _coord: Coord) {}
    fn tile_spawned(&mut self, _tile: TileId, _letter: char, _coord: Coord) {}
    fn tile_position_changed(&mut self, _tile: TileId, _coord: Coord) {}
    fn tile_removed(&mut self, _tile: TileId) {}
    fn score_changed(&mut self, _score: u64) {}
}

/// Presenter for headless sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// One letter of a selection as it is reported to telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLetter {
    pub letter: char,
    pub coord: Coord,
}

/// Phase of the game a key frame was captured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyFrameState {
    Pre,
    Post,
    GameStart,
    GameEnd,
}

/// Semantic events the core reports. Persisted schema is the sink's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEvent {
    LetterSelected {
        letter: char,
        coord: Coord,
    },
    LetterDeselected {
        letter: char,
        coord: Coord,
    },
    DeselectAll {
        word: String,
        letters: Vec<SelectedLetter>,
    },
    WordSubmitted {
        word: String,
        points: u64,
        score: u64,
        letters: Vec<SelectedLetter>,
    },
    WordRejected {
        word: String,
        letters: Vec<SelectedLetter>,
    },
    KeyFrame {
        state: KeyFrameState,
        board: String,
        score: u64,
        words_played: u32,
        interactions: u32,
    },
}

impl TelemetryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TelemetryEvent::LetterSelected { .. } => "LetterSelected",
            TelemetryEvent::LetterDeselected { .. } => "LetterDeselected",
            TelemetryEvent::DeselectAll { .. } => "DeselectAll",
            TelemetryEvent::WordSubmitted { .. } => "WordSubmitted",
            TelemetryEvent::WordRejected { .. } => "WordRejected",
            TelemetryEvent::KeyFrame { .. } => "KeyFrame",
        }
    }

    pub fn coord(&self) -> Option<Coord> {
        match self {
            TelemetryEvent::LetterSelected { coord, .. }
            | TelemetryEvent::LetterDeselected { coord, .. } => Some(*coord),
            _ => None,
        }
    }

    pub fn word(&self) -> Option<&str> {
        match self {
            TelemetryEvent::DeselectAll { word, .. }
            | TelemetryEvent::WordSubmitted { word, .. }
            | TelemetryEvent::WordRejected { word, .. } => Some(word),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<u64> {
        match self {
            TelemetryEvent::WordSubmitted { score, .. } | TelemetryEvent::KeyFrame { score, .. } => {
                Some(*score)
            }
            _ => None,
        }
    }
}

/// Receives named gameplay events
pub trait TelemetrySink {
    fn record(&mut self, event: &TelemetryEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&mut self, _event: &TelemetryEvent) {}
}

/// Dictionary lookup. Must be case-insensitive and free of side effects.
pub trait WordValidator: Send + Sync {
    fn is_valid(&self, word: &str) -> bool;
}

impl WordValidator for HashSet<String> {
    fn is_valid(&self, word: &str) -> bool {
        self.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording collaborators shared by the unit tests.

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PresenterCall {
        Highlight(Coord),
        Unhighlight(Coord),
        Spawned(TileId, char, Coord),
        Moved(TileId, Coord),
        Removed(TileId),
        Score(u64),
    }

    #[derive(Debug, Clone, Default)]
    pub struct RecordingPresenter {
        pub calls: Rc<RefCell<Vec<PresenterCall>>>,
    }

    impl RecordingPresenter {
        pub fn take(&self) -> Vec<PresenterCall> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }
    }

    impl Presenter for RecordingPresenter {
        fn highlight(&mut self, coord: Coord) {
            self.calls.borrow_mut().push(PresenterCall::Highlight(coord));
        }
        fn unhighlight(&mut self, coord: Coord) {
            self.calls.borrow_mut().push(PresenterCall::Unhighlight(coord));
        }
        fn tile_spawned(&mut self, tile: TileId, letter: char, coord: Coord) {
            self.calls
                .borrow_mut()
                .push(PresenterCall::Spawned(tile, letter, coord));
        }
        fn tile_position_changed(&mut self, tile: TileId, coord: Coord) {
            self.calls.borrow_mut().push(PresenterCall::Moved(tile, coord));
        }
        fn tile_removed(&mut self, tile: TileId) {
            self.calls.borrow_mut().push(PresenterCall::Removed(tile));
        }
        fn score_changed(&mut self, score: u64) {
            self.calls.borrow_mut().push(PresenterCall::Score(score));
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct RecordingTelemetry {
        pub events: Rc<RefCell<Vec<TelemetryEvent>>>,
    }

    impl RecordingTelemetry {
        pub fn names(&self) -> Vec<&'static str> {
            self.events.borrow().iter().map(|e| e.name()).collect()
        }
    }

    impl TelemetrySink for RecordingTelemetry {
        fn record(&mut self, event: &TelemetryEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    pub fn words(list: &[&str]) -> HashSet<String> {
        list.iter().map(|w| w.to_string()).collect()
    }
}
