use std::collections::HashSet;

use crate::{
    error::{GameError, GameResult},
    game::Grid,
    models::{Coord, TileId},
    ports::{Presenter, SelectedLetter, TelemetryEvent, TelemetrySink},
};

/// One selected cell, with the tile that was there when it was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEntry {
    pub coord: Coord,
    pub tile: TileId,
    pub letter: char,
}

/// Ordered trail of selected cells forming the candidate word.
///
/// Coordinates are back-references into the grid; the tracker never owns tiles.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    entries: Vec<SelectionEntry>,
    current_word: String,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `coord` to the trail
    pub fn select(
        &mut self,
        grid: &Grid,
        coord: Coord,
        presenter: &mut dyn Presenter,
        telemetry: &mut dyn TelemetrySink,
    ) -> GameResult<()> {
        let Coord { x, y } = coord;
        if !grid.in_bounds(x, y) {
            return Err(GameError::OutOfBounds { x, y });
        }
        let tile = grid.entity_at(coord).ok_or(GameError::EmptyCell { x, y })?;

        if self.contains(coord) {
            return Err(GameError::AlreadySelected { x, y });
        }
        if let Some(last) = self.last() {
            if !last.is_adjacent(&coord) {
                return Err(GameError::NotAdjacent { x, y });
            }
        }

        let entry = SelectionEntry {
            coord,
            tile: tile.id,
            letter: tile.letter,
        };
        self.entries.push(entry);
        self.current_word.push(entry.letter);

        presenter.highlight(coord);
        telemetry.record(&TelemetryEvent::LetterSelected {
            letter: entry.letter,
            coord,
        });

        debug_assert!(self.is_well_formed());
        tracing::debug!("Selected {} at {}, word is now {}", entry.letter, coord, self.current_word);
        Ok(())
    }

    /// Drop the most recent coordinate
    pub fn remove_last(
        &mut self,
        presenter: &mut dyn Presenter,
        telemetry: &mut dyn TelemetrySink,
    ) -> Option<Coord> {
        let entry = self.entries.pop()?;
        self.current_word.pop();

        presenter.unhighlight(entry.coord);
        telemetry.record(&TelemetryEvent::LetterDeselected {
            letter: entry.letter,
            coord: entry.coord,
        });

        debug_assert!(self.is_well_formed());
        Some(entry.coord)
    }

    /// Pop coordinates until `coord` is the last one.
    ///
    /// Returns `false` without touching anything when `coord` is not selected.
    pub fn rewind_to(
        &mut self,
        coord: Coord,
        presenter: &mut dyn Presenter,
        telemetry: &mut dyn TelemetrySink,
    ) -> bool {
        if !self.contains(coord) {
            return false;
        }
        while self.last() != Some(coord) {
            if self.remove_last(presenter, telemetry).is_none() {
                break;
            }
        }
        true
    }

    /// Abandon the whole selection
    pub fn clear_all(&mut self, presenter: &mut dyn Presenter, telemetry: &mut dyn TelemetrySink) {
        for entry in &self.entries {
            presenter.unhighlight(entry.coord);
        }

        let event = TelemetryEvent::DeselectAll {
            word: std::mem::take(&mut self.current_word),
            letters: self.letters(),
        };
        self.entries.clear();
        telemetry.record(&event);
    }

    /// Drop the selection and its highlights without reporting it as a deselection
    pub fn dismiss(&mut self, presenter: &mut dyn Presenter) {
        for entry in self.entries.drain(..) {
            presenter.unhighlight(entry.coord);
        }
        self.current_word.clear();
    }

    /// Empty the selection without presenter calls, handing back what was selected
    pub fn take(&mut self) -> Vec<SelectionEntry> {
        self.current_word.clear();
        std::mem::take(&mut self.entries)
    }

    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn coords(&self) -> Vec<Coord> {
        self.entries.iter().map(|entry| entry.coord).collect()
    }

    pub fn letters(&self) -> Vec<SelectedLetter> {
        self.entries
            .iter()
            .map(|entry| SelectedLetter {
                letter: entry.letter,
                coord: entry.coord,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<Coord> {
        self.entries.last().map(|entry| entry.coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.entries.iter().any(|entry| entry.coord == coord)
    }

    /// Every step is adjacent to the previous one, no cell is used twice, and the word
    /// spells the selected letters in order. Holds after every mutation.
    pub fn is_well_formed(&self) -> bool {
        let adjacent = self
            .entries
            .windows(2)
            .all(|pair| pair[0].coord.is_adjacent(&pair[1].coord));
        let distinct: HashSet<Coord> = self.entries.iter().map(|entry| entry.coord).collect();
        let spelled = self.entries.iter().map(|entry| entry.letter).eq(self.current_word.chars());

        adjacent && distinct.len() == self.entries.len() && spelled
    }
}
