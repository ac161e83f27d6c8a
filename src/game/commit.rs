use std::sync::Arc;

use crate::{
    error::{GameError, GameResult},
    game::{
        scorer::{Score, Scorer, ScoringRule},
        Grid, SelectionTracker,
    },
    models::TileId,
    ports::{Presenter, TelemetryEvent, TelemetrySink, WordValidator},
};

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub word: String,
    /// Points awarded for this word
    pub points: u64,
    /// Running total after the award
    pub score: u64,
    pub removed: Vec<TileId>,
}

/// Validates the assembled word and either scores it or rejects it
pub struct WordCommitEngine {
    validator: Arc<dyn WordValidator>,
    scoring: ScoringRule,
}

impl WordCommitEngine {
    pub fn new(validator: Arc<dyn WordValidator>, scoring: ScoringRule) -> Self {
        Self { validator, scoring }
    }

    pub fn scoring(&self) -> ScoringRule {
        self.scoring
    }

    /// Submit the current selection.
    ///
    /// An empty selection is a no-op reported as `NothingToSubmit`. A rejected word
    /// clears the selection and is reported as `InvalidWord`.
    pub fn submit(
        &self,
        grid: &mut Grid,
        selection: &mut SelectionTracker,
        score: &mut Score,
        presenter: &mut dyn Presenter,
        telemetry: &mut dyn TelemetrySink,
    ) -> GameResult<Commit> {
        if selection.is_empty() {
            return Err(GameError::NothingToSubmit);
        }

        debug_assert!(selection.is_well_formed());
        let word = selection.current_word().to_string();

        // Gravity may have moved the selected tiles since they were picked
        let stale = selection
            .entries()
            .iter()
            .any(|entry| grid.tile_at(entry.coord.x, entry.coord.y) != Some(entry.tile));
        if stale {
            tracing::debug!("Selection for '{}' no longer matches the grid", word);
            selection.clear_all(presenter, telemetry);
            return Err(GameError::StaleSelection);
        }

        if !self.validator.is_valid(&word.to_lowercase()) {
            tracing::debug!("Rejected word: {}", word);
            let letters = selection.letters();
            selection.clear_all(presenter, telemetry);
            telemetry.record(&TelemetryEvent::WordRejected {
                word: word.clone(),
                letters,
            });
            return Err(GameError::InvalidWord(word));
        }

        let points = Scorer::word_points(self.scoring, &word);
        let total = score.award(points);
        let letters = selection.letters();

        let removed: Vec<TileId> = selection
            .take()
            .into_iter()
            .filter_map(|entry| {
                let id = grid.remove(entry.coord.x, entry.coord.y)?;
                presenter.tile_removed(id);
                Some(id)
            })
            .collect();

        presenter.score_changed(total);
        telemetry.record(&TelemetryEvent::WordSubmitted {
            word: word.clone(),
            points,
            score: total,
            letters,
        });

        tracing::info!("Word '{}' scored {} points (total {})", word, points, total);

        Ok(Commit {
            word,
            points,
            score: total,
            removed,
        })
    }
}
