use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::{
    config::SessionConfig,
    error::{GameError, GameResult},
    game::{
        Commit, GravityResolver, Grid, InteractionMode, Score, SelectionPolicy, SelectionTracker,
        TickReport, TileSpawner, WordCommitEngine,
    },
    input::InputEvent,
    models::{Coord, SessionSnapshot, TileId},
    ports::{
        KeyFrameState, NullPresenter, NullTelemetry, Presenter, TelemetryEvent, TelemetrySink,
        WordValidator,
    },
};

/// Counters reported in key frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub words_played: u32,
    pub interactions: u32,
    pub elapsed: Duration,
}

/// Borrowed view of a session handed to selection policies
pub struct SessionContext<'a> {
    grid: &'a mut Grid,
    selection: &'a mut SelectionTracker,
    score: &'a mut Score,
    commit: &'a WordCommitEngine,
    presenter: &'a mut dyn Presenter,
    telemetry: &'a mut dyn TelemetrySink,
    stats: &'a mut SessionStats,
}

impl SessionContext<'_> {
    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    pub fn selection(&self) -> &SelectionTracker {
        &*self.selection
    }

    pub fn has_tile(&self, coord: Coord) -> bool {
        self.grid.tile_at(coord.x, coord.y).is_some()
    }

    pub fn select(&mut self, coord: Coord) -> GameResult<()> {
        self.selection
            .select(self.grid, coord, self.presenter, self.telemetry)
    }

    pub fn remove_last(&mut self) -> Option<Coord> {
        self.selection.remove_last(self.presenter, self.telemetry)
    }

    pub fn rewind_to(&mut self, coord: Coord) -> bool {
        self.selection.rewind_to(coord, self.presenter, self.telemetry)
    }

    pub fn clear_all(&mut self) {
        self.selection.clear_all(self.presenter, self.telemetry);
    }

    pub fn dismiss(&mut self) {
        self.selection.dismiss(self.presenter);
    }

    /// Commit the selection, framed by `pre`/`post` key frames
    pub fn submit(&mut self) -> GameResult<Commit> {
        if self.selection.is_empty() {
            return Err(GameError::NothingToSubmit);
        }

        self.key_frame(KeyFrameState::Pre);
        let result = self.commit.submit(
            self.grid,
            self.selection,
            self.score,
            self.presenter,
            self.telemetry,
        );
        if result.is_ok() {
            self.stats.words_played += 1;
        }
        self.key_frame(KeyFrameState::Post);

        result
    }

    pub fn key_frame(&mut self, state: KeyFrameState) {
        self.telemetry.record(&TelemetryEvent::KeyFrame {
            state,
            board: self.grid.snapshot().board(),
            score: self.score.value(),
            words_played: self.stats.words_played,
            interactions: self.stats.interactions,
        });
    }
}

/// One player's game: grid, selection, score and the collaborators they report to.
///
/// Single-threaded; the host drives it through [`GameSession::tick`] and
/// [`GameSession::handle_input`] only.
pub struct GameSession {
    id: Uuid,
    grid: Grid,
    selection: SelectionTracker,
    score: Score,
    gravity: GravityResolver,
    commit: WordCommitEngine,
    policy: Box<dyn SelectionPolicy>,
    spawner: Option<TileSpawner>,
    presenter: Box<dyn Presenter>,
    telemetry: Box<dyn TelemetrySink>,
    stats: SessionStats,
}

impl GameSession {
    pub fn new(config: &SessionConfig, validator: Arc<dyn WordValidator>) -> Self {
        let spawner = config
            .auto_refill
            .then(|| TileSpawner::new(config.rng_seed));

        Self {
            id: Uuid::new_v4(),
            grid: Grid::new(config.radius_x, config.radius_y),
            selection: SelectionTracker::new(),
            score: Score::default(),
            gravity: GravityResolver::new(config.fall_speed),
            commit: WordCommitEngine::new(validator, config.scoring),
            policy: config.interaction_mode.policy(config.min_word_length),
            spawner,
            presenter: Box::new(NullPresenter),
            telemetry: Box::new(NullTelemetry),
            stats: SessionStats::default(),
        }
    }

    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Box<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Start from a prepared grid instead of an empty one
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    fn split(&mut self) -> (&dyn SelectionPolicy, SessionContext<'_>) {
        let GameSession {
            grid,
            selection,
            score,
            commit,
            policy,
            presenter,
            telemetry,
            stats,
            ..
        } = self;

        let ctx = SessionContext {
            grid,
            selection,
            score,
            commit,
            presenter: &mut **presenter,
            telemetry: &mut **telemetry,
            stats,
        };
        (&**policy, ctx)
    }

    /// Advance the simulation by `elapsed`: gravity first, then refill
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        self.stats.elapsed += elapsed;

        let mut report = self
            .gravity
            .tick(&mut self.grid, elapsed, self.presenter.as_mut());

        if let Some(spawner) = self.spawner.as_mut() {
            report.spawned = spawner.refill(&mut self.grid, self.presenter.as_mut());
        }

        report
    }

    /// Route one normalized input event through the selection policy.
    ///
    /// Returns the commit when the event played a word. Rejections and invalid moves
    /// leave the session in a consistent state and are only logged.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Commit> {
        self.stats.interactions += 1;
        let (policy, mut ctx) = self.split();

        let result = match event {
            InputEvent::TileTapped { x, y } => policy.handle_begin(&mut ctx, Coord::new(x, y)),
            InputEvent::TileDragEnter { x, y } => policy.handle_move(&mut ctx, Coord::new(x, y)),
            InputEvent::TileReleased => policy.handle_end(&mut ctx),
            InputEvent::Cancelled => {
                if !ctx.selection().is_empty() {
                    ctx.clear_all();
                }
                Ok(None)
            }
            InputEvent::Submit => ctx.submit().map(Some),
        };

        match result {
            Ok(commit) => commit,
            Err(err) => {
                tracing::debug!("Input {:?} ignored: {}", event, err);
                None
            }
        }
    }

    /// Submit the current selection directly
    pub fn submit(&mut self) -> GameResult<Commit> {
        self.split().1.submit()
    }

    pub fn spawn_tile(&mut self, letter: char, column: i32) -> GameResult<TileId> {
        let id = self.grid.spawn(letter, column)?;
        let coord = Coord::new(column, self.grid.top_row());
        if let Some(tile) = self.grid.tile(id) {
            self.presenter.tile_spawned(id, tile.letter, coord);
        }
        Ok(id)
    }

    pub fn key_frame(&mut self, state: KeyFrameState) {
        self.split().1.key_frame(state);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn current_word(&self) -> &str {
        self.selection.current_word()
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn mode(&self) -> InteractionMode {
        self.policy.mode()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid: self.grid.snapshot(),
            score: self.score.value(),
            current_word: self.selection.current_word().to_string(),
            words_played: self.stats.words_played,
            interactions: self.stats.interactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ScoringRule;
    use crate::models::TileState;
    use crate::ports::testing::{words, PresenterCall, RecordingPresenter, RecordingTelemetry};

    fn config(mode: InteractionMode) -> SessionConfig {
        SessionConfig {
            interaction_mode: mode,
            auto_refill: false,
            ..SessionConfig::default()
        }
    }

    /// 3x3 board:
    ///   row 2: . . .
    ///   row 1: S O N
    ///   row 0: C A T
    fn board() -> Grid {
        let mut grid = Grid::with_size(3, 3);
        for (x, letter) in ['C', 'A', 'T'].into_iter().enumerate() {
            grid.insert(letter, Coord::new(x as i32, 0), TileState::Settled)
                .unwrap();
        }
        for (x, letter) in ['S', 'O', 'N'].into_iter().enumerate() {
            grid.insert(letter, Coord::new(x as i32, 1), TileState::Settled)
                .unwrap();
        }
        grid
    }

    struct Harness {
        session: GameSession,
        presenter: RecordingPresenter,
        telemetry: RecordingTelemetry,
    }

    fn harness(mode: InteractionMode) -> Harness {
        let presenter = RecordingPresenter::default();
        let telemetry = RecordingTelemetry::default();
        let session = GameSession::new(&config(mode), Arc::new(words(&["cat", "son", "cats", "ton"])))
            .with_grid(board())
            .with_presenter(Box::new(presenter.clone()))
            .with_telemetry(Box::new(telemetry.clone()));
        Harness {
            session,
            presenter,
            telemetry,
        }
    }

    fn tap(x: i32, y: i32) -> InputEvent {
        InputEvent::TileTapped { x, y }
    }

    fn drag(x: i32, y: i32) -> InputEvent {
        InputEvent::TileDragEnter { x, y }
    }

    #[test]
    fn test_tap_mode_spells_and_submits_cat() {
        let mut h = harness(InteractionMode::Tap);
        for event in [tap(0, 0), tap(1, 0), tap(2, 0)] {
            assert!(h.session.handle_input(event).is_none());
        }
        assert_eq!(h.session.current_word(), "CAT");

        // Releasing does nothing in tap mode
        assert!(h.session.handle_input(InputEvent::TileReleased).is_none());
        assert_eq!(h.session.current_word(), "CAT");

        let commit = h.session.handle_input(InputEvent::Submit).unwrap();
        assert_eq!(commit.points, 3);
        assert_eq!(h.session.score(), 3);
        for x in 0..3 {
            assert!(h.session.grid().tile_at(x, 0).is_none());
        }
        assert_eq!(h.session.stats().words_played, 1);
    }

    #[test]
    fn test_tap_last_tile_deselects_it() {
        let mut h = harness(InteractionMode::Tap);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(tap(1, 0));
        h.session.handle_input(tap(1, 0));

        assert_eq!(h.session.current_word(), "C");
    }

    #[test]
    fn test_tap_earlier_tile_rewinds() {
        let mut h = harness(InteractionMode::Tap);
        for event in [tap(0, 0), tap(1, 1), tap(2, 0), tap(2, 1)] {
            h.session.handle_input(event);
        }
        assert_eq!(h.session.current_word(), "COTN");

        h.session.handle_input(tap(1, 1));
        assert_eq!(h.session.current_word(), "CO");
    }

    #[test]
    fn test_tap_non_adjacent_clears() {
        let mut h = harness(InteractionMode::Tap);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(tap(1, 0));
        h.session.handle_input(tap(0, 1));
        assert_eq!(h.session.current_word(), "CAS");

        // (2, 1) is two columns away from (0, 1)
        h.session.handle_input(tap(2, 1));
        assert_eq!(h.session.current_word(), "");
        assert_eq!(h.telemetry.names().last(), Some(&"DeselectAll"));
    }

    #[test]
    fn test_tap_empty_cell_clears() {
        let mut h = harness(InteractionMode::Tap);
        h.session.handle_input(tap(0, 0));
        h.presenter.take();
        h.session.handle_input(tap(0, 2));

        assert!(h.session.selection().is_empty());
        assert_eq!(h.telemetry.names(), vec!["LetterSelected"]);
        assert_eq!(
            h.presenter.take(),
            vec![PresenterCall::Unhighlight(Coord::new(0, 0))]
        );
    }

    #[test]
    fn test_tap_outside_board_keeps_selection() {
        let mut h = harness(InteractionMode::Tap);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(tap(7, -1));

        assert_eq!(h.session.current_word(), "C");
        assert_eq!(h.telemetry.names(), vec!["LetterSelected"]);
    }

    #[test]
    fn test_tap_mode_drag_extends_and_rewinds() {
        let mut h = harness(InteractionMode::Tap);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(drag(1, 0));
        h.session.handle_input(drag(1, 0));
        h.session.handle_input(drag(2, 1));
        assert_eq!(h.session.current_word(), "CAN");

        h.session.handle_input(drag(0, 0));
        assert_eq!(h.session.current_word(), "C");
    }

    #[test]
    fn test_swipe_release_submits() {
        let mut h = harness(InteractionMode::Swipe);
        h.session.handle_input(tap(0, 1));
        h.session.handle_input(drag(1, 1));
        h.session.handle_input(drag(2, 1));
        assert_eq!(h.session.current_word(), "SON");

        let commit = h.session.handle_input(InputEvent::TileReleased).unwrap();
        assert_eq!(commit.word, "SON");
        assert_eq!(h.session.score(), 3);
        assert!(h.session.selection().is_empty());
    }

    #[test]
    fn test_swipe_short_release_clears() {
        let mut h = harness(InteractionMode::Swipe);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(drag(1, 0));

        assert!(h.session.handle_input(InputEvent::TileReleased).is_none());
        assert!(h.session.selection().is_empty());
        assert_eq!(h.session.score(), 0);
        assert_eq!(h.telemetry.names().last(), Some(&"DeselectAll"));
        assert_eq!(h.session.grid().tile_count(), 6);
    }

    #[test]
    fn test_swipe_invalid_word_rejected_on_release() {
        let mut h = harness(InteractionMode::Swipe);
        h.session.handle_input(tap(2, 0));
        h.session.handle_input(drag(1, 0));
        h.session.handle_input(drag(0, 0));

        assert!(h.session.handle_input(InputEvent::TileReleased).is_none());
        assert_eq!(h.session.score(), 0);
        assert!(h.session.selection().is_empty());
        assert!(h.telemetry.names().contains(&"WordRejected"));
    }

    #[test]
    fn test_swipe_new_press_restarts_selection() {
        let mut h = harness(InteractionMode::Swipe);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(drag(1, 0));
        h.session.handle_input(tap(2, 1));

        assert_eq!(h.session.current_word(), "N");
    }

    #[test]
    fn test_cancel_clears_in_both_modes() {
        for mode in [InteractionMode::Tap, InteractionMode::Swipe] {
            let mut h = harness(mode);
            h.session.handle_input(tap(0, 0));
            h.session.handle_input(drag(1, 0));
            h.session.handle_input(InputEvent::Cancelled);
            assert!(h.session.selection().is_empty(), "{:?}", mode);
        }
    }

    #[test]
    fn test_submit_with_nothing_selected() {
        let mut h = harness(InteractionMode::Tap);
        assert_eq!(h.session.submit(), Err(GameError::NothingToSubmit));
        assert!(h.session.handle_input(InputEvent::Submit).is_none());
        assert_eq!(h.session.score(), 0);
        assert!(h.telemetry.names().is_empty());
    }

    #[test]
    fn test_submit_framed_by_key_frames() {
        let mut h = harness(InteractionMode::Tap);
        for event in [tap(0, 0), tap(1, 0), tap(2, 0)] {
            h.session.handle_input(event);
        }
        h.session.submit().unwrap();

        let events = h.telemetry.events.borrow();
        let tail: Vec<_> = events.iter().rev().take(3).collect();
        assert!(matches!(
            tail[0],
            TelemetryEvent::KeyFrame { state: KeyFrameState::Post, score: 3, words_played: 1, .. }
        ));
        assert_eq!(tail[1].name(), "WordSubmitted");
        assert!(matches!(
            tail[2],
            TelemetryEvent::KeyFrame { state: KeyFrameState::Pre, board, .. } if board == ".../SON/CAT"
        ));
    }

    #[test]
    fn test_gravity_refills_gap_after_commit() {
        let mut h = harness(InteractionMode::Tap);
        for event in [tap(0, 0), tap(1, 0), tap(2, 0)] {
            h.session.handle_input(event);
        }
        h.session.submit().unwrap();
        h.presenter.take();

        h.session.tick(Duration::from_millis(50));

        let snapshot = h.session.snapshot();
        assert_eq!(snapshot.grid.rows, vec!["...", "...", "SON"]);
        let moves = h
            .presenter
            .take()
            .into_iter()
            .filter(|call| matches!(call, PresenterCall::Moved(..)))
            .count();
        assert_eq!(moves, 3);
    }

    #[test]
    fn test_auto_refill_spawns_on_tick() {
        let cfg = SessionConfig {
            radius_x: 1,
            radius_y: 1,
            auto_refill: true,
            rng_seed: Some(3),
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(&cfg, Arc::new(words(&[])));

        let report = session.tick(Duration::from_millis(50));
        assert_eq!(report.spawned.len(), 3);

        for _ in 0..20 {
            session.tick(Duration::from_millis(50));
        }
        assert!(session.grid().is_consistent());
        assert!(session.grid().tile_count() >= 3);
        assert!(session.grid().tiles().all(|tile| tile.pos.y < 3));
    }

    #[test]
    fn test_spawn_tile_notifies_presenter() {
        let mut h = harness(InteractionMode::Tap);
        let id = h.session.spawn_tile('z', 0).unwrap();

        assert_eq!(
            h.presenter.take(),
            vec![PresenterCall::Spawned(id, 'Z', Coord::new(0, 2))]
        );
        assert_eq!(
            h.session.spawn_tile('q', 0),
            Err(GameError::CellOccupied { x: 0, y: 2 })
        );
    }

    #[test]
    fn test_interactions_counted() {
        let mut h = harness(InteractionMode::Swipe);
        h.session.handle_input(tap(0, 0));
        h.session.handle_input(drag(5, 5));
        h.session.handle_input(InputEvent::Cancelled);
        assert_eq!(h.session.stats().interactions, 3);
        assert_eq!(h.session.mode(), InteractionMode::Swipe);
    }

    #[test]
    fn test_scoring_rule_from_config() {
        let cfg = SessionConfig {
            scoring: ScoringRule::LetterValues,
            interaction_mode: InteractionMode::Tap,
            auto_refill: false,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(&cfg, Arc::new(words(&["cat"]))).with_grid(board());
        for event in [tap(0, 0), tap(1, 0), tap(2, 0)] {
            session.handle_input(event);
        }
        assert_eq!(session.submit().unwrap().points, 5);
    }
}
