use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::GameResult,
    game::{session::SessionContext, Commit},
    models::Coord,
};

/// Minimum selection length a swipe release will submit
pub const DEFAULT_MIN_WORD_LENGTH: usize = 3;

/// How pointer gestures build a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Tap tiles one by one, play the word with an explicit submit
    Tap,
    /// Drag across tiles, releasing plays the word
    #[default]
    Swipe,
}

impl InteractionMode {
    pub fn policy(self, min_word_length: usize) -> Box<dyn SelectionPolicy> {
        match self {
            InteractionMode::Tap => Box::new(TapPolicy),
            InteractionMode::Swipe => Box::new(SwipePolicy { min_word_length }),
        }
    }
}

impl FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tap" => Ok(InteractionMode::Tap),
            "swipe" | "drag" => Ok(InteractionMode::Swipe),
            other => Err(format!("unknown interaction mode '{}'", other)),
        }
    }
}

/// Gesture handling shared by every interaction mode.
///
/// `begin` is a press on a cell, `move` is the pointer entering another cell while
/// held, `end` is the release. Each may return the commit it triggered.
pub trait SelectionPolicy {
    fn mode(&self) -> InteractionMode;

    fn handle_begin(&self, ctx: &mut SessionContext<'_>, coord: Coord) -> GameResult<Option<Commit>>;

    fn handle_move(&self, ctx: &mut SessionContext<'_>, coord: Coord) -> GameResult<Option<Commit>> {
        drag_over(ctx, coord)?;
        Ok(None)
    }

    fn handle_end(&self, ctx: &mut SessionContext<'_>) -> GameResult<Option<Commit>>;
}

/// Dragging onto a cell: extend the trail, or back up along it when the pointer
/// returns to a tile that is already selected.
fn drag_over(ctx: &mut SessionContext<'_>, coord: Coord) -> GameResult<()> {
    if !ctx.has_tile(coord) {
        return Ok(());
    }
    let Some(last) = ctx.selection().last() else {
        return Ok(());
    };

    if last == coord {
        return Ok(());
    }
    if ctx.selection().contains(coord) {
        ctx.rewind_to(coord);
        return Ok(());
    }
    if last.is_adjacent(&coord) {
        ctx.select(coord)?;
    }
    Ok(())
}

/// Tap-hold-release: words grow one tap at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct TapPolicy;

impl SelectionPolicy for TapPolicy {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Tap
    }

    fn handle_begin(&self, ctx: &mut SessionContext<'_>, coord: Coord) -> GameResult<Option<Commit>> {
        // An empty cell drops the selection quietly; taps off the board are ignored
        if !ctx.has_tile(coord) {
            if ctx.grid().in_bounds(coord.x, coord.y) {
                ctx.dismiss();
            }
            return Ok(None);
        }

        let Some(last) = ctx.selection().last() else {
            ctx.select(coord)?;
            return Ok(None);
        };

        if last == coord {
            ctx.remove_last();
        } else if ctx.selection().contains(coord) {
            ctx.rewind_to(coord);
        } else if last.is_adjacent(&coord) {
            ctx.select(coord)?;
        } else {
            ctx.clear_all();
        }
        Ok(None)
    }

    fn handle_end(&self, _ctx: &mut SessionContext<'_>) -> GameResult<Option<Commit>> {
        Ok(None)
    }
}

/// Drag-select: a single gesture spells the word and releasing plays it
#[derive(Debug, Clone, Copy)]
pub struct SwipePolicy {
    pub min_word_length: usize,
}

impl Default for SwipePolicy {
    fn default() -> Self {
        Self {
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
        }
    }
}

impl SelectionPolicy for SwipePolicy {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Swipe
    }

    fn handle_begin(&self, ctx: &mut SessionContext<'_>, coord: Coord) -> GameResult<Option<Commit>> {
        if !ctx.selection().is_empty() {
            ctx.clear_all();
        }
        if ctx.has_tile(coord) {
            ctx.select(coord)?;
        }
        Ok(None)
    }

    fn handle_end(&self, ctx: &mut SessionContext<'_>) -> GameResult<Option<Commit>> {
        let len = ctx.selection().len();
        if len >= self.min_word_length {
            return ctx.submit().map(Some);
        }
        if len > 0 {
            ctx.clear_all();
        }
        Ok(None)
    }
}
