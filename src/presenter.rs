use crate::{
    models::{Coord, TileId},
    ports::Presenter,
};

/// Presenter for the headless host; every visual update becomes a trace event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn highlight(&mut self, coord: Coord) {
        tracing::debug!("Highlight {}", coord);
    }

    fn unhighlight(&mut self, coord: Coord) {
        tracing::debug!("Unhighlight {}", coord);
    }

    fn tile_spawned(&mut self, tile: TileId, letter: char, coord: Coord) {
        tracing::trace!("Tile {} '{}' spawned at {}", tile, letter, coord);
    }

    fn tile_position_changed(&mut self, tile: TileId, coord: Coord) {
        tracing::trace!("Tile {} moved to {}", tile, coord);
    }

    fn tile_removed(&mut self, tile: TileId) {
        tracing::debug!("Tile {} removed", tile);
    }

    fn score_changed(&mut self, score: u64) {
        tracing::info!("Score: {}", score);
    }
}
