use std::collections::HashSet;
use std::time::Duration;

use crate::{
    game::Grid,
    models::{TileId, TileState},
    ports::Presenter,
};

/// Default interval between two fall steps of the same tile
pub const DEFAULT_FALL_SPEED: Duration = Duration::from_millis(50);

/// What one gravity tick changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tiles that moved down one row, in processing order
    pub moved: Vec<TileId>,
    /// Falling tiles that landed and became settled
    pub landed: Vec<TileId>,
    /// Columns in which a collapse shift started
    pub collapsed_columns: Vec<i32>,
    /// Tiles dropped in at the top after gravity ran
    pub spawned: Vec<TileId>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.moved.is_empty() && self.landed.is_empty()
    }
}

/// Per-column collapse and fall resolution.
///
/// Each tick first advances `Falling` tiles, then resolves at most one column shift per
/// column, columns in ascending order. A tile moves at most once per tick and only
/// after its own timer has reached `fall_speed`.
#[derive(Debug, Clone)]
pub struct GravityResolver {
    fall_speed: Duration,
}

impl Default for GravityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FALL_SPEED)
    }
}

impl GravityResolver {
    pub fn new(fall_speed: Duration) -> Self {
        Self { fall_speed }
    }

    pub fn fall_speed(&self) -> Duration {
        self.fall_speed
    }

    pub fn tick(
        &self,
        grid: &mut Grid,
        elapsed: Duration,
        presenter: &mut dyn Presenter,
    ) -> TickReport {
        let mut report = TickReport::default();
        let mut moved = HashSet::new();

        for tile in grid.tiles_mut() {
            tile.fall_timer += elapsed;
        }

        self.advance_falling(grid, &mut moved, &mut report, presenter);

        for x in 0..grid.width() as i32 {
            Self::settle_supported(grid, x);
            self.collapse_column(grid, x, &mut moved, &mut report, presenter);
        }

        report
    }

    /// Step every due `Falling` tile one row down, lowest rows first so that a stack of
    /// falling tiles moves together.
    fn advance_falling(
        &self,
        grid: &mut Grid,
        moved: &mut HashSet<TileId>,
        report: &mut TickReport,
        presenter: &mut dyn Presenter,
    ) {
        let mut due = Vec::new();
        for x in 0..grid.width() as i32 {
            for y in 0..grid.height() as i32 {
                let Some(id) = grid.tile_at(x, y) else { continue };
                if let Some(tile) = grid.tile(id) {
                    if tile.is_falling() && tile.fall_timer >= self.fall_speed {
                        due.push(id);
                    }
                }
            }
        }

        for id in due {
            let Some(pos) = grid.tile(id).map(|tile| tile.pos) else {
                continue;
            };
            let target = pos.below();

            // Wait on a tile that is itself still falling instead of landing on it
            let blocker_falling = grid
                .entity_at(target)
                .is_some_and(|below| below.is_falling());
            if blocker_falling {
                continue;
            }

            match grid.place(id, target.x, target.y) {
                Ok(()) => {
                    moved.insert(id);
                    report.moved.push(id);
                    presenter.tile_position_changed(id, target);
                }
                Err(_) => {
                    if let Some(tile) = grid.tile_mut(id) {
                        tile.state = TileState::Settled;
                    }
                    report.landed.push(id);
                    tracing::trace!("Tile {} landed at {}", id, pos);
                }
            }

            if let Some(tile) = grid.tile_mut(id) {
                tile.fall_timer = Duration::ZERO;
            }
        }
    }

    /// A column-falling tile that has support again is settled
    fn settle_supported(grid: &mut Grid, x: i32) {
        for y in 0..grid.height() as i32 {
            let Some(id) = grid.tile_at(x, y) else { continue };
            let supported = y == 0 || grid.tile_at(x, y - 1).is_some();
            if let Some(tile) = grid.tile_mut(id) {
                if tile.is_column_falling() && supported {
                    tile.state = TileState::Settled;
                }
            }
        }
    }

    fn collapse_column(
        &self,
        grid: &mut Grid,
        x: i32,
        moved: &mut HashSet<TileId>,
        report: &mut TickReport,
        presenter: &mut dyn Presenter,
    ) {
        let height = grid.height() as i32;
        let column = grid.column_tiles(x);
        let column_falling: Vec<TileId> = column
            .iter()
            .copied()
            .filter(|id| grid.tile(*id).is_some_and(|tile| tile.is_column_falling()))
            .collect();

        for y in 1..height {
            let Some(id) = grid.tile_at(x, y) else { continue };
            let Some(tile) = grid.tile(id) else { continue };

            if tile.is_falling() || moved.contains(&id) || tile.fall_timer < self.fall_speed {
                continue;
            }
            if !grid.is_empty_at(x, y - 1) {
                continue;
            }
            if column_falling.iter().any(|other| *other != id) {
                tracing::trace!("Column {} already collapsing, skipping {}", x, id);
                continue;
            }
            let stack_moved = (y..height)
                .filter_map(|above| grid.tile_at(x, above))
                .any(|above| moved.contains(&above));
            if stack_moved {
                continue;
            }

            self.shift_column(grid, x, y, id, moved, report, presenter);
            return;
        }
    }

    /// Move every tile at or above `from_y` down one row; the top row ends up empty
    #[allow(clippy::too_many_arguments)]
    fn shift_column(
        &self,
        grid: &mut Grid,
        x: i32,
        from_y: i32,
        initiator: TileId,
        moved: &mut HashSet<TileId>,
        report: &mut TickReport,
        presenter: &mut dyn Presenter,
    ) {
        if let Some(tile) = grid.tile_mut(initiator) {
            tile.state = TileState::ColumnFalling;
            tile.fall_timer = Duration::ZERO;
        }
        report.collapsed_columns.push(x);

        for y in from_y..grid.height() as i32 {
            let Some(id) = grid.tile_at(x, y) else { continue };
            if let Err(err) = grid.place(id, x, y - 1) {
                debug_assert!(false, "column shift blocked: {err}");
                tracing::error!("Column {} shift blocked at row {}: {}", x, y, err);
                return;
            }
            moved.insert(id);
            report.moved.push(id);
            if let Some(tile) = grid.tile(id) {
                presenter.tile_position_changed(id, tile.pos);
            }
        }

        debug_assert!(grid.is_empty_at(x, grid.height() as i32 - 1));
    }
}
