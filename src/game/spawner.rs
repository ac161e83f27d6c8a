use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    game::Grid,
    models::{Coord, TileId},
    ports::Presenter,
    utils::letters::cumulative_distribution,
};

/// Drops new letters into columns that have room at the top.
pub struct TileSpawner {
    rng: StdRng,
    cumulative_dist: &'static [(char, f32)],
    total: f32,
}

impl TileSpawner {
    /// A fixed seed gives a reproducible letter sequence
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let cumulative_dist = cumulative_distribution();
        let total = cumulative_dist.last().map(|(_, c)| *c).unwrap_or(0.0);

        Self {
            rng,
            cumulative_dist,
            total,
        }
    }

    /// Weighted random letter following English letter frequencies
    pub fn next_letter(&mut self) -> char {
        let random_value = self.rng.random::<f32>() * self.total;

        for (letter, cumulative) in self.cumulative_dist {
            if random_value <= *cumulative {
                return *letter;
            }
        }

        'E' // Fallback
    }

    /// Spawn one falling tile in every column whose top cell is free and whose tiles are
    /// at rest on the floor. Columns are visited in ascending order.
    pub fn refill(&mut self, grid: &mut Grid, presenter: &mut dyn Presenter) -> Vec<TileId> {
        let top = grid.top_row();
        let mut spawned = Vec::new();

        for x in 0..grid.width() as i32 {
            if !grid.is_empty_at(x, top) || grid.is_column_in_motion(x) || !is_compact(grid, x) {
                continue;
            }

            let letter = self.next_letter();
            match grid.spawn(letter, x) {
                Ok(id) => {
                    presenter.tile_spawned(id, letter, Coord::new(x, top));
                    spawned.push(id);
                }
                Err(err) => tracing::warn!("Failed to spawn into column {}: {}", x, err),
            }
        }

        spawned
    }
}

/// No gaps between the floor and the highest tile
fn is_compact(grid: &Grid, x: i32) -> bool {
    let count = grid.column_tiles(x).len() as i32;
    (0..count).all(|y| grid.tile_at(x, y).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TileState;
    use crate::ports::testing::{PresenterCall, RecordingPresenter};
    use crate::ports::NullPresenter;

    #[test]
    fn test_seeded_spawner_is_reproducible() {
        let mut a = TileSpawner::new(Some(42));
        let mut b = TileSpawner::new(Some(42));
        let first: String = (0..50).map(|_| a.next_letter()).collect();
        let second: String = (0..50).map(|_| b.next_letter()).collect();

        assert_eq!(first, second);
        assert!(first.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_refill_spawns_into_open_columns() {
        let mut grid = Grid::with_size(3, 3);
        // Column 1 is full
        for y in 0..3 {
            grid.insert('A', Coord::new(1, y), TileState::Settled).unwrap();
        }
        let mut spawner = TileSpawner::new(Some(7));
        let mut presenter = RecordingPresenter::default();

        let spawned = spawner.refill(&mut grid, &mut presenter);

        assert_eq!(spawned.len(), 2);
        assert!(grid.tile(spawned[0]).unwrap().is_falling());
        assert_eq!(grid.tile(spawned[0]).unwrap().pos, Coord::new(0, 2));
        assert_eq!(grid.tile(spawned[1]).unwrap().pos, Coord::new(2, 2));
        let calls = presenter.take();
        assert!(matches!(calls[0], PresenterCall::Spawned(_, _, c) if c == Coord::new(0, 2)));
    }

    #[test]
    fn test_refill_skips_columns_in_motion_or_with_gaps() {
        let mut grid = Grid::with_size(2, 4);
        grid.spawn('A', 0).unwrap();
        grid.place(grid.tile_at(0, 3).unwrap(), 0, 2).unwrap();
        // Column 1 has a hole under a settled tile
        grid.insert('B', Coord::new(1, 2), TileState::Settled).unwrap();

        let spawned = TileSpawner::new(Some(1)).refill(&mut grid, &mut NullPresenter);
        assert!(spawned.is_empty());
    }
}
