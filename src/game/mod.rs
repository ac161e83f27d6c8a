// Game engine modules

pub mod commit;
pub mod gravity;
pub mod grid;
pub mod policy;
pub mod scorer;
pub mod selection;
pub mod session;
pub mod spawner;

pub use commit::{Commit, WordCommitEngine};
pub use gravity::{GravityResolver, TickReport, DEFAULT_FALL_SPEED};
pub use grid::Grid;
pub use policy::{InteractionMode, SelectionPolicy, SwipePolicy, TapPolicy};
pub use scorer::{Score, Scorer, ScoringRule};
pub use selection::{SelectionEntry, SelectionTracker};
pub use session::{GameSession, SessionContext, SessionStats};
pub use spawner::TileSpawner;
