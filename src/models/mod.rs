pub mod snapshot;
pub mod tile;

pub use snapshot::{GridSnapshot, SessionSnapshot};
pub use tile::{Coord, TileEntity, TileId, TileState};
