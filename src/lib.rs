//! Falling-letter word game engine.
//!
//! The core lives in [`game`]; [`ports`] defines what it needs from the outside world.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod game;
pub mod input;
pub mod models;
pub mod ports;
pub mod presenter;
pub mod telemetry;
pub mod utils;

pub use error::{GameError, GameResult};
