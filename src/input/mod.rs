pub mod messages;
pub mod reader;

pub use messages::InputEvent;
pub use reader::{forward_events, spawn_stdin_reader};
