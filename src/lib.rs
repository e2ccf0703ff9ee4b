pub mod character;
pub mod config;
pub mod grid;
pub mod maze;
pub mod render;
pub mod session;

#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;

pub use character::{Character, CharacterState, Stat, Stats};
pub use config::{ConfigError, ExitPolicy, SessionConfig};
pub use grid::{Direction, Dungeon, Grid, OutOfBounds, Position, Size, Tile};
pub use maze::MazeGenerator;
pub use session::{Outcome, Session};
