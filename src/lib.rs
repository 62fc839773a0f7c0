//! Perfect-maze generation and the rules for walking one.
//!
//! [`generate`] carves a grid; [`MazeSession`] owns it and validates the
//! player's moves until the bottom-right cell is reached.

pub mod difficulty;
pub mod error;
pub mod maze;
pub mod session;

pub use difficulty::Difficulty;
pub use error::MazeError;
pub use maze::{generate, Dir, Grid, Pos, Tile};
pub use session::{MazeSession, MoveResult, Status};
