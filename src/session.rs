//! Player state on top of a generated grid.

use tracing::{info, trace};

use crate::error::MazeError;
use crate::maze::{Dir, Grid, Pos};

/// Outcome of a single move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Accepted(Pos),
    Rejected,
}

impl MoveResult {
    pub fn is_accepted(self) -> bool {
        matches!(self, MoveResult::Accepted(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Won,
}

/// One play-through of one maze.
///
/// Owns its grid; the player starts at the top-left cell and wins on
/// reaching the bottom-right one. Reaching the end does not lock the
/// session, later moves are still validated the same way.
#[derive(Debug, Clone)]
pub struct MazeSession {
    grid: Grid,
    player: Pos,
    end: Pos,
    moves: u32,
}

impl MazeSession {
    pub fn new(grid: Grid) -> Self {
        let player = grid.start();
        let end = grid.end();
        Self {
            grid,
            player,
            end,
            moves: 0,
        }
    }

    /// Starts the player at `pos` instead of the top-left cell.
    pub fn starting_at(grid: Grid, pos: Pos) -> Result<Self, MazeError> {
        if !grid.contains(pos) {
            return Err(MazeError::OutOfBounds {
                pos,
                size: grid.size(),
            });
        }
        let mut session = Self::new(grid);
        session.player = pos;
        Ok(session)
    }

    /// Moves one cell towards `dir` if that cell is on the grid and open.
    pub fn attempt_move(&mut self, dir: Dir) -> MoveResult {
        let was_won = self.is_won();
        let target = self
            .player
            .step(dir, 1, self.grid.size())
            .filter(|&pos| self.grid.is_open(pos));
        let Some(target) = target else {
            trace!(?dir, from = %self.player, "move rejected");
            return MoveResult::Rejected;
        };

        self.player = target;
        self.moves += 1;
        trace!(?dir, to = %target, "move accepted");
        if !was_won && self.is_won() {
            info!(moves = self.moves, "maze solved");
        }
        MoveResult::Accepted(target)
    }

    pub fn is_won(&self) -> bool {
        self.player == self.end
    }

    pub fn status(&self) -> Status {
        if self.is_won() {
            Status::Won
        } else {
            Status::InProgress
        }
    }

    pub fn current_position(&self) -> Pos {
        self.player
    }

    pub fn end_position(&self) -> Pos {
        self.end
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Accepted moves so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }
}
