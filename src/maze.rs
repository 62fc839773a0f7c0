//! Grid model and perfect-maze generation.

use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::MazeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

/// A cell coordinate, 0-based, `row` first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Moves `dist` cells towards `dir`, or `None` if that leaves a
    /// `size` x `size` grid.
    pub fn step(self, dir: Dir, dist: usize, size: usize) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr * dist as isize)?;
        let col = self.col.checked_add_signed(dc * dist as isize)?;
        (row < size && col < size).then_some(Pos { row, col })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// `(row, col)` offset of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// Square matrix of walls and open cells.
///
/// Start is always the top-left cell and end the bottom-right one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// A `size` x `size` grid of walls.
    fn walled(size: usize) -> Self {
        Self {
            size,
            tiles: vec![vec![Tile::Wall; size]; size],
        }
    }

    /// Parses rows of `#` (wall) and `.` (open). Blank lines and
    /// surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let size = lines.len();
        if size < 2 {
            return Err(MazeError::TooSmall { size });
        }

        let mut tiles = Vec::with_capacity(size);
        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::with_capacity(size);
            for (col, ch) in line.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Open,
                    _ => return Err(MazeError::UnexpectedChar { ch, row, col }),
                };
                cells.push(tile);
            }
            if cells.len() != size {
                return Err(MazeError::Ragged {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
            tiles.push(cells);
        }
        Ok(Self { size, tiles })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Pos {
        Pos::new(0, 0)
    }

    pub fn end(&self) -> Pos {
        Pos::new(self.size - 1, self.size - 1)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.tiles.get(pos.row)?.get(pos.col).copied()
    }

    /// `false` for walls and for positions off the grid.
    pub fn is_open(&self, pos: Pos) -> bool {
        self.tile(pos) == Some(Tile::Open)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.tiles.iter().map(Vec::as_slice)
    }

    pub fn open_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&tile| tile == Tile::Open)
            .count()
    }

    /// Cells reachable from `start` through open 4-neighbours.
    pub fn reachable_from(&self, start: Pos) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; self.size]; self.size];
        if !self.is_open(start) {
            return seen;
        }
        let mut q = VecDeque::new();
        seen[start.row][start.col] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for dir in Dir::ALL {
                let Some(next) = pos.step(dir, 1, self.size) else {
                    continue;
                };
                if seen[next.row][next.col] || !self.is_open(next) {
                    continue;
                }
                seen[next.row][next.col] = true;
                q.push_back(next);
            }
        }
        seen
    }

    fn carve(&mut self, pos: Pos) {
        self.tiles[pos.row][pos.col] = Tile::Open;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.tiles {
            for tile in row {
                let ch = match tile {
                    Tile::Wall => '#',
                    Tile::Open => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One pending cell of the depth-first walk.
struct Frame {
    pos: Pos,
    dirs: [Dir; 4],
    next: usize,
}

impl Frame {
    fn new(pos: Pos, rng: &mut impl Rng) -> Self {
        let mut dirs = Dir::ALL;
        dirs.shuffle(rng);
        Self { pos, dirs, next: 0 }
    }

    fn next_dir(&mut self) -> Option<Dir> {
        let dir = self.dirs.get(self.next).copied()?;
        self.next += 1;
        Some(dir)
    }
}

/// Carves a perfect maze into a `size` x `size` grid.
///
/// Walks the even-coordinate lattice depth-first from the top-left cell,
/// stepping two cells at a time and opening the wall cell in between. Each
/// cell's directions are shuffled once when it is entered, so the result
/// depends only on the RNG stream.
///
/// On even sizes the bottom-right cell lies off the lattice; the cell
/// above it is opened too so the end hangs off the tree as a leaf. Every
/// other off-lattice border cell stays a wall.
///
/// # Panics
///
/// If `size < 2`.
pub fn generate(size: usize, rng: &mut impl Rng) -> Grid {
    assert!(size >= 2, "maze size must be at least 2, got {size}");

    let mut grid = Grid::walled(size);
    let start = grid.start();
    grid.carve(start);

    let mut stack = vec![Frame::new(start, rng)];
    let mut deepest = stack.len();
    while let Some(frame) = stack.last_mut() {
        let from = frame.pos;
        match frame.next_dir() {
            None => {
                stack.pop();
            }
            Some(dir) => {
                let Some(target) = from.step(dir, 2, size) else {
                    continue;
                };
                if grid.is_open(target) {
                    continue;
                }
                let between = Pos::new((from.row + target.row) / 2, (from.col + target.col) / 2);
                grid.carve(between);
                grid.carve(target);
                stack.push(Frame::new(target, rng));
                deepest = deepest.max(stack.len());
            }
        }
    }

    link_end(&mut grid);

    debug!(
        size,
        open = grid.open_count(),
        max_depth = deepest,
        "maze generated"
    );
    grid
}

fn link_end(grid: &mut Grid) {
    let start = grid.start();
    let end = grid.end();
    grid.carve(start);
    grid.carve(end);
    if grid.size % 2 == 0 {
        grid.carve(Pos::new(end.row - 1, end.col));
    }
}
