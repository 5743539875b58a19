/// Maze generation: randomized depth-first backtracking on a lattice.
///
/// Lattice cells sit at even `(x, y)`; odd coordinates are the wall slots
/// between two lattice cells. Carving starts at the origin, visits the
/// in-bounds neighbours two steps away in shuffled order, and opens the
/// midpoint each time it descends into a cell not yet visited. The carved
/// passages form a spanning tree of the lattice, so every lattice cell is
/// reachable from every other by exactly one path.
///
/// Depth is tracked with an explicit stack of frames, one per cell on the
/// current path. Each frame keeps its own shuffled candidate list and a
/// cursor, which reproduces the visiting order of the recursive formulation
/// without touching the call stack.
///
/// When a dimension is even the far row/column is not part of the lattice,
/// so the goal corner would otherwise stay walled in. `link_goal` opens it
/// as a dead-end spur off the nearest lattice cell.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::cell::Cell;
use super::error::MazeError;
use super::grid::{Grid, Position};

/// A generated maze: the grid plus the seed that reproduces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    seed: u64,
}

impl Maze {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Where the player spawns.
    pub fn start(&self) -> Position {
        Position::ORIGIN
    }

    /// Bottom-right corner.
    pub fn goal(&self) -> Position {
        Position::new(self.cols() - 1, self.rows() - 1)
    }
}

pub struct MazeGenerator {
    rng: StdRng,
    seed: u64,
}

/// One lattice cell on the current carving path.
struct Frame {
    cell: Position,
    candidates: [Position; 4],
    len: usize,
    next: usize,
}

impl MazeGenerator {
    pub fn new(seed: u64) -> Self {
        MazeGenerator {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed drawn from the thread-local generator; every call differs.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Carve a `rows x cols` maze.
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<Maze, MazeError> {
        let mut grid = Grid::new(rows, cols)?;
        let mut visited = vec![vec![false; cols]; rows];

        let mut stack = vec![self.enter(&mut grid, &mut visited, Position::ORIGIN)];
        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.len {
                stack.pop();
                continue;
            }
            let current = frame.cell;
            let candidate = frame.candidates[frame.next];
            frame.next += 1;

            // Checked here, not when the list was built: a deeper frame may
            // have reached this cell since.
            if visited[candidate.y][candidate.x] {
                continue;
            }
            grid.set(current.midpoint(candidate), Cell::Open);
            let child = self.enter(&mut grid, &mut visited, candidate);
            stack.push(child);
        }

        self.link_goal(&mut grid);
        debug_assert!(grid
            .reachable_from(Position::ORIGIN)
            .contains(&Position::new(cols - 1, rows - 1)));

        Ok(Maze { grid, seed: self.seed })
    }

    /// Open a lattice cell and build its shuffled neighbour list.
    fn enter(&mut self, grid: &mut Grid, visited: &mut [Vec<bool>], cell: Position) -> Frame {
        grid.set(cell, Cell::Open);
        visited[cell.y][cell.x] = true;

        let mut candidates = [Position::ORIGIN; 4];
        let mut len = 0;
        for (dx, dy) in [(0, 2), (0, -2), (2, 0), (-2, 0)] {
            if let Some(p) = cell.offset(dx, dy).filter(|p| grid.contains(*p)) {
                candidates[len] = p;
                len += 1;
            }
        }
        candidates[..len].shuffle(&mut self.rng);

        Frame { cell, candidates, len, next: 0 }
    }

    /// Make sure the bottom-right corner is open and hangs off the lattice.
    fn link_goal(&mut self, grid: &mut Grid) {
        let goal = Position::new(grid.cols() - 1, grid.rows() - 1);
        if grid.is_open(goal) {
            return;
        }
        grid.set(goal, Cell::Open);

        // Both coordinates odd: the corner is diagonal to the nearest
        // lattice cell, so one of the two slots between them must open too.
        if goal.x % 2 == 1 && goal.y % 2 == 1 {
            let connector = if self.rng.gen::<bool>() {
                Position::new(goal.x, goal.y - 1)
            } else {
                Position::new(goal.x - 1, goal.y)
            };
            grid.set(connector, Cell::Open);
        }
    }
}
