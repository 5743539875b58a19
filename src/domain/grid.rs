/// Grid: a fixed-size rectangle of `Cell`s, indexed by `Position`.
///
/// Storage is row-major (`cells[y][x]`), matching how the renderer walks it.
/// Reads outside the rectangle return `Cell::Wall`, so callers never need a
/// separate bounds check before asking whether a cell is passable.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use super::cell::Cell;
use super::error::MazeError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Shift by a signed delta. `None` if either axis would go negative.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Position> {
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        Some(Position { x, y })
    }

    /// Cell halfway between two lattice cells two steps apart.
    pub fn midpoint(self, other: Position) -> Position {
        Position {
            x: (self.x + other.x) / 2,
            y: (self.y + other.y) / 2,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// All-wall grid. Fails on a zero dimension or a cell count that
    /// cannot be addressed.
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![vec![Cell::Wall; cols]; rows],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        if self.contains(pos) {
            self.cells[pos.y][pos.x]
        } else {
            Cell::Wall
        }
    }

    #[inline]
    pub fn is_open(&self, pos: Position) -> bool {
        self.get(pos).is_open()
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.y][pos.x] = cell;
        }
    }

    /// Row slices, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|r| r.as_slice())
    }

    /// Orthogonal in-bounds neighbours of `pos`.
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .into_iter()
            .filter_map(move |(dx, dy)| pos.offset(dx, dy))
            .filter(move |p| self.contains(*p))
    }

    /// Every open cell reachable from `start` through open cells (BFS).
    /// Empty if `start` itself is not open.
    pub fn reachable_from(&self, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::new();
        if !self.is_open(start) {
            return seen;
        }
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(pos) = queue.pop_front() {
            for next in self.neighbours(pos) {
                if self.is_open(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }
        Ok(())
    }
}

/// Parse the diagram form: one line per row, `#` wall, `.` or space open.
impl FromStr for Grid {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.is_empty()).collect();
        let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let mut grid = Grid::new(lines.len(), cols)?;
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MazeError::RaggedRow { row: y, expected: cols, found });
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::from_glyph(ch)
                    .ok_or(MazeError::UnknownGlyph { glyph: ch, x, y })?;
                grid.set(Position::new(x, y), cell);
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        rows.join("\n").parse().expect("valid diagram")
    }

    #[test]
    fn new_grid_is_all_wall() {
        let g = Grid::new(3, 5).unwrap();
        assert_eq!(g.rows(), 3);
        assert_eq!(g.cols(), 5);
        assert!(g.rows_iter().flatten().all(|c| *c == Cell::Wall));
    }

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(Grid::new(0, 4), Err(MazeError::InvalidDimensions { rows: 0, cols: 4 }));
        assert_eq!(Grid::new(4, 0), Err(MazeError::InvalidDimensions { rows: 4, cols: 0 }));
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = grid(&["..", ".."]);
        assert!(g.is_open(Position::new(1, 1)));
        assert!(!g.is_open(Position::new(2, 0)));
        assert!(!g.is_open(Position::new(0, 2)));
    }

    #[test]
    fn out_of_bounds_write_ignored() {
        let mut g = Grid::new(2, 2).unwrap();
        g.set(Position::new(5, 5), Cell::Open);
        assert_eq!(g, Grid::new(2, 2).unwrap());
    }

    #[test]
    fn offset_stops_at_zero() {
        assert_eq!(Position::ORIGIN.offset(-1, 0), None);
        assert_eq!(Position::ORIGIN.offset(0, -1), None);
        assert_eq!(Position::new(3, 4).offset(-1, 1), Some(Position::new(2, 5)));
    }

    #[test]
    fn midpoint_between_lattice_cells() {
        assert_eq!(Position::new(2, 4).midpoint(Position::new(4, 4)), Position::new(3, 4));
        assert_eq!(Position::new(0, 2).midpoint(Position::new(0, 0)), Position::new(0, 1));
    }

    #[test]
    fn display_and_parse_agree() {
        let text = "..#\n#..";
        let g: Grid = text.parse().unwrap();
        assert_eq!(g.to_string(), text);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = "...\n..".parse::<Grid>().unwrap_err();
        assert_eq!(err, MazeError::RaggedRow { row: 1, expected: 3, found: 2 });
    }

    #[test]
    fn parse_rejects_unknown_glyph() {
        let err = "..\n.x".parse::<Grid>().unwrap_err();
        assert_eq!(err, MazeError::UnknownGlyph { glyph: 'x', x: 1, y: 1 });
    }

    #[test]
    fn reachability_stops_at_walls() {
        let g = grid(&[
            "..#.",
            "#.#.",
            "..#.",
        ]);
        let seen = g.reachable_from(Position::ORIGIN);
        assert_eq!(seen.len(), 5);
        assert!(seen.contains(&Position::new(0, 2)));
        assert!(!seen.contains(&Position::new(3, 0)));
    }

    #[test]
    fn reachability_from_wall_is_empty() {
        let g = grid(&["#.", ".."]);
        assert!(g.reachable_from(Position::ORIGIN).is_empty());
    }
}
