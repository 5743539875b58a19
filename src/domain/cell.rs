/// Cell states and their properties.
/// Passability is queried via methods so maze semantics live in one place.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cell {
    Open,
    #[default]
    Wall,
}

impl Cell {
    /// Can the player occupy this cell?
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Open)
    }

    /// Diagram character used by `Grid`'s text form.
    pub fn glyph(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
        }
    }

    pub fn from_glyph(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Open),
            '#' => Some(Cell::Wall),
            _ => None,
        }
    }
}
