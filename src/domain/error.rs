/// Errors raised by maze construction.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("invalid maze dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("unknown cell glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}
