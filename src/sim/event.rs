/// Events emitted by session transitions and simulation steps.
/// The presentation layer consumes these for sound and logging.

use std::time::Duration;

use crate::domain::grid::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    NewMaze { seed: u64, rows: usize, cols: usize },
    Moved { from: Position, to: Position },
    Won { moves: u32, elapsed: Duration },
}
