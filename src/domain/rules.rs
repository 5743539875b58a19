/// Movement rules.
///
/// ┌───────────────────────────────┬───────────┐
/// │ Condition (checked in order)  │ Result    │
/// ├───────────────────────────────┼───────────┤
/// │ (dx, dy) not a unit step      │ rejected  │
/// │ destination off the grid      │ rejected  │
/// │ destination is Wall           │ rejected  │
/// │ otherwise                     │ accepted  │
/// └───────────────────────────────┴───────────┘

use super::direction::MoveDir;
use super::grid::{Grid, Position};

/// Where a step from `from` by `(dx, dy)` lands, if the step is legal.
pub fn destination(grid: &Grid, from: Position, dx: i32, dy: i32) -> Option<Position> {
    MoveDir::from_delta(dx, dy)?;
    from.offset(dx, dy).filter(|to| grid.is_open(*to))
}

pub fn can_move(grid: &Grid, from: Position, dir: MoveDir) -> bool {
    let (dx, dy) = dir.delta();
    destination(grid, from, dx, dy).is_some()
}
