/// Directional intents and the per-frame input bundle.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    /// Priority order used when several directions are held at once.
    pub const PRIORITY: [MoveDir; 4] = [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right];

    /// Unit `(dx, dy)`; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<MoveDir> {
        match (dx, dy) {
            (0, -1) => Some(MoveDir::Up),
            (0, 1) => Some(MoveDir::Down),
            (-1, 0) => Some(MoveDir::Left),
            (1, 0) => Some(MoveDir::Right),
            _ => None,
        }
    }

    /// Pick one direction out of everything held this frame.
    pub fn resolve(held: impl Fn(MoveDir) -> bool) -> Option<MoveDir> {
        Self::PRIORITY.into_iter().find(|d| held(*d))
    }
}

/// What the loop hands to `sim::step` each frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub movement: Option<MoveDir>,
}
