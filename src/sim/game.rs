/// GameState: one maze, the player on it, and the counters for one attempt.
///
/// The move operation only validates and applies a step. Counting moves and
/// pacing them is left to the caller (`sim::step`), which looks at the
/// returned flag to decide.
///
/// Time is measured from construction, minus any time spent paused, and
/// freezes at `finish`.

use std::time::{Duration, Instant};

use crate::domain::direction::MoveDir;
use crate::domain::generator::Maze;
use crate::domain::grid::Position;
use crate::domain::rules;

#[derive(Clone, Debug)]
struct Clock {
    started: Instant,
    paused_total: Duration,
    paused_at: Option<Instant>,
    finished: Option<Duration>,
}

impl Clock {
    fn new(now: Instant) -> Self {
        Clock { started: now, paused_total: Duration::ZERO, paused_at: None, finished: None }
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        if let Some(done) = self.finished {
            return done;
        }
        let end = self.paused_at.unwrap_or(now);
        end.saturating_duration_since(self.started).saturating_sub(self.paused_total)
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    maze: Maze,
    pub player: Position,
    goal: Position,
    pub moves: u32,
    clock: Clock,
}

impl GameState {
    pub fn new(maze: Maze) -> Self {
        Self::started_at(maze, Instant::now())
    }

    pub fn started_at(maze: Maze, now: Instant) -> Self {
        GameState {
            player: maze.start(),
            goal: maze.goal(),
            maze,
            moves: 0,
            clock: Clock::new(now),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Apply a unit step if the destination is in bounds and open.
    /// Diagonal, zero or long steps are rejected with no effect.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        match rules::destination(self.maze.grid(), self.player, dx, dy) {
            Some(to) => {
                self.player = to;
                true
            }
            None => false,
        }
    }

    pub fn try_step(&mut self, dir: MoveDir) -> bool {
        let (dx, dy) = dir.delta();
        self.try_move(dx, dy)
    }

    pub fn is_at_goal(&self) -> bool {
        self.player == self.goal
    }

    // ── Clock ──

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.clock.elapsed_at(now)
    }

    /// Whole seconds, as shown in the HUD.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.finished.is_some()
    }

    /// Freeze the clock. Later calls keep the first reading.
    pub fn finish(&mut self, now: Instant) {
        if self.clock.finished.is_none() {
            self.clock.finished = Some(self.clock.elapsed_at(now));
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if self.clock.paused_at.is_none() && !self.is_finished() {
            self.clock.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(at) = self.clock.paused_at.take() {
            self.clock.paused_total += now.saturating_duration_since(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generator::MazeGenerator;

    fn game(rows: usize, cols: usize, seed: u64) -> GameState {
        GameState::new(MazeGenerator::new(seed).generate(rows, cols).unwrap())
    }

    #[test]
    fn starts_at_origin_with_goal_in_far_corner() {
        let g = game(20, 20, 1);
        assert_eq!(g.player, Position::ORIGIN);
        assert_eq!(g.goal(), Position::new(19, 19));
        assert_eq!(g.moves, 0);
        assert!(!g.is_at_goal());
    }

    #[test]
    fn corners_reject_outward_moves() {
        let mut g = game(9, 9, 3);
        let corners = [
            (Position::new(0, 0), [(-1, 0), (0, -1)]),
            (Position::new(8, 0), [(1, 0), (0, -1)]),
            (Position::new(0, 8), [(-1, 0), (0, 1)]),
            (Position::new(8, 8), [(1, 0), (0, 1)]),
        ];
        for (corner, outward) in corners {
            for (dx, dy) in outward {
                g.player = corner;
                assert!(!g.try_move(dx, dy), "{corner} by ({dx}, {dy})");
                assert_eq!(g.player, corner);
            }
        }
    }

    #[test]
    fn walls_reject_and_leave_position() {
        let mut g = game(7, 7, 5);
        // (1, 1) is odd/odd, never carved.
        g.player = Position::new(1, 0);
        assert!(!g.maze().grid().is_open(Position::new(1, 1)));
        assert!(!g.try_step(MoveDir::Down));
        assert_eq!(g.player, Position::new(1, 0));
    }

    #[test]
    fn invalid_vectors_rejected_without_effect() {
        let mut g = game(5, 5, 8);
        g.player = Position::new(2, 2);
        for (dx, dy) in [(0, 0), (1, 1), (2, 0), (0, -2), (-1, 1)] {
            assert!(!g.try_move(dx, dy));
            assert_eq!(g.player, Position::new(2, 2));
        }
    }

    #[test]
    fn accepted_move_updates_position_only() {
        let mut g = game(5, 5, 8);
        let dir = MoveDir::PRIORITY
            .into_iter()
            .find(|d| rules::can_move(g.maze().grid(), g.player, *d))
            .expect("origin has an open neighbour");
        assert!(g.try_step(dir));
        assert_ne!(g.player, Position::ORIGIN);
        assert_eq!(g.moves, 0);
    }

    #[test]
    fn win_only_at_exact_goal() {
        let mut g = game(6, 6, 2);
        g.player = g.goal();
        assert!(g.is_at_goal());
        for p in [Position::new(4, 5), Position::new(5, 4), Position::new(0, 5), Position::ORIGIN] {
            g.player = p;
            assert!(!g.is_at_goal(), "{p}");
        }
    }

    #[test]
    fn stepping_right_matches_grid() {
        let mut g = game(4, 4, 2024);
        let grid = g.maze().grid().clone();
        for x in 1..4 {
            let expected = grid.is_open(Position::new(x, 0));
            assert_eq!(g.try_move(1, 0), expected, "step to ({x}, 0)");
            if !expected {
                assert_eq!(g.player, Position::new(x - 1, 0));
                break;
            }
        }
    }

    #[test]
    fn clock_excludes_pauses_and_freezes_on_finish() {
        let t0 = Instant::now();
        let maze = MazeGenerator::new(0).generate(3, 3).unwrap();
        let mut g = GameState::started_at(maze, t0);
        let s = Duration::from_secs;

        assert_eq!(g.elapsed_at(t0 + s(5)), s(5));
        g.pause(t0 + s(5));
        assert_eq!(g.elapsed_at(t0 + s(20)), s(5));
        g.resume(t0 + s(20));
        assert_eq!(g.elapsed_at(t0 + s(22)), s(7));

        g.finish(t0 + s(30));
        assert!(g.is_finished());
        assert_eq!(g.elapsed_at(t0 + s(100)), s(15));
        g.finish(t0 + s(200));
        assert_eq!(g.elapsed_at(t0 + s(300)), s(15));
    }
}
