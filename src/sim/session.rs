/// Session: the state machine wrapped around one `GameState` at a time.
///
///   Playing ──goal reached──▶ Won
///   Playing ──restart──────▶ Playing (fresh maze)
///   Won     ──restart──────▶ Playing (fresh maze)
///   any     ──quit─────────▶ Quit
///
/// Restart replaces the whole `GameState` with one built from a newly
/// seeded maze. Nothing carries over except the configured size and the
/// count of mazes played.

use std::time::{Duration, Instant};

use tracing::{info, trace};

use crate::config::GameConfig;
use crate::domain::error::MazeError;
use crate::domain::generator::{Maze, MazeGenerator};
use super::event::GameEvent;
use super::game::GameState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
    Quit,
}

pub struct Session {
    pub game: GameState,
    pub phase: Phase,
    pub paused: bool,
    /// 1-based index of the current maze within this run.
    pub maze_number: u32,

    rows: usize,
    cols: usize,
    move_cooldown: Duration,
    /// Earliest instant the next move may be applied.
    pub(super) move_ready_at: Option<Instant>,
}

impl Session {
    /// Build the first maze. A configured seed is used here and only here.
    pub fn new(config: &GameConfig) -> Result<(Self, GameEvent), MazeError> {
        let mut generator = match config.maze.seed {
            Some(seed) => MazeGenerator::new(seed),
            None => MazeGenerator::from_entropy(),
        };
        let maze = generator.generate(config.maze.rows, config.maze.cols)?;
        let event = new_maze_event(&maze);
        info!(seed = maze.seed(), rows = maze.rows(), cols = maze.cols(), "maze generated");
        trace!("layout:\n{}", maze.grid());

        let session = Session {
            game: GameState::new(maze),
            phase: Phase::Playing,
            paused: false,
            maze_number: 1,
            rows: config.maze.rows,
            cols: config.maze.cols,
            move_cooldown: config.speed.move_cooldown(),
            move_ready_at: None,
        };
        Ok((session, event))
    }

    /// Discard the current game and start over on a freshly seeded maze.
    pub fn restart(&mut self) -> Result<GameEvent, MazeError> {
        let maze = MazeGenerator::from_entropy().generate(self.rows, self.cols)?;
        let event = new_maze_event(&maze);
        self.maze_number += 1;
        info!(
            seed = maze.seed(),
            number = self.maze_number,
            "restarted on a new maze"
        );
        trace!("layout:\n{}", maze.grid());

        self.game = GameState::new(maze);
        self.phase = Phase::Playing;
        self.paused = false;
        self.move_ready_at = None;
        Ok(event)
    }

    pub fn quit(&mut self) {
        if self.phase != Phase::Quit {
            info!(moves = self.game.moves, phase = ?self.phase, "quit");
            self.phase = Phase::Quit;
        }
    }

    /// Only meaningful while playing; the clock stops while paused.
    pub fn toggle_pause(&mut self, now: Instant) {
        if self.phase != Phase::Playing {
            return;
        }
        self.paused = !self.paused;
        if self.paused {
            self.game.pause(now);
        } else {
            self.game.resume(now);
        }
    }

    pub fn move_cooldown(&self) -> Duration {
        self.move_cooldown
    }
}

fn new_maze_event(maze: &Maze) -> GameEvent {
    GameEvent::NewMaze { seed: maze.seed(), rows: maze.rows(), cols: maze.cols() }
}
