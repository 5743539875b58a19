/// The step function: applies one frame of input to the session.
///
/// Processing order:
///   1. Phase / pause gate
///   2. Move cooldown
///   3. Movement (one direction per frame)
///   4. Win check
///
/// The move counter and cooldown advance only on an accepted move. The win
/// check runs every playing frame, so a maze whose start is its goal is won
/// on the first step.

use std::time::Instant;

use tracing::{debug, info};

use crate::domain::direction::FrameInput;
use super::event::GameEvent;
use super::session::{Phase, Session};

pub fn step(session: &mut Session, input: FrameInput, now: Instant) -> Vec<GameEvent> {
    if session.phase != Phase::Playing || session.paused {
        return vec![];
    }

    let mut events = Vec::new();
    resolve_movement(session, input, now, &mut events);
    resolve_win(session, now, &mut events);
    events
}

fn resolve_movement(session: &mut Session, input: FrameInput, now: Instant, events: &mut Vec<GameEvent>) {
    let Some(dir) = input.movement else { return };

    if let Some(ready) = session.move_ready_at {
        if now < ready {
            return;
        }
    }

    let from = session.game.player;
    if session.game.try_step(dir) {
        session.game.moves += 1;
        session.move_ready_at = Some(now + session.move_cooldown());
        let to = session.game.player;
        debug!(?dir, %from, %to, moves = session.game.moves, "moved");
        events.push(GameEvent::Moved { from, to });
    }
}

fn resolve_win(session: &mut Session, now: Instant, events: &mut Vec<GameEvent>) {
    if !session.game.is_at_goal() {
        return;
    }
    session.game.finish(now);
    session.phase = Phase::Won;
    let moves = session.game.moves;
    let elapsed = session.game.elapsed_at(now);
    info!(moves, secs = elapsed.as_secs(), "maze solved");
    events.push(GameEvent::Won { moves, elapsed });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::GameConfig;
    use crate::domain::direction::MoveDir;
    use crate::domain::grid::Position;
    use crate::domain::rules;

    fn session(rows: usize, cols: usize, seed: u64) -> Session {
        let mut cfg = GameConfig::default();
        cfg.maze.rows = rows;
        cfg.maze.cols = cols;
        cfg.maze.seed = Some(seed);
        cfg.speed.move_cooldown_ms = 100;
        Session::new(&cfg).unwrap().0
    }

    fn go(dir: MoveDir) -> FrameInput {
        FrameInput { movement: Some(dir) }
    }

    fn open_dir(s: &Session) -> MoveDir {
        MoveDir::PRIORITY
            .into_iter()
            .find(|d| rules::can_move(s.game.maze().grid(), s.game.player, *d))
            .expect("an open neighbour")
    }

    fn blocked_dir(s: &Session) -> MoveDir {
        MoveDir::PRIORITY
            .into_iter()
            .find(|d| !rules::can_move(s.game.maze().grid(), s.game.player, *d))
            .expect("a blocked neighbour")
    }

    #[test]
    fn accepted_move_counts_once() {
        let mut s = session(9, 9, 1);
        let now = Instant::now();
        let dir = open_dir(&s);
        let events = step(&mut s, go(dir), now);
        assert_eq!(s.game.moves, 1);
        assert!(matches!(events[..], [GameEvent::Moved { from: Position::ORIGIN, .. }]));
    }

    #[test]
    fn rejected_move_not_counted() {
        let mut s = session(9, 9, 1);
        let dir = blocked_dir(&s);
        let events = step(&mut s, go(dir), Instant::now());
        assert!(events.is_empty());
        assert_eq!(s.game.moves, 0);
        assert_eq!(s.game.player, Position::ORIGIN);
        assert!(s.move_ready_at.is_none());
    }

    #[test]
    fn cooldown_throttles_after_accepted_move() {
        let mut s = session(9, 9, 1);
        let t0 = Instant::now();
        let dir = open_dir(&s);
        step(&mut s, go(dir), t0);
        let back = match dir {
            MoveDir::Up => MoveDir::Down,
            MoveDir::Down => MoveDir::Up,
            MoveDir::Left => MoveDir::Right,
            MoveDir::Right => MoveDir::Left,
        };
        assert!(step(&mut s, go(back), t0 + Duration::from_millis(50)).is_empty());
        assert_eq!(s.game.moves, 1);
        step(&mut s, go(back), t0 + Duration::from_millis(100));
        assert_eq!(s.game.moves, 2);
        assert_eq!(s.game.player, Position::ORIGIN);
    }

    #[test]
    fn no_input_no_change() {
        let mut s = session(5, 5, 3);
        assert!(step(&mut s, FrameInput::default(), Instant::now()).is_empty());
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn reaching_goal_wins_and_freezes() {
        let mut s = session(5, 5, 3);
        let now = Instant::now();
        // Park the player next to the goal on the open side.
        let goal = s.game.goal();
        let grid = s.game.maze().grid().clone();
        let (before, dir) = [
            (Position::new(goal.x - 1, goal.y), MoveDir::Right),
            (Position::new(goal.x, goal.y - 1), MoveDir::Down),
        ]
        .into_iter()
        .find(|(p, _)| grid.is_open(*p))
        .expect("goal has an open neighbour");
        s.game.player = before;

        let events = step(&mut s, go(dir), now);
        assert_eq!(s.phase, Phase::Won);
        assert!(s.game.is_finished());
        assert!(matches!(events.last(), Some(GameEvent::Won { moves: 1, .. })));

        // Won is inert until restart.
        assert!(step(&mut s, go(MoveDir::Left), now + Duration::from_secs(1)).is_empty());
        assert_eq!(s.game.player, goal);
    }

    #[test]
    fn single_cell_maze_is_won_immediately() {
        let mut s = session(1, 1, 0);
        let events = step(&mut s, FrameInput::default(), Instant::now());
        assert_eq!(s.phase, Phase::Won);
        assert!(matches!(events[..], [GameEvent::Won { moves: 0, .. }]));
    }

    #[test]
    fn paused_ignores_movement() {
        let mut s = session(9, 9, 1);
        let now = Instant::now();
        s.toggle_pause(now);
        let dir = open_dir(&s);
        assert!(step(&mut s, go(dir), now).is_empty());
        assert_eq!(s.game.player, Position::ORIGIN);
    }

    #[test]
    fn walk_to_goal_along_bfs_path() {
        let mut s = session(11, 14, 17);
        let grid = s.game.maze().grid().clone();
        let path = shortest_path(&grid, s.game.player, s.game.goal());
        let mut now = Instant::now();
        for pair in path.windows(2) {
            let dx = pair[1].x as i32 - pair[0].x as i32;
            let dy = pair[1].y as i32 - pair[0].y as i32;
            let dir = MoveDir::from_delta(dx, dy).unwrap();
            step(&mut s, go(dir), now);
            now += s.move_cooldown();
        }
        assert_eq!(s.phase, Phase::Won);
        assert_eq!(s.game.moves as usize, path.len() - 1);
    }

    fn shortest_path(
        grid: &crate::domain::grid::Grid,
        from: Position,
        to: Position,
    ) -> Vec<Position> {
        use std::collections::{HashMap, VecDeque};
        let mut prev: HashMap<Position, Position> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(p) = queue.pop_front() {
            if p == to {
                break;
            }
            for n in grid.neighbours(p) {
                if grid.is_open(n) && n != from && !prev.contains_key(&n) {
                    prev.insert(n, p);
                    queue.push_back(n);
                }
            }
        }
        let mut path = vec![to];
        while let Some(&p) = prev.get(path.last().unwrap()) {
            path.push(p);
        }
        path.reverse();
        path
    }
}
