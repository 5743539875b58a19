/// Keyboard state tracker and key bindings.
///
/// Tracks which keys are currently held so a held arrow keeps walking,
/// and which were freshly pressed this frame so restart/quit/pause fire once.
///
/// Terminals rarely report key release. Without release events a key only
/// counts as held once auto-repeat has sent a second event for it, and stays
/// held until `HOLD_TIMEOUT` passes without another. A single tap is
/// therefore a fresh press and nothing more, so it moves exactly one cell.
/// When the terminal reports Release (keyboard enhancement, see
/// `Renderer::init`), set `honor_release`: a key is then held from press to
/// release, with `STUCK_TIMEOUT` as a guard against a lost release.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::direction::MoveDir;

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);
const STUCK_TIMEOUT: Duration = Duration::from_secs(1);

// ── Bindings ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::F(1), KeyCode::Char('p'), KeyCode::Char('P')];

/// One-shot commands, as opposed to held movement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Restart,
    Quit,
    Pause,
}

fn direction_keys(dir: MoveDir) -> &'static [KeyCode] {
    match dir {
        MoveDir::Up => KEYS_UP,
        MoveDir::Down => KEYS_DOWN,
        MoveDir::Left => KEYS_LEFT,
        MoveDir::Right => KEYS_RIGHT,
    }
}

fn command_keys(cmd: Command) -> &'static [KeyCode] {
    match cmd {
        Command::Restart => KEYS_RESTART,
        Command::Quit => KEYS_QUIT,
        Command::Pause => KEYS_PAUSE,
    }
}

#[derive(Clone, Copy, Debug)]
struct KeyHold {
    /// Last Press/Repeat event for the key.
    at: Instant,
    /// Auto-repeat has fired since the initial press.
    repeating: bool,
}

pub struct InputState {
    last_active: HashMap<KeyCode, KeyHold>,
    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,
    ctrl_c: bool,
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before `step`.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.apply(key, Instant::now());
            }
        }

        let now = Instant::now();
        let timeout = self.timeout();
        self.last_active.retain(|_, h| now.saturating_duration_since(h.at) < timeout);
        Ok(())
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
        }
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let repeating = if self.is_active_at(key.code, now) {
                    true
                } else {
                    self.fresh_presses.push(key.code);
                    key.kind == KeyEventKind::Repeat
                };
                self.last_active.insert(key.code, KeyHold { at: now, repeating });
            }
        }
    }

    /// Is any key bound to `dir` held (or tapped) this frame?
    pub fn held(&self, dir: MoveDir) -> bool {
        self.held_at(dir, Instant::now())
    }

    fn held_at(&self, dir: MoveDir, now: Instant) -> bool {
        direction_keys(dir)
            .iter()
            .any(|k| self.is_held_at(*k, now) || self.fresh_presses.contains(k))
    }

    /// Highest-priority direction held this frame.
    #[cfg(test)]
    pub fn held_direction(&self) -> Option<MoveDir> {
        MoveDir::resolve(|d| self.held(d))
    }

    /// Was the command's key freshly pressed this frame? (edge trigger)
    pub fn pressed(&self, cmd: Command) -> bool {
        command_keys(cmd).iter().any(|k| self.fresh_presses.contains(k))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }

    fn timeout(&self) -> Duration {
        if self.honor_release {
            STUCK_TIMEOUT
        } else {
            HOLD_TIMEOUT
        }
    }

    /// Seen recently enough that a new event for it is not a fresh press.
    fn is_active_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .is_some_and(|h| now.saturating_duration_since(h.at) < self.timeout())
    }

    /// Held across frames: pressed and not released, or auto-repeating.
    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.is_active_at(code, now)
            && (self.honor_release || self.last_active.get(&code).is_some_and(|h| h.repeating))
    }
}
