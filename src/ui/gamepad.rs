/// Gamepad input tracker using gilrs.
///
/// D-pad and left stick walk the maze. Face/shoulder buttons are mapped to
/// commands through config.toml via `load_button_config()`:
///   Start / A   →  Confirm (restart from the win screen)
///   Start       →  Restart
///   Select      →  Quit
///   Y           →  Pause
///
/// Without the `gamepad` feature this compiles to an always-idle tracker.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::{info, warn};

use crate::config::GamepadConfig;
use crate::domain::direction::MoveDir;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,      // South
    B,      // East
    X,      // West
    Y,      // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

fn dir_index(dir: MoveDir) -> usize {
    match dir {
        MoveDir::Up => 0,
        MoveDir::Down => 1,
        MoveDir::Left => 2,
        MoveDir::Right => 3,
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// Command-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    restart: Vec<Btn>,
    pause: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::Start, Btn::A],
            cancel: vec![Btn::Select],
            restart: vec![Btn::Start],
            pause: vec![Btn::Y],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    /// Indexed by `dir_index`.
    dpad: [BtnState; 4],
    stick: [BtnState; 4],
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_xy: (f32, f32),

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = match Gilrs::new() {
            Ok(g) => {
                if g.gamepads().next().is_some() {
                    info!("gamepad detected");
                }
                Some(g)
            }
            Err(e) => {
                warn!(error = %e, "gamepad support unavailable");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_xy: (0.0, 0.0),
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Empty or unrecognised lists keep
    /// the defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(target: &mut Vec<Btn>, names: &[String]) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *target = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.confirm, &cfg.confirm);
        apply(&mut map.cancel, &cfg.cancel);
        apply(&mut map.restart, &cfg.restart);
        apply(&mut map.pause, &cfg.pause);
    }

    pub fn update(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.just_pressed = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else { return };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_xy.0 = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_xy.1 = value,
                EventType::Connected => info!(id = ?event.id, "gamepad connected"),
                EventType::Disconnected => {
                    info!(id = ?event.id, "gamepad disconnected");
                    self.release_all();
                }
                _ => {}
            }
        }

        // Stick Y is positive upward.
        let (x, y) = self.stick_xy;
        self.stick[dir_index(MoveDir::Up)].set(y > STICK_DEADZONE);
        self.stick[dir_index(MoveDir::Down)].set(y < -STICK_DEADZONE);
        self.stick[dir_index(MoveDir::Left)].set(x < -STICK_DEADZONE);
        self.stick[dir_index(MoveDir::Right)].set(x > STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp => Some(MoveDir::Up),
            Button::DPadDown => Some(MoveDir::Down),
            Button::DPadLeft => Some(MoveDir::Left),
            Button::DPadRight => Some(MoveDir::Right),
            _ => None,
        };
        if let Some(dir) = dir {
            self.dpad[dir_index(dir)].set(held);
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn as usize].set(held);
        }
    }

    #[cfg(feature = "gamepad")]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad = [BtnState::default(); 4];
        self.stick = [BtnState::default(); 4];
        self.stick_xy = (0.0, 0.0);
    }

    // ── Queries ──

    pub fn held(&self, dir: MoveDir) -> bool {
        let i = dir_index(dir);
        self.dpad[i].held || self.stick[i].held
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }
    pub fn restart_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.restart)
    }
    pub fn pause_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("North"), Some(Btn::Y));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_and_ignores_junk() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GamepadConfig {
            confirm: vec!["B".into()],
            cancel: vec!["nonsense".into()],
            restart: vec![],
            pause: vec!["R1".into(), "L1".into()],
        });
        assert_eq!(pad.action_map.confirm, vec![Btn::B]);
        assert_eq!(pad.action_map.cancel, vec![Btn::Select]);
        assert_eq!(pad.action_map.restart, vec![Btn::Start]);
        assert_eq!(pad.action_map.pause, vec![Btn::R1, Btn::L1]);
    }

    #[test]
    fn edge_then_hold() {
        let mut pad = GamepadState::new();
        pad.buttons[Btn::Select as usize].set(true);
        assert!(pad.cancel_pressed());
        pad.update();
        pad.buttons[Btn::Select as usize].set(true);
        assert!(!pad.cancel_pressed());
    }

    #[test]
    fn dpad_priority_matches_keyboard() {
        let mut pad = GamepadState::new();
        pad.dpad[dir_index(MoveDir::Right)].set(true);
        pad.stick[dir_index(MoveDir::Up)].set(true);
        assert_eq!(MoveDir::resolve(|d| pad.held(d)), Some(MoveDir::Up));
    }
}
