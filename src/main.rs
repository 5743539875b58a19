/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::Instant;

use tracing::info;

use config::GameConfig;
use domain::direction::{FrameInput, MoveDir};
use domain::error::MazeError;
use sim::event::GameEvent;
use sim::session::{Phase, Session};
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

fn main() {
    let config = GameConfig::load();
    logging::init(&config.log);

    let (mut session, first_maze) = match Session::new(&config) {
        Ok(started) => started,
        Err(e) => {
            eprintln!("Cannot build maze: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    process_sound_events(sound.as_ref(), &[first_maze]);

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    info!(mazes = session.maze_number, "session ended");
    println!();
    println!("Thanks for playing Maze Walker!");
    println!("Mazes played: {}", session.maze_number);
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.release_events();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame = config.speed.frame_duration();

    loop {
        let frame_start = Instant::now();
        kb.drain_events()?;
        gp.update();

        if kb.ctrl_c_pressed() {
            session.quit();
        } else {
            handle_commands(session, sound, &kb, &gp)?;
        }
        if session.phase == Phase::Quit {
            break;
        }

        let input = FrameInput {
            movement: MoveDir::resolve(|d| kb.held(d) || gp.held(d)),
        };
        let events = step::step(session, input, Instant::now());
        process_sound_events(sound, &events);

        renderer.render(session)?;

        if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

/// One-shot commands: quit, pause, restart. Restart is honored in any
/// phase; on the win screen the gamepad confirm button restarts too.
fn handle_commands(
    session: &mut Session,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
) -> Result<(), MazeError> {
    if kb.pressed(Command::Quit) || gp.cancel_pressed() {
        session.quit();
        return Ok(());
    }

    if kb.pressed(Command::Pause) || gp.pause_pressed() {
        session.toggle_pause(Instant::now());
    }

    let restart = kb.pressed(Command::Restart)
        || gp.restart_pressed()
        || (session.phase == Phase::Won && gp.confirm_pressed());
    if restart {
        let event = session.restart()?;
        process_sound_events(sound, &[event]);
    }
    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::NewMaze { .. } => sfx.play_new_maze(),
            GameEvent::Moved { .. } => sfx.play_step(),
            GameEvent::Won { .. } => sfx.play_win(),
        }
    }
}
