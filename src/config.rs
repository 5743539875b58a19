/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: Option<u64>, // first maze only; restarts always reroll
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub fps: u32,
    pub move_cooldown_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub restart: Vec<String>,
    pub pause: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl SpeedConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn move_cooldown(&self) -> Duration {
        Duration::from_millis(self.move_cooldown_ms)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_move_cooldown")]
    move_cooldown_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default)]
    file: Option<String>,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_rows() -> usize { 20 }
fn default_cols() -> usize { 20 }
fn default_fps() -> u32 { 60 }
fn default_move_cooldown() -> u64 { 100 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_pause() -> Vec<String> { vec!["Y".into()] }
fn default_log_level() -> String { "info".into() }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze { rows: default_rows(), cols: default_cols(), seed: None }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { fps: default_fps(), move_cooldown_ms: default_move_cooldown() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            restart: default_restart(),
            pause: default_pause(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: None, level: default_log_level() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            maze: MazeConfig { rows: t.maze.rows, cols: t.maze.cols, seed: t.maze.seed },
            speed: SpeedConfig { fps: t.speed.fps, move_cooldown_ms: t.speed.move_cooldown_ms },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                restart: t.gamepad.restart,
                pause: t.gamepad.pause,
            },
            log: LogConfig { file: t.log.file.map(PathBuf::from), level: t.log.level },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match Self::parse(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return Self::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from)
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!((cfg.maze.rows, cfg.maze.cols), (20, 20));
        assert_eq!(cfg.maze.seed, None);
        assert_eq!(cfg.speed.fps, 60);
        assert_eq!(cfg.speed.move_cooldown(), Duration::from_millis(100));
        assert_eq!(cfg.gamepad.cancel, vec!["Select".to_string()]);
        assert!(cfg.log.file.is_none());
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            r#"
            [maze]
            cols = 31
            seed = 77

            [log]
            file = "maze.log"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.maze.rows, 20);
        assert_eq!(cfg.maze.cols, 31);
        assert_eq!(cfg.maze.seed, Some(77));
        assert_eq!(cfg.log.file, Some(PathBuf::from("maze.log")));
        assert_eq!(cfg.speed.fps, 60);
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(GameConfig::parse("[maze]\nrows = \"many\"").is_err());
    }

    #[test]
    fn frame_duration_survives_zero_fps() {
        let speed = SpeedConfig { fps: 0, move_cooldown_ms: 0 };
        assert_eq!(speed.frame_duration(), Duration::from_secs(1));
        let speed = SpeedConfig { fps: 50, move_cooldown_ms: 0 };
        assert_eq!(speed.frame_duration(), Duration::from_millis(20));
    }
}
