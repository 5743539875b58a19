/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into the `front` buffer
///   2. Compare each cell with `back` (the previous frame)
///   3. Emit terminal commands only for changed cells, batched with `queue!`
///   4. Flush once, then swap front/back
///
/// Screen layout (top to bottom): HUD strip, blank row, maze viewport,
/// blank row, help line. Each maze cell is two terminal columns wide so the
/// grid looks square.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::Cell as MazeCell;
use crate::domain::grid::Position;
use crate::sim::session::{Phase, Session};
use super::camera::Camera;

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const WALL: Color = Color::Rgb { r: 200, g: 200, b: 200 };
const FLOOR: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const PLAYER: Color = Color::Rgb { r: 66, g: 135, b: 245 };
const GOAL: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const HUD_BG: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const HUD_FG: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const DIM: Color = Color::Rgb { r: 120, g: 120, b: 140 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Never equal to a composed cell; filling `back` with it forces a full
    /// repaint.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// `put_str` centered horizontally on row `y`.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', bg, bg));
        }
    }
}

// ── Renderer ──

const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// HUD + gap above the maze, gap + help line below.
const RESERVED_ROWS: usize = MAP_ROW + 2;

const HELP: &str = "Arrows/WASD: Move   P: Pause   R: New maze   Q/Esc: Quit";
const WIN_PROMPT: &str = "Press R to Restart or Q to Quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    camera: Camera,
    last_maze: Option<u32>,
    last_phase: Option<Phase>,
    release_events: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            camera: Camera::default(),
            last_maze: None,
            last_phase: None,
            release_events: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;
        // Ask for press/repeat/release reporting where the terminal has it.
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.release_events = true;
        }
        self.resize(terminal::size().unwrap_or((80, 24)));
        Ok(())
    }

    /// True once `init` enabled key release reporting.
    pub fn release_events(&self) -> bool {
        self.release_events
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.release_events {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.release_events = false;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, (tw, th): (u16, u16)) {
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.invalidate();
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        let size = terminal::size().unwrap_or((80, 24));
        if size != (self.term_w as u16, self.term_h as u16) {
            self.resize(size);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        let maze = session.game.maze();
        let (rows, cols) = (maze.rows(), maze.cols());
        self.camera.view_w = (self.term_w / CELL_W).min(cols);
        self.camera.view_h = self.term_h.saturating_sub(RESERVED_ROWS).max(1).min(rows);

        let player = session.game.player;
        if self.last_maze != Some(session.maze_number) {
            self.camera.center_on(player.x, player.y, cols, rows);
            self.back.invalidate();
            self.last_maze = Some(session.maze_number);
        } else {
            self.camera.follow(player.x, player.y, cols, rows);
        }
        if self.last_phase != Some(session.phase) {
            self.back.invalidate();
            self.last_phase = Some(session.phase);
        }

        self.front.clear();
        self.compose_hud(session);
        self.compose_maze(session);
        match session.phase {
            Phase::Playing if session.paused => self.compose_banner(&["PAUSED", "P: Resume"]),
            Phase::Playing => {}
            Phase::Won => {
                let stats = format!(
                    "Moves: {}  Time: {}s",
                    session.game.moves,
                    session.game.elapsed_secs()
                );
                self.compose_banner(&["You Win!", stats.as_str(), WIN_PROMPT]);
            }
            Phase::Quit => {}
        }
        let help_row = self.front.height.saturating_sub(1);
        self.front.put_str(1, help_row, HELP, DIM, BASE_BG);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, session: &Session) {
        self.front.fill_row(HUD_ROW, HUD_BG);
        let game = &session.game;
        let hud = format!(" Moves: {} | Time: {}s", game.moves, game.elapsed_secs());
        self.front.put_str(0, HUD_ROW, &hud, HUD_FG, HUD_BG);

        let maze = game.maze();
        let info = format!(
            "Maze #{}  {}x{}  seed {} ",
            session.maze_number,
            maze.rows(),
            maze.cols(),
            maze.seed()
        );
        let x = self.front.width.saturating_sub(info.chars().count());
        if x > hud.chars().count() {
            self.front.put_str(x, HUD_ROW, &info, HUD_FG, HUD_BG);
        }
    }

    fn compose_maze(&mut self, session: &Session) {
        let game = &session.game;
        let maze = game.maze();
        let grid = maze.grid();
        let (rows, cols) = (maze.rows(), maze.cols());

        // Left edge of the maze area, centered when narrower than the screen.
        let left = self.term_w.saturating_sub(self.camera.view_w * CELL_W) / 2;

        for vy in 0..self.camera.view_h {
            for vx in 0..self.camera.view_w {
                let Some((wx, wy)) = self.camera.view_to_world(vx, vy, cols, rows) else {
                    continue;
                };
                let bg = match grid.get(Position::new(wx, wy)) {
                    MazeCell::Open => FLOOR,
                    MazeCell::Wall => WALL,
                };
                self.put_maze_cell(left, vx, vy, ' ', bg, bg);
            }
        }

        let goal = game.goal();
        if let Some((vx, vy)) = self.camera.world_to_view(goal.x, goal.y) {
            self.put_maze_cell(left, vx, vy, ' ', GOAL, GOAL);
        }
        let p = game.player;
        if let Some((vx, vy)) = self.camera.world_to_view(p.x, p.y) {
            self.put_maze_cell(left, vx, vy, ' ', PLAYER, PLAYER);
        }
    }

    fn put_maze_cell(&mut self, left: usize, vx: usize, vy: usize, ch: char, fg: Color, bg: Color) {
        let col = left + vx * CELL_W;
        let row = MAP_ROW + vy;
        for dx in 0..CELL_W {
            self.front.set(col + dx, row, Cell::new(ch, fg, bg));
        }
    }

    /// Boxed message centered over the maze area.
    fn compose_banner(&mut self, lines: &[&str]) {
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let height = lines.len() * 2 + 1;
        let top = MAP_ROW + self.camera.view_h.saturating_sub(height) / 2;
        let left = self.front.width.saturating_sub(inner) / 2;

        for y in top..top + height {
            for x in left..left + inner {
                self.front.set(x, y, Cell::new(' ', Color::White, BASE_BG));
            }
        }
        for (i, line) in lines.iter().enumerate() {
            let fg = if i == 0 { HUD_BG } else { Color::White };
            self.front.put_centered(top + 1 + i * 2, line, fg, BASE_BG);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn release_reporting_off_until_init() {
        assert!(!Renderer::new().release_events());
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut fb = FrameBuffer::new(5, 1);
        fb.put_str(3, 0, "abcdef", Color::White, BASE_BG);
        assert_eq!(text_row(&fb, 0), "   ab");
    }

    #[test]
    fn put_centered_on_odd_width() {
        let mut fb = FrameBuffer::new(9, 1);
        fb.put_centered(0, "win", Color::White, BASE_BG);
        assert_eq!(text_row(&fb, 0), "   win   ");
    }

    #[test]
    fn resize_resets_contents() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set(1, 1, Cell::new('x', Color::White, BASE_BG));
        fb.resize(3, 3);
        assert_eq!(fb.cells.len(), 9);
        assert!(fb.cells.iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn invalid_differs_from_blank() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.invalidate();
        assert!(fb.cells.iter().all(|c| *c != Cell::BLANK));
    }
}
