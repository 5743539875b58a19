/// Camera: the viewport onto a maze larger than the terminal.
///
/// `(x, y)` is the maze coordinate of the top-left visible cell. The view
/// is never larger than the maze; the renderer clamps it and centers a small
/// maze on screen itself. The camera only scrolls once the player leaves the
/// inner dead zone.

#[derive(Clone, Debug, Default)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

/// Dead-zone margin as a fraction of the view: 1/5 on each side.
const MARGIN_DIV: i32 = 5;

/// One axis of `follow`: new origin for `target` inside `world` cells.
fn follow_axis(origin: i32, target: usize, view: usize, world: usize) -> i32 {
    let (view, world, target) = (view as i32, world as i32, target as i32);
    let margin = view / MARGIN_DIV;
    let lo = origin + margin;
    let hi = origin + view - margin - 1;
    let moved = if target < lo {
        target - margin
    } else if target > hi {
        target - view + margin + 1
    } else {
        origin
    };
    moved.clamp(0, (world - view).max(0))
}

fn center_axis(target: usize, view: usize, world: usize) -> i32 {
    let (view, world, target) = (view as i32, world as i32, target as i32);
    (target - view / 2).clamp(0, (world - view).max(0))
}

impl Camera {
    pub fn follow(&mut self, tx: usize, ty: usize, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }
        self.x = follow_axis(self.x, tx, self.view_w, world_w);
        self.y = follow_axis(self.y, ty, self.view_h, world_h);
    }

    /// Jump straight to `(tx, ty)`; used when a new maze appears.
    pub fn center_on(&mut self, tx: usize, ty: usize, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 {
            return;
        }
        self.x = center_axis(tx, self.view_w, world_w);
        self.y = center_axis(ty, self.view_h, world_h);
    }

    /// Maze coordinate to viewport coordinate, `None` if off-screen.
    pub fn world_to_view(&self, wx: usize, wy: usize) -> Option<(usize, usize)> {
        let vx = wx as i32 - self.x;
        let vy = wy as i32 - self.y;
        let inside = (0..self.view_w as i32).contains(&vx) && (0..self.view_h as i32).contains(&vy);
        inside.then_some((vx as usize, vy as usize))
    }

    /// Viewport coordinate to maze coordinate, `None` past the maze edge.
    pub fn view_to_world(&self, vx: usize, vy: usize, world_w: usize, world_h: usize) -> Option<(usize, usize)> {
        let wx = self.x + vx as i32;
        let wy = self.y + vy as i32;
        let inside = (0..world_w as i32).contains(&wx) && (0..world_h as i32).contains(&wy);
        inside.then_some((wx as usize, wy as usize))
    }
}
