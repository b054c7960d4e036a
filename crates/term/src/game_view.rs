//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom: one HUD row, the bordered playfield, one hint row.
//! World units are scaled to fit the playfield; center-line mode uses screen
//! coordinates (+y down) and wall mode uses y-up world coordinates.

use crate::core::{GameSnapshot, GameWorld, Obstacle, Player, Vec3};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{
    GameState, GroundMode, ObstacleKind, SCREEN_HEIGHT, SCREEN_WIDTH, WORLD_SIZE,
};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 8;

const FIELD_BG: Rgb = Rgb::new(18, 18, 28);
const BLACK: Rgb = Rgb::new(0, 0, 0);
const HIT_FLASH: Rgb = Rgb::new(255, 255, 255);

/// Playfield rectangle inside the border, in terminal cells.
#[derive(Debug, Clone, Copy)]
struct Field {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    world_w: f32,
    world_h: f32,
    y_up: bool,
}

impl Field {
    fn col(&self, wx: f32) -> i32 {
        (wx / self.world_w * self.w as f32).floor() as i32
    }

    fn row(&self, wy: f32) -> i32 {
        let wy = if self.y_up { self.world_h - wy } else { wy };
        (wy / self.world_h * self.h as f32).floor() as i32
    }

    /// Fill the world-space box `[min, max)` (at least one cell).
    fn fill(&self, fb: &mut FrameBuffer, min: Vec3, max: Vec3, ch: char, style: CellStyle) {
        let (c0, c1) = (self.col(min.x), self.col(max.x));
        let (r0, r1) = {
            let (a, b) = (self.row(min.y), self.row(max.y));
            (a.min(b), a.max(b))
        };
        for r in r0..=r1.max(r0) {
            for c in c0..=c1.max(c0) {
                if (c == c1 && c1 > c0) || (r == r1 && r1 > r0) {
                    continue;
                }
                self.put(fb, c, r, ch, style);
            }
        }
    }

    fn put(&self, fb: &mut FrameBuffer, c: i32, r: i32, ch: char, style: CellStyle) {
        if c < 0 || r < 0 || c >= self.w as i32 || r >= self.h as i32 {
            return;
        }
        fb.put_char(self.x + c as u16, self.y + r as u16, ch, style);
    }
}

/// A lightweight terminal renderer for the runner.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    ground_mode: GroundMode,
    show_hints: bool,
    hit_flash: bool,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            ground_mode: GroundMode::CenterLine,
            show_hints: true,
            hit_flash: false,
        }
    }
}

impl GameView {
    pub fn new(ground_mode: GroundMode) -> Self {
        Self {
            ground_mode,
            ..Self::default()
        }
    }

    pub fn with_hints(mut self, show_hints: bool) -> Self {
        self.show_hints = show_hints;
        self
    }

    /// Draw the player in the hit color for this frame.
    pub fn with_hit_flash(mut self, hit_flash: bool) -> Self {
        self.hit_flash = hit_flash;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        obstacles: &[Obstacle],
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        if viewport.width < MIN_WIDTH || viewport.height < MIN_HEIGHT {
            fb.put_str(0, 0, "terminal too small", CellStyle::default().bold());
            return;
        }

        let field = self.field(viewport);
        let border = CellStyle::plain(Rgb::new(160, 160, 170), BLACK);
        let background = CellStyle::plain(FIELD_BG, FIELD_BG);
        fb.fill_rect(field.x, field.y, field.w, field.h, ' ', background);
        draw_border(fb, field.x - 1, field.y - 1, field.w + 2, field.h + 2, border);

        if let Some(world) = snap.world.as_ref() {
            self.draw_world(fb, &field, world);
        }
        for obstacle in obstacles {
            draw_obstacle(fb, &field, obstacle);
        }
        if let Some(player) = snap.player.as_ref() {
            self.draw_player(fb, &field, player);
        }

        self.draw_hud(fb, snap, viewport);
        if self.show_hints {
            let hint = CellStyle::plain(Rgb::new(130, 130, 140), BLACK).dim();
            fb.put_str(
                1,
                viewport.height - 1,
                "space tap  g switch  [ ] rotate  p pause  r restart  q quit",
                hint,
            );
        }

        let overlay = match snap.state {
            GameState::Menu => Some("PRESS ENTER TO START"),
            GameState::Paused => Some("PAUSED"),
            GameState::GameOver => Some("GAME OVER"),
            GameState::Playing => None,
        };
        if let Some(text) = overlay {
            draw_overlay_text(fb, &field, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        obstacles: &[Obstacle],
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, obstacles, viewport, &mut fb);
        fb
    }

    fn field(&self, viewport: Viewport) -> Field {
        // HUD row + top border above, bottom border + hint row below.
        let (world_w, world_h, y_up) = match self.ground_mode {
            GroundMode::CenterLine => (SCREEN_WIDTH, SCREEN_HEIGHT, false),
            GroundMode::Walls => (WORLD_SIZE, WORLD_SIZE, true),
        };
        Field {
            x: 1,
            y: 2,
            w: viewport.width - 2,
            h: viewport.height - 4,
            world_w,
            world_h,
            y_up,
        }
    }

    fn draw_world(&self, fb: &mut FrameBuffer, field: &Field, world: &GameWorld) {
        if self.ground_mode != GroundMode::CenterLine {
            return;
        }
        let row = field.row(world.center_line_y);
        let style = CellStyle::plain(Rgb::new(90, 200, 240), FIELD_BG).bold();
        for c in 0..field.w as i32 {
            field.put(fb, c, row, '━', style);
        }
    }

    fn draw_player(&self, fb: &mut FrameBuffer, field: &Field, player: &Player) {
        let fg = if self.hit_flash {
            HIT_FLASH
        } else if player.hp * 4 <= player.max_hp {
            Rgb::new(240, 90, 80)
        } else {
            Rgb::new(250, 210, 90)
        };
        let style = CellStyle::plain(fg, FIELD_BG).bold();
        let size = crate::types::PLAYER_SIZE;
        let max = player.position + Vec3::new(size, size, 0.0);
        field.fill(fb, player.position, max, '█', style);
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport) {
        let label = CellStyle::plain(Rgb::new(220, 220, 220), BLACK).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), BLACK);

        let mut x = 1;
        fb.put_str(x, 0, "HP", label);
        x += 3;
        if let Some(player) = snap.player.as_ref() {
            const BAR: u16 = 10;
            let filled = (player.hp * BAR as u32 / player.max_hp.max(1)) as u16;
            let bar = CellStyle::plain(Rgb::new(90, 210, 110), BLACK);
            fb.hline(x, 0, filled, '█', bar);
            fb.hline(x + filled, 0, BAR - filled, '░', bar.dim());
            x += BAR + 1;
            x += fb.put_u32(x, 0, player.hp, value);
            fb.put_char(x, 0, '/', value);
            x += 1;
            x += fb.put_u32(x, 0, player.max_hp, value);
        } else {
            fb.put_char(x, 0, '-', value);
            x += 1;
        }

        if let Some(world) = snap.world.as_ref() {
            x += 2;
            fb.put_str(x, 0, "GRAV", label);
            x += 5;
            fb.put_char(x, 0, self.gravity_arrow(world.gravity_direction), value);
            x += 2;
            fb.put_str(x, 0, "ROT", label);
            x += 4;
            let angle = world.display_angle.rem_euclid(360.0).round() as u32 % 360;
            x += fb.put_u32(x, 0, angle, value);
            fb.put_char(x, 0, '°', value);
            x += 1;
            if snap.rotating {
                fb.put_char(x, 0, '*', value.bold());
                x += 1;
            }
            x += 2;
            fb.put_str(x, 0, "SEC", label);
            x += 4;
            fb.put_u32(x, 0, world.current_section, value);
        }

        let state = snap.state.as_str();
        let sx = viewport.width.saturating_sub(state.len() as u16 + 1);
        fb.put_str(sx, 0, state, value.dim());
    }

    fn gravity_arrow(&self, g: Vec3) -> char {
        let up_is_positive = self.ground_mode == GroundMode::Walls;
        if g.x > 0.0 {
            '→'
        } else if g.x < 0.0 {
            '←'
        } else if (g.y > 0.0) == up_is_positive {
            '↑'
        } else {
            '↓'
        }
    }
}

fn draw_obstacle(fb: &mut FrameBuffer, field: &Field, obstacle: &Obstacle) {
    let (ch, fg) = match obstacle.kind {
        ObstacleKind::Spike => ('▲', Rgb::new(230, 80, 80)),
        ObstacleKind::Block => ('■', Rgb::new(150, 150, 170)),
        ObstacleKind::Saw => ('✹', Rgb::new(240, 160, 60)),
    };
    let bounds = obstacle.bounds();
    field.fill(fb, bounds.min, bounds.max, ch, CellStyle::plain(fg, FIELD_BG));
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    fb.hline(x + 1, y, w - 2, '─', style);
    fb.hline(x + 1, y + h - 1, w - 2, '─', style);
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, field: &Field, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = field.x + field.w.saturating_sub(text_w) / 2;
    let y = field.y + field.h / 4;
    let style = CellStyle::plain(Rgb::new(255, 255, 255), BLACK).bold();
    fb.put_str(x, y, text, style);
}
