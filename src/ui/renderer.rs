/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into the `front` buffer
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Emit terminal commands only for cells that changed, batched with `queue!`
///   4. Swap front/back
///
/// Layout (terminal rows):
///   0        HUD: level name, coins, attempt
///   2..      map viewport, one tile = 2 columns x 1 row
///   +1       status banner (won / burned)
///   +2       help
///
/// Actors are drawn over the terrain from their boxes, at half-tile
/// horizontal resolution, so the player's 0.7-wide body moves smoothly.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::actor::{Actor, Role};
use crate::domain::tile::Tile;
use crate::domain::vector::Vector;
use crate::sim::level::{Level, Status};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background everywhere, matching the `Clear` colour so
    /// VTE terminals show no seams between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never equal to a composed cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
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
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
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
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

/// Terminal columns per tile.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// HUD, gap, status and help rows.
const RESERVED_ROWS: usize = MAP_ROW + 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_FG: Color = Color::Rgb { r: 150, g: 160, b: 190 };
const WALL_BG: Color = Color::Rgb { r: 70, g: 80, b: 110 };
const LAVA_FG: Color = Color::Rgb { r: 255, g: 170, b: 40 };
const LAVA_BG: Color = Color::Rgb { r: 190, g: 40, b: 20 };
const PLAYER_FG: Color = Color::Rgb { r: 64, g: 64, b: 64 };
const COIN_FG: Color = Color::Rgb { r: 241, g: 229, b: 89 };

const WALL_GLYPH: char = '█';
const LAVA_GLYPH: char = '≈';
const PLAYER_GLYPH: char = '▓';
const COIN_GLYPH: char = '$';
const HAZARD_GLYPH: char = '≈';

/// Visible window onto the level, in tiles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Viewport {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Viewport {
    /// Largest window that fits, centred on `focus` and clamped to the level.
    fn follow(focus: Vector, level_w: usize, level_h: usize, max_w: usize, max_h: usize) -> Self {
        let w = level_w.min(max_w);
        let h = level_h.min(max_h);
        Viewport {
            x: centre_on(focus.x, w, level_w),
            y: centre_on(focus.y, h, level_h),
            w,
            h,
        }
    }
}

fn centre_on(focus: f64, view: usize, total: usize) -> usize {
    let max = total.saturating_sub(view) as f64;
    let start = (focus - view as f64 / 2.0).floor();
    // NaN clamps to 0 through the `max(0.0)` below.
    start.min(max).max(0.0) as usize
}

// ── Composition (pure: level → front buffer) ──

fn compose(front: &mut FrameBuffer, level: &Level, attempt: u32) {
    let max_w = front.width / CELL_W;
    let max_h = front.height.saturating_sub(RESERVED_ROWS).max(1);
    let focus = level
        .player()
        .map(|p| p.position() + p.size() * 0.5)
        .unwrap_or_default();
    let view = Viewport::follow(focus, level.width(), level.height(), max_w, max_h);

    compose_hud(front, level, attempt);
    compose_terrain(front, level, view);
    // Player last so it is never hidden behind a coin.
    for actor in level.actors().iter().filter(|a| a.role() != Role::Player) {
        compose_actor(front, actor, view);
    }
    if let Some(player) = level.player() {
        compose_actor(front, player, view);
    }
    compose_footer(front, level, MAP_ROW + view.h);
}

fn compose_hud(front: &mut FrameBuffer, level: &Level, attempt: u32) {
    let (collected, total) = level.coins();
    let status = match level.status() {
        Status::InProgress => "Playing",
        Status::Won => "Cleared",
        Status::Lost => "Burned",
    };
    let hud = format!(
        " {}   Coins {}/{}   Attempt {}   {} ",
        level.name(),
        collected,
        total,
        attempt,
        status
    );
    front.fill_row(HUD_ROW, HUD_BG);
    front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
}

fn compose_terrain(front: &mut FrameBuffer, level: &Level, view: Viewport) {
    for vy in 0..view.h {
        let row = MAP_ROW + vy;
        for vx in 0..view.w {
            let Some(tile) = level.tile_at(view.x + vx, view.y + vy) else {
                continue;
            };
            let cell = match tile {
                Tile::Space => Cell::BLANK,
                Tile::Wall => Cell::new(WALL_GLYPH, WALL_FG, WALL_BG),
                Tile::Lava => Cell::new(LAVA_GLYPH, LAVA_FG, LAVA_BG),
            };
            front.set(vx * CELL_W, row, cell);
            front.set(vx * CELL_W + 1, row, cell);
        }
    }
}

/// Screen span `[start, end)` covered by `[lo, hi)` at `scale` cells per
/// tile, shifted by the viewport origin.
fn raster_span(lo: f64, hi: f64, origin: usize, scale: usize) -> (i64, i64) {
    let s = scale as f64;
    let shift = (origin * scale) as i64;
    ((lo * s).floor() as i64 - shift, (hi * s).ceil() as i64 - shift)
}

fn compose_actor(front: &mut FrameBuffer, actor: &Actor, view: Viewport) {
    let bounds = actor.bounds();
    let cell = match actor.role() {
        Role::Player => Cell::new(PLAYER_GLYPH, PLAYER_FG, Color::White),
        Role::Collectible => Cell::new(COIN_GLYPH, COIN_FG, Color::Reset),
        Role::Hazard => Cell::new(HAZARD_GLYPH, LAVA_FG, LAVA_BG),
    };

    let (x0, x1) = raster_span(bounds.left(), bounds.right(), view.x, CELL_W);
    let (y0, y1) = raster_span(bounds.top(), bounds.bottom(), view.y, 1);
    let cols = (view.w * CELL_W) as i64;
    let rows = view.h as i64;

    for y in y0.max(0)..y1.min(rows) {
        for x in x0.max(0)..x1.min(cols) {
            front.set(x as usize, MAP_ROW + y as usize, cell);
        }
    }
}

fn compose_footer(front: &mut FrameBuffer, level: &Level, map_end: usize) {
    let status_row = map_end;
    match level.status() {
        Status::InProgress => {}
        Status::Won => {
            let bg = Color::Rgb { r: 30, g: 120, b: 50 };
            front.fill_row(status_row, bg);
            front.put_str(0, status_row, " All coins collected! ", Color::White, bg);
        }
        Status::Lost => {
            let bg = Color::Rgb { r: 150, g: 30, b: 30 };
            front.fill_row(status_row, bg);
            front.put_str(0, status_row, " Burned! ", Color::White, bg);
        }
    }

    let help = " ←→/AD: Move  ↑/W/Space: Jump  R: Restart  Esc/Q: Quit";
    front.put_str(0, status_row + 1, help, Color::DarkGrey, Color::Reset);
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    /// Force a full repaint on the next frame (e.g. after a restart).
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, level: &Level, attempt: u32) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, level, attempt);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // Cursor position after the last Print, if known.
        let mut cursor: Option<(usize, usize)> = None;

        // Not ResetColor: the terminal default may differ from BASE_BG.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor != Some((x, y)) {
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
                cursor = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
