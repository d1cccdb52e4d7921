/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Direction, GhostColour};
use crate::domain::tile::{Tile, WallEdges};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// Using the same explicit RGB for both `Clear(ClearType::All)` and
    /// every cell's background keeps the inter-row gap the same colour
    /// as the cells on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
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
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
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

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).as_str().to_string()).collect()
    }
}

// ── Palette ──

const WALL_FG: Color = Color::Rgb { r: 33, g: 33, b: 255 };
const DOT_FG: Color = Color::Rgb { r: 255, g: 185, b: 175 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const SCARED_FG: Color = Color::Rgb { r: 60, g: 60, b: 255 };
const LAIR_BG: Color = Color::Rgb { r: 20, g: 20, b: 40 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const GAME_OVER_FG: Color = Color::Rgb { r: 255, g: 60, b: 60 };

/// Scared ghosts start flashing when this little of the window is left.
const SCARE_FLASH_MS: u64 = 2_000;

fn ghost_colour(c: GhostColour) -> Color {
    match c {
        GhostColour::Red => Color::Rgb { r: 255, g: 0, b: 0 },
        GhostColour::Pink => Color::Rgb { r: 255, g: 184, b: 255 },
        GhostColour::Blue => Color::Rgb { r: 0, g: 255, b: 255 },
        GhostColour::Orange => Color::Rgb { r: 255, g: 184, b: 82 },
    }
}

fn player_glyph(facing: Direction) -> char {
    match facing {
        Direction::Left => 'ᗤ',
        Direction::Up => 'ᗢ',
        Direction::Right => 'ᗧ',
        Direction::Down => 'ᗜ',
    }
}

/// Box-drawing pair for a wall tile: one glyph per terminal column.
/// Only the sides that face open floor are drawn.
fn wall_glyphs(e: WallEdges) -> (char, char) {
    let left = match (e.left, e.top, e.bottom) {
        (true, true, _) => '┌',
        (true, false, true) => '└',
        (true, false, false) => '│',
        (false, true, _) | (false, _, true) => '─',
        _ => ' ',
    };
    let right = match (e.right, e.top, e.bottom) {
        (true, true, _) => '┐',
        (true, false, true) => '┘',
        (true, false, false) => '│',
        (false, true, _) | (false, _, true) => '─',
        _ => ' ',
    };
    (left, right)
}

// ── Renderer ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    anim_tick: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            anim_tick: 0,
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
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, muted: bool) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.anim_tick = self.anim_tick.wrapping_add(1);
        self.compose(world, muted);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Do NOT use ResetColor here: it resets to the terminal's
        // native default, which may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &WorldState, muted: bool) {
        self.front.clear();
        self.compose_hud(w, muted);

        let board = &w.board;
        for i in 0..board.len() {
            let (gx, gy) = board.coords(i);
            self.compose_cell(w, i, gx * CELL_W, MAP_ROW + gy);
        }

        self.compose_ready_message(w);
        self.compose_footer(w);
    }

    fn compose_hud(&mut self, w: &WorldState, muted: bool) {
        let buf_w = self.front.width;
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::from_char(' ', Color::White, HUD_BG));
        }
        let sound = if muted { "  [muted]" } else { "" };
        let hud = format!(
            " Score: {:<6} High Score: {:<6} Dots: {:<4}{}",
            w.score,
            w.high_score,
            w.board.pellets_remaining(),
            sound,
        );
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    /// Write the visual for tile `i` into the front buffer at (col, row).
    fn compose_cell(&mut self, w: &WorldState, i: usize, col: usize, row: usize) {
        if w.player.position == i {
            let ch = player_glyph(w.player.facing);
            self.front.set(col, row, Cell::from_char(ch, PLAYER_FG, Color::Reset));
            return;
        }

        // Later ghosts in the roster draw over earlier ones.
        if let Some(g) = w.ghosts.iter().rev().find(|g| g.position == i) {
            let fg = if g.scared {
                let flashing = w
                    .scare_remaining_ms()
                    .map_or(false, |ms| ms <= SCARE_FLASH_MS);
                if flashing && (self.anim_tick / 8) % 2 == 0 {
                    Color::White
                } else {
                    SCARED_FG
                }
            } else {
                ghost_colour(g.colour)
            };
            self.front.set(col, row, Cell::from_char('ᗣ', fg, Color::Reset));
            return;
        }

        let board = &w.board;
        let tile = match board.tile(i) {
            Some(t) => t,
            None => return,
        };
        let (c0, c1, fg, bg) = match tile {
            Tile::Wall(edges) if edges.any() => {
                let (l, r) = wall_glyphs(edges);
                (l, r, WALL_FG, Color::Reset)
            }
            Tile::Wall(_) => (' ', ' ', WALL_FG, Color::Reset),
            Tile::PacDot if board.is_pac_dot(i) => ('·', ' ', DOT_FG, Color::Reset),
            Tile::PowerPellet if board.is_power_pellet(i) => {
                let blink = (self.anim_tick / 12) % 2 == 0;
                let ch = if blink { '●' } else { ' ' };
                (ch, ' ', DOT_FG, Color::Reset)
            }
            _ if board.is_lair(i) => (' ', ' ', Color::White, LAIR_BG),
            _ => (' ', ' ', Color::White, Color::Reset),
        };
        self.front.set(col, row, Cell::from_char(c0, fg, bg));
        self.front.set(col + 1, row, Cell::from_char(c1, fg, bg));
    }

    /// "Ready!" centred on the ready-marker tile.
    fn compose_ready_message(&mut self, w: &WorldState) {
        if w.ready_message.is_empty() {
            return;
        }
        if let Some(marker) = w.board.ready_marker() {
            let (gx, gy) = w.board.coords(marker);
            let centre = gx * CELL_W + 1;
            let len = w.ready_message.chars().count();
            let col = centre.saturating_sub(len / 2);
            self.front.put_str(col, MAP_ROW + gy, &w.ready_message, PLAYER_FG, Color::Reset);
        }
    }

    fn compose_footer(&mut self, w: &WorldState) {
        let state_row = MAP_ROW + w.board.height() + 1;
        let help_row = state_row + 2;

        if !w.state_message.is_empty() {
            self.front.put_str(1, state_row, &w.state_message, GAME_OVER_FG, Color::Reset);
        } else if w.start_enabled() && (self.anim_tick / 30) % 2 == 0 {
            self.front.put_str(1, state_row, "Press ENTER to start", Color::White, Color::Reset);
        }

        let help = " Arrows/WASD: Move  Enter: Start  M: Mute  Q: Quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }
}
