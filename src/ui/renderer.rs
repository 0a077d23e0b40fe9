/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (array of Cell)
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// One board cell spans two terminal columns, so cells come out roughly
/// square on common fonts. The board frame is drawn *around* the
/// playable `[0, cols) × [0, rows)` area: every grid cell the
/// simulation can use is inside the frame.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::ColorConfig;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const fn blank(bg: Color) -> Cell {
        Cell { ch: ' ', fg: Color::White, bg }
    }

    /// Sentinel used to invalidate the back buffer after a resize:
    /// different from any real cell, so every position gets diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── Layout ──

/// Terminal column/row of the board's top-left playable cell.
/// Row 0 holds the score line, row 1 the top border.
const BOARD_ORIGIN_X: u16 = 2;
const BOARD_ORIGIN_Y: u16 = 2;

pub struct Renderer {
    out: BufWriter<Stdout>,
    front: Vec<Cell>,
    back: Vec<Cell>,
    term_w: u16,
    term_h: u16,
    colors: ColorConfig,
}

impl Renderer {
    pub fn new(colors: ColorConfig) -> Self {
        Renderer {
            out: BufWriter::new(io::stdout()),
            front: vec![],
            back: vec![],
            term_w: 0,
            term_h: 0,
            colors,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All),
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            terminal::LeaveAlternateScreen,
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (w, h) = terminal::size()?;
        if (w, h) != (self.term_w, self.term_h) {
            self.term_w = w;
            self.term_h = h;
            let len = w as usize * h as usize;
            self.front = vec![Cell::blank(self.colors.background); len];
            self.back = vec![Cell::INVALID; len];
        }

        self.front.fill(Cell::blank(self.colors.background));
        self.build_frame(world);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Frame construction ──

    fn build_frame(&mut self, world: &WorldState) {
        let need_w = BOARD_ORIGIN_X + world.grid.cols as u16 * 2 + 1;
        let need_h = BOARD_ORIGIN_Y + world.grid.rows as u16 + 1;
        if self.term_w < need_w || self.term_h < need_h {
            let msg = format!("Terminal too small: need {need_w}×{need_h}");
            self.put_str(0, 0, &msg, Color::Yellow, self.colors.background);
            return;
        }

        match world.phase {
            Phase::Menu => self.build_menu(world),
            Phase::Playing | Phase::Paused | Phase::GameOver => self.build_board(world),
        }
    }

    fn build_menu(&mut self, world: &WorldState) {
        let bg = self.colors.background;
        let cx = self.term_w / 2;
        let cy = self.term_h / 2;
        let lines: [(String, Color); 5] = [
            ("S N A K E".into(), self.colors.snake),
            (String::new(), Color::White),
            ("[Enter]  Start".into(), Color::White),
            (format!("[\u{2191}\u{2193}]     Speed: {}", world.level.label()), Color::White),
            ("[Esc]    Exit".into(), Color::White),
        ];
        for (i, (text, fg)) in lines.iter().enumerate() {
            let x = cx.saturating_sub(text.chars().count() as u16 / 2);
            let y = cy.saturating_sub(3) + i as u16;
            self.put_str(x, y, text, *fg, bg);
        }
    }

    fn build_board(&mut self, world: &WorldState) {
        let bg = self.colors.background;

        self.put_str(1, 0, &format!("Score {}", world.score), Color::White, bg);

        self.draw_border(world.grid.cols as u16, world.grid.rows as u16);

        for &cell in &world.snake {
            self.put_board_cell(cell, self.colors.snake);
        }
        // On a won board there is no live food: `world.food` still holds
        // the last-eaten cell, which is now the snake's head.
        if !world.won {
            self.put_board_cell(world.food, self.colors.food);
        }

        match world.phase {
            Phase::Paused => self.banner(world, &["Paused".to_string()]),
            Phase::GameOver => {
                let headline = if world.won { "You win!" } else { "Game over" };
                self.banner(world, &[headline.to_string(), format!("Score {}", world.score)]);
            }
            _ => {}
        }
    }

    fn draw_border(&mut self, cols: u16, rows: u16) {
        let fg = self.colors.border;
        let bg = self.colors.background;
        let left = BOARD_ORIGIN_X - 1;
        let right = BOARD_ORIGIN_X + cols * 2;
        let top = BOARD_ORIGIN_Y - 1;
        let bottom = BOARD_ORIGIN_Y + rows;

        for x in left..=right {
            self.put(x, top, '─', fg, bg);
            self.put(x, bottom, '─', fg, bg);
        }
        for y in top..=bottom {
            self.put(left, y, '│', fg, bg);
            self.put(right, y, '│', fg, bg);
        }
        self.put(left, top, '┌', fg, bg);
        self.put(right, top, '┐', fg, bg);
        self.put(left, bottom, '└', fg, bg);
        self.put(right, bottom, '┘', fg, bg);
    }

    /// Paint one grid cell as a two-column block of `color`.
    fn put_board_cell(&mut self, cell: (i32, i32), color: Color) {
        let (x, y) = cell;
        let tx = BOARD_ORIGIN_X + x as u16 * 2;
        let ty = BOARD_ORIGIN_Y + y as u16;
        self.put(tx, ty, ' ', color, color);
        self.put(tx + 1, ty, ' ', color, color);
    }

    /// Centered text lines over the board area.
    fn banner(&mut self, world: &WorldState, lines: &[String]) {
        let cx = BOARD_ORIGIN_X + world.grid.cols as u16; // board center column
        let cy = BOARD_ORIGIN_Y + world.grid.rows as u16 / 2;
        let start = cy.saturating_sub(lines.len() as u16 / 2);
        for (i, text) in lines.iter().enumerate() {
            let x = cx.saturating_sub(text.chars().count() as u16 / 2);
            self.put_str(x, start + i as u16, text, Color::Yellow, self.colors.background);
        }
    }

    // ── Buffer primitives ──

    fn put(&mut self, x: u16, y: u16, ch: char, fg: Color, bg: Color) {
        if x < self.term_w && y < self.term_h {
            let idx = y as usize * self.term_w as usize + x as usize;
            self.front[idx] = Cell { ch, fg, bg };
        }
    }

    fn put_str(&mut self, x: u16, y: u16, text: &str, fg: Color, bg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i as u16, y, ch, fg, bg);
        }
    }

    // ── Diff flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;
        let mut cursor_at: Option<(u16, u16)> = None;

        for y in 0..self.term_h {
            for x in 0..self.term_w {
                let idx = y as usize * self.term_w as usize + x as usize;
                let cell = self.front[idx];
                if cell == self.back[idx] {
                    continue;
                }

                // Skip MoveTo when writing the very next column.
                if cursor_at != Some((x, y)) {
                    queue!(self.out, MoveTo(x, y))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.out, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorConfig;
    use crate::domain::grid::Grid;
    use crate::sim::world::WorldState;

    /// Renderer with buffers prepared as `render()` would after a
    /// resize, so `build_frame` can be driven directly.
    fn renderer(w: u16, h: u16) -> Renderer {
        let colors = ColorConfig {
            background: Color::Black,
            snake: Color::Green,
            food: Color::Red,
            border: Color::White,
        };
        let mut r = Renderer::new(colors);
        r.term_w = w;
        r.term_h = h;
        let len = w as usize * h as usize;
        r.front = vec![Cell::blank(colors.background); len];
        r.back = vec![Cell::INVALID; len];
        r
    }

    fn bg_at(r: &Renderer, cell: (i32, i32)) -> Color {
        let x = BOARD_ORIGIN_X as usize + cell.0 as usize * 2;
        let y = BOARD_ORIGIN_Y as usize + cell.1 as usize;
        r.front[y * r.term_w as usize + x].bg
    }

    fn world() -> WorldState {
        let mut w = WorldState::with_seed(Grid::new(8, 8), 1);
        w.start_game(std::time::Duration::from_millis(100));
        w
    }

    #[test]
    fn live_food_renders_in_food_color() {
        let mut r = renderer(40, 20);
        let mut w = world();
        w.food = (7, 7);
        r.build_frame(&w);
        assert_eq!(bg_at(&r, (7, 7)), r.colors.food);
        assert_eq!(bg_at(&r, w.head()), r.colors.snake);
    }

    #[test]
    fn won_board_draws_no_food_over_the_head() {
        let mut r = renderer(40, 20);
        let mut w = world();
        // A winning move leaves `food` pointing at the just-eaten cell,
        // which is now the snake's head.
        w.food = w.head();
        w.won = true;
        w.phase = Phase::GameOver;
        r.build_frame(&w);
        assert_eq!(bg_at(&r, w.head()), r.colors.snake);
    }
}
