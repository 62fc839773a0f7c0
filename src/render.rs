use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use maze_game::{Difficulty, MazeSession, Pos, Tile};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CELL_W: usize = 2;
const HINT: &str = "arrows/hjkl: move   n: new game   q: quit";

#[derive(Clone, Copy, Debug, PartialEq)]
enum Glyph {
    Player,
    Start,
    End,
    Wall,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Remembers what is on screen so only changed cells are redrawn.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_footer: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(size: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            last_footer: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn render_game(
    stdout: &mut Stdout,
    session: &MazeSession,
    elapsed: Duration,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let size = session.grid().size();
    let secs = elapsed.as_secs_f64();
    let hud = format!("Time: {:.2} sec   Moves: {}", secs, session.moves());
    let (footer, color) = if session.is_won() {
        (
            format!(
                "Congratulations! You've solved the maze in {:.2} seconds!",
                secs
            ),
            Color::Yellow,
        )
    } else {
        (HINT.to_string(), Color::DarkGrey)
    };

    let grid_w = (size * CELL_W) as u16;
    let needed_h = (size + 2) as u16;
    let needed_w = required_width(size, &[hud.as_str(), footer.as_str()]);

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(fit(&msg, term_w)))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - grid_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    if renderer.needs_full || hud != renderer.last_hud {
        draw_line(stdout, term_w, renderer.origin_y - 1, &hud, Color::White)?;
        renderer.last_hud = hud;
    }

    for row in 0..size {
        for col in 0..size {
            let pos = Pos::new(row, col);
            let cell = cell_for(session, pos);
            let idx = row * size + col;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, pos, cell)?;
            }
        }
    }

    if renderer.needs_full || footer != renderer.last_footer {
        draw_line(stdout, term_w, renderer.origin_y + size as u16, &footer, color)?;
        renderer.last_footer = footer;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

pub fn render_menu(stdout: &mut Stdout, selected: usize) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    stdout.queue(Clear(ClearType::All))?;

    let top = (term_h / 2).saturating_sub(4);
    draw_line(stdout, term_w, top, "Select Difficulty Level:", Color::White)?;
    for (idx, difficulty) in Difficulty::ALL.iter().enumerate() {
        let size = difficulty.grid_size();
        let (marker, color) = if idx == selected {
            ("> ", Color::Yellow)
        } else {
            ("  ", Color::Grey)
        };
        let label = format!(
            "{}{}) {:<6} {}x{}",
            marker,
            idx + 1,
            difficulty.to_string(),
            size,
            size
        );
        draw_line(stdout, term_w, top + 2 + idx as u16, &label, color)?;
    }
    draw_line(
        stdout,
        term_w,
        top + 6,
        "1-3 or arrows + Enter to start, q to quit",
        Color::DarkGrey,
    )?;
    stdout.flush()?;
    Ok(())
}

fn cell_for(session: &MazeSession, pos: Pos) -> Cell {
    if pos == session.current_position() {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Blue,
        };
    }
    if pos == session.end_position() {
        return Cell {
            glyph: Glyph::End,
            color: Color::Red,
        };
    }
    if pos == session.grid().start() {
        return Cell {
            glyph: Glyph::Start,
            color: Color::Green,
        };
    }
    match session.grid().tile(pos) {
        Some(Tile::Open) => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
        _ => Cell {
            glyph: Glyph::Wall,
            color: Color::Grey,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, pos: Pos, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "●",
        Glyph::Start | Glyph::End => "▒▒",
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
    };
    let x_pos = renderer.origin_x + (pos.col * CELL_W) as u16;
    let y_pos = renderer.origin_y + pos.row as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Clears row `y` and prints `text` centred on it.
fn draw_line(stdout: &mut Stdout, term_w: u16, y: u16, text: &str, color: Color) -> io::Result<()> {
    stdout.queue(MoveTo(0, y))?;
    stdout.queue(Clear(ClearType::CurrentLine))?;
    let text = fit(text, term_w);
    stdout.queue(MoveTo(centered_x(term_w, text), y))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Columns needed for the grid and every status line beside it.
fn required_width(size: usize, lines: &[&str]) -> u16 {
    lines
        .iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .fold(size * CELL_W, usize::max) as u16
}

/// Longest prefix of `text` that fits in `width` columns, so a line
/// never wraps and scrolls the screen.
fn fit(text: &str, width: u16) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += UnicodeWidthChar::width(ch).unwrap_or(0);
        if used > width as usize {
            return &text[..idx];
        }
    }
    text
}

fn centered_x(term_w: u16, text: &str) -> u16 {
    let w = UnicodeWidthStr::width(text) as u16;
    term_w.saturating_sub(w) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_game::Grid;

    #[test]
    fn player_marker_wins_over_start() {
        let grid = Grid::from_ascii("..\n#.").unwrap();
        let session = MazeSession::new(grid);
        assert_eq!(cell_for(&session, Pos::new(0, 0)).glyph, Glyph::Player);
        assert_eq!(cell_for(&session, Pos::new(1, 1)).glyph, Glyph::End);
        assert_eq!(cell_for(&session, Pos::new(1, 0)).glyph, Glyph::Wall);
        assert_eq!(cell_for(&session, Pos::new(0, 1)).glyph, Glyph::Empty);
    }

    #[test]
    fn width_covers_win_message_on_small_grid() {
        let footer = "Congratulations! You've solved the maze in 12.34 seconds!";
        let needed = required_width(10, &["Time: 12.34 sec   Moves: 40", footer]);
        assert_eq!(needed as usize, UnicodeWidthStr::width(footer));
        assert!(needed > 40);
        assert_eq!(required_width(20, &["short"]), 40);
    }

    #[test]
    fn fit_truncates_to_terminal_width() {
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("abc", 10), "abc");
        assert_eq!(fit("●●x", 2), "●●");
        assert_eq!(fit("██x", 1), "█");
    }

    #[test]
    fn centering_never_underflows() {
        assert_eq!(centered_x(10, "abcd"), 3);
        assert_eq!(centered_x(2, "too wide for it"), 0);
    }
}
