mod cli;
mod clock;
mod input;
mod render;

use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use maze_game::{generate, Difficulty, MazeSession};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use clock::Stopwatch;
use render::Renderer;

const DEFAULT_RENDER_FPS: u64 = 30;

struct Game {
    session: MazeSession,
    clock: Stopwatch,
    renderer: Renderer,
}

impl Game {
    fn new(difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let size = difficulty.grid_size();
        info!(%difficulty, size, "starting session");
        let grid = generate(size, rng);
        Self {
            session: MazeSession::new(grid),
            clock: Stopwatch::start(),
            renderer: Renderer::new(size),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Flow {
        if code == KeyCode::Char('n') {
            return Flow::Menu;
        }
        let Some(dir) = input::dir_for_key(code) else {
            return Flow::Stay;
        };
        let result = self.session.attempt_move(dir);
        if result.is_accepted() && self.session.is_won() && self.clock.is_running() {
            let elapsed = self.clock.stop();
            info!(
                secs = elapsed.as_secs_f64(),
                moves = self.session.moves(),
                "finished"
            );
        }
        Flow::Stay
    }
}

enum Screen {
    Menu { selected: usize, dirty: bool },
    Playing(Game),
}

impl Screen {
    fn menu() -> Self {
        Screen::Menu {
            selected: 0,
            dirty: true,
        }
    }

    fn invalidate(&mut self) {
        match self {
            Screen::Menu { dirty, .. } => *dirty = true,
            Screen::Playing(game) => game.renderer.invalidate(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if input::is_quit(&key) {
            return Flow::Quit;
        }
        match self {
            Screen::Menu { selected, dirty } => {
                let entries = Difficulty::ALL.len();
                if let Some(idx) = input::menu_shortcut(key.code, entries) {
                    return Flow::Play(Difficulty::ALL[idx]);
                }
                match key.code {
                    KeyCode::Enter => return Flow::Play(Difficulty::ALL[*selected]),
                    KeyCode::Up | KeyCode::Char('k') => {
                        *selected = (*selected + entries - 1) % entries;
                        *dirty = true;
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        *selected = (*selected + 1) % entries;
                        *dirty = true;
                    }
                    _ => {}
                }
                Flow::Stay
            }
            Screen::Playing(game) => game.handle_key(key.code),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Flow {
    Stay,
    Quit,
    Menu,
    Play(Difficulty),
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &cli);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_tracing(path: &Path) -> io::Result<()> {
    // The terminal is in raw mode, so logs go to a file.
    let log_file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(stdout: &mut Stdout, cli: &Cli) -> io::Result<()> {
    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "maze seed");
    let mut rng = StdRng::seed_from_u64(seed);

    let render_fps = read_render_fps();
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));
    debug!(render_fps, "render settings");

    let mut screen = match cli.difficulty {
        Some(difficulty) => Screen::Playing(Game::new(difficulty, &mut rng)),
        None => Screen::menu(),
    };

    loop {
        match &mut screen {
            Screen::Menu { selected, dirty } => {
                if *dirty {
                    render::render_menu(stdout, *selected)?;
                    *dirty = false;
                }
            }
            Screen::Playing(game) => {
                render::render_game(stdout, &game.session, game.clock.elapsed(), &mut game.renderer)?;
            }
        }

        if !event::poll(frame_time)? {
            continue;
        }
        let flow = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => screen.handle_key(key),
            Event::Resize(..) => {
                screen.invalidate();
                Flow::Stay
            }
            _ => Flow::Stay,
        };
        match flow {
            Flow::Stay => {}
            Flow::Quit => {
                info!("quit");
                return Ok(());
            }
            Flow::Menu => screen = Screen::menu(),
            Flow::Play(difficulty) => screen = Screen::Playing(Game::new(difficulty, &mut rng)),
        }
    }
}

fn read_render_fps() -> u64 {
    std::env::var("MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use maze_game::{Dir, Grid, Pos};
    use std::collections::VecDeque;
    use std::thread;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_for(dir: Dir) -> KeyCode {
        match dir {
            Dir::Up => KeyCode::Up,
            Dir::Down => KeyCode::Down,
            Dir::Left => KeyCode::Left,
            Dir::Right => KeyCode::Right,
        }
    }

    fn reverse(dir: Dir) -> Dir {
        match dir {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    fn path_to_end(grid: &Grid) -> Vec<Dir> {
        let size = grid.size();
        let mut came_from: Vec<Vec<Option<(Pos, Dir)>>> = vec![vec![None; size]; size];
        let mut q = VecDeque::from([grid.start()]);
        while let Some(pos) = q.pop_front() {
            for dir in Dir::ALL {
                let Some(next) = pos.step(dir, 1, size) else {
                    continue;
                };
                if !grid.is_open(next) || next == grid.start() || came_from[next.row][next.col].is_some() {
                    continue;
                }
                came_from[next.row][next.col] = Some((pos, dir));
                q.push_back(next);
            }
        }
        let mut path = Vec::new();
        let mut pos = grid.end();
        while let Some((prev, dir)) = came_from[pos.row][pos.col] {
            path.push(dir);
            pos = prev;
        }
        path.reverse();
        path
    }

    #[test]
    fn clock_stops_on_first_finish() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut game = Game::new(Difficulty::Easy, &mut rng);
        let path = path_to_end(game.session.grid());
        let (&last, rest) = path.split_last().unwrap();

        for dir in rest {
            assert_eq!(game.handle_key(key_for(*dir)), Flow::Stay);
        }
        assert!(game.clock.is_running());
        game.handle_key(key_for(last));
        assert!(game.session.is_won());
        assert!(!game.clock.is_running());

        let finished = game.clock.elapsed();
        thread::sleep(Duration::from_millis(5));
        game.handle_key(key_for(reverse(last)));
        assert!(!game.session.is_won());
        game.handle_key(key_for(last));
        assert!(game.session.is_won());
        assert_eq!(game.clock.elapsed(), finished);
    }

    #[test]
    fn unmapped_keys_leave_game_alone() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = Game::new(Difficulty::Medium, &mut rng);
        for code in [KeyCode::Char('x'), KeyCode::Enter, KeyCode::Tab] {
            assert_eq!(game.handle_key(code), Flow::Stay);
        }
        assert_eq!(game.session.current_position(), Pos::new(0, 0));
        assert_eq!(game.session.moves(), 0);
        assert!(game.clock.is_running());
    }

    #[test]
    fn n_returns_to_menu_and_q_quits() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut screen = Screen::Playing(Game::new(Difficulty::Hard, &mut rng));
        assert_eq!(screen.handle_key(press(KeyCode::Char('n'))), Flow::Menu);
        assert_eq!(screen.handle_key(press(KeyCode::Char('q'))), Flow::Quit);
        assert_eq!(Screen::menu().handle_key(press(KeyCode::Esc)), Flow::Quit);
    }

    #[test]
    fn menu_selection_wraps() {
        let mut screen = Screen::menu();
        screen.handle_key(press(KeyCode::Up));
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), Flow::Play(Difficulty::Hard));
        screen.handle_key(press(KeyCode::Down));
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), Flow::Play(Difficulty::Easy));
        screen.handle_key(press(KeyCode::Char('j')));
        assert_eq!(screen.handle_key(press(KeyCode::Enter)), Flow::Play(Difficulty::Medium));
    }

    #[test]
    fn menu_digits_pick_difficulty() {
        let mut screen = Screen::menu();
        assert_eq!(screen.handle_key(press(KeyCode::Char('1'))), Flow::Play(Difficulty::Easy));
        assert_eq!(screen.handle_key(press(KeyCode::Char('2'))), Flow::Play(Difficulty::Medium));
        assert_eq!(screen.handle_key(press(KeyCode::Char('3'))), Flow::Play(Difficulty::Hard));
        assert_eq!(screen.handle_key(press(KeyCode::Char('4'))), Flow::Stay);
        assert_eq!(screen.handle_key(press(KeyCode::Char('x'))), Flow::Stay);
    }
}
