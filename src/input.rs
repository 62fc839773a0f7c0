//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use maze_game::Dir;

/// Arrow keys and vi keys; anything else is not a move.
pub fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}

pub fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Menu row picked by a digit key, 0-based.
pub fn menu_shortcut(code: KeyCode, entries: usize) -> Option<usize> {
    let KeyCode::Char(ch) = code else {
        return None;
    };
    let n = ch.to_digit(10)? as usize;
    (1..=entries).contains(&n).then(|| n - 1)
}
