//! Key mapping from terminal events to game actions.

use crate::types::{Direction, GameAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Arrow keys, WASD and HJKL.
pub fn direction_for_key(key: KeyEvent) -> Option<Direction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(Direction::Up)
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(Direction::Right)
        }
        _ => None,
    }
}

/// Map keyboard input to game actions while no bomb is armed.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if let Some(direction) = direction_for_key(key) {
        return Some(GameAction::Move(direction));
    }

    match key.code {
        // Boosters
        KeyCode::Char('u') | KeyCode::Char('U') => Some(GameAction::Undo),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(GameAction::Shuffle),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(GameAction::Bomb),

        // Restart
        KeyCode::Char('n') | KeyCode::Char('N') => Some(GameAction::NewGame),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
