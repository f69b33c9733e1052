//! Target cursor used while a bomb waits for its target.

use crate::map::direction_for_key;
use crate::types::{Direction, GameAction, Position, BOARD_SIZE};
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCursor {
    pos: Position,
}

impl Default for TargetCursor {
    fn default() -> Self {
        Self {
            pos: Position::new(0, 0),
        }
    }
}

impl TargetCursor {
    pub fn new(pos: Position) -> Self {
        let last = (BOARD_SIZE - 1) as u8;
        Self {
            pos: Position::new(pos.row.min(last), pos.col.min(last)),
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Step one cell, stopping at the board edge.
    pub fn step(&mut self, direction: Direction) {
        let last = (BOARD_SIZE - 1) as u8;
        let Position { row, col } = self.pos;
        self.pos = match direction {
            Direction::Up => Position::new(row.saturating_sub(1), col),
            Direction::Down => Position::new((row + 1).min(last), col),
            Direction::Left => Position::new(row, col.saturating_sub(1)),
            Direction::Right => Position::new(row, (col + 1).min(last)),
        };
    }

    /// Map a key while targeting. Movement keys steer the cursor and yield nothing.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<GameAction> {
        if let Some(direction) = direction_for_key(key) {
            self.step(direction);
            return None;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(GameAction::Target(self.pos)),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => Some(GameAction::CancelBomb),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stops_at_edges() {
        let mut cursor = TargetCursor::default();
        cursor.step(Direction::Up);
        cursor.step(Direction::Left);
        assert_eq!(cursor.position(), Position::new(0, 0));

        for _ in 0..10 {
            cursor.step(Direction::Down);
            cursor.step(Direction::Right);
        }
        assert_eq!(cursor.position(), Position::new(3, 3));
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(
            TargetCursor::new(Position::new(9, 2)).position(),
            Position::new(3, 2)
        );
    }

    #[test]
    fn test_targeting_keys() {
        let mut cursor = TargetCursor::default();
        assert_eq!(cursor.handle_key(KeyEvent::from(KeyCode::Right)), None);
        assert_eq!(cursor.handle_key(KeyEvent::from(KeyCode::Char('j'))), None);
        assert_eq!(
            cursor.handle_key(KeyEvent::from(KeyCode::Enter)),
            Some(GameAction::Target(Position::new(1, 1)))
        );
        assert_eq!(
            cursor.handle_key(KeyEvent::from(KeyCode::Esc)),
            Some(GameAction::CancelBomb)
        );
        assert_eq!(cursor.handle_key(KeyEvent::from(KeyCode::Char('u'))), None);
    }
}
