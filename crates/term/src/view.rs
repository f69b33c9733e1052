//! GameView: maps a session into lines of text.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{
    BoosterInventory, EventSink, GameSession, RandomSource, SessionStore, Statistics,
};
use crate::types::{BoosterKind, Position, BOARD_SIZE};

/// Everything the view needs from one frame of play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFrame {
    pub board: [[u32; BOARD_SIZE]; BOARD_SIZE],
    pub score: u32,
    pub highest_tile: u32,
    pub moves: u32,
    pub boosters: BoosterInventory,
    pub game_over: bool,
    pub won: bool,
    /// Set while a bomb waits for its target
    pub cursor: Option<Position>,
    pub best_score: u32,
    pub message: Option<String>,
}

impl ViewFrame {
    pub fn from_session<R, E, P>(session: &GameSession<R, E, P>) -> Self
    where
        R: RandomSource,
        E: EventSink,
        P: SessionStore,
    {
        Self {
            board: session.board().to_rows(),
            score: session.score(),
            highest_tile: session.highest_tile(),
            moves: session.move_count(),
            boosters: *session.boosters(),
            game_over: session.is_game_over(),
            won: session.has_won(),
            cursor: None,
            best_score: session.score(),
            message: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<Position>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_stats(mut self, stats: &Statistics) -> Self {
        self.best_score = self.best_score.max(stats.best_score);
        self
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}

/// A lightweight text renderer for the board.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: usize,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 6 }
    }
}

impl GameView {
    pub fn new(cell_w: usize) -> Self {
        Self {
            cell_w: cell_w.max(3),
        }
    }

    pub fn render_lines(&self, frame: &ViewFrame) -> Vec<String> {
        let mut lines = Vec::with_capacity(BOARD_SIZE * 2 + 8);

        lines.push(format!(
            " Score {:<8} Best {:<8} Moves {}",
            frame.score, frame.best_score, frame.moves
        ));

        let rule = self.rule();
        lines.push(rule.clone());
        for (r, row) in frame.board.iter().enumerate() {
            let mut line = String::from(" |");
            for (c, &value) in row.iter().enumerate() {
                let selected = frame.cursor == Some(Position::new(r as u8, c as u8));
                line.push_str(&self.cell(value, selected));
                line.push('|');
            }
            lines.push(line);
            lines.push(rule.clone());
        }

        lines.push(booster_line(&frame.boosters));
        lines.push(status_line(frame));
        lines.push(help_line(frame.cursor.is_some()));
        lines
    }

    fn rule(&self) -> String {
        let mut line = String::from(" +");
        for _ in 0..BOARD_SIZE {
            line.push_str(&"-".repeat(self.cell_w));
            line.push('+');
        }
        line
    }

    fn cell(&self, value: u32, selected: bool) -> String {
        let w = self.cell_w;
        let text = if value == 0 {
            String::from(".")
        } else {
            value.to_string()
        };
        if selected {
            format!("[{:^width$}]", text, width = w - 2)
        } else if value == 0 {
            format!("{:^width$}", text, width = w)
        } else {
            format!("{:>width$} ", text, width = w - 1)
        }
    }
}

fn booster_line(boosters: &BoosterInventory) -> String {
    let mut line = String::from(" ");
    for kind in BoosterKind::ALL {
        line.push_str(&format!("{} {}  ", kind.as_str(), boosters.count(kind)));
    }
    line.trim_end().to_string()
}

fn status_line(frame: &ViewFrame) -> String {
    if let Some(message) = &frame.message {
        return format!(" {}", message);
    }
    if frame.game_over {
        format!(" Game over! Highest tile {}", frame.highest_tile)
    } else if frame.cursor.is_some() {
        String::from(" Bomb armed: pick a tile")
    } else if frame.won {
        String::from(" You made it! Keep going")
    } else {
        String::new()
    }
}

fn help_line(targeting: bool) -> String {
    if targeting {
        String::from(" arrows: aim  enter: destroy  esc: cancel")
    } else {
        String::from(" arrows/wasd/hjkl: move  u: undo  x: shuffle  b: bomb  n: new  q: quit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> ViewFrame {
        ViewFrame {
            board: [[2, 0, 0, 0], [0, 2048, 0, 0], [0, 0, 0, 0], [0, 0, 0, 4]],
            score: 120,
            highest_tile: 2048,
            moves: 7,
            boosters: BoosterInventory::new(1, 0, 2, 0),
            game_over: false,
            won: true,
            cursor: None,
            best_score: 500,
            message: None,
        }
    }

    #[test]
    fn test_board_rows_are_aligned() {
        let lines = GameView::default().render_lines(&frame());
        let width = lines[1].len();
        for line in &lines[1..=9] {
            assert_eq!(line.len(), width, "{:?}", line);
        }
        assert!(lines[0].contains("Score 120"));
        assert!(lines[0].contains("Best 500"));
        assert!(lines[4].contains("2048"));
    }

    #[test]
    fn test_boosters_and_status() {
        let lines = GameView::default().render_lines(&frame());
        assert_eq!(lines[10], " undo 1  shuffle 0  bomb 2  life 0");
        assert!(lines[11].contains("Keep going"));
    }

    #[test]
    fn test_cursor_is_bracketed() {
        let f = frame().with_cursor(Some(Position::new(0, 0)));
        let lines = GameView::default().render_lines(&f);
        assert!(lines[2].starts_with(" |[ 2  ]|"), "{:?}", lines[2]);
        assert!(lines.last().unwrap().contains("esc: cancel"));
    }

    #[test]
    fn test_game_over_status() {
        let mut f = frame();
        f.game_over = true;
        let lines = GameView::default().render_lines(&f);
        assert!(lines[11].contains("Game over"));
    }
}
