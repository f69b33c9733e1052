//! Move engine - directional compaction and merge
//!
//! A move processes every row (horizontal moves) or column (vertical moves)
//! independently. Each line is read starting at the edge the tiles slide
//! towards, so `Right` and `Down` reuse the exact same line routine as
//! `Left` and `Up`:
//!
//! 1. Drop the zeros, keeping the relative order of tiles.
//! 2. Walk the compacted tiles from the leading edge; a tile equal to the
//!    previously written one merges into it unless that one is itself the
//!    product of a merge in this pass.
//! 3. Pad the trailing edge with zeros.
//!
//! The board is only written when at least one line changed, so a move that
//! reports `moved == false` leaves it byte-for-byte identical.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Direction, MergeEvent, BOARD_SIZE, MAX_LINE_MERGES, MAX_MOVE_MERGES};

/// Outcome of sliding a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSlide {
    /// Line contents after the slide, leading edge first
    pub values: [u32; BOARD_SIZE],
    pub score: u32,
    /// `(slot, value)` of each merged tile, slot counted from the leading edge
    pub merges: ArrayVec<(usize, u32), MAX_LINE_MERGES>,
}

impl LineSlide {
    pub fn changed(&self, before: &[u32; BOARD_SIZE]) -> bool {
        &self.values != before
    }
}

/// Outcome of applying one directional move to a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub direction: Direction,
    pub moved: bool,
    pub score_delta: u32,
    pub merges: ArrayVec<MergeEvent, MAX_MOVE_MERGES>,
}

impl MoveResult {
    /// A rejected or ineffective move
    pub fn unmoved(direction: Direction) -> Self {
        Self {
            direction,
            moved: false,
            score_delta: 0,
            merges: ArrayVec::new(),
        }
    }

    pub fn merge_count(&self) -> u32 {
        self.merges.len() as u32
    }
}

/// Compact and merge one line given leading edge first.
///
/// # Examples
///
/// ```
/// use tile_merge_core::moves::slide_line;
///
/// let slid = slide_line(&[2, 2, 2, 2]);
/// assert_eq!(slid.values, [4, 4, 0, 0]);
/// assert_eq!(slid.score, 8);
///
/// // A freshly merged tile never merges again in the same pass.
/// let slid = slide_line(&[4, 2, 2, 0]);
/// assert_eq!(slid.values, [4, 4, 0, 0]);
/// ```
pub fn slide_line(line: &[u32; BOARD_SIZE]) -> LineSlide {
    let mut values = [0u32; BOARD_SIZE];
    let mut merged = [false; BOARD_SIZE];
    let mut merges = ArrayVec::new();
    let mut score = 0u32;
    let mut write = 0usize;

    for &v in line.iter().filter(|&&v| v != 0) {
        if write > 0 && values[write - 1] == v && !merged[write - 1] {
            let combined = v * 2;
            values[write - 1] = combined;
            merged[write - 1] = true;
            score += combined;
            merges.push((write - 1, combined));
        } else {
            values[write] = v;
            write += 1;
        }
    }

    LineSlide {
        values,
        score,
        merges,
    }
}

/// Apply a move to `board` in place.
pub fn apply_move(board: &mut Board, direction: Direction) -> MoveResult {
    let mut result = MoveResult::unmoved(direction);
    let mut next = *board;

    for line in 0..BOARD_SIZE {
        let positions = Board::line_positions(direction, line);
        let before = board.read_line(&positions);
        let slid = slide_line(&before);

        if !slid.changed(&before) {
            continue;
        }

        result.moved = true;
        result.score_delta += slid.score;
        for &(slot, value) in &slid.merges {
            result.merges.push(MergeEvent {
                pos: positions[slot],
                value,
            });
        }
        next.write_line(&positions, &slid.values);
    }

    if result.moved {
        *board = next;
    }
    result
}

/// Whether any direction would change the board.
pub fn can_move(board: &Board) -> bool {
    Direction::ALL.iter().any(|&dir| {
        let mut probe = *board;
        apply_move(&mut probe, dir).moved
    })
}
