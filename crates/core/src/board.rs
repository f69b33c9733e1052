//! Board module - manages the tile grid
//!
//! The board is a 4x4 grid where each cell is either empty (0) or holds a
//! power of two >= 2. Uses a flat array for cache locality and zero-allocation.
//! Coordinates: (row, col) with row 0 at the top and col 0 on the left.

use arrayvec::ArrayVec;

use crate::error::GameError;
use crate::rng::{shuffle, RandomSource};
use crate::types::{Direction, Position, BOARD_SIZE, CELL_COUNT};

/// The game board - 4 rows x 4 columns using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [u32; CELL_COUNT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [0; CELL_COUNT],
        }
    }

    /// Build a board from rows, top to bottom
    pub fn from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut cells = [0; CELL_COUNT];
        for (r, row) in rows.iter().enumerate() {
            cells[r * BOARD_SIZE..(r + 1) * BOARD_SIZE].copy_from_slice(row);
        }
        Self { cells }
    }

    /// Copy out as rows, top to bottom
    pub fn to_rows(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[r * BOARD_SIZE..(r + 1) * BOARD_SIZE]);
        }
        rows
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(row: usize, col: usize) -> Option<usize> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        Some(row * BOARD_SIZE + col)
    }

    /// Get cell value at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell value at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: u32) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn get_at(&self, pos: Position) -> Option<u32> {
        self.get(pos.row as usize, pos.col as usize)
    }

    pub fn set_at(&mut self, pos: Position, value: u32) -> bool {
        self.set(pos.row as usize, pos.col as usize, value)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[u32; CELL_COUNT] {
        &self.cells
    }

    /// Coordinates of every empty cell, row-major
    pub fn empty_cells(&self) -> ArrayVec<Position, CELL_COUNT> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(idx, _)| Position::from_index(idx))
            .collect()
    }

    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().any(|&v| v == 0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    /// Highest tile on the grid (0 if empty)
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Whether every cell is 0 or a power of two >= 2
    pub fn is_well_formed(&self) -> bool {
        self.cells
            .iter()
            .all(|&v| v == 0 || (v >= 2 && v.is_power_of_two()))
    }

    /// Whether some horizontally or vertically adjacent pair holds equal tiles
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let v = self.cells[row * BOARD_SIZE + col];
                if v == 0 {
                    continue;
                }
                if col + 1 < BOARD_SIZE && self.cells[row * BOARD_SIZE + col + 1] == v {
                    return true;
                }
                if row + 1 < BOARD_SIZE && self.cells[(row + 1) * BOARD_SIZE + col] == v {
                    return true;
                }
            }
        }
        false
    }

    /// No empty cell and no mergeable neighbours: no move can change the board
    pub fn is_terminal(&self) -> bool {
        !self.has_empty_cell() && !self.has_adjacent_pair()
    }

    /// Place a 2 (or, with `four_probability`, a 4) on a uniformly chosen empty cell
    ///
    /// Fails with [`GameError::BoardSpawnExhausted`] on a full board, leaving it unchanged.
    pub fn place_random_tile<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
        four_probability: f64,
    ) -> Result<(Position, u32), GameError> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return Err(GameError::BoardSpawnExhausted);
        }

        let pos = empty[rng.next_index(empty.len())];
        let value = if rng.next_f64() < four_probability { 4 } else { 2 };
        self.set_at(pos, value);
        Ok((pos, value))
    }

    /// Cell positions of one line, ordered from the edge tiles slide towards
    ///
    /// `line` is a row index for horizontal moves and a column index for
    /// vertical ones.
    pub fn line_positions(direction: Direction, line: usize) -> [Position; BOARD_SIZE] {
        let mut out = [Position::new(0, 0); BOARD_SIZE];
        let last = BOARD_SIZE - 1;
        for (k, pos) in out.iter_mut().enumerate() {
            let (row, col) = match direction {
                Direction::Left => (line, k),
                Direction::Right => (line, last - k),
                Direction::Up => (k, line),
                Direction::Down => (last - k, line),
            };
            *pos = Position::new(row as u8, col as u8);
        }
        out
    }

    /// Read one line in movement order
    pub fn read_line(&self, positions: &[Position; BOARD_SIZE]) -> [u32; BOARD_SIZE] {
        let mut out = [0; BOARD_SIZE];
        for (slot, pos) in out.iter_mut().zip(positions) {
            *slot = self.get_at(*pos).unwrap_or(0);
        }
        out
    }

    /// Write one line back in movement order
    pub fn write_line(&mut self, positions: &[Position; BOARD_SIZE], values: &[u32; BOARD_SIZE]) {
        for (pos, &v) in positions.iter().zip(values) {
            self.set_at(*pos, v);
        }
    }

    /// Non-zero values in row-major order
    pub fn tiles(&self) -> ArrayVec<u32, CELL_COUNT> {
        self.cells.iter().copied().filter(|&v| v != 0).collect()
    }

    /// Whether two tiles share a value
    pub fn has_duplicate_tile(&self) -> bool {
        let mut tiles = self.tiles();
        tiles.sort_unstable();
        tiles.windows(2).any(|w| w[0] == w[1])
    }

    /// Redistribute every tile over random cells (Fisher-Yates over the whole grid)
    ///
    /// The multiset of tile values and the number of empty cells are preserved;
    /// only positions change.
    pub fn shuffle_tiles<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let tiles = self.tiles();
        let mut cells = [0u32; CELL_COUNT];
        cells[..tiles.len()].copy_from_slice(&tiles);
        shuffle(rng, &mut cells);
        self.cells = cells;
    }

    /// Move one duplicate next to its twin so at least one merge is available.
    ///
    /// Returns false when no two tiles share a value.
    pub fn pair_up_duplicate(&mut self) -> bool {
        for i in 0..CELL_COUNT {
            let v = self.cells[i];
            if v == 0 {
                continue;
            }
            let Some(j) = (i + 1..CELL_COUNT).find(|&j| self.cells[j] == v) else {
                continue;
            };
            let col = i % BOARD_SIZE;
            let neighbour = if col + 1 < BOARD_SIZE { i + 1 } else { i - 1 };
            if neighbour != j {
                self.cells.swap(j, neighbour);
            }
            return true;
        }
        false
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [0; CELL_COUNT];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRng, SimpleRng};

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(0, 3), Some(3));
        assert_eq!(Board::index(1, 0), Some(4));
        assert_eq!(Board::index(3, 3), Some(15));
        assert_eq!(Board::index(4, 0), None);
        assert_eq!(Board::index(0, 4), None);
    }

    #[test]
    fn test_board_rows_roundtrip() {
        let rows = [[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 16, 0], [32, 0, 0, 2]];
        let board = Board::from_rows(rows);
        assert_eq!(board.to_rows(), rows);
        assert_eq!(board.cells[3], 4);
        assert_eq!(board.cells[12], 32);
    }

    #[test]
    fn test_empty_cells() {
        let mut board = Board::new();
        assert_eq!(board.empty_cells().len(), 16);

        board.set(1, 2, 2);
        let empty = board.empty_cells();
        assert_eq!(empty.len(), 15);
        assert!(!empty.contains(&Position::new(1, 2)));
    }

    #[test]
    fn test_highest_tile() {
        assert_eq!(Board::new().highest_tile(), 0);
        let board = Board::from_rows([[2, 0, 0, 0], [0, 512, 0, 0], [0, 0, 64, 0], [0, 0, 0, 4]]);
        assert_eq!(board.highest_tile(), 512);
    }

    #[test]
    fn test_well_formed() {
        assert!(Board::new().is_well_formed());
        let mut board = Board::new();
        board.set(0, 0, 3);
        assert!(!board.is_well_formed());
        board.set(0, 0, 1);
        assert!(!board.is_well_formed());
        board.set(0, 0, 1024);
        assert!(board.is_well_formed());
    }

    #[test]
    fn test_checkerboard_is_terminal() {
        let board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(board.is_terminal());
    }

    #[test]
    fn test_full_board_with_pair_is_not_terminal() {
        let horizontal = Board::from_rows([[2, 2, 8, 4], [4, 8, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!horizontal.is_terminal());

        let vertical = Board::from_rows([[2, 4, 2, 4], [2, 8, 4, 2], [8, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!vertical.is_terminal());
    }

    #[test]
    fn test_board_with_gap_is_not_terminal() {
        let board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_place_random_tile_fills_an_empty_cell() {
        let mut board = Board::new();
        let mut rng = SimpleRng::new(3);
        let (pos, value) = board.place_random_tile(&mut rng, 0.1).unwrap();
        assert!(value == 2 || value == 4);
        assert_eq!(board.get_at(pos), Some(value));
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn test_place_random_tile_value_distribution_follows_draw() {
        // First draw picks the cell, second picks the value.
        let mut board = Board::new();
        let mut rng = ScriptedRng::new(vec![0.0, 0.95]);
        let (pos, value) = board.place_random_tile(&mut rng, 0.1).unwrap();
        assert_eq!(pos, Position::new(0, 0));
        assert_eq!(value, 2);

        let mut rng = ScriptedRng::new(vec![0.0, 0.05]);
        let (pos, value) = board.place_random_tile(&mut rng, 0.1).unwrap();
        assert_eq!(pos, Position::new(0, 1));
        assert_eq!(value, 4);
    }

    #[test]
    fn test_place_random_tile_on_full_board_fails() {
        let mut board = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let before = board;
        let mut rng = SimpleRng::new(1);
        assert_eq!(
            board.place_random_tile(&mut rng, 0.1),
            Err(GameError::BoardSpawnExhausted)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_shuffle_preserves_tiles_and_gaps() {
        let mut board = Board::from_rows([[2, 4, 0, 0], [8, 0, 0, 16], [0, 0, 2, 0], [0, 64, 0, 0]]);
        let mut before = board.tiles();
        before.sort_unstable();

        let mut rng = SimpleRng::new(11);
        for _ in 0..20 {
            board.shuffle_tiles(&mut rng);
            let mut after = board.tiles();
            after.sort_unstable();
            assert_eq!(after, before);
            assert_eq!(board.empty_cells().len(), 10);
        }
    }

    #[test]
    fn test_pair_up_duplicate() {
        let mut board = Board::from_rows([[2, 4, 8, 16], [32, 64, 128, 256], [512, 1024, 2048, 4096], [8192, 16384, 32768, 2]]);
        assert!(board.is_terminal());
        assert!(board.has_duplicate_tile());
        assert!(board.pair_up_duplicate());
        assert!(!board.is_terminal());
        assert_eq!(board.get(0, 0), Some(2));
        assert_eq!(board.get(0, 1), Some(2));
        assert_eq!(board.tile_count(), 16);
    }

    #[test]
    fn test_pair_up_without_duplicate_fails() {
        let mut board = Board::from_rows([[2, 4, 8, 16], [32, 64, 128, 256], [512, 1024, 2048, 4096], [8192, 16384, 32768, 65536]]);
        assert!(!board.has_duplicate_tile());
        assert!(!board.pair_up_duplicate());
    }

    #[test]
    fn test_line_positions_start_at_leading_edge() {
        assert_eq!(Board::line_positions(Direction::Left, 1)[0], Position::new(1, 0));
        assert_eq!(Board::line_positions(Direction::Right, 1)[0], Position::new(1, 3));
        assert_eq!(Board::line_positions(Direction::Up, 2)[0], Position::new(0, 2));
        assert_eq!(Board::line_positions(Direction::Down, 2)[0], Position::new(3, 2));
        assert_eq!(Board::line_positions(Direction::Down, 2)[3], Position::new(0, 2));
    }
}
