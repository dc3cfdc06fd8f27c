//! Board module - manages the Tetris playfield
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind and
//! colour of the piece that locked there. Uses a flat array for cache locality
//! and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::types::{PieceColor, TetrominoType, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// A cell filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LockedCell {
    pub kind: TetrominoType,
    pub color: PieceColor,
}

/// `None` for an empty cell
pub type CellValue = Option<LockedCell>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [CellValue; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some((y as usize) * BOARD_WIDTH + (x as usize))
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<CellValue> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: CellValue) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Cells of row `y`, `None` past the bottom
    pub fn row(&self, y: usize) -> Option<&[CellValue]> {
        if y >= BOARD_HEIGHT {
            return None;
        }
        let start = y * BOARD_WIDTH;
        Some(&self.cells[start..start + BOARD_WIDTH])
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.cells.chunks_exact(BOARD_WIDTH)
    }

    /// Test a shape matrix placed with its top-left corner at (`x`, `y`).
    ///
    /// A filled shape cell collides when it is left of column 0, right of the
    /// last column, or below the last row, or when it overlaps a filled board
    /// cell. Cells above the board (`y < 0`) never collide with the stack.
    pub fn collides(&self, shape: &[Vec<u8>], x: i32, y: i32) -> bool {
        for (dy, row) in shape.iter().enumerate() {
            for (dx, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let bx = x + dx as i32;
                let by = y + dy as i32;

                if bx < 0 || bx >= BOARD_WIDTH as i32 || by >= BOARD_HEIGHT as i32 {
                    return true;
                }
                if by >= 0 && self.is_occupied(bx, by) {
                    return true;
                }
            }
        }
        false
    }

    /// Paint the filled cells of `shape` that land inside the board.
    ///
    /// Cells above the top edge are dropped.
    pub fn paint(&mut self, shape: &[Vec<u8>], x: i32, y: i32, cell: LockedCell) {
        for (dy, row) in shape.iter().enumerate() {
            for (dx, &value) in row.iter().enumerate() {
                if value != 0 {
                    self.set(x + dx as i32, y + dy as i32, Some(cell));
                }
            }
        }
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// Remaining rows fall down; empty rows are inserted at the top so the
    /// board keeps its height. Uses a two-pointer pass with zero allocation.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, BOARD_HEIGHT> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH;
        let mut write_y = BOARD_HEIGHT;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// Compact board: 0 for empty, otherwise the piece code (1-7)
    pub fn to_codes(&self) -> [[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut out = [[0u8; BOARD_WIDTH]; BOARD_HEIGHT];
        for (y, row) in self.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                out[y][x] = cell.map_or(0, |c| c.kind.code());
            }
        }
        out
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<CellValue>>) -> Self {
        assert_eq!(cells_2d.len(), BOARD_HEIGHT);
        assert!(cells_2d.iter().all(|row| row.len() == BOARD_WIDTH));

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * BOARD_WIDTH + x] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<CellValue>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A `BOARD_HEIGHT x BOARD_WIDTH` board with every cell empty
pub fn create_empty_board() -> Board {
    Board::new()
}

/// See [`Board::collides`]
pub fn check_collision(board: &Board, shape: &[Vec<u8>], position: (i32, i32)) -> bool {
    board.collides(shape, position.0, position.1)
}
