//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::TetrominoType;

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a piece type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Numeric cell value: 0 for empty, the piece color index (1..=7) otherwise
    pub fn value(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(piece_type) => piece_type.color_index(),
        }
    }
}

/// Rows removed by a single line clear, reported bottom to top
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    pub rows: Vec<usize>,
}

impl LineClear {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|cells| cells.get(col as usize))
            .copied()
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        match self
            .cells
            .get_mut(row as usize)
            .and_then(|cells| cells.get_mut(col as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[[Cell; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.cells
    }

    /// Whether a piece overlaps a wall, the floor or a filled cell.
    /// Cells above the top row only count against the side walls.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.block_positions().any(|(row, col)| {
            if col < 0 || col >= BOARD_WIDTH as i32 || row >= BOARD_HEIGHT as i32 {
                return true;
            }
            row >= 0 && self.cells[row as usize][col as usize].is_filled()
        })
    }

    /// Write a piece into the board and return the (row, col) cells it filled.
    /// Parts above the top row are dropped.
    pub fn merge(&mut self, piece: &Piece) -> Vec<(usize, usize)> {
        let mut landed = Vec::with_capacity(4);
        for (row, col) in piece.block_positions() {
            if row >= 0 && self.set(row, col, Cell::Filled(piece.piece_type)) {
                landed.push((row as usize, col as usize));
            }
        }
        landed
    }

    /// Remove every full row in one pass and drop the rest down
    pub fn clear_full_lines(&mut self) -> LineClear {
        let rows: Vec<usize> = (0..BOARD_HEIGHT)
            .rev()
            .filter(|&row| self.is_line_full(row))
            .collect();
        if rows.is_empty() {
            return LineClear::default();
        }

        let mut write_row = BOARD_HEIGHT;
        for read_row in (0..BOARD_HEIGHT).rev() {
            if !rows.contains(&read_row) {
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
            }
        }

        // Fill the top with empty rows
        for row in &mut self.cells[..write_row] {
            *row = [Cell::Empty; BOARD_WIDTH];
        }

        LineClear { rows }
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
