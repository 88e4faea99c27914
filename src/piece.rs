//! Active falling piece logic

use crate::board::{Board, BOARD_WIDTH};
use crate::tetromino::{Shape, TetrominoType};

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino (also decides the color)
    pub piece_type: TetrominoType,
    /// Current rotated shape
    pub shape: Shape,
    /// Top-left corner of the shape's bounding box.
    /// Row 0 is the top of the board, increases downward
    pub row: i32,
    pub col: i32,
}

/// A piece sitting in the hold slot: no position, rotation is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldPiece {
    pub piece_type: TetrominoType,
    pub shape: Shape,
}

/// Column that centers a shape of the given width
fn spawn_col(width: usize) -> i32 {
    (BOARD_WIDTH / 2) as i32 - (width / 2) as i32
}

impl Piece {
    /// Create a new piece at spawn position
    pub fn new(piece_type: TetrominoType) -> Self {
        Self::spawn(piece_type, piece_type.shape())
    }

    /// Put a held piece back in play at the spawn position
    pub fn from_held(held: HeldPiece) -> Self {
        Self::spawn(held.piece_type, held.shape)
    }

    fn spawn(piece_type: TetrominoType, shape: Shape) -> Self {
        Self {
            piece_type,
            row: 0,
            col: spawn_col(shape.width()),
            shape,
        }
    }

    /// Strip position, keeping type and current rotation
    pub fn to_held(&self) -> HeldPiece {
        HeldPiece {
            piece_type: self.piece_type,
            shape: self.shape.clone(),
        }
    }

    /// Absolute (row, col) of every occupied cell
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(|(dx, dy)| (self.row + dy, self.col + dx))
    }

    /// Try to shift by (rows, cols); reverts and returns false on collision
    pub fn try_shift(&mut self, rows: i32, cols: i32, board: &Board) -> bool {
        self.row += rows;
        self.col += cols;
        if board.collides(self) {
            self.row -= rows;
            self.col -= cols;
            false
        } else {
            true
        }
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_shift(0, -1, board)
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_shift(0, 1, board)
    }

    /// Try to move down, returns true if successful
    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_shift(1, 0, board)
    }

    /// Rotate clockwise in place. No kicks: any collision keeps the old shape
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated_cw();
        let original = std::mem::replace(&mut self.shape, rotated);
        if board.collides(self) {
            self.shape = original;
            false
        } else {
            true
        }
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> i32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }

    /// Where this piece would come to rest (the ghost piece)
    pub fn ghost(&self, board: &Board) -> Piece {
        let mut ghost = self.clone();
        ghost.hard_drop(board);
        ghost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, BOARD_HEIGHT};

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(Piece::new(TetrominoType::I).col, 3);
        assert_eq!(Piece::new(TetrominoType::O).col, 4);
        assert_eq!(Piece::new(TetrominoType::T).col, 4);
        assert_eq!(Piece::new(TetrominoType::T).row, 0);
    }

    #[test]
    fn test_block_positions() {
        let piece = Piece::new(TetrominoType::O);
        let positions: Vec<_> = piece.block_positions().collect();
        assert_eq!(positions, vec![(0, 4), (0, 5), (1, 4), (1, 5)]);
    }

    #[test]
    fn test_move_stops_at_wall() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::O);
        let mut moves = 0;
        while piece.move_left(&board) {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(piece.col, 0);
    }

    #[test]
    fn test_hard_drop_to_floor() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I);
        let distance = piece.hard_drop(&board);
        assert_eq!(distance, BOARD_HEIGHT as i32 - 1);
        assert_eq!(piece.row, BOARD_HEIGHT as i32 - 1);
    }

    #[test]
    fn test_rotation_rejected_against_floor() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I);
        piece.hard_drop(&board);
        let before = piece.clone();
        // Vertical I would poke three rows below the floor
        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotation_rejected_by_blocks() {
        let mut board = Board::new();
        let mut piece = Piece::new(TetrominoType::I);
        piece.row = 5;
        // Vertical I would cover column 3, rows 5..=8
        board.set(7, 3, Cell::Filled(TetrominoType::Z));
        assert!(!piece.rotate(&board));
        assert_eq!(piece.shape, TetrominoType::I.shape());
    }

    #[test]
    fn test_ghost_does_not_move_piece() {
        let mut board = Board::new();
        board.set(10, 4, Cell::Filled(TetrominoType::S));
        let piece = Piece::new(TetrominoType::O);
        let ghost = piece.ghost(&board);
        assert_eq!(piece.row, 0);
        assert_eq!(ghost.row, 8);
        assert_eq!(ghost.col, piece.col);
    }

    #[test]
    fn test_held_piece_keeps_rotation() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::L);
        piece.row = 4;
        assert!(piece.rotate(&board));
        let held = piece.to_held();
        let back = Piece::from_held(held);
        assert_eq!(back.shape, TetrominoType::L.shape().rotated_cw());
        assert_eq!(back.row, 0);
        assert_eq!(back.col, 4);
    }
}
