//! Tetromino definitions and shapes
//!
//! Shapes are plain boolean matrices. Rotation is a naive clockwise matrix
//! rotation around the bounding box; there is no wall-kick table.

use ratatui::style::Color;

/// The 7 tetromino types, in type-id order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan
    T, // Blue
    L, // Orange
    J, // Yellow
    O, // Green
    S, // Purple
    Z, // Red
}

impl TetrominoType {
    /// Get all tetromino types, indexed by type id
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::T,
            TetrominoType::L,
            TetrominoType::J,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::Z,
        ]
    }

    /// Look up a type by its id (0..7)
    #[cfg(test)]
    fn from_id(id: usize) -> Option<TetrominoType> {
        Self::all().get(id).copied()
    }

    /// Type id in 0..7
    pub fn id(&self) -> usize {
        *self as usize
    }

    /// Board color index in 1..=7 (0 means an empty cell)
    pub fn color_index(&self) -> u8 {
        self.id() as u8 + 1
    }

    /// Get the display color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::T => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
            TetrominoType::J => Color::Yellow,
            TetrominoType::O => Color::Green,
            TetrominoType::S => Color::Magenta,
            TetrominoType::Z => Color::Red,
        }
    }

    /// Spawn orientation matrix
    pub fn shape(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::T => &[&[1, 1, 1], &[0, 1, 0]],
            TetrominoType::L => &[&[1, 1, 1], &[1, 0, 0]],
            TetrominoType::J => &[&[1, 1, 1], &[0, 0, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::S => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::Z => &[&[0, 1, 1], &[1, 1, 0]],
        };
        Shape {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }
}

/// A piece shape as a rectangular occupancy matrix, `rows[y][x]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from explicit rows. All rows must have the same width.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Offsets (dx, dy) of every occupied cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(dx, _)| (dx as i32, dy as i32))
        })
    }

    /// Clockwise rotation: transpose, then reverse each new row
    pub fn rotated_cw(&self) -> Shape {
        let height = self.height();
        let rows = (0..self.width())
            .map(|x| (0..height).rev().map(|y| self.rows[y][x]).collect())
            .collect();
        Shape { rows }
    }
}
