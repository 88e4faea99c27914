//! 7-bag randomizer for piece generation
//!
//! All 7 pieces are shuffled, then dealt out before reshuffling.
//! This prevents long droughts.

use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Pieces left in the current bag, dealt from the back
    pieces: Vec<TetrominoType>,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create a bag seeded from OS randomness
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag with a fixed seed (reproducible sequence)
    pub fn with_seed(seed: u64) -> Self {
        let mut bag = Self {
            pieces: Vec::with_capacity(7),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        bag.pieces = bag.generate_bag();
        bag
    }

    /// A uniformly shuffled permutation of all 7 types (Fisher-Yates)
    pub fn generate_bag(&mut self) -> Vec<TetrominoType> {
        let mut pieces = TetrominoType::all().to_vec();
        pieces.shuffle(&mut self.rng);
        pieces
    }

    /// Deal the next piece, refilling first if the bag is empty
    pub fn next(&mut self) -> TetrominoType {
        loop {
            if let Some(piece) = self.pieces.pop() {
                return piece;
            }
            self.pieces = self.generate_bag();
        }
    }

    /// Throw away what is left and start a fresh bag
    pub fn reset(&mut self) {
        self.pieces = self.generate_bag();
    }

    /// Number of pieces left before the next refill
    #[cfg(test)]
    fn remaining(&self) -> usize {
        self.pieces.len()
    }
}
