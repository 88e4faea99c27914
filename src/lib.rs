//! BLOCKDROP - a falling-block puzzle engine with a terminal front end
//!
//! The engine (`game`, `board`, `piece`, `bag`, `score`, `tetromino`) knows
//! nothing about terminals. `input`, `effects`, `settings` and `ui` adapt it
//! to crossterm and ratatui.

pub mod bag;
pub mod board;
pub mod effects;
pub mod game;
pub mod input;
pub mod piece;
pub mod score;
pub mod settings;
pub mod tetromino;
pub mod ui;
