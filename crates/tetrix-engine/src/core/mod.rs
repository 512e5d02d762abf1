//! Core data structures: piece geometry, the active piece and the board grid.
//!
//! - [`Shape`] - Tetromino kinds and their offset table
//! - [`ActivePiece`] - A shape in a given orientation
//! - [`Board`] - The grid of placed blocks and its line-clear protocol

pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;
