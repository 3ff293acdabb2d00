pub mod board;
pub mod types;

pub use board::{Board, BoardError};
pub use types::{PlayerId, Position};
