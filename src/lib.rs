pub mod board;
pub mod engine;
pub mod error;
pub mod handicap;
pub mod player;
pub mod scoring;
pub mod stone;

/// Board coordinate as `(col, row)`, 0-based.
pub type Point = (u8, u8);

pub use board::{Board, Group};
pub use engine::{Captures, DEFAULT_KOMI, Game, GameState, LastMove, Stage};
pub use error::GoError;
pub use player::HeuristicPlayer;
pub use scoring::{PlayerPoints, ScoreSheet};
pub use stone::Stone;
