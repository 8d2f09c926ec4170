//! Chess rules engine with attack-map check detection and
//! simulation-based checkmate analysis.

pub mod board;
pub mod config;
pub mod detector;
pub mod game;
pub mod movegen;
pub mod snapshot;
pub mod types;

pub use board::{Board, Piece, PieceId, UndoState};
pub use detector::CheckmateDetector;
pub use game::{Game, MoveOutcome, MoveRecord};
pub use movegen::pseudo_legal;
pub use snapshot::GameSnapshot;
pub use types::*;
