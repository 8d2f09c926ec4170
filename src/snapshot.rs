//! Serializable state views for rendering layers.
//!
//! The engine types themselves stay serde-free; everything a UI needs is
//! captured here into plain strings and arrays.

use serde::Serialize;

use crate::game::Game;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Full game state as a rendering layer sees it.
///
/// The board grid is rank 8 first (row 0) down to rank 1 (row 7), with
/// `""` for empty squares and two-letter codes ("wP", "bK") for pieces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub players: Players,
    pub created_at: String,
    pub board: [[String; 8]; 8],
    pub turn: String,
    pub status: String,
    /// The mated color once the game is over, otherwise `null`.
    pub checkmated: Option<String>,
    /// Completed moves as coordinate pairs ("e2e4").
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Players {
    pub white: String,
    pub black: String,
}

impl GameSnapshot {
    /// Capture the current state of a game.
    pub fn capture(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            players: Players {
                white: game.white_player.clone(),
                black: game.black_player.clone(),
            },
            created_at: game.created_at.to_rfc3339(),
            board: game.board_array(),
            turn: game.side_to_move().to_string(),
            status: game.status().as_str().to_string(),
            checkmated: game.status().checkmated().map(|c| c.to_string()),
            moves: game.move_history().iter().map(|m| m.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
