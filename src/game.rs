//! Stateful game controller wrapping the board/detector pair.
//!
//! `Game` manages the turn, move history, and status detection, and runs
//! the commit pipeline every played move goes through. It is the primary
//! type an embedding UI interacts with.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::board::Board;
use crate::detector::CheckmateDetector;
use crate::movegen;
use crate::types::{ChessError, Color, GameStatus, PieceKind, Square};

// =========================================================================
// MoveRecord and MoveOutcome
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// Kind of the piece that moved.
    pub piece: PieceKind,
    /// Kind of the piece the move captured, if any.
    pub captured: Option<PieceKind>,
    /// What game status resulted from this move.
    pub status_after: GameStatus,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// What a committed move produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Option<PieceKind>,
    pub status: GameStatus,
}

// =========================================================================
// Game
// =========================================================================

/// A complete chess game with history and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    // Core state
    board: Board,
    detector: CheckmateDetector,
    move_history: Vec<MoveRecord>,

    // Status
    status: GameStatus,

    // Metadata
    pub id: String,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        let mut board = Board::standard();
        let detector =
            CheckmateDetector::new(&mut board).expect("the standard position has both kings");
        Self {
            board,
            detector,
            move_history: Vec::new(),
            status: GameStatus::InProgress,
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
        }
    }

    /// Create a game from a custom position.
    ///
    /// The setup must hold exactly one king per side. A constructed
    /// position may already be check or even checkmate; the initial
    /// status reflects that.
    pub fn from_board(mut board: Board) -> Result<Self, ChessError> {
        let detector = CheckmateDetector::new(&mut board)?;
        let mut game = Self {
            board,
            detector,
            move_history: Vec::new(),
            status: GameStatus::InProgress,
            id: Uuid::new_v4().to_string(),
            white_player: "Player".into(),
            black_player: "Player".into(),
            created_at: Utc::now(),
        };
        game.status = game.evaluate_position();
        Ok(game)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Completed move history.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// Text rendering of the current board.
    pub fn board_string(&self) -> String {
        self.board.board_string()
    }

    /// Legal destinations from a square: geometric moves, restricted to
    /// the allowable set, each confirmed safe by simulation. Empty for an
    /// empty square or a piece of the idle color.
    pub fn legal_destinations(&mut self, from: Square) -> Vec<Square> {
        let Some(id) = self.board.piece_at(from) else {
            return Vec::new();
        };
        if self.board.piece(id).color != self.board.side_to_move {
            return Vec::new();
        }
        let allowable = self.detector.allowable_squares(&mut self.board);
        movegen::pseudo_legal(&self.board, id)
            .into_iter()
            .filter(|to| allowable.contains(to))
            .filter(|&to| self.detector.test_move(&mut self.board, id, to))
            .collect()
    }

    // -----------------------------------------------------------------
    // Attempt move — the commit pipeline
    // -----------------------------------------------------------------

    /// Play a move for the side to move.
    ///
    /// Pipeline: turn and origin guards, geometric legality, the
    /// allowable-squares restriction while in check, the simulation
    /// safety check, then commit, map re-derivation, and status
    /// re-evaluation.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }
        let turn = self.board.side_to_move;
        let Some(id) = self.board.piece_at(from) else {
            return Err(illegal(from, to, "no piece on the origin square"));
        };
        let piece = self.board.piece(id);
        let (color, kind) = (piece.color, piece.kind);
        if color != turn {
            return Err(illegal(from, to, format!("it is {turn}'s turn")));
        }

        if !movegen::pseudo_legal(&self.board, id).contains(&to) {
            return Err(illegal(from, to, "not a legal destination for this piece"));
        }
        if !self
            .detector
            .allowable_squares(&mut self.board)
            .contains(&to)
        {
            return Err(illegal(from, to, "the move does not address the check"));
        }
        if !self.detector.test_move(&mut self.board, id, to) {
            return Err(illegal(from, to, "the king would be left in check"));
        }

        // Commit. The destination was validated above, so the relocation
        // cannot be refused.
        let undo = self.board.relocate(id, to).expect("validated destination");
        let captured = undo.captured().map(|cid| self.board.piece(cid).kind);
        self.detector.update(&mut self.board);

        let status = self.resolve_after_move(turn);
        self.status = status;
        if let Some(color) = status.checkmated() {
            info!(game_id = self.id, "{color} checkmated by {from}{to}");
        } else {
            debug!(game_id = self.id, "{turn} played {from}{to} ({status})");
        }

        self.move_history.push(MoveRecord {
            from,
            to,
            piece: kind,
            captured,
            status_after: status,
        });

        Ok(MoveOutcome { captured, status })
    }

    /// Play a move given algebraic square names ("e2", "e4").
    pub fn attempt_move_named(&mut self, from: &str, to: &str) -> Result<MoveOutcome, ChessError> {
        let from =
            Square::from_algebraic(from).ok_or_else(|| ChessError::InvalidSquare(from.into()))?;
        let to = Square::from_algebraic(to).ok_or_else(|| ChessError::InvalidSquare(to.into()))?;
        self.attempt_move(from, to)
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    /// Post-commit evaluation. Checkmate ends the game with the turn left
    /// on the mover; otherwise the turn passes, and a bare check on the
    /// new side to move is reported.
    fn resolve_after_move(&mut self, mover: Color) -> GameStatus {
        if self.detector.checkmated(&mut self.board, Color::Black) {
            return GameStatus::Checkmate(Color::Black);
        }
        if self.detector.checkmated(&mut self.board, Color::White) {
            return GameStatus::Checkmate(Color::White);
        }
        self.board.side_to_move = !mover;
        if self.detector.in_check(&self.board, !mover) {
            GameStatus::Check(!mover)
        } else {
            GameStatus::InProgress
        }
    }

    /// Evaluate a position as it stands, without passing the turn. Used
    /// for custom setups.
    fn evaluate_position(&mut self) -> GameStatus {
        if self.detector.checkmated(&mut self.board, Color::Black) {
            return GameStatus::Checkmate(Color::Black);
        }
        if self.detector.checkmated(&mut self.board, Color::White) {
            return GameStatus::Checkmate(Color::White);
        }
        for color in [Color::White, Color::Black] {
            if self.detector.in_check(&self.board, color) {
                return GameStatus::Check(color);
            }
        }
        GameStatus::InProgress
    }

    // -----------------------------------------------------------------
    // Board array (for state views)
    // -----------------------------------------------------------------

    /// Generate an 8×8 board array (row-major, rank 8 first → rank 1
    /// last). Empty squares are empty strings. Pieces are like "wP",
    /// "bK", etc.
    pub fn board_array(&self) -> [[String; 8]; 8] {
        let mut cells: [[String; 8]; 8] =
            std::array::from_fn(|_| std::array::from_fn(|_| String::new()));
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, 7 - rank);
                if let Some(piece) = self.board.occupant(sq) {
                    let c = match piece.color {
                        Color::White => 'w',
                        Color::Black => 'b',
                    };
                    let p = match piece.kind {
                        PieceKind::Pawn => 'P',
                        PieceKind::Knight => 'N',
                        PieceKind::Bishop => 'B',
                        PieceKind::Rook => 'R',
                        PieceKind::Queen => 'Q',
                        PieceKind::King => 'K',
                    };
                    cells[rank as usize][file as usize] = format!("{c}{p}");
                }
            }
        }
        cells
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn illegal(from: Square, to: Square, reason: impl Into<String>) -> ChessError {
    ChessError::IllegalMove {
        from,
        to,
        reason: reason.into(),
    }
}

// =========================================================================
// Tests
// =========================================================================
