//! Geometric move generation.
//!
//! Pipeline:
//!   1. Generate a piece's geometric destinations here, ignoring check.
//!   2. The detector simulates each candidate and rejects any that leave
//!      the mover's own king attacked.
//!
//! Generation is pure over the board; nothing here mutates or allocates
//! beyond the returned list.

use crate::board::{Board, Piece, PieceId};
use crate::types::{Color, PieceKind, Square};

// =========================================================================
// Public API
// =========================================================================

/// Geometric destinations for one piece, ignorant of check.
///
/// A captured piece generates nothing. Own-color destinations never
/// appear; enemy-occupied destinations are captures.
pub fn pseudo_legal(board: &Board, id: PieceId) -> Vec<Square> {
    let piece = board.piece(id);
    let Some(from) = piece.square else {
        return Vec::new();
    };
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece, from),
        PieceKind::Knight => leaper_moves(board, piece.color, from, &KNIGHT_OFFSETS),
        PieceKind::Bishop => diagonal_reach(board, piece.color, from),
        PieceKind::Rook => orthogonal_reach(board, piece.color, from),
        PieceKind::Queen => {
            // A queen is exactly the union of the two sliding scans.
            let mut moves = orthogonal_reach(board, piece.color, from);
            moves.extend(diagonal_reach(board, piece.color, from));
            moves
        }
        PieceKind::King => leaper_moves(board, piece.color, from, &KING_OFFSETS),
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn pawn_moves(board: &Board, piece: &Piece, from: Square) -> Vec<Square> {
    let mut moves = Vec::new();
    let dir = piece.color.forward();

    // --- Single step ---
    if let Some(to) = from.offset(0, dir)
        && board.occupant(to).is_none()
    {
        moves.push(to);
    }

    // --- Double step ---
    // Gated on the destination square alone; the square passed over is
    // not examined.
    if !piece.moved
        && let Some(to) = from.offset(0, 2 * dir)
        && board.occupant(to).is_none()
    {
        moves.push(to);
    }

    // --- Diagonal captures ---
    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dir)
            && let Some(target) = board.occupant(to)
            && target.color != piece.color
        {
            moves.push(to);
        }
    }

    moves
}

// =========================================================================
// Sliding scans
// =========================================================================

/// Orthogonal spans for rooks and queens.
///
/// Each half-line is scanned from the board edge toward the piece; every
/// occupied square overwrites the boundary, so the nearest blocker wins.
/// An enemy boundary stays inside the span (capturable), an own boundary
/// is moved one square inside (excluded). The two closed intervals are
/// then emitted minus the piece's own square.
fn orthogonal_reach(board: &Board, color: Color, from: Square) -> Vec<Square> {
    let (file, rank) = (from.file(), from.rank());

    let mut lo_rank = 0;
    for r in 0..rank {
        if let Some(p) = board.occupant(Square::from_file_rank(file, r)) {
            lo_rank = if p.color != color { r } else { r + 1 };
        }
    }
    let mut hi_rank = 7;
    for r in (rank + 1..8).rev() {
        if let Some(p) = board.occupant(Square::from_file_rank(file, r)) {
            hi_rank = if p.color != color { r } else { r - 1 };
        }
    }
    let mut lo_file = 0;
    for f in 0..file {
        if let Some(p) = board.occupant(Square::from_file_rank(f, rank)) {
            lo_file = if p.color != color { f } else { f + 1 };
        }
    }
    let mut hi_file = 7;
    for f in (file + 1..8).rev() {
        if let Some(p) = board.occupant(Square::from_file_rank(f, rank)) {
            hi_file = if p.color != color { f } else { f - 1 };
        }
    }

    let mut moves = Vec::new();
    for r in lo_rank..=hi_rank {
        if r != rank {
            moves.push(Square::from_file_rank(file, r));
        }
    }
    for f in lo_file..=hi_file {
        if f != file {
            moves.push(Square::from_file_rank(f, rank));
        }
    }
    moves
}

const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, 1), (1, 1), (1, -1), (-1, -1)];

/// Diagonal walks for bishops and queens: step outward, keep empty
/// squares, stop one short of an own blocker, stop on an enemy blocker
/// with its square included.
fn diagonal_reach(board: &Board, color: Color, from: Square) -> Vec<Square> {
    let mut moves = Vec::new();
    for (df, dr) in DIAGONAL_DIRS {
        let mut cur = from;
        while let Some(next) = cur.offset(df, dr) {
            match board.occupant(next) {
                Some(p) if p.color == color => break,
                Some(_) => {
                    moves.push(next);
                    break;
                }
                None => {
                    moves.push(next);
                    cur = next;
                }
            }
        }
    }
    moves
}

// =========================================================================
// Leapers
// =========================================================================

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Fixed-offset destinations for knights and kings. Off-board candidates
/// are discarded; own-color occupants are excluded.
fn leaper_moves(board: &Board, color: Color, from: Square, offsets: &[(i8, i8)]) -> Vec<Square> {
    let mut moves = Vec::new();
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            match board.occupant(to) {
                Some(p) if p.color == color => {}
                _ => moves.push(to),
            }
        }
    }
    moves
}

// ===========================================================================
// Tests
// ===========================================================================
