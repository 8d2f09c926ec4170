//! Check and checkmate analysis.
//!
//! The detector keeps one attack map per color: for every square, the
//! list of that color's non-king pieces whose geometric moves reach it.
//! Maps are fully recomputed by [`CheckmateDetector::update`] after every
//! board mutation, never patched incrementally.
//!
//! Checkmate is decided by hypothetical play on the real board:
//! [`CheckmateDetector::test_move`] relocates, re-derives the maps,
//! records whether the mover's own king is attacked, and reverts exactly.
//! The three escape analyses (evade, capture the checker, interpose)
//! each return an explicit square set; callers union them.

use crate::board::{Board, PieceId};
use crate::movegen;
use crate::types::{ChessError, Color, PieceKind, Square};

// ---------------------------------------------------------------------------
// AttackMap
// ---------------------------------------------------------------------------

/// Per-square lists of one color's pieces that can move there.
///
/// These are move maps: a pawn's forward pushes participate (a push can
/// interpose against a check), and since a push requires an empty
/// destination a pawn never "attacks" an occupied square head-on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttackMap {
    entries: [Vec<PieceId>; Square::NUM],
}

impl AttackMap {
    fn new() -> AttackMap {
        AttackMap {
            entries: std::array::from_fn(|_| Vec::new()),
        }
    }

    fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.clear();
        }
    }

    #[inline]
    fn add(&mut self, sq: Square, id: PieceId) {
        self.entries[sq.index()].push(id);
    }

    #[inline]
    fn at(&self, sq: Square) -> &[PieceId] {
        &self.entries[sq.index()]
    }
}

// ---------------------------------------------------------------------------
// CheckmateDetector
// ---------------------------------------------------------------------------

/// Attack-map bookkeeping and mate analysis.
///
/// The detector holds no board reference; every operation takes the board
/// explicitly, and the pair travels together through the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckmateDetector {
    attacks: [AttackMap; 2],
    kings: [PieceId; 2],
}

impl CheckmateDetector {
    /// Build a detector over a board and derive the initial maps.
    ///
    /// Each side must have exactly one king.
    pub fn new(board: &mut Board) -> Result<CheckmateDetector, ChessError> {
        let kings = [
            locate_king(board, Color::White)?,
            locate_king(board, Color::Black)?,
        ];
        let mut detector = CheckmateDetector {
            attacks: [AttackMap::new(), AttackMap::new()],
            kings,
        };
        detector.update(board);
        Ok(detector)
    }

    // -----------------------------------------------------------------------
    // Map derivation
    // -----------------------------------------------------------------------

    /// Recompute both attack maps from scratch.
    ///
    /// Captured pieces are pruned from their rosters first; kings are left
    /// out of the maps entirely.
    pub fn update(&mut self, board: &mut Board) {
        for map in &mut self.attacks {
            map.clear();
        }
        for color in [Color::White, Color::Black] {
            board.prune_captured(color);
            let roster: Vec<PieceId> = board.roster(color).to_vec();
            for id in roster {
                if board.piece(id).kind == PieceKind::King {
                    continue;
                }
                for to in movegen::pseudo_legal(board, id) {
                    self.attacks[color.index()].add(to, id);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Check queries
    // -----------------------------------------------------------------------

    /// The cached king id for a color.
    #[inline]
    pub fn king(&self, color: Color) -> PieceId {
        self.kings[color.index()]
    }

    /// Pieces of `by` whose geometric moves reach `sq`, in roster order.
    #[inline]
    pub fn attackers_of(&self, sq: Square, by: Color) -> &[PieceId] {
        self.attacks[by.index()].at(sq)
    }

    /// Is the color's king attacked in the current maps?
    ///
    /// Reads the maps as they stand; callers re-derive after mutations.
    pub fn in_check(&self, board: &Board, color: Color) -> bool {
        match self.king_square(board, color) {
            Some(sq) => !self.attackers_of(sq, !color).is_empty(),
            // The king leaves the board only transiently, inside a
            // simulation by the other side.
            None => false,
        }
    }

    fn king_square(&self, board: &Board, color: Color) -> Option<Square> {
        board.piece(self.king(color)).square
    }

    // -----------------------------------------------------------------------
    // Hypothetical-move oracle
    // -----------------------------------------------------------------------

    /// Simulate relocating `id` to `to`; true when the mover's own king is
    /// left unattacked.
    ///
    /// Sequence: relocate, re-derive the maps, record the verdict, revert,
    /// re-derive again. Whatever the verdict, board and maps are identical
    /// to entry on return. A relocation the board refuses verdicts false.
    pub fn test_move(&mut self, board: &mut Board, id: PieceId, to: Square) -> bool {
        let mover = board.piece(id).color;
        let Some(undo) = board.relocate(id, to) else {
            return false;
        };
        self.update(board);
        let safe = !self.in_check(board, mover);
        board.undo_relocate(id, undo);
        self.update(board);
        safe
    }

    // -----------------------------------------------------------------------
    // Escape analysis — explicit square sets
    // -----------------------------------------------------------------------

    /// King destinations the simulation confirms safe. Includes the king
    /// capturing an undefended adjacent checker.
    pub fn evasion_squares(&mut self, board: &mut Board, color: Color) -> Vec<Square> {
        let king = self.king(color);
        let mut out = Vec::new();
        for to in movegen::pseudo_legal(board, king) {
            if self.test_move(board, king, to) {
                out.push(to);
            }
        }
        out
    }

    /// The checker's square, when it can be captured by the king or by a
    /// mapped defender without exposing the own king.
    ///
    /// Empty unless there is exactly one threat: no single capture lifts a
    /// double check.
    pub fn capture_squares(
        &mut self,
        board: &mut Board,
        color: Color,
        threats: &[PieceId],
    ) -> Vec<Square> {
        let &[threat] = threats else {
            return Vec::new();
        };
        let Some(target) = board.piece(threat).square else {
            return Vec::new();
        };

        let king = self.king(color);
        if movegen::pseudo_legal(board, king).contains(&target)
            && self.test_move(board, king, target)
        {
            return vec![target];
        }
        let defenders = self.attackers_of(target, color).to_vec();
        if defenders
            .into_iter()
            .any(|d| self.test_move(board, d, target))
        {
            return vec![target];
        }
        Vec::new()
    }

    /// Squares where interposition lifts the check: every square strictly
    /// between a sliding checker and the king that a mapped defender can
    /// safely reach.
    ///
    /// Empty unless there is exactly one threat; knight and pawn checks
    /// have nothing standing between and are unblockable.
    pub fn block_squares(
        &mut self,
        board: &mut Board,
        color: Color,
        threats: &[PieceId],
    ) -> Vec<Square> {
        let &[threat] = threats else {
            return Vec::new();
        };
        if !board.piece(threat).kind.is_sliding() {
            return Vec::new();
        }
        let Some(attacker_sq) = board.piece(threat).square else {
            return Vec::new();
        };
        let Some(king_sq) = self.king_square(board, color) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for between in between_line(attacker_sq, king_sq) {
            let defenders = self.attackers_of(between, color).to_vec();
            if defenders
                .into_iter()
                .any(|d| self.test_move(board, d, between))
            {
                out.push(between);
            }
        }
        out
    }

    /// Union of the three escape sets for a checked color, deduplicated.
    fn escape_squares(&mut self, board: &mut Board, color: Color) -> Vec<Square> {
        let threats = match self.king_square(board, color) {
            Some(sq) => self.attackers_of(sq, !color).to_vec(),
            None => Vec::new(),
        };
        let mut out = self.evasion_squares(board, color);
        for sq in self
            .capture_squares(board, color, &threats)
            .into_iter()
            .chain(self.block_squares(board, color, &threats))
        {
            if !out.contains(&sq) {
                out.push(sq);
            }
        }
        out
    }

    // -----------------------------------------------------------------------
    // Verdicts
    // -----------------------------------------------------------------------

    /// Has the color been checkmated? In check, with no safe evasion, no
    /// capture of the checker, and no interposition.
    pub fn checkmated(&mut self, board: &mut Board, color: Color) -> bool {
        self.update(board);
        if !self.in_check(board, color) {
            return false;
        }
        self.escape_squares(board, color).is_empty()
    }

    /// Destinations that address the current check, for the currently
    /// checked color; all 64 squares when neither king is attacked.
    pub fn allowable_squares(&mut self, board: &mut Board) -> Vec<Square> {
        self.update(board);
        let checked = [Color::White, Color::Black]
            .into_iter()
            .find(|&c| self.in_check(board, c));
        match checked {
            Some(color) => self.escape_squares(board, color),
            None => Square::all().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Free helpers
// ---------------------------------------------------------------------------

fn locate_king(board: &Board, color: Color) -> Result<PieceId, ChessError> {
    let mut kings = board
        .roster(color)
        .iter()
        .copied()
        .filter(|&id| board.piece(id).kind == PieceKind::King);
    let king = kings
        .next()
        .ok_or_else(|| ChessError::InvalidSetup(format!("{color} has no king")))?;
    if kings.next().is_some() {
        return Err(ChessError::InvalidSetup(format!(
            "{color} has more than one king"
        )));
    }
    Ok(king)
}

/// Squares strictly between two squares sharing a file, rank, or
/// diagonal; empty when they share none (or are adjacent).
fn between_line(a: Square, b: Square) -> Vec<Square> {
    let file_span = b.file() as i8 - a.file() as i8;
    let rank_span = b.rank() as i8 - a.rank() as i8;
    let orthogonal = (file_span == 0) != (rank_span == 0);
    let diagonal = file_span != 0 && file_span.abs() == rank_span.abs();
    if !orthogonal && !diagonal {
        return Vec::new();
    }

    let (df, dr) = (file_span.signum(), rank_span.signum());
    let mut out = Vec::new();
    let mut cur = a;
    while let Some(next) = cur.offset(df, dr) {
        if next == b {
            break;
        }
        out.push(next);
        cur = next;
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================
