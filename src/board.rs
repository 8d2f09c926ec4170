//! Mailbox board: a square-indexed grid of piece ids over a piece arena,
//! with one roster of live pieces per color.
//!
//! Every move, committed or hypothetical, goes through the single
//! relocation primitive, which is exactly reversible via [`UndoState`].

use std::fmt;

use crate::types::{Color, PieceKind, Square};

// ---------------------------------------------------------------------------
// PieceId and Piece
// ---------------------------------------------------------------------------

/// Index into the board's piece arena. Ids are stable for the lifetime of
/// the board; a captured piece keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(u8);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece and its board back-reference.
///
/// `square` is `None` once the piece is captured; a committed move never
/// places a captured piece back on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub square: Option<Square>,
    /// Set on the first relocation. Only pawn generation consults it.
    pub moved: bool,
}

// ---------------------------------------------------------------------------
// UndoState — saved state for reversing a relocation
// ---------------------------------------------------------------------------

/// State saved by [`Board::relocate`] so [`Board::undo_relocate`] can
/// restore the board bit-for-bit, roster ordering and moved flag included.
#[derive(Debug, Clone)]
pub struct UndoState {
    from: Square,
    moved_before: bool,
    captured: Option<CapturedPiece>,
}

#[derive(Debug, Clone)]
struct CapturedPiece {
    id: PieceId,
    roster_index: usize,
}

impl UndoState {
    /// The piece removed by this relocation, if it was a capture.
    #[inline]
    pub fn captured(&self) -> Option<PieceId> {
        self.captured.as_ref().map(|c| c.id)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The playing surface: grid, piece arena, and per-color rosters.
///
/// Invariant: `grid[sq] == Some(id)` iff `pieces[id].square == Some(sq)`,
/// and each color's roster lists exactly its on-board pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// `grid[sq.index()]` is the occupant of `sq`, if any.
    grid: [Option<PieceId>; Square::NUM],
    /// Every piece ever placed; captured entries stay behind, unsquared.
    pieces: Vec<Piece>,
    /// Live piece ids, `rosters[color.index()]`, in placement order.
    rosters: [Vec<PieceId>; 2],
    /// Whose turn it is.
    pub side_to_move: Color,
}

impl Board {
    /// An empty board, White to move.
    pub fn empty() -> Board {
        Board {
            grid: [None; Square::NUM],
            pieces: Vec::new(),
            rosters: [Vec::new(), Vec::new()],
            side_to_move: Color::White,
        }
    }

    /// The standard starting position, White to move.
    pub fn standard() -> Board {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Board::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            board.place(Color::White, kind, Square::from_file_rank(file as u8, 0));
            board.place(Color::Black, kind, Square::from_file_rank(file as u8, 7));
        }
        for file in 0..8 {
            board.place(Color::White, PieceKind::Pawn, Square::from_file_rank(file, 1));
            board.place(Color::Black, PieceKind::Pawn, Square::from_file_rank(file, 6));
        }
        board
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Place a new piece on an empty square and return its id.
    ///
    /// Panics if the square is occupied; custom positions are built on an
    /// empty board, square by square.
    pub fn place(&mut self, color: Color, kind: PieceKind, sq: Square) -> PieceId {
        assert!(
            self.grid[sq.index()].is_none(),
            "square {sq} is already occupied",
        );
        debug_assert!(self.pieces.len() < u8::MAX as usize);
        let id = PieceId(self.pieces.len() as u8);
        self.pieces.push(Piece {
            color,
            kind,
            square: Some(sq),
            moved: false,
        });
        self.grid[sq.index()] = Some(id);
        self.rosters[color.index()].push(id);
        id
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Occupant id of a square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.grid[sq.index()]
    }

    /// Occupant of a square, if any.
    #[inline]
    pub fn occupant(&self, sq: Square) -> Option<&Piece> {
        self.piece_at(sq).map(|id| self.piece(id))
    }

    /// Live piece ids for a color, in placement order.
    #[inline]
    pub fn roster(&self, color: Color) -> &[PieceId] {
        &self.rosters[color.index()]
    }

    /// The color's king, if one is on the board.
    pub fn king(&self, color: Color) -> Option<PieceId> {
        self.roster(color)
            .iter()
            .copied()
            .find(|&id| self.piece(id).kind == PieceKind::King)
    }

    /// Retain only roster entries whose piece is still on a square.
    pub fn prune_captured(&mut self, color: Color) {
        let pieces = &self.pieces;
        self.rosters[color.index()].retain(|id| pieces[id.index()].square.is_some());
    }

    // -----------------------------------------------------------------------
    // Relocation — the single mutation primitive
    // -----------------------------------------------------------------------

    /// Move a piece to `to`, capturing any enemy occupant.
    ///
    /// Refuses with `None`, mutating nothing, when `to` holds a piece of
    /// the mover's own color or the mover is no longer on the board.
    /// Otherwise returns the state needed to revert the relocation exactly.
    pub fn relocate(&mut self, id: PieceId, to: Square) -> Option<UndoState> {
        let mover = &self.pieces[id.index()];
        let from = mover.square?;
        let color = mover.color;
        let moved_before = mover.moved;
        if let Some(occ) = self.piece_at(to) {
            if self.pieces[occ.index()].color == color {
                return None;
            }
        }

        // Capture: unlink the victim from grid and roster, remembering its
        // roster index so a revert reinserts it in place.
        let captured = self.piece_at(to).map(|victim| {
            let enemy = (!color).index();
            let roster_index = self.rosters[enemy]
                .iter()
                .position(|&r| r == victim)
                .expect("captured piece missing from its roster");
            self.rosters[enemy].remove(roster_index);
            self.pieces[victim.index()].square = None;
            CapturedPiece {
                id: victim,
                roster_index,
            }
        });

        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);
        let mover = &mut self.pieces[id.index()];
        mover.square = Some(to);
        mover.moved = true;

        Some(UndoState {
            from,
            moved_before,
            captured,
        })
    }

    /// Reverse a relocation previously applied with [`Board::relocate`].
    ///
    /// A relocate/undo pair leaves the board identical to its prior state,
    /// the moved flag and roster ordering included.
    pub fn undo_relocate(&mut self, id: PieceId, undo: UndoState) {
        let to = self.pieces[id.index()]
            .square
            .expect("relocated piece is on the board");
        self.grid[to.index()] = None;
        self.grid[undo.from.index()] = Some(id);
        let mover = &mut self.pieces[id.index()];
        mover.square = Some(undo.from);
        mover.moved = undo.moved_before;

        if let Some(cap) = undo.captured {
            self.grid[to.index()] = Some(cap.id);
            let color = self.pieces[cap.id.index()].color;
            self.pieces[cap.id.index()].square = Some(to);
            self.rosters[color.index()].insert(cap.roster_index, cap.id);
        }
    }

    // -----------------------------------------------------------------------
    // Consistency check (debug builds)
    // -----------------------------------------------------------------------

    /// Verify that grid, arena back-references, and rosters agree.
    /// Available in debug builds and test builds.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        for sq in Square::all() {
            if let Some(id) = self.grid[sq.index()] {
                assert_eq!(
                    self.pieces[id.index()].square,
                    Some(sq),
                    "back-reference mismatch at {sq}",
                );
            }
        }
        for (i, piece) in self.pieces.iter().enumerate() {
            let id = PieceId(i as u8);
            let roster = &self.rosters[piece.color.index()];
            match piece.square {
                Some(sq) => {
                    assert_eq!(self.grid[sq.index()], Some(id), "grid mismatch at {sq}");
                    assert!(roster.contains(&id), "live piece missing from its roster");
                }
                None => assert!(!roster.contains(&id), "captured piece still on a roster"),
            }
        }
        for color in [Color::White, Color::Black] {
            let mut seen = std::collections::HashSet::new();
            for &id in self.roster(color) {
                assert!(seen.insert(id), "duplicate roster entry");
                assert_eq!(
                    self.pieces[id.index()].color,
                    color,
                    "roster color mismatch",
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for
    /// debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8 {
                let sq = Square::from_file_rank(file, rank);
                let ch = match self.occupant(sq) {
                    Some(piece) => piece.kind.to_char(piece.color),
                    None => '.',
                };
                s.push(ch);
                if file < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
