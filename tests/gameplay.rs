//! Full-game scenario suite driven through the public `Game` API.
//!
//! Each scenario exercises the whole pipeline at once: geometric move
//! generation, attack-map refresh, the allowable-squares restriction, the
//! simulation safety check, and status detection. A wrong verdict at any
//! stage surfaces as a wrong final status here.

use chessmate::board::Board;
use chessmate::game::Game;
use chessmate::types::{ChessError, Color, GameStatus, PieceKind, Square};

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).expect("valid square name")
}

fn play(game: &mut Game, from: &str, to: &str) {
    game.attempt_move(sq(from), sq(to)).expect("legal move");
}

fn custom(to_move: Color, pieces: &[(Color, PieceKind, &str)]) -> Game {
    let mut board = Board::empty();
    for &(color, kind, square) in pieces {
        board.place(color, kind, sq(square));
    }
    board.side_to_move = to_move;
    Game::from_board(board).expect("valid setup")
}

/// Grid and rosters must describe the same set of pieces.
fn assert_in_sync(board: &Board) {
    let mut on_grid = 0;
    for square in Square::all() {
        if let Some(id) = board.piece_at(square) {
            assert_eq!(board.piece(id).square, Some(square));
            on_grid += 1;
        }
    }
    let rostered: usize = [Color::White, Color::Black]
        .iter()
        .map(|&c| board.roster(c).len())
        .sum();
    assert_eq!(on_grid, rostered);

    for color in [Color::White, Color::Black] {
        for &id in board.roster(color) {
            let piece = board.piece(id);
            assert_eq!(piece.color, color);
            let square = piece.square.expect("rostered piece is on the board");
            assert_eq!(board.piece_at(square), Some(id));
        }
    }
}

// =====================================================================
// Full games
// =====================================================================

#[test]
fn fools_mate_move_by_move() {
    let mut game = Game::new();

    play(&mut game, "f2", "f3");
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, "e7", "e5");
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, "g2", "g4");
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, "d8", "h4");
    assert_eq!(game.status(), GameStatus::Checkmate(Color::White));
    assert!(game.is_game_over());

    let statuses: Vec<GameStatus> = game
        .move_history()
        .iter()
        .map(|rec| rec.status_after)
        .collect();
    assert_eq!(
        statuses,
        vec![
            GameStatus::InProgress,
            GameStatus::InProgress,
            GameStatus::InProgress,
            GameStatus::Checkmate(Color::White),
        ]
    );
}

#[test]
fn scholars_mate_move_by_move() {
    let mut game = Game::new();

    play(&mut game, "e2", "e4");
    play(&mut game, "e7", "e5");
    play(&mut game, "f1", "c4");
    play(&mut game, "b8", "c6");
    play(&mut game, "d1", "h5");
    // The f7 pawn still shields the king along the h5 diagonal.
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, "g8", "f6");

    let outcome = game.attempt_move(sq("h5"), sq("f7")).expect("mating move");
    assert_eq!(outcome.captured, Some(PieceKind::Pawn));
    assert_eq!(outcome.status, GameStatus::Checkmate(Color::Black));
}

#[test]
fn finished_game_refuses_further_play() {
    let mut game = Game::new();
    play(&mut game, "f2", "f3");
    play(&mut game, "e7", "e5");
    play(&mut game, "g2", "g4");
    play(&mut game, "d8", "h4");

    let err = game.attempt_move(sq("e2"), sq("e3")).unwrap_err();
    assert!(matches!(err, ChessError::GameOver(_)));
    assert_eq!(game.move_history().len(), 4);
}

#[test]
fn queen_sacrifice_line_resolves_checks() {
    let mut game = Game::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "f7", "f5");
    play(&mut game, "d1", "h5");
    assert_eq!(game.status(), GameStatus::Check(Color::Black));
    play(&mut game, "g7", "g6");
    assert_eq!(game.status(), GameStatus::InProgress);

    // Taking the interposer renews the check; taking the queen lifts it.
    let outcome = game.attempt_move(sq("h5"), sq("g6")).expect("legal move");
    assert_eq!(outcome.captured, Some(PieceKind::Pawn));
    assert_eq!(outcome.status, GameStatus::Check(Color::Black));
    assert_eq!(game.board().roster(Color::Black).len(), 15);

    let outcome = game.attempt_move(sq("h7"), sq("g6")).expect("legal move");
    assert_eq!(outcome.captured, Some(PieceKind::Queen));
    assert_eq!(outcome.status, GameStatus::InProgress);
    assert_eq!(game.board().roster(Color::White).len(), 15);
}

// =====================================================================
// Constructed mates
// =====================================================================

#[test]
fn back_rank_mate_delivered_by_a_move() {
    let mut game = custom(
        Color::White,
        &[
            (Color::White, PieceKind::King, "e1"),
            (Color::White, PieceKind::Rook, "a1"),
            (Color::Black, PieceKind::King, "g8"),
            (Color::Black, PieceKind::Pawn, "f7"),
            (Color::Black, PieceKind::Pawn, "g7"),
            (Color::Black, PieceKind::Pawn, "h7"),
        ],
    );
    assert_eq!(game.status(), GameStatus::InProgress);

    let outcome = game.attempt_move(sq("a1"), sq("a8")).expect("mating move");
    assert_eq!(outcome.status, GameStatus::Checkmate(Color::Black));
}

#[test]
fn smothered_mate_by_a_knight() {
    let mut game = custom(
        Color::White,
        &[
            (Color::White, PieceKind::King, "a1"),
            (Color::White, PieceKind::Knight, "e5"),
            (Color::Black, PieceKind::King, "h8"),
            (Color::Black, PieceKind::Rook, "g8"),
            (Color::Black, PieceKind::Pawn, "g7"),
            (Color::Black, PieceKind::Pawn, "h7"),
        ],
    );

    // The knight check cannot be blocked, the king has no free square,
    // and nothing attacks f7.
    let outcome = game.attempt_move(sq("e5"), sq("f7")).expect("mating move");
    assert_eq!(outcome.status, GameStatus::Checkmate(Color::Black));
}

#[test]
fn stalemate_leaves_the_game_in_progress() {
    // The queen covers g7, g8, and h7 without attacking h8 itself. Black
    // has no legal reply, but only checkmate ends a game.
    let mut game = custom(
        Color::Black,
        &[
            (Color::White, PieceKind::King, "b1"),
            (Color::White, PieceKind::Queen, "g6"),
            (Color::Black, PieceKind::King, "h8"),
        ],
    );
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(game.legal_destinations(sq("h8")).is_empty());

    for to in ["g8", "g7", "h7"] {
        let err = game.attempt_move(sq("h8"), sq(to)).unwrap_err();
        assert!(err.to_string().contains("the king would be left in check"));
    }

    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(!game.is_game_over());
}

// =====================================================================
// Check handling
// =====================================================================

#[test]
fn discovered_double_check_forces_a_king_move() {
    let mut game = custom(
        Color::White,
        &[
            (Color::White, PieceKind::King, "h1"),
            (Color::White, PieceKind::Rook, "e1"),
            (Color::White, PieceKind::Bishop, "e4"),
            (Color::Black, PieceKind::King, "e8"),
            (Color::Black, PieceKind::Rook, "a8"),
        ],
    );

    // The bishop steps aside and checks from c6 while uncovering the rook.
    play(&mut game, "e4", "c6");
    assert_eq!(game.status(), GameStatus::Check(Color::Black));

    // Neither threat can be captured or blocked against the other, so the
    // rook is pinned to inaction. d8 passes the geometric and allowable
    // filters for the rook but the simulation still rejects it.
    assert!(game.legal_destinations(sq("a8")).is_empty());
    assert_eq!(
        game.legal_destinations(sq("e8")),
        vec![sq("f8"), sq("f7"), sq("d8")]
    );

    play(&mut game, "e8", "f8");
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn pinned_knight_has_no_moves() {
    let mut game = custom(
        Color::Black,
        &[
            (Color::White, PieceKind::King, "e1"),
            (Color::White, PieceKind::Bishop, "b5"),
            (Color::Black, PieceKind::Knight, "c6"),
            (Color::Black, PieceKind::King, "e8"),
        ],
    );
    assert_eq!(game.status(), GameStatus::InProgress);

    assert!(game.legal_destinations(sq("c6")).is_empty());
    let err = game.attempt_move(sq("c6"), sq("d4")).unwrap_err();
    assert!(err.to_string().contains("the king would be left in check"));
}

#[test]
fn capturing_the_checker_is_the_only_piece_answer() {
    let mut game = custom(
        Color::Black,
        &[
            (Color::White, PieceKind::King, "a1"),
            (Color::White, PieceKind::Queen, "e5"),
            (Color::Black, PieceKind::King, "e8"),
            (Color::Black, PieceKind::Knight, "g4"),
        ],
    );
    assert_eq!(game.status(), GameStatus::Check(Color::Black));

    // No black piece can interpose on e6 or e7, so the knight's only
    // contribution is taking the queen.
    assert_eq!(game.legal_destinations(sq("g4")), vec![sq("e5")]);

    let outcome = game.attempt_move(sq("g4"), sq("e5")).expect("legal move");
    assert_eq!(outcome.captured, Some(PieceKind::Queen));
    assert_eq!(outcome.status, GameStatus::InProgress);
}

// =====================================================================
// Bookkeeping
// =====================================================================

#[test]
fn twenty_openers_for_each_side() {
    let mut game = Game::new();

    let count = |game: &mut Game, color: Color| -> usize {
        let froms: Vec<Square> = game
            .board()
            .roster(color)
            .iter()
            .filter_map(|&id| game.board().piece(id).square)
            .collect();
        froms
            .into_iter()
            .map(|from| game.legal_destinations(from).len())
            .sum()
    };

    assert_eq!(count(&mut game, Color::White), 20);
    play(&mut game, "e2", "e4");
    assert_eq!(count(&mut game, Color::Black), 20);
}

#[test]
fn grid_and_rosters_stay_in_sync() {
    let mut game = Game::new();
    let line = [
        ("e2", "e4"),
        ("f7", "f5"),
        ("d1", "h5"),
        ("g7", "g6"),
        ("h5", "g6"),
        ("h7", "g6"),
        ("g1", "f3"),
        ("g8", "f6"),
    ];
    for (from, to) in line {
        play(&mut game, from, to);
        assert_in_sync(game.board());
    }
    assert_eq!(game.board().roster(Color::White).len(), 15);
    assert_eq!(game.board().roster(Color::Black).len(), 15);
}

#[test]
fn queries_leave_the_position_untouched() {
    let mut game = Game::new();
    play(&mut game, "e2", "e4");
    play(&mut game, "f7", "f5");
    play(&mut game, "d1", "h5");

    let before = game.board().clone();
    for square in Square::all() {
        game.legal_destinations(square);
    }
    assert_eq!(game.board(), &before);
}

#[test]
fn replays_are_deterministic() {
    let line = [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")];
    let mut a = Game::new();
    let mut b = Game::new();
    for (from, to) in line {
        play(&mut a, from, to);
        play(&mut b, from, to);
    }
    assert_eq!(a.board(), b.board());
    assert_eq!(a.board_string(), b.board_string());
    assert_eq!(a.status(), b.status());
}
