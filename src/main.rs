use std::io::{self, Write};

use chessmate::config::AppConfig;
use chessmate::game::Game;
use chessmate::snapshot::GameSnapshot;
use chessmate::types::{GameStatus, Square};

fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chessmate=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let mut game = Game::new();
    game.white_player = config.white_name;
    game.black_player = config.black_name;

    tracing::info!(
        "chessmate v{} console game {}",
        env!("CARGO_PKG_VERSION"),
        game.id
    );

    println!("{}", game.board_string());
    println!("commands: e2 e4 | moves e2 | board | state | quit");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{}> ", game.side_to_move());
        let _ = io::stdout().flush();

        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["board"] => println!("{}", game.board_string()),
            ["state"] => match serde_json::to_string_pretty(&GameSnapshot::capture(&game)) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("state unavailable: {e}"),
            },
            ["moves", square] => match Square::from_algebraic(square) {
                Some(from) => {
                    let moves = game.legal_destinations(from);
                    if moves.is_empty() {
                        println!("no legal moves from {from}");
                    } else {
                        let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                        println!("{from}: {}", list.join(" "));
                    }
                }
                None => eprintln!("not a square: {square}"),
            },
            [from, to] => handle_move(&mut game, from, to),
            _ => eprintln!("commands: e2 e4 | moves e2 | board | state | quit"),
        }

        if game.is_game_over() {
            break;
        }
    }

    if game.is_game_over() {
        println!("game over: {}", game.status());
    }
}

fn handle_move(game: &mut Game, from: &str, to: &str) {
    match game.attempt_move_named(from, to) {
        Ok(outcome) => {
            println!("{}", game.board_string());
            if let Some(kind) = outcome.captured {
                println!("captured a {kind}");
            }
            match outcome.status {
                GameStatus::Check(color) => println!("{color} is in check"),
                GameStatus::Checkmate(color) => println!("checkmate, {color} loses"),
                GameStatus::InProgress => {}
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}
