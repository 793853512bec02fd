use std::{
    io::{self, BufRead, Write},
    time::Instant,
};

use tracing::{debug, warn};

use crate::{
    engine::Engine,
    error::{ChessError, ChessResult},
    game_state::GameState,
    moves::Move,
    search::{SearchObserver, SearchStats},
};

const ENGINE_NAME: &str = "Mailbox Chess Engine";
const ENGINE_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Prints one `info` line per completed depth
struct InfoPrinter {
    start_time: Instant,
}

impl SearchObserver for InfoPrinter {
    fn on_depth_complete(&mut self, depth: u16, score: i32, best_move: Move) {
        println!(
            "info depth {} score cp {} time {} pv {}",
            depth,
            score,
            self.start_time.elapsed().as_millis(),
            best_move
        );
    }

    fn on_stats(&mut self, stats: &SearchStats) {
        println!("info nodes {}", stats.nodes);
    }
}

pub fn uci_loop(engine: &mut Engine) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let Ok(input) = line else {
            break;
        };

        let input = input.trim();
        let Some(command) = input.split_whitespace().next() else {
            continue;
        };

        debug!(command = input, "uci command");

        match command {
            "uci" => {
                println!("id name {}", ENGINE_NAME);
                println!("id author {}", ENGINE_AUTHOR);
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => engine.new_game(),
            "position" => {
                if let Err(e) = parse_position_command(engine, input) {
                    warn!(error = %e, "error parsing position");
                    eprintln!("Error parsing position: {}", e);
                }
            }
            "go" => {
                parse_go_command(engine, input);

                let result = engine.think(&mut InfoPrinter {
                    start_time: Instant::now(),
                });

                match result.best_move {
                    Some(best_move) => println!("bestmove {}", best_move),
                    None => println!("bestmove 0000"),
                }
            }
            "stop" => {}
            "quit" => break,
            "d" | "display" => engine.state.board().display_board(false),
            _ => {
                // Unknown commands are ignored
            }
        }

        if stdout.flush().is_err() {
            break;
        }
    }
}

/// Parse UCI position command
/// Examples:
///   position startpos
///   position startpos moves e2e4 e7e5
///   position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1
///   position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4
pub fn parse_position_command(engine: &mut Engine, command: &str) -> ChessResult<()> {
    let parts: Vec<&str> = command.split_whitespace().collect();

    let mut index = 1;

    let mut state = match parts.get(index).copied() {
        Some("startpos") => {
            index += 1;
            GameState::default()
        }
        Some("fen") => {
            index += 1;

            let fen_parts: Vec<&str> = parts[index..]
                .iter()
                .take_while(|&&part| part != "moves")
                .copied()
                .collect();

            index += fen_parts.len();
            GameState::from_fen(&fen_parts.join(" "))?
        }
        other => {
            return Err(ChessError::UnknownCommand(format!(
                "position {}",
                other.unwrap_or("")
            )));
        }
    };

    if parts.get(index) == Some(&"moves") {
        for move_str in &parts[index + 1..] {
            state.make_uci_move(move_str)?;
        }
    }

    engine.state = state;
    Ok(())
}

/// Parse UCI go command and update search settings
/// Examples:
///   go depth 10
///   go movetime 5000
///   go wtime 300000 btime 300000 winc 0 binc 0
pub fn parse_go_command(engine: &mut Engine, command: &str) {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let settings = &mut engine.search_settings;

    let value = |i: usize| parts.get(i + 1).and_then(|v| v.parse::<u64>().ok());

    let mut clock_given = false;
    let mut i = 1; // Skip "go"

    while i < parts.len() {
        match parts[i] {
            "wtime" => {
                settings.wtime = value(i);
                clock_given = true;
            }
            "btime" => {
                settings.btime = value(i);
                clock_given = true;
            }
            "winc" => settings.winc = value(i),
            "binc" => settings.binc = value(i),
            "movetime" => settings.movetime = value(i),
            "depth" => {
                if let Some(depth) = value(i) {
                    settings.max_depth = depth.clamp(1, u16::MAX as u64) as u16;
                }
            }
            _ => {
                i += 1;
                continue;
            }
        }

        i += 2;
    }

    // The clock governs unless a fixed movetime was also given
    if clock_given && !parts.contains(&"movetime") {
        settings.movetime = None;
    }
}
