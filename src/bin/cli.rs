use chess_engine::engine::Engine;
use chess_engine::game_state::GameState;
use chess_engine::moves::Move;
use chess_engine::search::{SearchObserver, SearchStats};
use chess_engine::types::{GameResult, Side};
use rand::Rng;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// `st` argument in whole seconds, as milliseconds
fn parse_seconds_as_ms(text: &str) -> Option<u64> {
    text.trim()
        .parse::<u64>()
        .ok()
        .map(|seconds| seconds.saturating_mul(1000))
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let len = s.len();

    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

fn flush() {
    let _ = io::stdout().flush();
}

/// Reads one line; `None` on EOF or error
fn read_line() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

/// One table row per completed depth
#[derive(Default)]
struct DepthTable {
    stats: SearchStats,
}

impl SearchObserver for DepthTable {
    fn on_depth_complete(&mut self, depth: u16, score: i32, best_move: Move) {
        println!("│ {:>4} │ {:>8} │ {:^18} │", depth, score, best_move.to_uci());
        flush();
    }

    fn on_stats(&mut self, stats: &SearchStats) {
        self.stats = *stats;
    }
}

struct CLI {
    engine: Engine,
    display_enabled: bool,
    flip: bool,
}

impl CLI {
    fn new() -> Self {
        Self {
            engine: Engine::default(),
            display_enabled: true,
            flip: false,
        }
    }

    fn show_help(&self) {
        println!("\n======================= INFORMATION ======================");
        println!("h or help - Displays help on the commands");
        println!("d or dd   - Displays board and toggles display setting");
        println!("moves     - Displays of list of possible moves");
        println!("fen       - Displays a FEN string for the current position");
        println!("f         - Flips the board");
        println!("q or quit - Quits the program");
        println!("================= CONTROLLING THE ENGINE =================");
        println!("go        - Starts the engine from the current position");
        println!("new       - Starts a new game");
        println!("p or play - The computer plays a move");
        println!("off       - Turns the computer player off");
        println!("===================== CONFIGURATION ======================");
        println!("fen <FEN>    - Loads a FEN string");
        println!("sd <depth>   - Sets the maximum search depth");
        println!("st <seconds> - Sets the time limit per move in seconds");
    }

    fn display_board(&self) {
        if self.display_enabled {
            self.engine.state.board().display_board(self.flip);
        }
    }

    fn print_result(&mut self, result: Option<GameResult>) {
        let Some(result) = result else {
            return;
        };

        self.display_board();
        println!(
            "\nGAME OVER: {}",
            if result.is_draw() { "draw" } else { "decisive" }
        );
        println!("{{{}}} {}", result, result.score());

        self.engine.new_game();
    }

    fn run_main_loop(&mut self) {
        self.display_board();

        loop {
            println!("\n-------------------------------");
            println!(
                "*   Move: {} | To move: {:?}   *",
                self.engine.state.fullmove_number(),
                self.engine.state.side_to_move()
            );
            println!("-------------------------------");

            // Computer's turn
            if self.engine.computer_side == Some(self.engine.state.side_to_move()) {
                println!("\nComputer is thinking...");
                println!("\n┌──────┬──────────┬────────────────────┐");
                println!("│ DEPTH│  SCORE   │     BEST MOVE      │");
                println!("├──────┼──────────┼────────────────────┤");

                if self.make_computer_move() {
                    self.print_result(self.engine.state.result());
                } else {
                    println!("(No legal moves)");
                    self.engine.computer_side = None;
                }

                self.display_board();
                continue;
            }

            print!("\nFrom square OR command > ");
            flush();

            let Some(input) = read_line() else {
                return;
            };

            let command = input.trim().to_lowercase();

            // COMMANDS WITHOUT PARAMETERS
            match command.as_str() {
                "d" => {
                    self.engine.state.board().display_board(self.flip);
                    continue;
                }
                "dd" => {
                    self.display_enabled = !self.display_enabled;

                    if self.display_enabled {
                        println!("\nBoard display enabled");
                        self.display_board();
                    } else {
                        println!("\nBoard display disabled");
                    }
                    continue;
                }
                "f" => {
                    self.flip = !self.flip;
                    self.display_board();
                    continue;
                }
                "go" => {
                    self.handle_go_command();
                    continue;
                }
                "h" | "help" => {
                    self.show_help();
                    continue;
                }
                "fen" => {
                    println!("\n{}", self.engine.state.to_fen());
                    continue;
                }
                "moves" => {
                    println!("\nLegal moves:");
                    self.engine.display_legal_moves();
                    continue;
                }
                "new" => {
                    self.engine.new_game();
                    self.display_board();
                    continue;
                }
                "p" | "play" => {
                    self.engine.computer_side = Some(self.engine.state.side_to_move());
                    continue;
                }
                "off" => {
                    self.engine.computer_side = None;
                    continue;
                }
                "q" | "quit" => {
                    println!("\nProgram exiting");
                    break;
                }
                _ => {}
            }

            // COMMANDS WITH PARAMETERS
            if let Some(fen_str) = input.trim().strip_prefix("fen ") {
                match GameState::from_fen(fen_str) {
                    Ok(state) => {
                        self.engine.state = state;
                        self.display_board();
                        println!("FEN loaded successfully");
                    }
                    Err(e) => println!("Error loading FEN: {}", e),
                }
                continue;
            }

            if let Some(depth) = command.strip_prefix("sd ") {
                if let Ok(depth) = depth.trim().parse::<u16>() {
                    self.engine.search_settings.max_depth = depth.max(1);
                    println!("\nSearch maximum search depth set to {}", depth);
                }
                continue;
            }

            if let Some(time) = command.strip_prefix("st ") {
                if let Some(movetime) = parse_seconds_as_ms(time) {
                    self.engine.search_settings.movetime = Some(movetime);
                    println!("\nSearch time set to {} seconds", movetime / 1000);
                }
                continue;
            }

            // PARSE "FROM" AND THEN "TO" SQUARE
            let mut move_str = command.replace(' ', "");

            if move_str.len() == 2 {
                print!("             To square > ");
                flush();

                let Some(to_input) = read_line() else {
                    return;
                };
                println!();

                move_str.push_str(to_input.trim());
            }

            match self.engine.state.make_uci_move(&move_str) {
                Ok(_) => {
                    self.print_result(self.engine.state.result());
                    self.display_board();
                }
                Err(e) => println!("\nILLEGAL MOVE! ({})", e),
            }
        }
    }

    fn handle_go_command(&mut self) {
        println!("\nChoose your side:");
        println!("1. White");
        println!("2. Black");
        println!("3. Random");
        print!("\nEnter choice (1-3) > ");
        flush();

        let Some(input) = read_line() else {
            return;
        };

        println!();

        let player_side = match input.trim() {
            "1" => Side::White,
            "2" => Side::Black,
            "3" => {
                let side = match rand::thread_rng().gen_bool(0.5) {
                    true => Side::White,
                    false => Side::Black,
                };
                println!("You are playing as {:?}", side);
                side
            }
            _ => {
                println!("Invalid choice. Defaulting to White.");
                Side::White
            }
        };

        self.engine.computer_side = Some(player_side.opponent());
    }

    fn make_computer_move(&mut self) -> bool {
        let mut table = DepthTable::default();

        let played = self.engine.play_best_move(&mut table);

        println!("└──────┴──────────┴────────────────────┘");

        let (best_move, result) = match played {
            Ok(played) => played,
            Err(_) => return false,
        };

        let stats = table.stats;
        let elapsed_ms = result.time_ms;

        let nodes_per_second = match elapsed_ms {
            0 => 0, // Avoid division by zero
            ms => ((stats.nodes as f64 / ms as f64) * 1000.0) as u64,
        };

        let q_percent = match stats.nodes {
            0 => 0,
            nodes => (stats.qnodes as f64 / nodes as f64 * 100.0) as u64,
        };

        println!("\n┌─────────────────────── SEARCH STATISTICS ───────────────────────┐");
        println!(
            "│ Time:        {:>9} ms  │  Depth:  {:>4}                       │",
            format_with_commas(elapsed_ms),
            result.depth,
        );
        println!(
            "│ Nodes:       {:>12}  │  Qui-Nodes:    {:>12} ({}%)  │",
            format_with_commas(stats.nodes),
            format_with_commas(stats.qnodes),
            q_percent
        );
        println!(
            "│ NPS:         {:>12}  │  β-Cutoffs:    {:>12}       │",
            format_with_commas(nodes_per_second),
            format_with_commas(stats.beta_cutoffs),
        );
        println!("└─────────────────────────────────────────────────────────────────┘");

        println!("\nComputer plays: \x1b[32m{}\x1b[0m", best_move.to_uci());

        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    println!("\n==============================");
    println!("|   Mailbox Chess Engine     |");
    println!("==============================\n");
    println!("\n\"h or help\" displays a list of commands\n");

    let mut cli = CLI::new();
    cli.run_main_loop();
}
