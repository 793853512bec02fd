pub mod api;
pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod game_state;
pub mod moves;
pub mod piece;
pub mod search;
pub mod square;
pub mod time;
pub mod types;
pub mod uci;
pub mod zobrist_hash;
