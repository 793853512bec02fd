#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_MAX_DEPTH, DEFAULT_MOVETIME_MS},
    engine::find_best_move,
    error::{ChessError, ChessResult},
    game_state::GameState,
};

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub fen: String,
    pub depth: Option<u16>,
    pub movetime_ms: Option<u64>,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnalyzeResponse {
    pub best_move: String,      // Coordinate notation, e.g. e2e4
    pub algebraic: String,      // Piece letter and destination, e.g. Nf3
    pub evaluation: i32,        // Centipawns, side to move's point of view
    pub depth: u16,             // Deepest completed iteration
    pub nodes: u64,             // Total nodes searched
    pub time_ms: u64,           // Time spent searching in milliseconds
    pub fen_after_move: String, // FEN string after applying best move
}

/// Main entry point for API consumers
/// Analyzes a chess position and returns the best move
pub fn analyze_position(request: AnalyzeRequest) -> ChessResult<AnalyzeResponse> {
    let mut state = GameState::from_fen(&request.fen)?;

    let depth = request.depth.unwrap_or(DEFAULT_MAX_DEPTH);
    let movetime = request.movetime_ms.unwrap_or(DEFAULT_MOVETIME_MS);

    let result = find_best_move(&state, depth, movetime, &mut ());
    let best_move = result.best_move.ok_or(ChessError::NoLegalMoves)?;
    let algebraic = best_move.to_algebraic(state.board());

    state.make_move(&best_move)?;

    Ok(AnalyzeResponse {
        best_move: best_move.to_uci(),
        algebraic,
        evaluation: result.evaluation,
        depth: result.depth,
        nodes: result.stats.nodes,
        time_ms: result.time_ms,
        fen_after_move: state.to_fen(),
    })
}

/// Simpler interface with just FEN and depth
pub fn get_best_move(fen: &str, depth: u16) -> ChessResult<AnalyzeResponse> {
    analyze_position(AnalyzeRequest {
        fen: fen.to_string(),
        depth: Some(depth),
        movetime_ms: None,
    })
}

/// JSON in, JSON out
#[cfg(feature = "api")]
pub fn analyze_json(request: &str) -> ChessResult<String> {
    let request: AnalyzeRequest = serde_json::from_str(request)?;
    let response = analyze_position(request)?;
    Ok(serde_json::to_string(&response)?)
}
