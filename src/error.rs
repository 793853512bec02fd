//! Error types for the rules engine
//!
//! Position-description parsing has its own `FenError`; everything else a
//! caller can get wrong surfaces as a `ChessError`.

use thiserror::Error;

use crate::types::{GameResult, Side};

/// Malformed position-description (FEN) input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("Invalid FEN: expected at least placement and active color, got {0} field(s)")]
    MissingFields(usize),

    #[error("Invalid FEN rows: expected 8, got {0}")]
    InvalidRowCount(usize),

    #[error("Invalid piece letter '{0}'")]
    InvalidPiece(char),

    #[error("Invalid FEN row width: row {row} covers {width} squares")]
    InvalidRowWidth { row: usize, width: usize },

    #[error("Invalid active color '{0}' (expected 'w' or 'b')")]
    InvalidActiveColor(String),

    #[error("Invalid castling field '{0}'")]
    InvalidCastling(String),

    #[error("Invalid en passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("Invalid move counter '{0}'")]
    InvalidCounter(String),

    #[error("Invalid king count: {side:?} has {count} king(s), expected 1")]
    InvalidKingCount { side: Side, count: usize },

    /// The side that just moved cannot have left its king attacked
    #[error("Invalid position: {0:?} is in check but not to move")]
    OpponentInCheck(Side),
}

/// Errors that can occur while driving a game
#[derive(Error, Debug)]
pub enum ChessError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("Invalid square '{0}'")]
    InvalidSquare(String),

    /// Text that is not a coordinate move at all
    #[error("Invalid move format: {0}")]
    InvalidMove(String),

    /// Well-formed, but not among the legal moves of the current position
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Game is already over ({0})")]
    GameOver(GameResult),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("No legal moves in position (checkmate or stalemate)")]
    NoLegalMoves,

    #[cfg(feature = "api")]
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ChessResult<T> = Result<T, ChessError>;
