use std::{collections::HashMap, fmt};

use tracing::{info, warn};

use crate::{
    board::{Board, BoardUndo},
    error::{ChessError, ChessResult},
    moves::Move,
    piece::PROMOTION_KINDS,
    types::{GameResult, PieceKind, Side, Square},
    zobrist_hash::position_signature,
};

/// Half-moves without a capture or pawn move that end the game
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;
pub const REPETITION_LIMIT: u32 = 3;

impl GameResult {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::Checkmate(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        self.winner().is_none()
    }

    /// PGN-style score, e.g. "1-0"
    pub fn score(self) -> &'static str {
        match self {
            GameResult::Checkmate(Side::White) => "1-0",
            GameResult::Checkmate(Side::Black) => "0-1",
            _ => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate(Side::White) => f.write_str("White mates"),
            GameResult::Checkmate(Side::Black) => f.write_str("Black mates"),
            GameResult::Stalemate => f.write_str("Stalemate"),
            GameResult::DrawByInsufficientMaterial => f.write_str("Draw by insufficient material"),
            GameResult::DrawByFiftyMoveRule => f.write_str("Draw by fifty move rule"),
            GameResult::DrawByRepetition => f.write_str("Draw by repetition"),
        }
    }
}

/// Board, side to move and the draw bookkeeping of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Side,
    result: Option<GameResult>,
    /// Half-moves since the last capture or pawn move
    halfmove_clock: u32,
    fullmove_number: u32,
    signature: u64,
    /// Signature -> occurrences since the last irreversible move
    repetitions: HashMap<u64, u32>,
}

/// Snapshot taken by `make_move_fast`
#[derive(Copy, Clone, Debug)]
pub struct MoveUndo {
    board: BoardUndo,
    side_to_move: Side,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Board::new(), Side::White)
    }
}

impl GameState {
    pub fn new(board: Board, side_to_move: Side) -> Self {
        Self::with_counters(board, side_to_move, 0, 1)
    }

    pub fn with_counters(
        board: Board,
        side_to_move: Side,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let signature = position_signature(&board, side_to_move);

        Self {
            board,
            side_to_move,
            result: None,
            halfmove_clock,
            fullmove_number: fullmove_number.max(1),
            signature,
            repetitions: HashMap::from([(signature, 1)]),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn signature(&self) -> u64 {
        self.signature
    }

    /// Times the current position has occurred since the last capture or
    /// pawn move
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.signature).copied().unwrap_or(0)
    }

    pub fn is_in_check(&self) -> bool {
        self.board.is_in_check(self.side_to_move)
    }

    /// Empty unless `square` holds a piece of the side to move
    pub fn legal_moves_for_piece(&self, square: Square) -> Vec<Move> {
        let mut scratch = self.board;
        let mut moves = Vec::new();
        scratch.legal_moves_from(square, self.side_to_move, &mut moves);
        moves
    }

    pub fn all_legal_moves_for(&self, side: Side) -> Vec<Move> {
        let mut scratch = self.board;
        let mut moves = Vec::with_capacity(64);
        scratch.legal_moves_for(side, &mut moves);
        moves
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.all_legal_moves_for(self.side_to_move)
    }

    /// In-place generation for the search: no board copy
    pub(crate) fn generate_legal_moves(&mut self, moves: &mut Vec<Move>) {
        moves.clear();
        self.board.legal_moves_for(self.side_to_move, moves);
    }

    /// Plays a legal move and updates all game bookkeeping. Fails if the game
    /// is over or `mv` is not legal in the current position; the state is
    /// untouched in both cases.
    pub fn make_move(&mut self, mv: &Move) -> ChessResult<()> {
        if let Some(result) = self.result {
            warn!(%mv, %result, "move rejected, game is over");
            return Err(ChessError::GameOver(result));
        }

        if !self.legal_moves_for_piece(mv.from()).contains(mv) {
            warn!(%mv, "move rejected, not legal in this position");
            return Err(ChessError::IllegalMove(mv.to_uci()));
        }

        let (_, capture_or_pawn) = self.board.make_move(mv);

        if capture_or_pawn {
            self.halfmove_clock = 0;
            self.repetitions.clear();
        } else {
            self.halfmove_clock += 1;
        }

        if self.side_to_move == Side::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = self.side_to_move.opponent();
        self.update_signature();
        self.result = self.check_game_result();

        if let Some(result) = self.result {
            info!(%result, "game over");
        }

        Ok(())
    }

    /// Resolves coordinate text ("e2e4", "e7e8q") against the legal moves and
    /// plays it
    pub fn make_uci_move(&mut self, text: &str) -> ChessResult<Move> {
        if let Some(result) = self.result {
            return Err(ChessError::GameOver(result));
        }

        let mv = self.parse_uci_move(text)?;
        self.make_move(&mv)?;
        Ok(mv)
    }

    /// Finds the legal move matching coordinate text. A missing promotion
    /// suffix means a queen.
    pub fn parse_uci_move(&self, text: &str) -> ChessResult<Move> {
        let text = text.trim();

        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(ChessError::InvalidMove(text.to_string()));
        }

        let from: Square = text[0..2].parse()?;
        let to: Square = text[2..4].parse()?;

        let promote_to = match text[4..].chars().next() {
            None => None,
            Some(letter) => match PieceKind::from_letter(letter) {
                Some(kind) if PROMOTION_KINDS.contains(&kind) => Some(kind),
                _ => return Err(ChessError::InvalidMove(text.to_string())),
            },
        };

        self.legal_moves_for_piece(from)
            .into_iter()
            .find(|mv| {
                mv.to() == to
                    && match mv.promotion() {
                        None => promote_to.is_none(),
                        Some(kind) => kind == promote_to.unwrap_or(PieceKind::Queen),
                    }
            })
            .ok_or_else(|| ChessError::IllegalMove(text.to_string()))
    }

    fn update_signature(&mut self) {
        self.signature = position_signature(&self.board, self.side_to_move);
        *self.repetitions.entry(self.signature).or_insert(0) += 1;
    }

    /// First matching rule wins: no legal moves, material, fifty moves,
    /// repetition
    fn check_game_result(&mut self) -> Option<GameResult> {
        let side = self.side_to_move;

        if !self.board.has_legal_move(side) {
            return Some(match self.board.is_in_check(side) {
                true => GameResult::Checkmate(side.opponent()),
                false => GameResult::Stalemate,
            });
        }

        if self.board.insufficient_material() {
            return Some(GameResult::DrawByInsufficientMaterial);
        }

        if self.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
            return Some(GameResult::DrawByFiftyMoveRule);
        }

        if self.repetition_count() >= REPETITION_LIMIT {
            return Some(GameResult::DrawByRepetition);
        }

        None
    }

    /// Search path: plays `mv` without touching counters, repetition history
    /// or the result. Must be paired with `unmake_move_fast`.
    pub fn make_move_fast(&mut self, mv: &Move) -> MoveUndo {
        let undo = MoveUndo {
            board: self.board.make_move(mv).0,
            side_to_move: self.side_to_move,
        };

        self.side_to_move = self.side_to_move.opponent();
        undo
    }

    pub fn unmake_move_fast(&mut self, undo: MoveUndo) {
        self.side_to_move = undo.side_to_move;
        self.board.take_back_move(&undo.board);
    }

    /// Number of leaf positions `depth` plies below this one
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let mut moves = Vec::with_capacity(64);
        self.generate_legal_moves(&mut moves);

        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;

        for mv in &moves {
            let undo = self.make_move_fast(mv);
            nodes += self.perft(depth - 1);
            self.unmake_move_fast(undo);
        }

        nodes
    }

    /// Per-root-move leaf counts, in generation order
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let mut moves = Vec::with_capacity(64);
        self.generate_legal_moves(&mut moves);

        moves
            .into_iter()
            .map(|mv| {
                let undo = self.make_move_fast(&mv);
                let nodes = self.perft(depth.saturating_sub(1));
                self.unmake_move_fast(undo);
                (mv, nodes)
            })
            .collect()
    }
}
