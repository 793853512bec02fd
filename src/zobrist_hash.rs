use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::OnceLock;

use crate::{
    board::Board,
    constants::{NUM_COLS, NUM_PIECE_TYPES, NUM_SIDES, NUM_SQUARES},
    types::{CastleSide, Piece, PieceKind, Side, Square},
};

/// Fixed so that signatures are reproducible between runs
const ZOBRIST_SEED: u64 = 0x5EED_C0DE_CAFE_F00D;

pub struct ZobristKeys {
    pieces: [[[u64; NUM_SQUARES]; NUM_PIECE_TYPES]; NUM_SIDES],
    black_to_move: u64,
    castling: [[u64; 2]; NUM_SIDES],
    en_passant_file: [u64; NUM_COLS],
}

static ZOBRIST_KEYS: OnceLock<ZobristKeys> = OnceLock::new();

fn random_key(rng: &mut StdRng) -> u64 {
    rng.gen_range(1..=u64::MAX)
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut pieces = [[[0u64; NUM_SQUARES]; NUM_PIECE_TYPES]; NUM_SIDES];

        for side in Side::iter() {
            for kind in PieceKind::iter() {
                for square in Square::iter() {
                    pieces[side as usize][kind as usize][square.index()] = random_key(&mut rng);
                }
            }
        }

        let black_to_move = random_key(&mut rng);

        let mut castling = [[0u64; 2]; NUM_SIDES];
        for keys in castling.iter_mut() {
            for key in keys.iter_mut() {
                *key = random_key(&mut rng);
            }
        }

        let mut en_passant_file = [0u64; NUM_COLS];
        for key in en_passant_file.iter_mut() {
            *key = random_key(&mut rng);
        }

        Self {
            pieces,
            black_to_move,
            castling,
            en_passant_file,
        }
    }
}

impl ZobristKeys {
    pub fn piece_key(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.side as usize][piece.kind as usize][square.index()]
    }

    pub fn black_to_move_key(&self) -> u64 {
        self.black_to_move
    }
}

pub fn zobrist_keys() -> &'static ZobristKeys {
    ZOBRIST_KEYS.get_or_init(ZobristKeys::generate)
}

/// Repetition signature: placement, side to move, castling availability and
/// an en passant file when a capture there is actually possible.
pub fn position_signature(board: &Board, side_to_move: Side) -> u64 {
    let keys = zobrist_keys();
    let mut key = 0u64;

    for (square, piece) in board.pieces() {
        key ^= keys.piece_key(piece, square);
    }

    if side_to_move == Side::Black {
        key ^= keys.black_to_move;
    }

    for side in Side::iter() {
        for (index, castle_side) in [CastleSide::KingSide, CastleSide::QueenSide]
            .into_iter()
            .enumerate()
        {
            if board.can_castle(side, castle_side) {
                key ^= keys.castling[side as usize][index];
            }
        }
    }

    if let Some(target) = board.en_passant_capturable(side_to_move) {
        key ^= keys.en_passant_file[target.col() as usize];
    }

    key
}
