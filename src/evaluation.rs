use crate::{
    board::Board,
    constants::{
        BISHOP_CENTRAL_BONUS, DOUBLED_PAWN_PENALTY, ENDGAME_MATERIAL_THRESHOLD,
        KING_ACTIVITY_BONUS, KING_CENTER_PENALTY, KNIGHT_CENTRAL_BONUS, NUM_COLS, NUM_SIDES,
        PAWN_SCORE, ROOK_CENTRAL_FILE_BONUS,
    },
    game_state::GameState,
    types::{PieceKind, Side, Square},
};

/// Static evaluation from the point of view of the side to move (negamax
/// convention), in centipawns
pub fn evaluate(state: &GameState) -> i32 {
    let score = evaluate_for_white(state.board());

    match state.side_to_move() {
        Side::White => score,
        Side::Black => -score,
    }
}

/// Non-pawn, non-king material of both sides at or below two rooks
pub fn is_endgame(non_pawn_material: [i32; NUM_SIDES]) -> bool {
    non_pawn_material.iter().sum::<i32>() <= ENDGAME_MATERIAL_THRESHOLD
}

/// Material plus positional terms, positive when White is better
pub fn evaluate_for_white(board: &Board) -> i32 {
    let mut score = [0i32; NUM_SIDES];
    let mut non_pawn_material = [0i32; NUM_SIDES];
    let mut pawns_by_file = [[0i32; NUM_COLS]; NUM_SIDES];
    let mut king_squares: [Option<Square>; NUM_SIDES] = [None; NUM_SIDES];

    for (square, piece) in board.pieces() {
        let side = piece.side as usize;
        let value = piece.kind.value();

        score[side] += value;

        match piece.kind {
            PieceKind::Pawn => {
                pawns_by_file[side][square.col() as usize] += 1;

                // The table is written for White; Black reads it flipped
                let table_square = match piece.side {
                    Side::White => square,
                    Side::Black => square.flipped(),
                };
                score[side] += PAWN_SCORE[table_square.row() as usize][table_square.col() as usize];
            }
            PieceKind::Knight => {
                non_pawn_material[side] += value;
                if square.is_central() {
                    score[side] += KNIGHT_CENTRAL_BONUS;
                }
            }
            PieceKind::Bishop => {
                non_pawn_material[side] += value;
                if square.is_central() {
                    score[side] += BISHOP_CENTRAL_BONUS;
                }
            }
            PieceKind::Rook => {
                non_pawn_material[side] += value;
                if matches!(square.col(), 3 | 4) {
                    score[side] += ROOK_CENTRAL_FILE_BONUS;
                }
            }
            PieceKind::Queen => non_pawn_material[side] += value,
            PieceKind::King => king_squares[side] = Some(square),
        }
    }

    let mut total = score[Side::White as usize] - score[Side::Black as usize];

    // A central king is exposed in the middlegame and active in the endgame
    if let [Some(white_king), Some(black_king)] = king_squares {
        let king_term = match is_endgame(non_pawn_material) {
            true => KING_ACTIVITY_BONUS,
            false => -KING_CENTER_PENALTY,
        };

        if white_king.is_central() {
            total += king_term;
        }
        if black_king.is_central() {
            total -= king_term;
        }
    }

    for file in 0..NUM_COLS {
        let white_pawns = pawns_by_file[Side::White as usize][file];
        let black_pawns = pawns_by_file[Side::Black as usize][file];

        if white_pawns > 1 {
            total -= DOUBLED_PAWN_PENALTY * (white_pawns - 1);
        }
        if black_pawns > 1 {
            total += DOUBLED_PAWN_PENALTY * (black_pawns - 1);
        }
    }

    total
}
