use test_utils::*;

use chess_engine::{
    board::Board,
    game_state::GameState,
    types::{Piece, PieceKind, Side, Square},
    zobrist_hash::{position_signature, zobrist_keys},
};
use std::collections::HashSet;

#[test]
fn zobrist_keys_are_shared() {
    assert!(
        std::ptr::eq(zobrist_keys(), zobrist_keys()),
        "Keys should be generated once"
    );
}

#[test]
fn zobrist_piece_keys_are_unique_and_non_zero() {
    let keys = zobrist_keys();
    let mut seen = HashSet::new();

    for side in Side::iter() {
        for kind in PieceKind::iter() {
            for square in Square::iter() {
                let key = keys.piece_key(Piece::new(kind, side), square);
                assert_ne!(key, 0, "Key for {:?} {:?} on {} is zero", side, kind, square);
                assert!(seen.insert(key), "Duplicate key for {:?} {:?} on {}", side, kind, square);
            }
        }
    }

    assert_eq!(seen.len(), 2 * 6 * 64);
    assert!(!seen.contains(&keys.black_to_move_key()));
}

#[test]
fn signature_of_empty_board_is_side_key() {
    let board = Board::empty();

    assert_eq!(position_signature(&board, Side::White), 0);
    assert_eq!(
        position_signature(&board, Side::Black),
        zobrist_keys().black_to_move_key()
    );
}

#[test]
fn signature_ignores_move_history() {
    // Same placement reached by transposition
    let mut first = GameState::default();
    play_moves(&mut first, &["g1f3", "g8f6", "b1c3"]);

    let mut second = GameState::default();
    play_moves(&mut second, &["b1c3", "g8f6", "g1f3"]);

    assert_eq!(first.signature(), second.signature());
    assert_eq!(first.signature(), position_signature(first.board(), first.side_to_move()));
}

#[test]
fn signature_distinguishes_placements() {
    let mut state = GameState::default();
    let start = state.signature();

    play_moves(&mut state, &["e2e4"]);
    assert_ne!(state.signature(), start);
}

#[test]
fn signature_includes_capturable_en_passant_file() {
    // White pawn on e5 can take on d6
    let with_target = state_from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    let without_target = state_from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");

    assert_ne!(with_target.signature(), without_target.signature());
}
