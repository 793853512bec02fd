use test_utils::*;

use chess_engine::{
    error::{ChessError, FenError},
    game_state::GameState,
    types::{CastleSide, PieceKind, Side},
};

mod errors {
    use super::*;

    fn fen_error(fen: &str) -> FenError {
        GameState::from_fen(fen).expect_err("FEN should be rejected")
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(fen_error(""), FenError::MissingFields(0));
        assert_eq!(
            fen_error("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            FenError::MissingFields(1)
        );
    }

    #[test]
    fn test_wrong_row_count() {
        assert_eq!(fen_error("8/8/8 w - - 0 1"), FenError::InvalidRowCount(3));
    }

    #[test]
    fn test_unknown_piece_letter() {
        assert_eq!(
            fen_error("rnbqkbnx/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenError::InvalidPiece('x')
        );
    }

    #[test]
    fn test_rows_must_cover_eight_squares() {
        assert_eq!(
            fen_error("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenError::InvalidRowWidth { row: 1, width: 7 }
        );
        assert_eq!(
            fen_error("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenError::InvalidRowWidth { row: 2, width: 9 }
        );
    }

    #[test]
    fn test_invalid_active_color() {
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            FenError::InvalidActiveColor("x".to_string())
        );
    }

    #[test]
    fn test_invalid_castling_field() {
        assert_eq!(
            fen_error("r3k2r/8/8/8/8/8/8/R3K2R w KQz - 0 1"),
            FenError::InvalidCastling("KQz".to_string())
        );
    }

    #[test]
    fn test_invalid_en_passant_field() {
        // Not a square
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/8/4K3 w - z9 0 1"),
            FenError::InvalidEnPassant("z9".to_string())
        );
        // A square on the wrong rank for White to move
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/8/4K3 w - e3 0 1"),
            FenError::InvalidEnPassant("e3".to_string())
        );
    }

    #[test]
    fn test_invalid_counters() {
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            FenError::InvalidCounter("x".to_string())
        );
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/8/4K3 w - - 0 -3"),
            FenError::InvalidCounter("-3".to_string())
        );
    }

    #[test]
    fn test_each_side_needs_one_king() {
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/8/K3K3 w - - 0 1"),
            FenError::InvalidKingCount {
                side: Side::White,
                count: 2
            }
        );
        assert_eq!(
            fen_error("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            FenError::InvalidKingCount {
                side: Side::Black,
                count: 0
            }
        );
    }

    #[test]
    fn test_side_not_to_move_cannot_be_in_check() {
        // The rook on e2 already attacks the Black king
        assert_eq!(
            fen_error("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1"),
            FenError::OpponentInCheck(Side::Black)
        );

        let state = state_from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1");
        assert!(state.is_in_check());
        assert!(
            !uci_moves(&state.legal_moves()).is_empty(),
            "Black can step out of check"
        );
    }

    #[test]
    fn test_fen_error_converts_into_chess_error() {
        let error: ChessError = fen_error("8/8 w").into();
        assert!(matches!(error, ChessError::Fen(FenError::InvalidRowCount(2))));
        assert_eq!(error.to_string(), "Invalid FEN rows: expected 8, got 2");
    }
}

mod optional_fields {
    use super::*;

    #[test]
    fn test_counters_are_read() {
        let state = state_from_fen("4k3/8/8/8/8/8/8/4K1N1 b - - 7 12");

        assert_eq!(state.side_to_move(), Side::Black);
        assert_eq!(state.halfmove_clock(), 7);
        assert_eq!(state.fullmove_number(), 12);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let state = state_from_fen("4k3/8/8/8/8/8/8/R3K2R w");

        assert_eq!(state.halfmove_clock(), 0);
        assert_eq!(state.fullmove_number(), 1);
        assert_eq!(
            state.to_fen(),
            "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1",
            "Without a castling field, pieces on their home squares keep their rights"
        );
    }

    #[test]
    fn test_en_passant_target_is_loaded() {
        let state = state_from_fen("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2");

        assert_eq!(state.board().pawn_skip_position(Side::Black), Some(sq("e6")));
        assert_eq!(state.board().pawn_skip_position(Side::White), None);
    }
}

mod derived_state {
    use super::*;

    #[test]
    fn test_castling_rights_follow_the_field() {
        let state = state_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1");
        let board = state.board();

        assert!(board.can_castle(Side::White, CastleSide::KingSide));
        assert!(!board.can_castle(Side::White, CastleSide::QueenSide));
        assert!(!board.can_castle(Side::Black, CastleSide::KingSide));
        assert!(board.can_castle(Side::Black, CastleSide::QueenSide));
    }

    #[test]
    fn test_pawns_off_their_start_row_cannot_double_push() {
        let state = state_from_fen("4k3/8/8/8/8/4P3/3P4/4K3 w - - 0 1");

        assert_eq!(targets_from(&state, "e3"), vec!["e4"]);
        assert_eq!(targets_from(&state, "d2"), vec!["d3", "d4"]);
    }

    #[test]
    fn test_pieces_are_placed() {
        let state = GameState::default();
        let board = state.board();

        let king = board.piece_at(sq("e1")).expect("White king on e1");
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.side, Side::White);
        assert!(!king.has_moved);

        let queen = board.piece_at(sq("d8")).expect("Black queen on d8");
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.side, Side::Black);

        assert_eq!(board.pieces().count(), 32);
    }
}

mod round_trip {
    use super::*;

    #[test]
    fn test_to_fen_reproduces_input() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ];

        for fen in fens {
            assert_eq!(state_from_fen(fen).to_fen(), fen);
        }
    }

    #[test]
    fn test_default_state_matches_starting_fen() {
        assert_eq!(
            GameState::default().to_fen(),
            chess_engine::constants::STARTING_FEN
        );
    }
}
