use test_utils::*;

use chess_engine::{
    constants::{MATE_SCORE, MATE_THRESHOLD},
    engine::{Engine, SearchSettings, find_best_move},
    game_state::GameState,
    moves::Move,
    search::{SearchObserver, SearchStats, move_order_score, order_moves},
    types::{GameResult, Side},
};

/// Generous budget so that the depth cap decides
const NO_TIME_LIMIT_MS: u64 = 600_000;

fn best_move_uci(fen: &str, depth: u16) -> Option<String> {
    let state = state_from_fen(fen);
    find_best_move(&state, depth, NO_TIME_LIMIT_MS, &mut ())
        .best_move
        .map(|mv| mv.to_uci())
}

mod alpha_beta {
    use super::*;

    #[test]
    fn test_finds_mate_in_one() {
        let state = state_from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let result = find_best_move(&state, 3, NO_TIME_LIMIT_MS, &mut ());

        assert_eq!(result.best_move.map(|mv| mv.to_uci()), Some("a1a8".to_string()));
        assert!(
            result.evaluation > MATE_THRESHOLD,
            "Mate should score above the threshold, got {}",
            result.evaluation
        );
        assert_eq!(
            result.evaluation,
            MATE_SCORE - 1,
            "Mate one ply from the root"
        );
    }

    #[test]
    fn test_no_move_when_checkmated() {
        let mut state = GameState::default();
        play_moves(&mut state, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        let result = find_best_move(&state, 3, NO_TIME_LIMIT_MS, &mut ());
        assert_eq!(result.best_move, None);
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn test_no_move_when_stalemated() {
        let state = state_from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1");
        assert!(!state.is_in_check());

        let result = find_best_move(&state, 2, NO_TIME_LIMIT_MS, &mut ());
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_search_is_deterministic() {
        let state = state_from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");

        let first = find_best_move(&state, 2, NO_TIME_LIMIT_MS, &mut ());
        let second = find_best_move(&state, 2, NO_TIME_LIMIT_MS, &mut ());

        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.evaluation, second.evaluation);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_search_leaves_the_state_untouched() {
        let state = state_from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let fen_before = state.to_fen();

        find_best_move(&state, 2, NO_TIME_LIMIT_MS, &mut ());

        assert_eq!(state.to_fen(), fen_before);
    }
}

mod quiescence {
    use super::*;

    #[test]
    fn test_takes_hanging_queen() {
        assert_eq!(
            best_move_uci("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 2),
            Some("d2d5".to_string())
        );
    }

    #[test]
    fn test_black_trades_rook_for_queen() {
        // Kxd2 recaptures, but the queen is worth more than the rook
        assert_eq!(
            best_move_uci("4k3/8/8/3r4/8/8/3Q4/4K3 b - - 0 1", 1),
            Some("d5d2".to_string())
        );
    }
}

mod move_ordering {
    use super::*;

    #[test]
    fn test_promotions_then_captures_then_quiet_moves() {
        let state = state_from_fen("4k3/1P6/8/8/8/8/3n4/4K3 w - - 0 1");
        let board = *state.board();

        let mut moves = state.legal_moves();
        order_moves(&board, &mut moves);

        let scores: Vec<u8> = moves.iter().map(|mv| move_order_score(&board, mv)).collect();
        assert!(
            scores.windows(2).all(|pair| pair[0] >= pair[1]),
            "Scores should not increase: {:?}",
            scores
        );

        assert!(moves[..4].iter().all(Move::is_promotion));
        assert_eq!(moves[4].to_uci(), "e1d2", "The capture comes right after the promotions");
        assert_eq!(scores.last(), Some(&0));
    }

    #[test]
    fn test_ordering_is_stable() {
        let state = GameState::default();
        let board = *state.board();

        let generated = state.legal_moves();
        let mut ordered = generated.clone();
        order_moves(&board, &mut ordered);

        assert_eq!(generated, ordered, "All quiet: generation order is kept");
    }
}

mod termination {
    use super::*;

    #[test]
    fn test_depth_cap_is_respected() {
        let result = find_best_move(&GameState::default(), 2, NO_TIME_LIMIT_MS, &mut ());
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn test_zero_time_budget_still_returns_a_legal_move() {
        let state = GameState::default();
        let result = find_best_move(&state, 10, 0, &mut ());

        let best_move = result.best_move.expect("A move should always be returned");
        assert!(state.legal_moves().contains(&best_move));
    }

    #[test]
    fn test_short_budget_stops_deep_search() {
        let state = state_from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let result = find_best_move(&state, 40, 200, &mut ());

        assert!(result.best_move.is_some());
        assert!(result.depth < 40, "Depth 40 cannot complete in 200ms");
        assert!(
            result.time_ms < 5_000,
            "Search should stop shortly after the budget, took {}ms",
            result.time_ms
        );
    }
}

mod observer {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        considered: usize,
        evaluated: Vec<(Move, i32)>,
        eval_updates: Vec<i32>,
        completed: Vec<(u16, i32, Move)>,
        stats: Option<SearchStats>,
    }

    impl SearchObserver for Recorder {
        fn on_consider(&mut self, _mv: Move) {
            self.considered += 1;
        }

        fn on_evaluated(&mut self, mv: Move, score: i32) {
            self.evaluated.push((mv, score));
        }

        fn on_eval_update(&mut self, score: i32) {
            self.eval_updates.push(score);
        }

        fn on_depth_complete(&mut self, depth: u16, score: i32, best_move: Move) {
            self.completed.push((depth, score, best_move));
        }

        fn on_stats(&mut self, stats: &SearchStats) {
            self.stats = Some(*stats);
        }
    }

    #[test]
    fn test_callbacks_fire_during_search() {
        let state = GameState::default();
        let mut recorder = Recorder::default();

        let result = find_best_move(&state, 2, NO_TIME_LIMIT_MS, &mut recorder);

        assert_eq!(recorder.considered, 40, "20 root moves at each of 2 depths");
        assert_eq!(recorder.evaluated.len(), 40);
        assert!(!recorder.eval_updates.is_empty());

        let depths: Vec<u16> = recorder.completed.iter().map(|&(depth, _, _)| depth).collect();
        assert_eq!(depths, vec![1, 2]);

        let (_, score, best_move) = recorder.completed[1];
        assert_eq!(Some(best_move), result.best_move);
        assert_eq!(score, result.evaluation);

        let stats = recorder.stats.expect("Stats should be reported once at the end");
        assert_eq!(stats, result.stats);
        assert!(stats.nodes > 0);
    }

    #[test]
    fn test_eval_updates_rise_within_a_depth() {
        let state = GameState::default();
        let mut recorder = Recorder::default();

        find_best_move(&state, 1, NO_TIME_LIMIT_MS, &mut recorder);

        assert!(
            recorder.eval_updates.windows(2).all(|pair| pair[0] < pair[1]),
            "Each update should improve on the last: {:?}",
            recorder.eval_updates
        );
    }
}

mod engine {
    use super::*;

    #[test]
    fn test_play_best_move_advances_the_game() {
        let mut engine = Engine::new(
            GameState::default(),
            SearchSettings::with_depth_and_movetime(2, NO_TIME_LIMIT_MS),
        );

        let (played, result) = engine.play_best_move(&mut ()).unwrap();

        assert_eq!(Some(played), result.best_move);
        assert_eq!(engine.state.side_to_move(), Side::Black);
        assert_eq!(engine.state.fullmove_number(), 1);
    }

    #[test]
    fn test_play_best_move_finishes_the_game() {
        let mut engine = Engine::new(
            state_from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1"),
            SearchSettings::with_depth_and_movetime(3, NO_TIME_LIMIT_MS),
        );

        engine.play_best_move(&mut ()).unwrap();
        assert_eq!(
            engine.state.result(),
            Some(GameResult::Checkmate(Side::White))
        );
        assert!(engine.play_best_move(&mut ()).is_err(), "Game is over");
    }

    #[test]
    fn test_settings_budget() {
        let settings = SearchSettings {
            movetime: None,
            wtime: Some(30_000),
            ..SearchSettings::default()
        };

        assert_eq!(settings.budget_ms(Side::White), 1000);
        assert_eq!(
            settings.budget_ms(Side::Black),
            10_000,
            "Missing clock falls back to five minutes"
        );
    }
}
