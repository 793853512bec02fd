use std::cmp::Reverse;

use tracing::{debug, trace};

use crate::{
    board::Board,
    constants::{INFINITY_SCORE, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, QUIESCENCE_MAX_DEPTH},
    evaluation::evaluate,
    game_state::GameState,
    moves::Move,
    time::TimeManager,
};

/// Progress hooks, called synchronously from the searching thread.
/// Every method defaults to doing nothing.
pub trait SearchObserver {
    /// A root move is about to be searched
    fn on_consider(&mut self, _mv: Move) {}

    /// A root move finished with this score (side to move's point of view)
    fn on_evaluated(&mut self, _mv: Move, _score: i32) {}

    /// The running best root score improved
    fn on_eval_update(&mut self, _score: i32) {}

    /// An iteration finished without running out of time
    fn on_depth_complete(&mut self, _depth: u16, _score: i32, _best_move: Move) {}

    /// Called once when the search ends
    fn on_stats(&mut self, _stats: &SearchStats) {}
}

impl SearchObserver for () {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Main search and quiescence nodes
    pub nodes: u64,
    pub qnodes: u64,
    /// Legal moves produced by the generator below the root
    pub generated_moves: u64,
    /// Stand-pat evaluations in quiescence
    pub leaf_evaluations: u64,
    pub beta_cutoffs: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal moves
    pub best_move: Option<Move>,
    pub evaluation: i32,
    /// Deepest fully completed iteration; 0 if none finished
    pub depth: u16,
    pub stats: SearchStats,
    pub time_ms: u64,
}

/// Promotions first, then captures, then the rest
pub fn move_order_score(board: &Board, mv: &Move) -> u8 {
    if mv.is_promotion() {
        2
    } else if mv.is_capture(board) {
        1
    } else {
        0
    }
}

/// Stable: moves of equal rank keep generation order
pub fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_key(|mv| Reverse(move_order_score(board, mv)));
}

/// Iterative deepening negamax over a private game state. Moves are played
/// and taken back in place with the fast make/unmake path.
pub struct Searcher<'a, O: SearchObserver + ?Sized> {
    state: &'a mut GameState,
    time_manager: TimeManager,
    observer: &'a mut O,
    stats: SearchStats,
}

impl<'a, O: SearchObserver + ?Sized> Searcher<'a, O> {
    pub fn new(state: &'a mut GameState, time_manager: TimeManager, observer: &'a mut O) -> Self {
        Self {
            state,
            time_manager,
            observer,
            stats: SearchStats::default(),
        }
    }

    /// Searches depth 1, 2, ... up to `max_depth`. The result of an iteration
    /// cut short by the clock is discarded, unless no iteration ever
    /// completed.
    pub fn iterative_deepening(&mut self, max_depth: u16) -> SearchResult {
        let mut root_moves = Vec::with_capacity(64);
        self.state.generate_legal_moves(&mut root_moves);

        if root_moves.is_empty() {
            let evaluation = evaluate(self.state);
            return self.finish(None, evaluation, 0);
        }

        order_moves(self.state.board(), &mut root_moves);

        let mut best: Option<(Move, i32)> = None;
        let mut partial_best: Option<(Move, i32)> = None;
        let mut completed_depth = 0;

        for depth in 1..=max_depth.max(1) {
            let beta = INFINITY_SCORE;
            let mut alpha = -INFINITY_SCORE;
            let mut best_at_depth: Option<Move> = None;
            let mut scores = Vec::with_capacity(root_moves.len());
            let mut aborted = false;

            for &mv in &root_moves {
                if self.time_manager.is_time_up() {
                    aborted = true;
                    break;
                }

                self.observer.on_consider(mv);

                let undo = self.state.make_move_fast(&mv);
                let score = -self.negamax(1, depth as i32 - 1, -beta, -alpha);
                self.state.unmake_move_fast(undo);

                self.observer.on_evaluated(mv, score);
                scores.push(score);

                if score > alpha {
                    alpha = score;
                    best_at_depth = Some(mv);
                    self.observer.on_eval_update(alpha);
                }
            }

            if aborted || self.time_manager.stopped {
                trace!(depth, "time budget exhausted, discarding partial iteration");

                if best.is_none() {
                    partial_best = best_at_depth.map(|mv| (mv, alpha));
                }
                break;
            }

            let Some(best_move) = best_at_depth else {
                break;
            };

            best = Some((best_move, alpha));
            completed_depth = depth;

            // Best-scoring root moves first at the next depth
            let mut scored: Vec<(Move, i32)> = root_moves.iter().copied().zip(scores).collect();
            scored.sort_by_key(|&(_, score)| Reverse(score));
            root_moves = scored.into_iter().map(|(mv, _)| mv).collect();

            debug!(
                depth,
                score = alpha,
                best_move = %best_move,
                nodes = self.stats.nodes,
                "completed depth"
            );
            self.observer.on_depth_complete(depth, alpha, best_move);

            if alpha.abs() > MATE_THRESHOLD {
                break;
            }
        }

        let (best_move, evaluation) = best
            .or(partial_best)
            .unwrap_or((root_moves[0], evaluate(self.state)));

        self.finish(Some(best_move), evaluation, completed_depth)
    }

    fn finish(&mut self, best_move: Option<Move>, evaluation: i32, depth: u16) -> SearchResult {
        self.observer.on_stats(&self.stats);

        SearchResult {
            best_move,
            evaluation,
            depth,
            stats: self.stats,
            time_ms: self.time_manager.elapsed().as_millis() as u64,
        }
    }

    /// Fail-hard negamax. `ply` counts from the root and biases mate scores so
    /// that shorter mates are preferred.
    fn negamax(&mut self, ply: usize, depth: i32, mut alpha: i32, beta: i32) -> i32 {
        self.stats.nodes += 1;

        if self.time_manager.should_stop(self.stats.nodes) {
            return evaluate(self.state);
        }

        if depth <= 0 || ply >= MAX_PLY {
            return self.quiescence(alpha, beta, QUIESCENCE_MAX_DEPTH);
        }

        let mut moves = Vec::with_capacity(64);
        self.state.generate_legal_moves(&mut moves);
        self.stats.generated_moves += moves.len() as u64;

        if moves.is_empty() {
            return match self.state.is_in_check() {
                true => -(MATE_SCORE - ply as i32),
                false => 0,
            };
        }

        order_moves(self.state.board(), &mut moves);

        for mv in &moves {
            let undo = self.state.make_move_fast(mv);
            let score = -self.negamax(ply + 1, depth - 1, -beta, -alpha);
            self.state.unmake_move_fast(undo);

            if score >= beta {
                self.stats.beta_cutoffs += 1;
                return beta;
            }

            if score > alpha {
                alpha = score;
            }

            if self.time_manager.stopped {
                break;
            }
        }

        alpha
    }

    /// Stand pat, then captures, promotions and checking moves only
    fn quiescence(&mut self, mut alpha: i32, beta: i32, depth: u8) -> i32 {
        self.stats.nodes += 1;
        self.stats.qnodes += 1;

        if self.time_manager.should_stop(self.stats.nodes) || depth == 0 {
            return evaluate(self.state);
        }

        self.stats.leaf_evaluations += 1;
        let stand_pat = evaluate(self.state);

        if !self.state.is_in_check() && stand_pat >= beta {
            return beta;
        }

        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = Vec::with_capacity(64);
        self.state.generate_legal_moves(&mut moves);
        self.stats.generated_moves += moves.len() as u64;

        for mv in &moves {
            let forcing = mv.is_promotion() || mv.is_capture(self.state.board());

            let undo = self.state.make_move_fast(mv);

            if forcing || self.state.is_in_check() {
                let score = -self.quiescence(-beta, -alpha, depth - 1);

                if score >= beta {
                    self.state.unmake_move_fast(undo);
                    return beta;
                }

                if score > alpha {
                    alpha = score;
                }
            }

            self.state.unmake_move_fast(undo);
        }

        alpha
    }
}
