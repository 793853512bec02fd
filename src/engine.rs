use tracing::info;

use crate::{
    constants::{DEFAULT_MAX_DEPTH, DEFAULT_MOVETIME_MS, DEFAULT_TIME_CHECK_INTERVAL},
    error::{ChessError, ChessResult},
    game_state::GameState,
    moves::Move,
    search::{SearchObserver, SearchResult, Searcher},
    time::TimeManager,
    types::Side,
};

pub struct Engine {
    pub state: GameState,
    pub search_settings: SearchSettings,
    pub computer_side: Option<Side>,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub max_depth: u16,
    /// Fixed budget per move (ms). Takes precedence over the clock fields.
    pub movetime: Option<u64>,
    /// Nodes between two reads of the clock
    pub time_check_interval: u64,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            movetime: Some(DEFAULT_MOVETIME_MS),
            time_check_interval: DEFAULT_TIME_CHECK_INTERVAL,
            wtime: None,
            btime: None,
            winc: None,
            binc: None,
        }
    }
}

impl SearchSettings {
    pub fn with_depth_and_movetime(max_depth: u16, movetime: u64) -> Self {
        Self {
            max_depth,
            movetime: Some(movetime),
            ..Self::default()
        }
    }

    /// Budget for `side` in ms
    pub fn budget_ms(&self, side: Side) -> u64 {
        match self.movetime {
            Some(movetime) => movetime,
            None if self.wtime.is_some() || self.btime.is_some() => TimeManager::budget_from_clock(
                self.wtime,
                self.btime,
                self.winc,
                self.binc,
                side == Side::White,
            ),
            None => DEFAULT_MOVETIME_MS,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(GameState::default(), SearchSettings::default())
    }
}

/// Best move for the side to move of `state`, searched on a private copy so
/// the caller's state is never touched. `None` only when there are no legal
/// moves.
pub fn find_best_move<O: SearchObserver + ?Sized>(
    state: &GameState,
    depth_cap: u16,
    time_budget_ms: u64,
    observer: &mut O,
) -> SearchResult {
    search_with(
        state,
        depth_cap,
        TimeManager::new(time_budget_ms, DEFAULT_TIME_CHECK_INTERVAL),
        observer,
    )
}

fn search_with<O: SearchObserver + ?Sized>(
    state: &GameState,
    depth_cap: u16,
    time_manager: TimeManager,
    observer: &mut O,
) -> SearchResult {
    let mut scratch = state.clone();
    let result = Searcher::new(&mut scratch, time_manager, observer).iterative_deepening(depth_cap);

    if let Some(best_move) = result.best_move {
        info!(
            best_move = %best_move,
            evaluation = result.evaluation,
            depth = result.depth,
            nodes = result.stats.nodes,
            time_ms = result.time_ms,
            "search finished"
        );
    }

    result
}

impl Engine {
    pub fn new(state: GameState, search_settings: SearchSettings) -> Self {
        Self {
            state,
            search_settings,
            computer_side: None,
        }
    }

    pub fn new_game(&mut self) {
        self.state = GameState::default();
        self.computer_side = None;
    }

    /// Iterative deepening search of the current position under the engine's
    /// settings
    pub fn think<O: SearchObserver + ?Sized>(&self, observer: &mut O) -> SearchResult {
        let time_manager = TimeManager::new(
            self.search_settings.budget_ms(self.state.side_to_move()),
            self.search_settings.time_check_interval,
        );

        search_with(
            &self.state,
            self.search_settings.max_depth,
            time_manager,
            observer,
        )
    }

    /// Searches and plays the best move
    pub fn play_best_move<O: SearchObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> ChessResult<(Move, SearchResult)> {
        if let Some(result) = self.state.result() {
            return Err(ChessError::GameOver(result));
        }

        let result = self.think(observer);
        let best_move = result.best_move.ok_or(ChessError::NoLegalMoves)?;

        self.state.make_move(&best_move)?;
        Ok((best_move, result))
    }

    pub fn display_legal_moves(&self) {
        let mut moves: Vec<String> = self.state.legal_moves().iter().map(Move::to_uci).collect();
        moves.sort();

        for (index, move_str) in moves.iter().enumerate() {
            print!("{} ", move_str);
            if (index + 1) % 8 == 0 {
                println!();
            }
        }
        println!();
    }
}
