use std::time::{Duration, Instant};

use crate::constants::{
    DEFAULT_MOVETIME_MS, DEFAULT_PLAYER_INCREMENT_MS, DEFAULT_PLAYER_TIME_REMAINING_MS,
    DEFAULT_TIME_CHECK_INTERVAL,
};

/// Wall-clock budget of one search. The clock is polled cooperatively, once
/// every `check_interval` nodes; once the budget is exceeded the manager
/// stays stopped.
#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    pub start_time: Instant,
    pub hard_limit: Duration,
    pub check_interval: u64,
    pub stopped: bool,
}

/// For ease of use in tests
impl Default for TimeManager {
    fn default() -> Self {
        Self::new(DEFAULT_MOVETIME_MS, DEFAULT_TIME_CHECK_INTERVAL)
    }
}

impl TimeManager {
    /// Create a new TimeManager for each search
    pub fn new(budget_ms: u64, check_interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            hard_limit: Duration::from_millis(budget_ms),
            check_interval: check_interval.max(1),
            stopped: false,
        }
    }

    /// Budget for a move under a game clock
    pub fn budget_from_clock(
        wtime: Option<u64>, // Remaining white time (ms)
        btime: Option<u64>, // Remaining black time (ms)
        winc: Option<u64>,  // White increment (ms)
        binc: Option<u64>,  // Black increment (ms)
        is_white_turn: bool,
    ) -> u64 {
        let (time_left, increment) = match is_white_turn {
            true => (
                wtime.unwrap_or(DEFAULT_PLAYER_TIME_REMAINING_MS),
                winc.unwrap_or(DEFAULT_PLAYER_INCREMENT_MS),
            ),
            false => (
                btime.unwrap_or(DEFAULT_PLAYER_TIME_REMAINING_MS),
                binc.unwrap_or(DEFAULT_PLAYER_INCREMENT_MS),
            ),
        };

        // Use 1/30 of remaining time + increment, but never more than 25% of total
        (time_left / 30 + increment).min(time_left / 4)
    }

    /// Time since search began
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Reads the clock now
    pub fn is_time_up(&mut self) -> bool {
        if !self.stopped && self.elapsed() > self.hard_limit {
            self.stopped = true;
        }

        self.stopped
    }

    /// Called once per node; reads the clock only on interval boundaries
    pub fn should_stop(&mut self, nodes: u64) -> bool {
        if !self.stopped && nodes % self.check_interval == 0 {
            return self.is_time_up();
        }

        self.stopped
    }
}
