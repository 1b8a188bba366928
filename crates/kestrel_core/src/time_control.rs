//! Search limits, the shared stop flag, and move-time allocation.
//!
//! `TimeControl` is cheaply cloneable; the UCI thread keeps one clone to
//! signal `stop` while the search thread polls its own. The flag transitions
//! false -> true once per search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::types::Color;

/// Raw clock data from a UCI `go` command. Times are milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub move_time: Option<u64>,
    pub nodes: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub moves_to_go: Option<u32>,
    pub infinite: bool,
}

/// Decide how long the mover may think.
///
/// `movetime` overrides everything; `infinite` disables the wall clock.
/// Otherwise budget `remaining / movesToGo` (default 30) plus three quarters
/// of the increment, capped at a quarter of the remaining clock.
pub fn allocate_move_time(side: Color, params: &GoParams) -> Option<Duration> {
    if let Some(ms) = params.move_time {
        if ms > 0 {
            return Some(Duration::from_millis(ms));
        }
    }
    if params.infinite {
        return None;
    }

    let (remaining, increment) = match side {
        Color::White => (params.wtime, params.winc.unwrap_or(0)),
        Color::Black => (params.btime, params.binc.unwrap_or(0)),
    };
    let remaining = remaining?;
    if remaining == 0 {
        return None;
    }

    let moves_to_go = u64::from(params.moves_to_go.unwrap_or(30).max(1));
    let base = remaining / moves_to_go;
    let allocated = (base + increment * 3 / 4).min(remaining / 4);
    Some(Duration::from_millis(allocated.max(1)))
}

/// Limits for one search invocation.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum search depth in plies.
    pub depth: u8,
    /// Wall-clock budget for this move (None = no clock).
    pub move_time: Option<Duration>,
    /// Node budget (None = unbounded).
    pub max_nodes: Option<u64>,
    /// `go infinite`: only an external stop ends the search.
    pub infinite: bool,
    /// Emit `info` lines while searching.
    pub verbose: bool,
    /// Shared stop flag and clock.
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// Depth-only limits, no clock.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
            max_nodes: None,
            infinite: false,
            verbose: false,
            time_control: TimeControl::new(None),
        }
    }

    /// Depth plus a wall-clock budget.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
            max_nodes: None,
            infinite: false,
            verbose: false,
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Build limits from parsed `go` parameters for the given mover.
    pub fn from_go(side: Color, params: &GoParams) -> Self {
        let move_time = if params.infinite {
            None
        } else {
            allocate_move_time(side, params)
        };
        Self {
            depth: params.depth.unwrap_or(u8::MAX),
            move_time,
            max_nodes: params.nodes,
            infinite: params.infinite,
            verbose: false,
            time_control: TimeControl::new(move_time),
        }
    }

    pub fn start(&self) {
        self.time_control.start();
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

/// Thread-safe stop flag plus the search clock.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    start_time: Arc<std::sync::RwLock<Option<Instant>>>,
    time_limit: Option<Duration>,
    /// The clock is only consulted every this many nodes.
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(std::sync::RwLock::new(None)),
            time_limit,
            check_interval: 1024,
        }
    }

    /// Start the clock; call when the search begins.
    pub fn start(&self) {
        *self.start_time.write().unwrap() = Some(Instant::now());
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// Start the clock only if it has not been started yet. Unlike `start`
    /// this never clears the stop flag, so a stop that raced ahead of the
    /// search thread is not lost.
    pub fn ensure_started(&self) {
        let mut start = self.start_time.write().unwrap();
        if start.is_none() {
            *start = Some(Instant::now());
        }
    }

    /// Cooperative cancel, also used when a limit trips.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Consult the wall clock, tripping the stop flag on expiry.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let Some(limit) = self.time_limit {
            if let Some(start) = *self.start_time.read().unwrap() {
                if start.elapsed() >= limit {
                    self.stop();
                    return true;
                }
            }
        }
        false
    }

    /// True every `check_interval` nodes.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes % self.check_interval == 0
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time
            .read()
            .unwrap()
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
