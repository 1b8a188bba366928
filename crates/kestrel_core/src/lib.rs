pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod movegen;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod uci;

pub use bitboard::Bitboard;
pub use board::{CastleSide, Position};
pub use error::{FenError, MoveParseError, PositionSetupError};
pub use movegen::{
    GenMode, filter_legal, generate, generate_into, in_check, in_check_for, is_capture,
    is_square_attacked, legal_captures_into, legal_moves, legal_moves_into,
};
pub use perft::{perft, perft_divide};
pub use time_control::{GoParams, SearchLimits, TimeControl, allocate_move_time};
pub use types::{Color, Move, MoveKind, Piece, PieceKind, coord_to_sq, sq_to_coord};
pub use uci::{move_to_uci, parse_uci_move, set_position_from_uci};

/// Result of one search invocation.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found; None only when the root has no legal moves.
    pub best_move: Option<Move>,
    /// Score in centipawns from the mover's perspective; mate scores are
    /// offset from the mate constant by the distance in plies.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    /// Deepest ply touched, quiescence included.
    pub seldepth: u8,
    /// Nodes visited, quiescence included.
    pub nodes: u64,
    /// Quiescence nodes alone.
    pub qnodes: u64,
    /// Principal variation of the last completed iteration.
    pub pv: Vec<Move>,
    /// True if the search was cut short by a limit or an external stop.
    pub stopped: bool,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            seldepth: 0,
            nodes: 0,
            qnodes: 0,
            pv: Vec::new(),
            stopped: false,
        }
    }
}

/// Implemented by every searcher that can sit behind the UCI front end.
pub trait Engine: Send {
    /// Search the position under the given limits and report the outcome.
    /// Never blocks on I/O; cancellation is polled through the limits' stop
    /// flag.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> SearchResult;

    /// Engine name for UCI identification.
    fn name(&self) -> &str;

    /// Engine author for UCI identification.
    fn author(&self) -> &str {
        "the Kestrel authors"
    }

    /// Drop per-game state (history tables and the like).
    fn new_game(&mut self) {}

    /// Set a named option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
