//! Error types for the text boundaries of the core: FEN parsing and UCI
//! move parsing. The board and the search never fail; bad input is rejected
//! before it reaches them.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),

    #[error("FEN board does not describe 8 ranks of 8 files")]
    BadBoardShape,

    #[error("invalid piece character '{0}' in FEN board")]
    InvalidPiece(char),

    #[error("invalid side-to-move field '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),

    #[error("invalid en-passant field '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid clock field '{0}'")]
    InvalidClock(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move string '{0}' is too short")]
    TooShort(String),

    #[error("invalid square in move '{0}'")]
    InvalidSquare(String),

    #[error("invalid promotion piece in move '{0}'")]
    InvalidPromotion(String),

    #[error("move '{0}' is not legal in this position")]
    Illegal(String),
}

impl MoveParseError {
    /// The offending move string, for `info string Invalid move:` reports.
    pub fn move_text(&self) -> &str {
        match self {
            MoveParseError::TooShort(t)
            | MoveParseError::InvalidSquare(t)
            | MoveParseError::InvalidPromotion(t)
            | MoveParseError::Illegal(t) => t,
        }
    }
}

/// Failure while executing a UCI `position` command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionSetupError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Move(#[from] MoveParseError),
}
