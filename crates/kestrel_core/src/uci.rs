//! UCI move-string translation and `position` command handling.
//!
//! Move strings are `<file><rank><file><rank>[qrbn]`. Parsing matches the
//! text against the legal-move list so the kind flags (castling, en passant)
//! come out right without re-deriving them.

use crate::board::Position;
use crate::error::{MoveParseError, PositionSetupError};
use crate::movegen::legal_moves;
use crate::types::*;

pub fn move_to_uci(mv: &Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if mv.kind == MoveKind::Promotion {
        let ch = match mv.promotion.unwrap_or(PieceKind::Queen) {
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            _ => 'q',
        };
        s.push(ch);
    }
    s
}

pub fn parse_uci_move(pos: &Position, txt: &str) -> Result<Move, MoveParseError> {
    if txt.len() < 4 {
        return Err(MoveParseError::TooShort(txt.to_string()));
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(|| MoveParseError::InvalidSquare(txt.to_string()))?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(|| MoveParseError::InvalidSquare(txt.to_string()))?;
    let promotion = match txt.as_bytes().get(4) {
        None => None,
        Some(b'q') | Some(b'Q') => Some(PieceKind::Queen),
        Some(b'r') | Some(b'R') => Some(PieceKind::Rook),
        Some(b'b') | Some(b'B') => Some(PieceKind::Bishop),
        Some(b'n') | Some(b'N') => Some(PieceKind::Knight),
        Some(_) => return Err(MoveParseError::InvalidPromotion(txt.to_string())),
    };

    legal_moves(pos)
        .into_iter()
        .find(|m| {
            m.from == from
                && m.to == to
                && match promotion {
                    Some(p) => m.kind == MoveKind::Promotion && m.promotion == Some(p),
                    None => m.kind != MoveKind::Promotion,
                }
        })
        .ok_or_else(|| MoveParseError::Illegal(txt.to_string()))
}

/// Execute the body of a UCI `position` command: `startpos | fen <fen>`,
/// optionally followed by `moves <uciMove>*`.
///
/// On a FEN error the position is left untouched. On a bad move the moves
/// applied so far are kept and the offending move is reported.
pub fn set_position_from_uci(pos: &mut Position, args: &[&str]) -> Result<(), PositionSetupError> {
    let mut i = 0;
    let mut next = match args.first() {
        Some(&"startpos") => {
            i = 1;
            Position::startpos()
        }
        Some(&"fen") => {
            let fen_end = args
                .iter()
                .position(|&t| t == "moves")
                .unwrap_or(args.len());
            let fen = args[1..fen_end].join(" ");
            i = fen_end;
            Position::from_fen(&fen)?
        }
        _ => Position::startpos(),
    };

    if args.get(i) == Some(&"moves") {
        for token in &args[i + 1..] {
            match parse_uci_move(&next, token) {
                Ok(mv) => {
                    next.make(&mv);
                }
                Err(err) => {
                    *pos = next;
                    return Err(err.into());
                }
            }
        }
    }

    *pos = next;
    Ok(())
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
