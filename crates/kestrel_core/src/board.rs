//! The mutable chessboard: twelve piece bitboards, cached occupancy, packed
//! side/castling state, and make/unmake over an undo stack.
//!
//! Invariants kept by `make`/`unmake`:
//! - at most one piece bit per square across the twelve boards,
//! - the three occupancy boards equal the union of their piece boards,
//! - `ep_target` holds at most one bit, set only after a double pawn push,
//! - castling-right bits are only ever restored through the undo record.

use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::types::*;

// packed_state layout: bit 0 side to move (1 = White), bits 1-4 castling.
const SIDE_TO_MOVE: u8 = 1;
const WHITE_KINGSIDE: u8 = 1 << 1;
const WHITE_QUEENSIDE: u8 = 1 << 2;
const BLACK_KINGSIDE: u8 = 1 << 3;
const BLACK_QUEENSIDE: u8 = 1 << 4;

// Rook home squares, 0-based.
const A1: u8 = 0;
const H1: u8 = 7;
const A8: u8 = 56;
const H8: u8 = 63;

/// Which wing of the board a castling right belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

/// Everything needed to reverse one `make`. The captured square differs from
/// the move's `to` only for en passant.
#[derive(Clone, Debug)]
struct Undo {
    captured: Option<PieceKind>,
    captured_index: u8,
    ep_target: Bitboard,
    packed_state: u8,
    halfmove_clock: u32,
    mv: Move,
}

#[derive(Clone, Debug)]
pub struct Position {
    /// One bitboard per (color, kind); index = color.idx() * 6 + kind.idx().
    piece_bb: [Bitboard; 12],
    white_occ: Bitboard,
    black_occ: Bitboard,
    all_occ: Bitboard,
    /// Zero or one bit: the square behind a pawn that just double-pushed.
    ep_target: Bitboard,
    packed_state: u8,
    halfmove_clock: u32,
    fullmove_number: u32,
    undo_stack: Vec<Undo>,
}

impl Position {
    fn empty() -> Position {
        Position {
            piece_bb: [Bitboard::EMPTY; 12],
            white_occ: Bitboard::EMPTY,
            black_occ: Bitboard::EMPTY,
            all_occ: Bitboard::EMPTY,
            ep_target: Bitboard::EMPTY,
            packed_state: SIDE_TO_MOVE,
            halfmove_clock: 0,
            fullmove_number: 1,
            undo_stack: Vec::new(),
        }
    }

    /// The initial array.
    pub fn startpos() -> Position {
        let mut pos = Position::empty();
        pos.piece_bb[0] = Bitboard::RANK_2;
        pos.piece_bb[1] = Bitboard(0x42); // knights b1 g1
        pos.piece_bb[2] = Bitboard(0x24); // bishops c1 f1
        pos.piece_bb[3] = Bitboard(0x81); // rooks a1 h1
        pos.piece_bb[4] = Bitboard(0x08); // queen d1
        pos.piece_bb[5] = Bitboard(0x10); // king e1
        pos.piece_bb[6] = Bitboard::RANK_7;
        pos.piece_bb[7] = Bitboard(0x42 << 56);
        pos.piece_bb[8] = Bitboard(0x24 << 56);
        pos.piece_bb[9] = Bitboard(0x81 << 56);
        pos.piece_bb[10] = Bitboard(0x08 << 56);
        pos.piece_bb[11] = Bitboard(0x10 << 56);
        pos.packed_state =
            SIDE_TO_MOVE | WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE;
        pos.refresh_occupancy();
        pos
    }

    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let mut parts = fen.split_whitespace();
        let board_part = parts.next().ok_or(FenError::MissingField("piece placement"))?;
        let stm_part = parts.next().ok_or(FenError::MissingField("side to move"))?;
        let castle_part = parts.next().ok_or(FenError::MissingField("castling"))?;
        let ep_part = parts.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        let mut pos = Position::empty();
        pos.packed_state = 0;

        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadBoardShape);
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8; // FEN lists rank 8 first
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as u8;
                } else {
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = match ch.to_ascii_lowercase() {
                        'p' => PieceKind::Pawn,
                        'n' => PieceKind::Knight,
                        'b' => PieceKind::Bishop,
                        'r' => PieceKind::Rook,
                        'q' => PieceKind::Queen,
                        'k' => PieceKind::King,
                        _ => return Err(FenError::InvalidPiece(ch)),
                    };
                    if file >= 8 {
                        return Err(FenError::BadBoardShape);
                    }
                    pos.bb_mut(color, kind).set(rank * 8 + file);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::BadBoardShape);
                }
            }
            if file != 8 {
                return Err(FenError::BadBoardShape);
            }
        }

        match stm_part {
            "w" => pos.packed_state |= SIDE_TO_MOVE,
            "b" => {}
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        }

        if castle_part != "-" {
            for c in castle_part.chars() {
                pos.packed_state |= match c {
                    'K' => WHITE_KINGSIDE,
                    'Q' => WHITE_QUEENSIDE,
                    'k' => BLACK_KINGSIDE,
                    'q' => BLACK_QUEENSIDE,
                    _ => return Err(FenError::InvalidCastling(castle_part.to_string())),
                };
            }
        }

        if ep_part != "-" {
            let sq = coord_to_sq(ep_part)
                .ok_or_else(|| FenError::InvalidEnPassant(ep_part.to_string()))?;
            pos.ep_target = Bitboard::from_index(sq - 1);
        }

        pos.halfmove_clock = halfmove_part
            .parse()
            .map_err(|_| FenError::InvalidClock(halfmove_part.to_string()))?;
        pos.fullmove_number = fullmove_part
            .parse::<u32>()
            .map_err(|_| FenError::InvalidClock(fullmove_part.to_string()))?
            .max(1);

        pos.refresh_occupancy();
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0u32;
            for file in 0..8u8 {
                match self.piece_at_index(rank * 8 + file) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from_digit(empty, 10).unwrap());
                            empty = 0;
                        }
                        fen.push(piece_char(piece));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from_digit(empty, 10).unwrap());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.packed_state & SIDE_TO_MOVE != 0 { 'w' } else { 'b' });

        fen.push(' ');
        let castle_bits = [
            (WHITE_KINGSIDE, 'K'),
            (WHITE_QUEENSIDE, 'Q'),
            (BLACK_KINGSIDE, 'k'),
            (BLACK_QUEENSIDE, 'q'),
        ];
        let mut any = false;
        for (bit, c) in castle_bits {
            if self.packed_state & bit != 0 {
                fen.push(c);
                any = true;
            }
        }
        if !any {
            fen.push('-');
        }

        fen.push(' ');
        match self.ep_target_square() {
            Some(sq) => fen.push_str(&sq_to_coord(sq)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    // Scalar queries. Square arguments and results are 1-based.

    /// Piece at the given square, or None.
    pub fn at(&self, sq: u8) -> Option<Piece> {
        if (1..=64).contains(&sq) {
            self.piece_at_index(sq - 1)
        } else {
            None
        }
    }

    pub fn occupied(&self, sq: u8) -> bool {
        (1..=64).contains(&sq) && self.all_occ.contains(sq - 1)
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        if self.packed_state & SIDE_TO_MOVE != 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn castle_right(&self, color: Color, side: CastleSide) -> bool {
        let bit = match (color, side) {
            (Color::White, CastleSide::King) => WHITE_KINGSIDE,
            (Color::White, CastleSide::Queen) => WHITE_QUEENSIDE,
            (Color::Black, CastleSide::King) => BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queen) => BLACK_QUEENSIDE,
        };
        self.packed_state & bit != 0
    }

    /// The en-passant target square, if the previous move was a double push.
    pub fn ep_target_square(&self) -> Option<u8> {
        self.ep_target.lsb().map(|index| index + 1)
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline(always)]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    // Bitboard views used by the generator, the evaluator, and tests.

    #[inline(always)]
    pub fn piece_bits(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.piece_bb[color.idx() * 6 + kind.idx()]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        match color {
            Color::White => self.white_occ,
            Color::Black => self.black_occ,
        }
    }

    #[inline(always)]
    pub fn all_occupancy(&self) -> Bitboard {
        self.all_occ
    }

    #[inline(always)]
    pub fn ep_bits(&self) -> Bitboard {
        self.ep_target
    }

    /// 0-based index of the king, if present.
    pub fn king_index(&self, color: Color) -> Option<u8> {
        self.piece_bits(color, PieceKind::King).lsb()
    }

    /// Piece at a 0-based board index.
    pub fn piece_at_index(&self, index: u8) -> Option<Piece> {
        if !self.all_occ.contains(index) {
            return None;
        }
        let color = if self.white_occ.contains(index) {
            Color::White
        } else {
            Color::Black
        };
        for kind in PieceKind::ALL {
            if self.piece_bits(color, kind).contains(index) {
                return Some(Piece { color, kind });
            }
        }
        None
    }

    /// Whole-state save for tests; not on the hot path.
    pub fn copy_snapshot(&self) -> Position {
        self.clone()
    }

    pub fn restore_snapshot(&mut self, snapshot: &Position) {
        *self = snapshot.clone();
    }

    /// Apply a move and push its undo record. Returns false — leaving the
    /// position untouched — only for malformed moves: out-of-range squares,
    /// an empty source square, or a piece of the wrong color on it. Callers
    /// are expected to pass generator output, where none of those occur.
    pub fn make(&mut self, mv: &Move) -> bool {
        if !(1..=64).contains(&mv.from) || !(1..=64).contains(&mv.to) {
            return false;
        }
        let from = mv.from - 1;
        let to = mv.to - 1;
        let us = self.side_to_move();
        let piece = match self.piece_at_index(from) {
            Some(p) if p.color == us => p,
            _ => return false,
        };
        let them = us.other();

        let (captured, captured_index) = match mv.kind {
            MoveKind::EnPassant => {
                let index = if us == Color::White { to - 8 } else { to + 8 };
                (Some(PieceKind::Pawn), index)
            }
            _ => (self.piece_at_index(to).map(|p| p.kind), to),
        };

        self.undo_stack.push(Undo {
            captured,
            captured_index,
            ep_target: self.ep_target,
            packed_state: self.packed_state,
            halfmove_clock: self.halfmove_clock,
            mv: mv.clone(),
        });

        if let Some(kind) = captured {
            self.bb_mut(them, kind).clear(captured_index);
        }

        self.bb_mut(us, piece.kind).clear(from);
        self.bb_mut(us, piece.kind).set(to);

        self.ep_target = Bitboard::EMPTY;

        match mv.kind {
            MoveKind::Castling => {
                let base = to / 8 * 8;
                let (rook_from, rook_to) = if to > from {
                    (base + 7, base + 5) // h-file to f-file
                } else {
                    (base, base + 3) // a-file to d-file
                };
                self.bb_mut(us, PieceKind::Rook).clear(rook_from);
                self.bb_mut(us, PieceKind::Rook).set(rook_to);
            }
            MoveKind::Promotion => {
                let promoted = mv.promotion.unwrap_or(PieceKind::Queen);
                self.bb_mut(us, PieceKind::Pawn).clear(to);
                self.bb_mut(us, promoted).set(to);
            }
            _ => {}
        }

        if piece.kind == PieceKind::Pawn && from.abs_diff(to) == 16 {
            self.ep_target = Bitboard::from_index((from + to) / 2);
        }

        if piece.kind == PieceKind::King {
            self.packed_state &= match us {
                Color::White => !(WHITE_KINGSIDE | WHITE_QUEENSIDE),
                Color::Black => !(BLACK_KINGSIDE | BLACK_QUEENSIDE),
            };
        }
        // Touching a rook home square, from either end of the move, kills the
        // corresponding right. Once that square is empty the right is moot.
        for index in [from, to] {
            self.packed_state &= match index {
                A1 => !WHITE_QUEENSIDE,
                H1 => !WHITE_KINGSIDE,
                A8 => !BLACK_QUEENSIDE,
                H8 => !BLACK_KINGSIDE,
                _ => !0,
            };
        }

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.refresh_occupancy();
        self.packed_state ^= SIDE_TO_MOVE;
        true
    }

    /// Reverse the most recent `make`. No-op on an empty stack.
    pub fn unmake(&mut self) {
        let Some(undo) = self.undo_stack.pop() else {
            debug_assert!(false, "unmake on empty undo stack");
            return;
        };
        let mover = if undo.packed_state & SIDE_TO_MOVE != 0 {
            Color::White
        } else {
            Color::Black
        };
        let mv = &undo.mv;
        let from = mv.from_index() as u8;
        let to = mv.to_index() as u8;

        match mv.kind {
            MoveKind::Promotion => {
                let promoted = mv.promotion.unwrap_or(PieceKind::Queen);
                self.bb_mut(mover, promoted).clear(to);
                self.bb_mut(mover, PieceKind::Pawn).set(from);
            }
            _ => {
                let piece = self.piece_at_index(to).unwrap();
                self.bb_mut(mover, piece.kind).clear(to);
                self.bb_mut(mover, piece.kind).set(from);
                if mv.kind == MoveKind::Castling {
                    let base = to / 8 * 8;
                    let (rook_from, rook_to) = if to > from {
                        (base + 7, base + 5)
                    } else {
                        (base, base + 3)
                    };
                    self.bb_mut(mover, PieceKind::Rook).clear(rook_to);
                    self.bb_mut(mover, PieceKind::Rook).set(rook_from);
                }
            }
        }

        if let Some(kind) = undo.captured {
            self.bb_mut(mover.other(), kind).set(undo.captured_index);
        }

        if mover == Color::Black {
            self.fullmove_number -= 1;
        }
        self.ep_target = undo.ep_target;
        self.packed_state = undo.packed_state;
        self.halfmove_clock = undo.halfmove_clock;
        self.refresh_occupancy();
    }

    #[inline(always)]
    fn bb_mut(&mut self, color: Color, kind: PieceKind) -> &mut Bitboard {
        &mut self.piece_bb[color.idx() * 6 + kind.idx()]
    }

    fn refresh_occupancy(&mut self) {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for kind in PieceKind::ALL {
            white |= self.piece_bits(Color::White, kind);
            black |= self.piece_bits(Color::Black, kind);
        }
        self.white_occ = white;
        self.black_occ = black;
        self.all_occ = white | black;
    }
}

fn piece_char(piece: Piece) -> char {
    let c = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match piece.color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
