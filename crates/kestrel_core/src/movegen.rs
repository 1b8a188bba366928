//! Pseudo-legal move generation plus the make/unmake legality filter.
//!
//! Generation order is deterministic: pawn, knight, bishop, rook, queen,
//! king, castling; within a piece kind, from-squares ascending and
//! to-squares ascending. Ties in search scores therefore resolve the same
//! way on every run.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Position;
use crate::types::*;

/// What the generator should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    All,
    CapturesOnly,
}

/// Generate pseudo-legal moves for the side to move.
pub fn generate(pos: &Position, mode: GenMode) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    generate_into(pos, mode, &mut out);
    out
}

pub fn generate_into(pos: &Position, mode: GenMode, out: &mut Vec<Move>) {
    out.clear();
    let us = pos.side_to_move();
    gen_pawn_moves(pos, us, mode, out);
    gen_knight_moves(pos, us, mode, out);
    gen_slider_moves(pos, us, PieceKind::Bishop, mode, out);
    gen_slider_moves(pos, us, PieceKind::Rook, mode, out);
    gen_slider_moves(pos, us, PieceKind::Queen, mode, out);
    gen_king_moves(pos, us, mode, out);
    if mode == GenMode::All {
        gen_castling_moves(pos, us, out);
    }
}

/// Drop every pseudo-legal move that leaves the mover's own king in check,
/// by playing each candidate on the position and inspecting check.
pub fn filter_legal(pos: &mut Position, moves: &mut Vec<Move>) {
    let mover = pos.side_to_move();
    moves.retain(|mv| {
        if !pos.make(mv) {
            debug_assert!(false, "generator produced a move make() rejects: {mv}");
            return false;
        }
        let illegal = in_check_for(pos, mover);
        pos.unmake();
        !illegal
    });
}

/// Generate all legal moves into the provided buffer, reusing it across
/// calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    generate_into(pos, GenMode::All, out);
    filter_legal(pos, out);
}

/// Generate legal captures (including en passant and capture-promotions).
pub fn legal_captures_into(pos: &mut Position, out: &mut Vec<Move>) {
    generate_into(pos, GenMode::CapturesOnly, out);
    filter_legal(pos, out);
}

/// Convenience wrapper that leaves the position untouched.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Is the 0-based square attacked by any piece of `by`?
pub fn is_square_attacked(pos: &Position, index: u8, by: Color) -> bool {
    // A pawn of `by` attacks `index` iff a pawn of the other color standing
    // on `index` would attack it back.
    if !(pawn_attacks(by.other(), index) & pos.piece_bits(by, PieceKind::Pawn)).is_empty() {
        return true;
    }
    if !(knight_attacks(index) & pos.piece_bits(by, PieceKind::Knight)).is_empty() {
        return true;
    }
    if !(king_attacks(index) & pos.piece_bits(by, PieceKind::King)).is_empty() {
        return true;
    }
    let occupied = pos.all_occupancy();
    let diagonal = pos.piece_bits(by, PieceKind::Bishop) | pos.piece_bits(by, PieceKind::Queen);
    if !(bishop_attacks(index, occupied) & diagonal).is_empty() {
        return true;
    }
    let orthogonal = pos.piece_bits(by, PieceKind::Rook) | pos.piece_bits(by, PieceKind::Queen);
    !(rook_attacks(index, occupied) & orthogonal).is_empty()
}

/// Is the side to move in check?
pub fn in_check(pos: &Position) -> bool {
    in_check_for(pos, pos.side_to_move())
}

/// Is `color`'s king attacked?
pub fn in_check_for(pos: &Position, color: Color) -> bool {
    match pos.king_index(color) {
        Some(king) => is_square_attacked(pos, king, color.other()),
        None => false,
    }
}

/// Does this move take a piece off the board? Decided against the current
/// position, so ask before `make`.
pub fn is_capture(pos: &Position, mv: &Move) -> bool {
    match mv.kind {
        MoveKind::Capture | MoveKind::EnPassant => true,
        MoveKind::Promotion => pos.occupied(mv.to),
        _ => false,
    }
}

fn push_move(pos: &Position, out: &mut Vec<Move>, mut mv: Move) {
    mv.notation = Some(notate(pos, &mv));
    out.push(mv);
}

fn push_promotions(pos: &Position, out: &mut Vec<Move>, from: u8, to: u8) {
    for promoted in [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ] {
        let mut mv = Move::from_indices(from, to, MoveKind::Promotion);
        mv.promotion = Some(promoted);
        push_move(pos, out, mv);
    }
}

fn gen_pawn_moves(pos: &Position, us: Color, mode: GenMode, out: &mut Vec<Move>) {
    let them = us.other();
    let empty = !pos.all_occupancy();
    let enemies = pos.occupancy(them);
    let ep = pos.ep_bits();
    let (start_rank, promo_rank) = match us {
        Color::White => (1, 7),
        Color::Black => (6, 0),
    };

    let mut pawns = pos.piece_bits(us, PieceKind::Pawn);
    while let Some(from) = pawns.pop_lsb() {
        let strikes = pawn_attacks(us, from);
        let mut targets = strikes & (enemies | ep);

        if mode == GenMode::All {
            let one = match us {
                Color::White if from <= 55 => Some(from + 8),
                Color::Black if from >= 8 => Some(from - 8),
                _ => None,
            };
            if let Some(one) = one {
                if empty.contains(one) {
                    targets.set(one);
                    if rank_of(from) == start_rank {
                        let two = if us == Color::White { from + 16 } else { from - 16 };
                        if empty.contains(two) {
                            targets.set(two);
                        }
                    }
                }
            }
        }

        while let Some(to) = targets.pop_lsb() {
            if rank_of(to) == promo_rank {
                push_promotions(pos, out, from, to);
            } else {
                let kind = if strikes.contains(to) {
                    if ep.contains(to) {
                        MoveKind::EnPassant
                    } else {
                        MoveKind::Capture
                    }
                } else {
                    MoveKind::Quiet
                };
                push_move(pos, out, Move::from_indices(from, to, kind));
            }
        }
    }
}

fn gen_knight_moves(pos: &Position, us: Color, mode: GenMode, out: &mut Vec<Move>) {
    let own = pos.occupancy(us);
    let enemies = pos.occupancy(us.other());
    let mut knights = pos.piece_bits(us, PieceKind::Knight);
    while let Some(from) = knights.pop_lsb() {
        let mut targets = knight_attacks(from) & !own;
        if mode == GenMode::CapturesOnly {
            targets &= enemies;
        }
        while let Some(to) = targets.pop_lsb() {
            let kind = if enemies.contains(to) { MoveKind::Capture } else { MoveKind::Quiet };
            push_move(pos, out, Move::from_indices(from, to, kind));
        }
    }
}

fn gen_slider_moves(pos: &Position, us: Color, kind: PieceKind, mode: GenMode, out: &mut Vec<Move>) {
    let own = pos.occupancy(us);
    let enemies = pos.occupancy(us.other());
    let occupied = pos.all_occupancy();
    let mut sliders = pos.piece_bits(us, kind);
    while let Some(from) = sliders.pop_lsb() {
        let attacks = match kind {
            PieceKind::Bishop => bishop_attacks(from, occupied),
            PieceKind::Rook => rook_attacks(from, occupied),
            _ => queen_attacks(from, occupied),
        };
        let mut targets = attacks & !own;
        if mode == GenMode::CapturesOnly {
            targets &= enemies;
        }
        while let Some(to) = targets.pop_lsb() {
            let move_kind = if enemies.contains(to) { MoveKind::Capture } else { MoveKind::Quiet };
            push_move(pos, out, Move::from_indices(from, to, move_kind));
        }
    }
}

fn gen_king_moves(pos: &Position, us: Color, mode: GenMode, out: &mut Vec<Move>) {
    let own = pos.occupancy(us);
    let enemies = pos.occupancy(us.other());
    let mut kings = pos.piece_bits(us, PieceKind::King);
    while let Some(from) = kings.pop_lsb() {
        let mut targets = king_attacks(from) & !own;
        if mode == GenMode::CapturesOnly {
            targets &= enemies;
        }
        while let Some(to) = targets.pop_lsb() {
            let kind = if enemies.contains(to) { MoveKind::Capture } else { MoveKind::Quiet };
            push_move(pos, out, Move::from_indices(from, to, kind));
        }
    }
}

fn gen_castling_moves(pos: &Position, us: Color, out: &mut Vec<Move>) {
    use crate::board::CastleSide;

    let them = us.other();
    let occupied = pos.all_occupancy();
    let base: u8 = match us {
        Color::White => 0,
        Color::Black => 56,
    };

    // Kingside: squares between king and rook empty; king start, crossing,
    // and landing squares all safe.
    if pos.castle_right(us, CastleSide::King) {
        let between = Bitboard(0x60u64 << base);
        if (occupied & between).is_empty()
            && !is_square_attacked(pos, base + 4, them)
            && !is_square_attacked(pos, base + 5, them)
            && !is_square_attacked(pos, base + 6, them)
        {
            push_move(pos, out, Move::from_indices(base + 4, base + 6, MoveKind::Castling));
        }
    }
    // Queenside: b, c and d files empty; e, d and c squares safe.
    if pos.castle_right(us, CastleSide::Queen) {
        let between = Bitboard(0x0Eu64 << base);
        if (occupied & between).is_empty()
            && !is_square_attacked(pos, base + 4, them)
            && !is_square_attacked(pos, base + 3, them)
            && !is_square_attacked(pos, base + 2, them)
        {
            push_move(pos, out, Move::from_indices(base + 4, base + 2, MoveKind::Castling));
        }
    }
}

/// Diagnostic long-algebraic string: "Ng1-f3", "e4xd5", "e7-e8=Q", "O-O".
/// Captures carry an 'x'; nothing downstream parses these.
fn notate(pos: &Position, mv: &Move) -> String {
    if mv.kind == MoveKind::Castling {
        return if mv.to > mv.from { "O-O".to_string() } else { "O-O-O".to_string() };
    }

    let mut s = String::with_capacity(8);
    if let Some(piece) = pos.at(mv.from) {
        if let Some(letter) = piece.kind.letter() {
            s.push(letter);
        }
    }
    s.push_str(&sq_to_coord(mv.from));
    s.push(if is_capture(pos, mv) { 'x' } else { '-' });
    s.push_str(&sq_to_coord(mv.to));
    if mv.kind == MoveKind::Promotion {
        s.push('=');
        if let Some(letter) = mv.promotion.unwrap_or(PieceKind::Queen).letter() {
            s.push(letter);
        }
    }
    s
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
